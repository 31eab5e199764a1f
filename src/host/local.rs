//! Local host
//!
//! A self-contained host: a table of persisted grants, each mapped to the
//! root node it opens, plus a broad-access flag. Concrete paths are probed on
//! the local filesystem.

use log::info;
use std::io;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::config::GrantConfig;
use crate::grants::AccessGrant;
use crate::host::{PermissionHost, TreeHost};
use crate::storage::{FsNode, NodeRef};

struct GrantEntry {
    grant: AccessGrant,
    root: NodeRef,
}

#[derive(Default)]
pub struct LocalHost {
    grants: RwLock<Vec<GrantEntry>>,
    broad_access: AtomicBool,
}

impl LocalHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Host with filesystem-backed grants from configuration.
    pub fn from_config(grants: &[GrantConfig], broad_access: bool) -> Self {
        let host = Self::new();
        host.set_broad_access(broad_access);
        for entry in grants {
            host.persist_grant(
                AccessGrant::new(entry.key.clone(), entry.read, entry.write),
                Arc::new(FsNode::new(&entry.root)),
            );
        }
        host
    }

    /// Records a grant the user approved. A grant with the same key is replaced.
    pub fn persist_grant(&self, grant: AccessGrant, root: NodeRef) {
        let mut grants = self.write_grants();
        grants.retain(|entry| entry.grant.key() != grant.key());
        info!("Persisted grant {}", grant.key());
        grants.push(GrantEntry { grant, root });
    }

    /// Revokes a grant. Returns whether it was held.
    pub fn revoke_grant(&self, key: &str) -> bool {
        let mut grants = self.write_grants();
        let before = grants.len();
        grants.retain(|entry| entry.grant.key() != key);
        let revoked = grants.len() != before;
        if revoked {
            info!("Revoked grant {key}");
        }
        revoked
    }

    pub fn set_broad_access(&self, granted: bool) {
        self.broad_access.store(granted, Ordering::SeqCst);
    }

    fn read_grants(&self) -> RwLockReadGuard<'_, Vec<GrantEntry>> {
        self.grants.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write_grants(&self) -> RwLockWriteGuard<'_, Vec<GrantEntry>> {
        self.grants.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl PermissionHost for LocalHost {
    fn persisted_grants(&self) -> Vec<AccessGrant> {
        self.read_grants()
            .iter()
            .map(|entry| entry.grant.clone())
            .collect()
    }

    fn has_broad_access(&self) -> bool {
        self.broad_access.load(Ordering::SeqCst)
    }
}

impl TreeHost for LocalHost {
    fn open_tree(&self, grant: &AccessGrant) -> io::Result<Option<NodeRef>> {
        Ok(self
            .read_grants()
            .iter()
            .find(|entry| entry.grant.key() == grant.key())
            .map(|entry| entry.root.clone()))
    }

    fn open_path(&self, path: &Path) -> Option<NodeRef> {
        FsNode::open(path)
    }
}
