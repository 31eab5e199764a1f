//! Access strategies
//!
//! Each strategy is one way of reaching a logical path. The selector tries
//! them in order; a strategy that cannot help reports `Unavailable` so the
//! next one runs.

use log::{debug, error};
use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use crate::error::AccessError;
use crate::grants::GrantStore;
use crate::host::{PermissionHost, TreeHost};
use crate::navigate::{ResolutionQuality, ResolvedHandle, remaining_segments, walk};
use crate::path::{AccessIntent, LogicalPath, split_segments};

/// States a resolution passes through. Every call starts at `NoAccess`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionState {
    NoAccess,
    BroadAccess,
    ScopedPending,
    ScopedResolved,
}

/// Result of one strategy attempt
pub enum StrategyOutcome {
    Resolved(ResolvedHandle),
    /// This strategy cannot serve the request; try the next one.
    Unavailable,
    /// The strategy applied but the host failed. Not retried.
    Failed(AccessError),
}

/// One way of reaching a logical path.
pub trait AccessStrategy: Send + Sync {
    fn name(&self) -> &'static str;

    /// State entered while this strategy works, if it has an intermediate one.
    fn pending_state(&self) -> Option<ResolutionState> {
        None
    }

    fn attempt(&self, path: &LogicalPath, intent: AccessIntent) -> StrategyOutcome;
}

// --------------------
// Broad access
// --------------------

/// Probes concrete paths directly while unrestricted access is held.
pub struct BroadAccessStrategy {
    permissions: Arc<dyn PermissionHost>,
    tree: Arc<dyn TreeHost>,
    roots: Vec<PathBuf>,
    app_data_dir: Vec<String>,
}

impl BroadAccessStrategy {
    /// `roots` are probed in order, canonical first.
    pub fn new(
        permissions: Arc<dyn PermissionHost>,
        tree: Arc<dyn TreeHost>,
        roots: Vec<PathBuf>,
        app_data_dir: &str,
    ) -> Self {
        Self {
            permissions,
            tree,
            roots,
            app_data_dir: split_segments(app_data_dir),
        }
    }

    /// Concrete candidate paths for `path`, in probe order.
    pub fn candidates(&self, path: &LogicalPath) -> Vec<PathBuf> {
        self.roots
            .iter()
            .map(|root| {
                let mut candidate = root.clone();
                candidate.extend(&self.app_data_dir);
                candidate.push(path.owner());
                candidate.extend(path.segments());
                candidate
            })
            .collect()
    }
}

impl AccessStrategy for BroadAccessStrategy {
    fn name(&self) -> &'static str {
        "broad-access"
    }

    fn attempt(&self, path: &LogicalPath, _intent: AccessIntent) -> StrategyOutcome {
        if !self.permissions.has_broad_access() {
            return StrategyOutcome::Unavailable;
        }

        for candidate in self.candidates(path) {
            debug!("Probing {}", candidate.display());
            let Some(node) = self.tree.open_path(&candidate) else {
                continue;
            };
            if node.exists() && node.is_directory() && node.can_read() {
                debug!("Found {path} at {}", candidate.display());
                return StrategyOutcome::Resolved(ResolvedHandle::new(
                    node,
                    path.segments().to_vec(),
                    ResolutionQuality::BroadAccess,
                ));
            }
            debug!("{} exists but is not a readable directory", candidate.display());
        }

        debug!("No probed path for {path} is readable");
        StrategyOutcome::Unavailable
    }
}

// --------------------
// Scoped grants
// --------------------

/// Navigates from the root of a persisted grant to the target.
pub struct ScopedGrantStrategy {
    store: GrantStore,
    tree: Arc<dyn TreeHost>,
    app_data_dir: String,
}

impl ScopedGrantStrategy {
    pub fn new(store: GrantStore, tree: Arc<dyn TreeHost>, app_data_dir: &str) -> Self {
        Self {
            store,
            tree,
            app_data_dir: app_data_dir.to_string(),
        }
    }

    fn navigation_failed(path: &LogicalPath, source: io::Error) -> StrategyOutcome {
        error!("Navigation failed for {path}: {source}");
        StrategyOutcome::Failed(AccessError::NavigationFailed {
            path: path.to_string(),
            source,
        })
    }
}

impl AccessStrategy for ScopedGrantStrategy {
    fn name(&self) -> &'static str {
        "scoped-grant"
    }

    fn pending_state(&self) -> Option<ResolutionState> {
        Some(ResolutionState::ScopedPending)
    }

    fn attempt(&self, path: &LogicalPath, intent: AccessIntent) -> StrategyOutcome {
        let Some(found) = self.store.find_grant_for(path, intent) else {
            return StrategyOutcome::Unavailable;
        };
        let grant = found.grant;
        debug!("Using grant {} ({:?}) for {path}", grant.key(), found.quality);

        let Some(remaining) = remaining_segments(
            &grant.document_segments(),
            &path.storage_segments(&self.app_data_dir),
            path.segments(),
        ) else {
            debug!("Grant {} lies below {path}", grant.key());
            return StrategyOutcome::Unavailable;
        };

        let root = match self.tree.open_tree(&grant) {
            Ok(Some(root)) => root,
            Ok(None) => {
                return Self::navigation_failed(
                    path,
                    io::Error::new(
                        io::ErrorKind::NotFound,
                        format!("tree for grant {} is unavailable", grant.key()),
                    ),
                );
            }
            Err(e) => return Self::navigation_failed(path, e),
        };

        if !root.exists() || !root.can_read() {
            return Self::navigation_failed(
                path,
                io::Error::new(
                    io::ErrorKind::PermissionDenied,
                    format!("root of grant {} is not readable", grant.key()),
                ),
            );
        }

        let create_missing = intent == AccessIntent::Write;

        let handle = match walk(root, &remaining, create_missing) {
            Ok(handle) => handle,
            Err(e) => return Self::navigation_failed(path, e),
        };

        let node = handle.node();
        if !node.exists() || !node.can_read() {
            return Self::navigation_failed(
                path,
                io::Error::new(
                    io::ErrorKind::PermissionDenied,
                    format!("{} is not readable", node.label()),
                ),
            );
        }

        StrategyOutcome::Resolved(handle)
    }
}
