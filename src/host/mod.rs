//! Host collaborators
//!
//! The permission system and the directory tree belong to the host. The
//! resolver reaches them only through these traits.

mod local;

pub use local::LocalHost;

use std::io;
use std::path::Path;

use crate::grants::AccessGrant;
use crate::storage::NodeRef;

/// The host permission system.
pub trait PermissionHost: Send + Sync {
    /// Grants persisted for this process, in host enumeration order.
    fn persisted_grants(&self) -> Vec<AccessGrant>;

    /// Whether unrestricted filesystem access is currently granted.
    fn has_broad_access(&self) -> bool;
}

/// The host directory tree.
pub trait TreeHost: Send + Sync {
    /// Root node of the subtree a grant covers. `Ok(None)` when the host no
    /// longer knows the grant.
    fn open_tree(&self, grant: &AccessGrant) -> io::Result<Option<NodeRef>>;

    /// Node at a concrete path, reachable only under broad access.
    fn open_path(&self, path: &Path) -> Option<NodeRef>;
}
