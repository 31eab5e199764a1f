//! Handle permissions
//!
//! Re-validates a node immediately before I/O. Grants can be revoked at any
//! time, so a handle that resolved a moment ago proves nothing.

use crate::error::IoError;
use crate::storage::node::DirectoryNode;

/// Check the node still exists and is readable
pub fn ensure_readable(node: &dyn DirectoryNode) -> Result<(), IoError> {
    if node.exists() && node.can_read() {
        Ok(())
    } else {
        Err(IoError::AccessRevokedMidUse(node.label()))
    }
}

/// Check the node still exists and is writable
pub fn ensure_writable(node: &dyn DirectoryNode) -> Result<(), IoError> {
    if node.exists() && node.can_write() {
        Ok(())
    } else {
        Err(IoError::AccessRevokedMidUse(node.label()))
    }
}

/// Check the node is still a readable directory
pub fn ensure_readable_directory(node: &dyn DirectoryNode) -> Result<(), IoError> {
    ensure_readable(node)?;
    if node.is_directory() {
        Ok(())
    } else {
        Err(IoError::AccessRevokedMidUse(node.label()))
    }
}
