//! Directory node abstraction
//!
//! The host owns the directory tree. This crate only sees it through
//! [`DirectoryNode`] and holds references for the length of one call.

use std::io::{self, Read, Write};
use std::sync::Arc;

/// Shared reference to a host-owned node.
pub type NodeRef = Arc<dyn DirectoryNode>;

/// Kind of a directory entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Directory,
    File,
}

/// Capability set of a node in the host's directory tree.
///
/// Any method may start failing or reporting `false` at any time because the
/// host can revoke access between calls.
pub trait DirectoryNode: Send + Sync {
    /// Display name. Some hosts expose nodes without one.
    fn name(&self) -> Option<String>;

    fn exists(&self) -> bool;

    fn kind(&self) -> NodeKind;

    fn can_read(&self) -> bool;

    fn can_write(&self) -> bool;

    /// Reported size in bytes. Only a hint: the stream may yield fewer.
    fn length(&self) -> u64;

    fn list_children(&self) -> io::Result<Vec<NodeRef>>;

    fn create_directory(&self, name: &str) -> io::Result<NodeRef>;

    fn create_file(&self, name: &str) -> io::Result<NodeRef>;

    fn open_read(&self) -> io::Result<Box<dyn Read + Send>>;

    /// Opens the node for writing, truncating existing content.
    fn open_write(&self) -> io::Result<Box<dyn Write + Send>>;

    fn is_directory(&self) -> bool {
        self.kind() == NodeKind::Directory
    }

    /// Display label for logs.
    fn label(&self) -> String {
        self.name().unwrap_or_else(|| "<unnamed>".to_string())
    }
}
