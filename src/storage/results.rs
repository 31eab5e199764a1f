//! Storage result types
//!
//! Defines result structures returned by storage operations.

use std::fmt;

use crate::storage::node::NodeKind;

/// One entry of a directory listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryEntry {
    pub name: String,
    pub kind: NodeKind,
    pub size: u64,
}

impl fmt::Display for DirectoryEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            NodeKind::Directory => write!(f, "[DIR] {}", self.name),
            NodeKind::File => write!(f, "[FILE] {} ({} bytes)", self.name, self.size),
        }
    }
}
