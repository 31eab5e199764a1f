//! File system backed nodes
//!
//! Implements [`DirectoryNode`] on top of `std::fs` for hosts that expose
//! plain paths (desktop hosts, or broad-access probing on a device).

use std::fs::{self, File};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::storage::node::{DirectoryNode, NodeKind, NodeRef};

/// A node addressed by a concrete path.
#[derive(Debug, Clone)]
pub struct FsNode {
    path: PathBuf,
}

impl FsNode {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Shared node for `path`, or `None` when nothing exists there.
    pub fn open(path: &Path) -> Option<NodeRef> {
        if path.exists() {
            Some(Arc::new(Self::new(path)))
        } else {
            None
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn child_path(&self, name: &str) -> io::Result<PathBuf> {
        if name.is_empty() || name.contains('/') || name == "." || name == ".." {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("invalid child name: {name:?}"),
            ));
        }
        Ok(self.path.join(name))
    }
}

impl DirectoryNode for FsNode {
    fn name(&self) -> Option<String> {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
    }

    fn exists(&self) -> bool {
        self.path.exists()
    }

    fn kind(&self) -> NodeKind {
        if self.path.is_dir() {
            NodeKind::Directory
        } else {
            NodeKind::File
        }
    }

    fn can_read(&self) -> bool {
        if self.path.is_dir() {
            fs::read_dir(&self.path).is_ok()
        } else {
            File::open(&self.path).is_ok()
        }
    }

    fn can_write(&self) -> bool {
        fs::metadata(&self.path)
            .map(|metadata| !metadata.permissions().readonly())
            .unwrap_or(false)
    }

    fn length(&self) -> u64 {
        fs::metadata(&self.path)
            .map(|metadata| if metadata.is_dir() { 0 } else { metadata.len() })
            .unwrap_or(0)
    }

    fn list_children(&self) -> io::Result<Vec<NodeRef>> {
        let mut children: Vec<NodeRef> = Vec::new();
        for entry in fs::read_dir(&self.path)? {
            let entry = entry?;
            children.push(Arc::new(FsNode::new(entry.path())));
        }
        Ok(children)
    }

    fn create_directory(&self, name: &str) -> io::Result<NodeRef> {
        let path = self.child_path(name)?;
        fs::create_dir(&path)?;
        Ok(Arc::new(FsNode::new(path)))
    }

    fn create_file(&self, name: &str) -> io::Result<NodeRef> {
        let path = self.child_path(name)?;
        File::create(&path)?;
        Ok(Arc::new(FsNode::new(path)))
    }

    fn open_read(&self) -> io::Result<Box<dyn Read + Send>> {
        Ok(Box::new(File::open(&self.path)?))
    }

    fn open_write(&self) -> io::Result<Box<dyn Write + Send>> {
        Ok(Box::new(File::create(&self.path)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_open_missing_path() {
        let dir = TempDir::new().unwrap();
        assert!(FsNode::open(&dir.path().join("missing")).is_none());
        assert!(FsNode::open(dir.path()).is_some());
    }

    #[test]
    fn test_create_and_list_children() {
        let dir = TempDir::new().unwrap();
        let root = FsNode::new(dir.path());
        root.create_directory("files").unwrap();
        root.create_file("notes.txt").unwrap();

        let mut names: Vec<String> = root
            .list_children()
            .unwrap()
            .iter()
            .filter_map(|child| child.name())
            .collect();
        names.sort();
        assert_eq!(names, ["files", "notes.txt"]);
    }

    #[test]
    fn test_rejects_traversal_names() {
        let dir = TempDir::new().unwrap();
        let root = FsNode::new(dir.path());
        assert!(root.create_directory("..").is_err());
        assert!(root.create_file("a/b").is_err());
    }

    #[test]
    fn test_write_then_read() {
        let dir = TempDir::new().unwrap();
        let root = FsNode::new(dir.path());
        let file = root.create_file("data.bin").unwrap();
        file.open_write().unwrap().write_all(b"abc").unwrap();

        let mut content = Vec::new();
        file.open_read().unwrap().read_to_end(&mut content).unwrap();
        assert_eq!(content, b"abc");
        assert_eq!(file.length(), 3);
        assert_eq!(file.kind(), NodeKind::File);
    }
}
