//! In-memory nodes
//!
//! A [`DirectoryNode`] tree kept entirely in memory. Hosts that mediate
//! storage through something other than a local filesystem (an object store,
//! a recorded device tree) can be modelled with it, and it exposes knobs to
//! simulate revocation and host failures.

use std::io::{self, Read, Write};
use std::sync::{Arc, Mutex, MutexGuard};

use crate::storage::node::{DirectoryNode, NodeKind, NodeRef};

struct State {
    exists: bool,
    readable: bool,
    writable: bool,
    fail_listing: bool,
    reported_length: Option<u64>,
    content: Vec<u8>,
    children: Vec<MemoryNode>,
}

struct Inner {
    name: Option<String>,
    kind: NodeKind,
    state: Mutex<State>,
}

impl Inner {
    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Cheaply cloneable handle to a shared in-memory node.
#[derive(Clone)]
pub struct MemoryNode {
    inner: Arc<Inner>,
}

impl MemoryNode {
    fn build(name: Option<String>, kind: NodeKind, content: Vec<u8>) -> Self {
        Self {
            inner: Arc::new(Inner {
                name,
                kind,
                state: Mutex::new(State {
                    exists: true,
                    readable: true,
                    writable: true,
                    fail_listing: false,
                    reported_length: None,
                    content,
                    children: Vec::new(),
                }),
            }),
        }
    }

    pub fn directory(name: &str) -> Self {
        Self::build(Some(name.to_string()), NodeKind::Directory, Vec::new())
    }

    pub fn file(name: &str, content: &[u8]) -> Self {
        Self::build(Some(name.to_string()), NodeKind::File, content.to_vec())
    }

    /// A directory whose host reports no display name.
    pub fn unnamed_directory() -> Self {
        Self::build(None, NodeKind::Directory, Vec::new())
    }

    /// Attaches `child` and returns it for chaining deeper levels.
    pub fn add_child(&self, child: MemoryNode) -> MemoryNode {
        self.inner.state().children.push(child.clone());
        child
    }

    /// Builds nested directories below this node, returning the deepest.
    pub fn add_path(&self, path: &str) -> MemoryNode {
        path.split('/')
            .filter(|segment| !segment.is_empty())
            .fold(self.clone(), |parent, segment| {
                match parent.child(segment) {
                    Some(existing) => existing,
                    None => parent.add_child(MemoryNode::directory(segment)),
                }
            })
    }

    /// Direct child with exactly this name.
    pub fn child(&self, name: &str) -> Option<MemoryNode> {
        self.inner
            .state()
            .children
            .iter()
            .find(|child| child.inner.name.as_deref() == Some(name))
            .cloned()
    }

    pub fn content(&self) -> Vec<u8> {
        self.inner.state().content.clone()
    }

    /// Number of nodes in this subtree, including this one.
    pub fn node_count(&self) -> usize {
        let children = self.inner.state().children.clone();
        1 + children.iter().map(MemoryNode::node_count).sum::<usize>()
    }

    /// Drops read and write capability, as a host revoking a grant would.
    pub fn revoke(&self) {
        let mut state = self.inner.state();
        state.readable = false;
        state.writable = false;
    }

    pub fn set_readable(&self, readable: bool) {
        self.inner.state().readable = readable;
    }

    pub fn set_writable(&self, writable: bool) {
        self.inner.state().writable = writable;
    }

    /// Marks the node as deleted by the host.
    pub fn remove(&self) {
        self.inner.state().exists = false;
    }

    /// Makes `list_children` fail the way a misbehaving provider would.
    pub fn fail_listing(&self, fail: bool) {
        self.inner.state().fail_listing = fail;
    }

    /// Overrides the size the node reports, without touching its content.
    pub fn set_reported_length(&self, length: Option<u64>) {
        self.inner.state().reported_length = length;
    }

    pub fn into_ref(self) -> NodeRef {
        Arc::new(self)
    }

    fn is_same(&self, other: &MemoryNode) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    fn create_child(&self, name: &str, kind: NodeKind) -> io::Result<NodeRef> {
        let mut state = self.inner.state();
        if !state.exists || !state.writable {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                format!("cannot create {name} under {}", self.label()),
            ));
        }
        if state
            .children
            .iter()
            .any(|child| child.inner.name.as_deref() == Some(name))
        {
            return Err(io::Error::new(
                io::ErrorKind::AlreadyExists,
                format!("{name} already exists"),
            ));
        }
        let child = Self::build(Some(name.to_string()), kind, Vec::new());
        state.children.push(child.clone());
        Ok(child.into_ref())
    }
}

impl PartialEq for MemoryNode {
    fn eq(&self, other: &Self) -> bool {
        self.is_same(other)
    }
}

impl std::fmt::Debug for MemoryNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryNode")
            .field("name", &self.inner.name)
            .field("kind", &self.inner.kind)
            .finish()
    }
}

impl DirectoryNode for MemoryNode {
    fn name(&self) -> Option<String> {
        self.inner.name.clone()
    }

    fn exists(&self) -> bool {
        self.inner.state().exists
    }

    fn kind(&self) -> NodeKind {
        self.inner.kind
    }

    fn can_read(&self) -> bool {
        let state = self.inner.state();
        state.exists && state.readable
    }

    fn can_write(&self) -> bool {
        let state = self.inner.state();
        state.exists && state.writable
    }

    fn length(&self) -> u64 {
        let state = self.inner.state();
        state
            .reported_length
            .unwrap_or(state.content.len() as u64)
    }

    fn list_children(&self) -> io::Result<Vec<NodeRef>> {
        let state = self.inner.state();
        if state.fail_listing {
            return Err(io::Error::other(format!(
                "provider failed to list {}",
                self.label()
            )));
        }
        if !state.exists || !state.readable {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                format!("cannot list {}", self.label()),
            ));
        }
        Ok(state
            .children
            .iter()
            .filter(|child| child.inner.state().exists)
            .map(|child| child.clone().into_ref())
            .collect())
    }

    fn create_directory(&self, name: &str) -> io::Result<NodeRef> {
        self.create_child(name, NodeKind::Directory)
    }

    fn create_file(&self, name: &str) -> io::Result<NodeRef> {
        self.create_child(name, NodeKind::File)
    }

    fn open_read(&self) -> io::Result<Box<dyn Read + Send>> {
        let state = self.inner.state();
        if !state.exists || !state.readable {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                format!("cannot read {}", self.label()),
            ));
        }
        Ok(Box::new(io::Cursor::new(state.content.clone())))
    }

    fn open_write(&self) -> io::Result<Box<dyn Write + Send>> {
        let mut state = self.inner.state();
        if !state.exists || !state.writable {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                format!("cannot write {}", self.label()),
            ));
        }
        state.content.clear();
        Ok(Box::new(MemoryWriter {
            inner: Arc::clone(&self.inner),
        }))
    }
}

struct MemoryWriter {
    inner: Arc<Inner>,
}

impl Write for MemoryWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut state = self.inner.state();
        if !state.exists || !state.writable {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                "write access revoked",
            ));
        }
        state.content.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_path_reuses_existing_levels() {
        let root = MemoryNode::directory("root");
        let first = root.add_path("files/dragon2017");
        let second = root.add_path("files/dragon2017/assets");
        assert_eq!(root.node_count(), 4);
        assert_eq!(first.child("assets"), Some(second));
    }

    #[test]
    fn test_revoked_node_refuses_listing() {
        let root = MemoryNode::directory("root");
        root.revoke();
        assert!(!root.can_read());
        assert!(root.list_children().is_err());
        assert!(root.create_directory("x").is_err());
    }

    #[test]
    fn test_removed_children_are_hidden() {
        let root = MemoryNode::directory("root");
        let child = root.add_child(MemoryNode::directory("gone"));
        child.remove();
        assert!(root.list_children().unwrap().is_empty());
    }

    #[test]
    fn test_writer_replaces_content() {
        let file = MemoryNode::file("a.txt", b"old content");
        file.open_write().unwrap().write_all(b"new").unwrap();
        assert_eq!(file.content(), b"new");
    }

    #[test]
    fn test_reported_length_override() {
        let file = MemoryNode::file("a.txt", b"abc");
        file.set_reported_length(Some(10));
        assert_eq!(file.length(), 10);
    }
}
