//! Directory storage
//!
//! The host directory abstraction, its bundled backends, and scoped file
//! I/O under a resolved handle.

pub mod filesystem;
pub mod memory;
pub mod node;
pub mod operations;
pub mod permissions;
pub mod results;

pub use filesystem::FsNode;
pub use memory::MemoryNode;
pub use node::{DirectoryNode, NodeKind, NodeRef};
pub use operations::{list_directory, read_file, write_file};
pub use results::DirectoryEntry;
