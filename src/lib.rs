//! Scoped access resolver
//!
//! Resolves a directory inside another application's private storage
//! (owning package + relative path) into a read/write-capable handle, on
//! hosts that gate storage behind revocable, persisted access grants.

pub mod config;
pub mod error;
pub mod grants;
pub mod host;
pub mod navigate;
pub mod path;
pub mod resolver;
pub mod storage;
pub mod utils;

pub use crate::config::ResolverConfig;
pub use error::{AccessError, IoError, ResolverError};
pub use grants::{AccessGrant, GrantStore, MatchQuality};
pub use host::{LocalHost, PermissionHost, TreeHost};
pub use navigate::{ResolutionQuality, ResolvedHandle};
pub use path::{AccessIntent, LogicalPath};
pub use resolver::{AccessStrategySelector, BlockingResolver, ConsentRequest};
pub use storage::{DirectoryEntry, DirectoryNode, NodeKind, NodeRef};
