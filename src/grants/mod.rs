//! Access grants
//!
//! Host-issued, persisted capability tokens and the read-only store that
//! maps them to logical paths.

mod matcher;
mod store;

pub use matcher::{GrantMatcher, MatchQuality, SubstringMatcher, decode_key, matches};
pub use store::{GrantMatch, GrantStore};

use crate::path::{AccessIntent, split_segments};

/// A persisted grant as reported by the host permission system.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessGrant {
    key: String,
    read: bool,
    write: bool,
}

impl AccessGrant {
    pub fn new(key: impl Into<String>, read: bool, write: bool) -> Self {
        Self {
            key: key.into(),
            read,
            write,
        }
    }

    /// The opaque identifying string.
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn can_read(&self) -> bool {
        self.read
    }

    pub fn can_write(&self) -> bool {
        self.write
    }

    pub fn permits(&self, intent: AccessIntent) -> bool {
        match intent {
            AccessIntent::Read => self.read,
            AccessIntent::Write => self.write,
        }
    }

    /// Segments of the document path the key encodes, best effort.
    ///
    /// `content://<authority>/tree/primary%3AAndroid%2Fdata` and
    /// `primary:Android/data` both yield `["Android", "data"]`.
    pub fn document_segments(&self) -> Vec<String> {
        let decoded = decode_key(&self.key);
        let mut document: &str = &decoded;
        if let Some((_, tree)) = document.split_once("/tree/") {
            document = tree.split("/document/").next().unwrap_or(tree);
        }
        if let Some((_, path)) = document.split_once(':') {
            document = path;
        }
        split_segments(document)
    }
}
