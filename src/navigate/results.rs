//! Result types for navigate operations

use std::fmt;

use crate::storage::NodeRef;

/// How a handle was reached
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionQuality {
    /// The full logical path was reached.
    ExactMatch,
    /// Only a prefix was reached; the rest was missing or could not be created.
    AncestorMatch,
    /// Reached by probing a concrete path under broad filesystem access.
    BroadAccess,
}

/// A directory reached by a resolution.
///
/// Valid only for the call that produced it: the host may revoke access at
/// any time, so I/O re-validates the node instead of trusting this value.
#[derive(Clone)]
pub struct ResolvedHandle {
    node: NodeRef,
    matched: Vec<String>,
    quality: ResolutionQuality,
}

impl ResolvedHandle {
    pub fn new(node: NodeRef, matched: Vec<String>, quality: ResolutionQuality) -> Self {
        Self {
            node,
            matched,
            quality,
        }
    }

    pub fn node(&self) -> &NodeRef {
        &self.node
    }

    /// Segments actually matched, in the names the host reported.
    pub fn matched_segments(&self) -> &[String] {
        &self.matched
    }

    pub fn quality(&self) -> ResolutionQuality {
        self.quality
    }

    pub fn is_exact(&self) -> bool {
        matches!(
            self.quality,
            ResolutionQuality::ExactMatch | ResolutionQuality::BroadAccess
        )
    }
}

impl fmt::Debug for ResolvedHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolvedHandle")
            .field("node", &self.node.label())
            .field("matched", &self.matched)
            .field("quality", &self.quality)
            .finish()
    }
}
