//! Grant matching
//!
//! Decides whether an opaque grant key covers a logical path. Host keys do
//! not encode the hierarchy in a normalized form, so matching is tolerant:
//! case-insensitive, percent-decoded, substring based.
//!
//! The ancestor rule is a heuristic. A grant whose key merely mentions every
//! segment is accepted even if it is not structurally an ancestor, and a real
//! ancestor whose key omits a segment is rejected. Replace [`SubstringMatcher`]
//! through [`GrantMatcher`] if a host ever exposes structured grants.

use std::borrow::Cow;

use crate::path::split_segments;

/// How well a grant covers a path
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum MatchQuality {
    None,
    Ancestor,
    Exact,
}

/// Strategy for matching grant keys against logical paths.
pub trait GrantMatcher: Send + Sync {
    fn matches(&self, grant_key: &str, owner: &str, relative_path: &str) -> MatchQuality;
}

/// The default substring heuristic.
#[derive(Debug, Clone, Copy, Default)]
pub struct SubstringMatcher;

impl GrantMatcher for SubstringMatcher {
    fn matches(&self, grant_key: &str, owner: &str, relative_path: &str) -> MatchQuality {
        matches(grant_key, owner, relative_path)
    }
}

/// Match `grant_key` against `owner` + `relative_path`.
pub fn matches(grant_key: &str, owner: &str, relative_path: &str) -> MatchQuality {
    let owner = owner.trim().to_lowercase();
    if owner.is_empty() {
        return MatchQuality::None;
    }

    let key = decode_key(grant_key).to_lowercase();
    if !key.contains(&owner) {
        return MatchQuality::None;
    }

    let segments: Vec<String> = split_segments(&relative_path.to_lowercase());
    if key.contains(&segments.join("/")) {
        return MatchQuality::Exact;
    }

    if segments.iter().all(|segment| key.contains(segment.as_str())) {
        MatchQuality::Ancestor
    } else {
        MatchQuality::None
    }
}

/// Percent-decode a grant key; keys that do not decode to UTF-8 are used raw.
pub fn decode_key(grant_key: &str) -> Cow<'_, str> {
    urlencoding::decode(grant_key).unwrap_or(Cow::Borrowed(grant_key))
}
