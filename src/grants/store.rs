//! Grant store
//!
//! Read-only view over the host's persisted grants. Nothing here adds,
//! removes or caches grants: every query enumerates the host afresh because
//! the user may revoke a grant between two calls.

use log::debug;
use std::sync::Arc;

use crate::grants::AccessGrant;
use crate::grants::matcher::{GrantMatcher, MatchQuality, SubstringMatcher};
use crate::host::PermissionHost;
use crate::path::{AccessIntent, LogicalPath};

/// A grant together with how well it covers the requested path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrantMatch {
    pub grant: AccessGrant,
    pub quality: MatchQuality,
}

#[derive(Clone)]
pub struct GrantStore {
    host: Arc<dyn PermissionHost>,
    matcher: Arc<dyn GrantMatcher>,
}

impl GrantStore {
    pub fn new(host: Arc<dyn PermissionHost>) -> Self {
        Self::with_matcher(host, Arc::new(SubstringMatcher))
    }

    pub fn with_matcher(host: Arc<dyn PermissionHost>, matcher: Arc<dyn GrantMatcher>) -> Self {
        Self { host, matcher }
    }

    /// Snapshot of the currently persisted grants, in host order.
    pub fn grants(&self) -> Vec<AccessGrant> {
        self.host.persisted_grants()
    }

    /// Best grant covering `path` regardless of its capability flags.
    pub fn find_grant(&self, path: &LogicalPath) -> Option<AccessGrant> {
        self.best_match(path, |_| true).map(|found| found.grant)
    }

    /// Best grant covering `path` whose flags permit `intent`.
    pub fn find_grant_for(&self, path: &LogicalPath, intent: AccessIntent) -> Option<GrantMatch> {
        self.best_match(path, |grant| grant.permits(intent))
    }

    /// Whether the best grant covering `path` carries both read and write.
    pub fn has_access(&self, path: &LogicalPath) -> bool {
        self.find_grant(path)
            .is_some_and(|grant| grant.can_read() && grant.can_write())
    }

    /// Exact matches beat ancestor matches; among equals the first
    /// enumerated wins.
    fn best_match<F>(&self, path: &LogicalPath, accept: F) -> Option<GrantMatch>
    where
        F: Fn(&AccessGrant) -> bool,
    {
        let relative = path.relative();
        let mut ancestor: Option<AccessGrant> = None;

        for grant in self.host.persisted_grants() {
            if !accept(&grant) {
                continue;
            }
            match self.matcher.matches(grant.key(), path.owner(), &relative) {
                MatchQuality::Exact => {
                    debug!("Grant {} covers {path} exactly", grant.key());
                    return Some(GrantMatch {
                        grant,
                        quality: MatchQuality::Exact,
                    });
                }
                MatchQuality::Ancestor if ancestor.is_none() => ancestor = Some(grant),
                _ => {}
            }
        }

        ancestor.map(|grant| {
            debug!("Grant {} covers {path} as an ancestor", grant.key());
            GrantMatch {
                grant,
                quality: MatchQuality::Ancestor,
            }
        })
    }
}
