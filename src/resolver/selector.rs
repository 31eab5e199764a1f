//! Access strategy selection
//!
//! Runs the ordered strategy list for each request: broad access first,
//! then scoped grants. Nothing survives between calls; there is no cached
//! "last resolved" handle.

use log::{debug, info};
use std::sync::Arc;

use crate::config::ResolverConfig;
use crate::error::{AccessError, IoError};
use crate::grants::{GrantMatcher, GrantStore, SubstringMatcher};
use crate::host::{PermissionHost, TreeHost};
use crate::navigate::{ResolutionQuality, ResolvedHandle};
use crate::path::{AccessIntent, LogicalPath};
use crate::resolver::consent::{ConsentRequest, build_consent_request};
use crate::resolver::strategy::{
    AccessStrategy, BroadAccessStrategy, ResolutionState, ScopedGrantStrategy, StrategyOutcome,
};
use crate::storage::{self, DirectoryEntry};

pub struct AccessStrategySelector {
    strategies: Vec<Box<dyn AccessStrategy>>,
    store: GrantStore,
    config: ResolverConfig,
}

impl AccessStrategySelector {
    /// Selector with the default cascade: broad access, then scoped grants.
    pub fn new(
        permissions: Arc<dyn PermissionHost>,
        tree: Arc<dyn TreeHost>,
        config: ResolverConfig,
    ) -> Self {
        Self::with_matcher(permissions, tree, config, Arc::new(SubstringMatcher))
    }

    pub fn with_matcher(
        permissions: Arc<dyn PermissionHost>,
        tree: Arc<dyn TreeHost>,
        config: ResolverConfig,
        matcher: Arc<dyn GrantMatcher>,
    ) -> Self {
        let store = GrantStore::with_matcher(Arc::clone(&permissions), matcher);
        let strategies: Vec<Box<dyn AccessStrategy>> = vec![
            Box::new(BroadAccessStrategy::new(
                permissions,
                Arc::clone(&tree),
                config.storage_roots(),
                &config.app_data_dir,
            )),
            Box::new(ScopedGrantStrategy::new(
                store.clone(),
                tree,
                &config.app_data_dir,
            )),
        ];

        Self {
            strategies,
            store,
            config,
        }
    }

    /// Selector over a host that provides both collaborators.
    pub fn for_host<H>(host: Arc<H>, config: ResolverConfig) -> Self
    where
        H: PermissionHost + TreeHost + 'static,
    {
        Self::new(host.clone(), host, config)
    }

    /// Appends a strategy tried after the existing ones.
    pub fn push_strategy(&mut self, strategy: Box<dyn AccessStrategy>) {
        self.strategies.push(strategy);
    }

    pub fn strategy_names(&self) -> Vec<&'static str> {
        self.strategies.iter().map(|strategy| strategy.name()).collect()
    }

    pub fn grant_store(&self) -> &GrantStore {
        &self.store
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Resolves `path` for `intent`.
    ///
    /// An [`ResolutionQuality::AncestorMatch`] is still a success: listing
    /// usually accepts it, single-file writes usually do not. The caller decides.
    pub fn resolve(
        &self,
        path: &LogicalPath,
        intent: AccessIntent,
    ) -> Result<ResolvedHandle, AccessError> {
        let mut state = ResolutionState::NoAccess;

        for strategy in &self.strategies {
            if let Some(pending) = strategy.pending_state() {
                state = transition(state, pending);
            }

            match strategy.attempt(path, intent) {
                StrategyOutcome::Resolved(handle) => {
                    let resolved = match handle.quality() {
                        ResolutionQuality::BroadAccess => ResolutionState::BroadAccess,
                        _ => ResolutionState::ScopedResolved,
                    };
                    transition(state, resolved);
                    info!(
                        "Resolved {path} via {} ({:?}, {} segments matched)",
                        strategy.name(),
                        handle.quality(),
                        handle.matched_segments().len()
                    );
                    return Ok(handle);
                }
                StrategyOutcome::Unavailable => {
                    debug!("Strategy {} unavailable for {path}", strategy.name());
                    state = transition(state, ResolutionState::NoAccess);
                }
                StrategyOutcome::Failed(e) => return Err(e),
            }
        }

        info!("No grant covers {path}");
        Err(AccessError::NoGrant(path.to_string()))
    }

    /// Consent request a caller can hand to the host after `NoGrant`.
    pub fn consent_request(&self, path: &LogicalPath) -> ConsentRequest {
        build_consent_request(path, &self.config)
    }

    // --------------------
    // Handle I/O
    // --------------------

    pub fn write_file(
        &self,
        handle: &ResolvedHandle,
        name: &str,
        data: &[u8],
    ) -> Result<(), IoError> {
        storage::write_file(&**handle.node(), name, data)
    }

    pub fn read_file(&self, handle: &ResolvedHandle, name: &str) -> Result<Vec<u8>, IoError> {
        storage::read_file(&**handle.node(), name)
    }

    pub fn list(&self, handle: &ResolvedHandle) -> Result<Vec<DirectoryEntry>, IoError> {
        storage::list_directory(&**handle.node())
    }
}

fn transition(from: ResolutionState, to: ResolutionState) -> ResolutionState {
    if from != to {
        debug!("Resolution state {from:?} -> {to:?}");
    }
    to
}
