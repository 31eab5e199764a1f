//! Blocking worker
//!
//! Tree listing and stream I/O against host-mediated storage can block for
//! an unbounded time. `BlockingResolver` moves every call onto tokio's
//! blocking pool so async callers (and UI threads driving them) never run
//! it themselves. Calls are not retried and cannot be cancelled once started.

use std::sync::Arc;

use crate::error::ResolverError;
use crate::navigate::ResolvedHandle;
use crate::path::{AccessIntent, LogicalPath};
use crate::resolver::selector::AccessStrategySelector;
use crate::storage::DirectoryEntry;

#[derive(Clone)]
pub struct BlockingResolver {
    selector: Arc<AccessStrategySelector>,
}

impl BlockingResolver {
    pub fn new(selector: AccessStrategySelector) -> Self {
        Self {
            selector: Arc::new(selector),
        }
    }

    pub fn selector(&self) -> &AccessStrategySelector {
        &self.selector
    }

    pub async fn resolve(
        &self,
        path: LogicalPath,
        intent: AccessIntent,
    ) -> Result<ResolvedHandle, ResolverError> {
        self.run(move |selector| Ok(selector.resolve(&path, intent)?))
            .await
    }

    pub async fn write_file(
        &self,
        handle: ResolvedHandle,
        name: String,
        data: Vec<u8>,
    ) -> Result<(), ResolverError> {
        self.run(move |selector| Ok(selector.write_file(&handle, &name, &data)?))
            .await
    }

    pub async fn read_file(
        &self,
        handle: ResolvedHandle,
        name: String,
    ) -> Result<Vec<u8>, ResolverError> {
        self.run(move |selector| Ok(selector.read_file(&handle, &name)?))
            .await
    }

    pub async fn list(&self, handle: ResolvedHandle) -> Result<Vec<DirectoryEntry>, ResolverError> {
        self.run(move |selector| Ok(selector.list(&handle)?)).await
    }

    async fn run<T, F>(&self, job: F) -> Result<T, ResolverError>
    where
        T: Send + 'static,
        F: FnOnce(&AccessStrategySelector) -> Result<T, ResolverError> + Send + 'static,
    {
        let selector = Arc::clone(&self.selector);
        tokio::task::spawn_blocking(move || job(selector.as_ref()))
            .await
            .map_err(|e| ResolverError::Worker(e.to_string()))?
    }
}
