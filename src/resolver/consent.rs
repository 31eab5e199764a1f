//! Consent requests
//!
//! When no grant covers a path the caller asks the host to show its consent
//! picker. The request points the picker at the target directory; the user's
//! answer arrives through the host, outside the resolver.

use crate::config::ResolverConfig;
use crate::path::LogicalPath;

/// What the host needs to open its directory picker on a target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsentRequest {
    /// Document id of the target, `<volume>:<app-data-dir>/<owner>/<relative>`.
    pub document_id: String,
    /// Tree identifier the picker should start at.
    pub initial_tree: String,
    /// Ask the picker to show internal storage roots.
    pub show_advanced: bool,
}

/// Builds the consent request for `path`.
pub fn build_consent_request(path: &LogicalPath, config: &ResolverConfig) -> ConsentRequest {
    let document = path.storage_segments(&config.app_data_dir);
    let document_id = format!("{}:{}", config.volume, document.join("/"));
    let initial_tree = format!(
        "content://{}/tree/{}",
        config.documents_authority,
        urlencoding::encode(&document_id)
    );

    ConsentRequest {
        document_id,
        initial_tree,
        show_advanced: true,
    }
}
