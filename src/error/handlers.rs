//! Error handlers
//!
//! Logs resolver errors and classifies them for callers.

use crate::error::types::{AccessError, IoError, ResolverError};
use log::{error, info};

/// Handle a resolver error
pub fn handle_error(err: &ResolverError) {
    if is_expected(err) {
        info!("{err}");
    } else {
        error!("Resolver error: {err}");
    }
}

/// Whether an error is a normal outcome rather than a fault.
///
/// A missing grant only means the user has not consented yet.
pub fn is_expected(err: &ResolverError) -> bool {
    matches!(err, ResolverError::Access(AccessError::NoGrant(_)))
}

/// Whether the caller must run a fresh resolution before retrying.
pub fn requires_fresh_resolution(err: &ResolverError) -> bool {
    matches!(err, ResolverError::Io(IoError::AccessRevokedMidUse(_)))
}
