//! Error types
//!
//! Defines domain-specific error types for resolution and handle I/O.

use std::io;
use thiserror::Error;

/// Resolution errors
#[derive(Debug, Error)]
pub enum AccessError {
    /// No broad access and no persisted grant covers the path. The caller
    /// should prompt for consent.
    #[error("No access grant covers {0}")]
    NoGrant(String),

    /// A grant existed but the host tree API failed while walking it.
    #[error("Navigation failed for {path}: {source}")]
    NavigationFailed {
        path: String,
        #[source]
        source: io::Error,
    },
}

/// Handle I/O errors
#[derive(Debug, Error)]
pub enum IoError {
    /// The handle (or the child under it) no longer exists or lost the
    /// capability the operation needs. Resolve again from scratch.
    #[error("Access revoked for {0}")]
    AccessRevokedMidUse(String),

    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Failed to create {name}: {source}")]
    CreateFailed {
        name: String,
        #[source]
        source: io::Error,
    },

    /// Stream open/read/write failure, with the bytes moved before it happened.
    #[error("Stream error on {name} after {transferred} bytes: {source}")]
    Stream {
        name: String,
        transferred: u64,
        #[source]
        source: io::Error,
    },
}

impl IoError {
    /// Bytes actually transferred before the failure, where that applies.
    pub fn transferred(&self) -> Option<u64> {
        match self {
            IoError::Stream { transferred, .. } => Some(*transferred),
            _ => None,
        }
    }
}

/// General resolver error that encompasses all error types
#[derive(Debug, Error)]
pub enum ResolverError {
    #[error("Access error: {0}")]
    Access(#[from] AccessError),

    #[error("I/O error: {0}")]
    Io(#[from] IoError),

    /// The blocking worker panicked or was cancelled by the runtime.
    #[error("Worker error: {0}")]
    Worker(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stream_error_reports_transferred() {
        let err = IoError::Stream {
            name: "save.dat".into(),
            transferred: 3,
            source: io::Error::new(io::ErrorKind::BrokenPipe, "pipe closed"),
        };
        assert_eq!(err.transferred(), Some(3));
        assert!(err.to_string().contains("after 3 bytes"));
        assert_eq!(IoError::FileNotFound("x".into()).transferred(), None);
    }

    #[test]
    fn test_conversion_into_resolver_error() {
        let err: ResolverError = AccessError::NoGrant("com.example/files".into()).into();
        assert!(matches!(err, ResolverError::Access(AccessError::NoGrant(_))));
    }
}
