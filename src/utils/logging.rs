//! Logging utilities
//!
//! Provides logging setup and configuration.

/// Setup logging for the probe binary
///
/// `RUST_LOG` controls verbosity; without it only warnings and errors show.
pub fn setup_logging() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
}
