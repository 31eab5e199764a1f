//! Error handling
//!
//! Defines error types and handling for the resolver.

pub mod handlers;
pub mod types;

pub use types::*;
