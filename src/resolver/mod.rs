//! Resolver
//!
//! Strategy selection, consent requests, and the blocking worker that runs
//! resolutions off the caller's thread.

pub mod consent;
pub mod selector;
pub mod strategy;
pub mod worker;

pub use consent::{ConsentRequest, build_consent_request};
pub use selector::AccessStrategySelector;
pub use strategy::{
    AccessStrategy, BroadAccessStrategy, ResolutionState, ScopedGrantStrategy, StrategyOutcome,
};
pub use worker::BlockingResolver;
