//! Navigate module
//!
//! Walks a host directory tree from a grant root towards a target path,
//! optionally creating missing directories.

mod operations;
mod results;

// Re-export public types and functions
pub use operations::{remaining_segments, walk};
pub use results::{ResolutionQuality, ResolvedHandle};
