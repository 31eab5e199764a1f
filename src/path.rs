//! Logical paths
//!
//! A logical path names a directory inside another application's private
//! storage: the owning package identifier plus a relative sub-path.

use std::fmt;

/// Owner identifier plus a `/`-delimited relative path.
///
/// Empty segments (leading, trailing or doubled slashes) are dropped at
/// construction. Segments keep their original case; comparisons elsewhere
/// are case-insensitive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogicalPath {
    owner: String,
    segments: Vec<String>,
}

impl LogicalPath {
    pub fn new(owner: impl Into<String>, relative_path: &str) -> Self {
        Self {
            owner: owner.into().trim().to_string(),
            segments: split_segments(relative_path),
        }
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Relative path with empty segments removed, joined by `/`.
    pub fn relative(&self) -> String {
        self.segments.join("/")
    }

    /// Segments of the concrete storage path: `<app_data_dir>/<owner>/<relative>`.
    pub fn storage_segments(&self, app_data_dir: &str) -> Vec<String> {
        let mut segments = split_segments(app_data_dir);
        segments.push(self.owner.clone());
        segments.extend(self.segments.iter().cloned());
        segments
    }
}

impl fmt::Display for LogicalPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            write!(f, "{}", self.owner)
        } else {
            write!(f, "{}/{}", self.owner, self.relative())
        }
    }
}

/// What the caller intends to do with the resolved directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessIntent {
    Read,
    /// Missing directories along the path are created.
    Write,
}

/// Split on `/`, dropping empty segments.
pub fn split_segments(path: &str) -> Vec<String> {
    path.split('/')
        .filter(|segment| !segment.is_empty())
        .map(str::to_string)
        .collect()
}
