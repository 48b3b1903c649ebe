//! Error types and result aliases for code2md.
//!
//! This module defines the error handling infrastructure:
//! - [`Result<T>`]: Type alias for `anyhow::Result<T>` used throughout the crate
//! - [`IoContext`]: Attaches the offending path to I/O failures

use std::path::Path;

use anyhow::Context;

pub type Result<T> = anyhow::Result<T>;

/// Extension for `std::io::Result` that names the file an operation touched
pub trait IoContext<T> {
    /// Wrap the error as "failed to `action` `path`"
    fn for_path(self, action: &str, path: &Path) -> Result<T>;
}

impl<T> IoContext<T> for std::io::Result<T> {
    fn for_path(self, action: &str, path: &Path) -> Result<T> {
        self.with_context(|| format!("failed to {action} {}", path.display()))
    }
}
