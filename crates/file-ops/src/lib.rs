//! File operations for account deletion.
//!
//! Provides the read-only precondition checks run before any destructive
//! step (base directories exist, per-account directories are accessible)
//! and the concurrent recursive removal of per-account directories.

mod check;
mod erase;
mod error;

pub use check::{PathAccess, find_first_inaccessible, find_first_missing, probe};
pub use erase::{account_path, account_paths, remove_all};
pub use error::FileOpsError;

use std::path::PathBuf;

/// Expands a `~` prefix to the user's home directory.
///
/// Paths without the prefix are returned unchanged.
pub fn expand_home(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        home_dir().join(rest)
    } else if path == "~" {
        home_dir()
    } else {
        PathBuf::from(path)
    }
}

/// Returns the user's home directory.
fn home_dir() -> PathBuf {
    std::env::var("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("/tmp"))
}
