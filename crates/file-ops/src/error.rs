//! Error types for file operations.

use std::path::PathBuf;

/// Errors produced while deriving or removing per-account paths.
#[derive(Debug, thiserror::Error)]
pub enum FileOpsError {
    #[error("invalid account id for a directory name: {0:?}")]
    InvalidAccountId(String),

    #[error("failed to remove {}: {source}", .path.display())]
    Remove {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
