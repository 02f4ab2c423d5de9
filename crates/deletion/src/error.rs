//! Deletion error types.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use userpurge_file_ops::FileOpsError;
use userpurge_protocol::{ErrorId, ErrorResponse, StoreDomain};
use userpurge_stores::StoreError;

/// Workflow stage an error is attributed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Authorize,
    Lock,
    Lookup,
    Preconditions,
    RemoveFiles,
    DropSeries,
    DropDomain(StoreDomain),
    RemoveAccount,
    RemoveSessions,
}

impl Stage {
    /// Returns `true` for stages that may already have removed data.
    pub fn is_destructive(self) -> bool {
        matches!(
            self,
            Stage::RemoveFiles
                | Stage::DropSeries
                | Stage::DropDomain(_)
                | Stage::RemoveAccount
                | Stage::RemoveSessions
        )
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Authorize => f.write_str("authorize"),
            Stage::Lock => f.write_str("lock"),
            Stage::Lookup => f.write_str("lookup"),
            Stage::Preconditions => f.write_str("preconditions"),
            Stage::RemoveFiles => f.write_str("remove-files"),
            Stage::DropSeries => f.write_str("drop-series"),
            Stage::DropDomain(domain) => write!(f, "drop-domain:{domain}"),
            Stage::RemoveAccount => f.write_str("remove-account"),
            Stage::RemoveSessions => f.write_str("remove-sessions"),
        }
    }
}

/// Underlying cause of a stage failure.
#[derive(Debug, thiserror::Error)]
pub enum StageFailure {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Files(#[from] FileOpsError),

    #[error("timed out after {0:?}")]
    Timeout(Duration),
}

/// Errors produced by an account deletion.
#[derive(Debug, thiserror::Error)]
pub enum DeletionError {
    #[error("invalid admin credential")]
    InvalidCredential,

    #[error("unknown user {username:?}")]
    UnknownUser { username: String },

    #[error("deletion already in progress for {username:?}")]
    Busy { username: String },

    #[error("base directory '{}' does not exist", .path.display())]
    DeploymentMisconfigured { path: PathBuf },

    #[error("directory '{}' is inaccessible", .path.display())]
    Inaccessible { path: PathBuf },

    #[error("{stage} failed: {source}")]
    Failed {
        stage: Stage,
        #[source]
        source: StageFailure,
    },
}

impl DeletionError {
    pub(crate) fn at(stage: Stage, source: impl Into<StageFailure>) -> Self {
        DeletionError::Failed {
            stage,
            source: source.into(),
        }
    }

    /// Stage the error is attributed to.
    pub fn stage(&self) -> Stage {
        match self {
            DeletionError::InvalidCredential => Stage::Authorize,
            DeletionError::UnknownUser { .. } => Stage::Lookup,
            DeletionError::Busy { .. } => Stage::Lock,
            DeletionError::DeploymentMisconfigured { .. } | DeletionError::Inaccessible { .. } => {
                Stage::Preconditions
            }
            DeletionError::Failed { stage, .. } => *stage,
        }
    }

    /// Error id reported to the caller.
    ///
    /// An invalid credential and an unknown user both map to
    /// `unknown-resource` so callers cannot probe for usernames.
    pub fn error_id(&self) -> ErrorId {
        match self {
            DeletionError::InvalidCredential | DeletionError::UnknownUser { .. } => {
                ErrorId::UnknownResource
            }
            _ => ErrorId::UnexpectedError,
        }
    }

    /// Generic payload for the caller. Never carries the cause.
    pub fn response(&self) -> ErrorResponse {
        ErrorResponse::new(self.error_id())
    }
}
