//! Cascading account deletion.
//!
//! [`DeletionOrchestrator`] authorizes the caller, resolves the account,
//! verifies the filesystem is in a state where erasure can complete, and
//! then removes the account's files, per-domain collections, optional
//! time-series namespace, account record and sessions. The caller gets a
//! single outcome; details go to the log.

pub mod auth;
pub mod config;
pub mod error;
pub mod lock;
pub mod orchestrator;

// Re-export primary types for convenience.
pub use config::{ConfigError, DeletionConfig, SeriesConfig};
pub use error::{DeletionError, Stage, StageFailure};
pub use lock::{AccountLockGuard, AccountLocks};
pub use orchestrator::{Collaborators, DeletionOrchestrator};
