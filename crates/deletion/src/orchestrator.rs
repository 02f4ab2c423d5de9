//! Deletion orchestrator.
//!
//! Sequences the validation gates and the destructive phase for one
//! account and folds everything into a single outcome.

use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;

use userpurge_file_ops::{account_paths, find_first_inaccessible, find_first_missing, remove_all};
use userpurge_protocol::{AccountIdentity, StoreDomain};
use userpurge_stores::{
    AccountLookup, RecordStore, SeriesEraser, SeriesStore, SessionStore, drop_account_data,
    remove_account, remove_sessions, resolve_account,
};

use crate::auth::credential_matches;
use crate::config::{ConfigError, DeletionConfig};
use crate::error::{DeletionError, Stage, StageFailure};
use crate::lock::{AccountLockGuard, AccountLocks};

/// Store collaborators the orchestrator deletes from.
#[derive(Clone)]
pub struct Collaborators {
    pub accounts: Arc<dyn AccountLookup>,
    pub records: Arc<dyn RecordStore>,
    pub sessions: Arc<dyn SessionStore>,
    /// `None` when the deployment has no time-series store.
    pub series: Option<Arc<dyn SeriesStore>>,
}

/// Removes every durable trace of an account.
///
/// Stages, each a hard gate:
/// 1. **Authorize**: caller credential against the admin key
/// 2. **Lookup**: username to [`AccountIdentity`]
/// 3. **Preconditions**: base directories exist, per-account
///    directories are absent or accessible
/// 4. **Erase**: files, time-series namespace and every
///    [`StoreDomain`] concurrently, then the account record, then sessions
///
/// Nothing is removed unless 1–3 pass. Erasure has no rollback; it is
/// safe to re-run because every drop treats absent data as success.
pub struct DeletionOrchestrator {
    config: DeletionConfig,
    accounts: Arc<dyn AccountLookup>,
    records: Arc<dyn RecordStore>,
    sessions: Arc<dyn SessionStore>,
    series: SeriesEraser,
    locks: AccountLocks,
}

impl DeletionOrchestrator {
    /// Creates an orchestrator with its own lock set.
    ///
    /// Fails if the config is invalid, or if it enables the time-series
    /// store but no series store is passed and none can be built from it.
    pub fn new(config: DeletionConfig, collaborators: Collaborators) -> Result<Self, ConfigError> {
        config.validate()?;

        let series = match collaborators.series {
            Some(store) => {
                if config.series.is_none() {
                    tracing::debug!("series store provided without [series] config, using it");
                }
                Some(store)
            }
            None => series_from_config(&config)?,
        };

        Ok(Self {
            config,
            accounts: collaborators.accounts,
            records: collaborators.records,
            sessions: collaborators.sessions,
            series: SeriesEraser::new(series),
            locks: AccountLocks::new(),
        })
    }

    /// Shares a lock set with other orchestrators in the same process.
    pub fn with_locks(mut self, locks: AccountLocks) -> Self {
        self.locks = locks;
        self
    }

    pub fn config(&self) -> &DeletionConfig {
        &self.config
    }

    pub fn locks(&self) -> &AccountLocks {
        &self.locks
    }

    /// Whether deletions drop the user's time-series namespace.
    pub fn series_enabled(&self) -> bool {
        self.series.is_enabled()
    }

    /// Deletes the account named `username`.
    ///
    /// Failures are logged here with full detail; callers should only
    /// forward [`DeletionError::response`].
    pub async fn delete_account(
        &self,
        credential: &str,
        username: &str,
    ) -> Result<(), DeletionError> {
        let result = self.run(credential, username).await;
        match &result {
            Ok(()) => tracing::info!(username, "account deleted"),
            Err(e) => log_failure(username, e),
        }
        result
    }

    async fn run(&self, credential: &str, username: &str) -> Result<(), DeletionError> {
        authorize(credential, &self.config.admin_key)?;
        let _guard = self.lock(username)?;

        let identity = resolve_account(
            self.accounts.as_ref(),
            username,
            self.config.call_timeout,
        )
        .await
        .map_err(|e| DeletionError::at(Stage::Lookup, e))?
        .ok_or_else(|| DeletionError::UnknownUser {
            username: username.to_string(),
        })?;

        tracing::debug!(username, account = %identity.id, "account resolved");

        self.erase_resolved(&identity).await
    }

    /// Runs the precondition gate and the destructive phase for an
    /// already-resolved identity.
    ///
    /// Skips the lookup, so it also finishes a deletion whose account
    /// record is already gone. Authorization and the account lock apply
    /// as for [`delete_account`](Self::delete_account).
    pub async fn erase_account(
        &self,
        credential: &str,
        identity: &AccountIdentity,
    ) -> Result<(), DeletionError> {
        let result = async {
            authorize(credential, &self.config.admin_key)?;
            let _guard = self.lock(&identity.username)?;
            self.erase_resolved(identity).await
        }
        .await;

        match &result {
            Ok(()) => tracing::info!(username = %identity.username, account = %identity.id, "account erased"),
            Err(e) => log_failure(&identity.username, e),
        }
        result
    }

    fn lock(&self, username: &str) -> Result<AccountLockGuard, DeletionError> {
        self.locks
            .try_acquire(username)
            .ok_or_else(|| DeletionError::Busy {
                username: username.to_string(),
            })
    }

    async fn erase_resolved(&self, identity: &AccountIdentity) -> Result<(), DeletionError> {
        let paths = self.check_preconditions(identity).await?;
        self.erase(identity, &paths).await
    }

    /// Checks the filesystem gate and returns the per-account paths.
    ///
    /// Read-only: nothing is created or removed.
    pub async fn check_preconditions(
        &self,
        identity: &AccountIdentity,
    ) -> Result<Vec<PathBuf>, DeletionError> {
        let bases = &self.config.base_paths;

        if let Some(path) = self.bounded(Stage::Preconditions, find_first_missing(bases)).await? {
            return Err(DeletionError::DeploymentMisconfigured { path });
        }

        let paths = account_paths(bases, &identity.id)
            .map_err(|e| DeletionError::at(Stage::Preconditions, e))?;

        if let Some(path) = self
            .bounded(Stage::Preconditions, find_first_inaccessible(&paths))
            .await?
        {
            return Err(DeletionError::Inaccessible { path });
        }

        Ok(paths)
    }

    /// Destructive phase. Files, series and domain drops run concurrently;
    /// account and session removal only run if all of those succeeded.
    async fn erase(&self, identity: &AccountIdentity, paths: &[PathBuf]) -> Result<(), DeletionError> {
        let limit = self.config.call_timeout;

        let files = async {
            self.bounded(Stage::RemoveFiles, remove_all(paths))
                .await?
                .map_err(|e| DeletionError::at(Stage::RemoveFiles, e))
        };

        let (files, series, drops) = tokio::join!(
            files,
            self.series.drop_namespace(&identity.username, limit),
            drop_account_data(self.records.as_ref(), &StoreDomain::ALL, identity, limit),
        );

        let mut failures = Vec::new();
        match files {
            Ok(removed) => tracing::debug!(account = %identity.id, removed, "account directories erased"),
            Err(e) => failures.push(e),
        }
        if let Err(e) = series {
            failures.push(DeletionError::at(Stage::DropSeries, e));
        }
        for drop in drops {
            if let Err(e) = drop.result {
                failures.push(DeletionError::at(Stage::DropDomain(drop.domain), e));
            }
        }

        if !failures.is_empty() {
            for e in &failures[1..] {
                tracing::error!(account = %identity.id, stage = %e.stage(), error = %e, "erase step failed");
            }
            tracing::warn!(
                account = %identity.id,
                failed = failures.len(),
                "keeping account record and sessions until erase steps succeed"
            );
            return Err(failures.swap_remove(0));
        }

        remove_account(self.accounts.as_ref(), &identity.id, limit)
            .await
            .map_err(|e| DeletionError::at(Stage::RemoveAccount, e))?;

        remove_sessions(self.sessions.as_ref(), &identity.username, limit)
            .await
            .map_err(|e| DeletionError::at(Stage::RemoveSessions, e))?;

        Ok(())
    }

    /// Bounds a non-store operation by the call timeout.
    async fn bounded<T>(&self, stage: Stage, fut: impl Future<Output = T>) -> Result<T, DeletionError> {
        tokio::time::timeout(self.config.call_timeout, fut)
            .await
            .map_err(|_| DeletionError::at(stage, StageFailure::Timeout(self.config.call_timeout)))
    }
}

fn authorize(credential: &str, admin_key: &str) -> Result<(), DeletionError> {
    if credential_matches(credential, admin_key) {
        Ok(())
    } else {
        Err(DeletionError::InvalidCredential)
    }
}

/// Series store for a `[series]` section when the caller passed none.
#[cfg(feature = "influx")]
fn series_from_config(
    config: &DeletionConfig,
) -> Result<Option<Arc<dyn SeriesStore>>, ConfigError> {
    Ok(config.series_store())
}

/// Without a driver, a `[series]` section cannot be honoured.
#[cfg(not(feature = "influx"))]
fn series_from_config(
    config: &DeletionConfig,
) -> Result<Option<Arc<dyn SeriesStore>>, ConfigError> {
    match &config.series {
        Some(series) => Err(ConfigError::SeriesStoreMissing {
            host: series.host.clone(),
        }),
        None => Ok(None),
    }
}

/// Logs a failed deletion server-side.
fn log_failure(username: &str, e: &DeletionError) {
    match e {
        DeletionError::InvalidCredential | DeletionError::UnknownUser { .. } => {
            tracing::warn!(username, error = %e, "account deletion rejected");
        }
        _ => {
            tracing::error!(
                username,
                stage = %e.stage(),
                destructive = e.stage().is_destructive(),
                error = %e,
                detail = ?e,
                "account deletion failed"
            );
        }
    }
}
