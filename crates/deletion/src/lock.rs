//! Per-account advisory locks.
//!
//! Two deletions of the same account must not interleave. The lock is
//! in-process only; deployments running several deletion workers need the
//! caller to serialize requests per account.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Set of usernames with a deletion in flight.
///
/// Cloning shares the same set.
#[derive(Debug, Clone, Default)]
pub struct AccountLocks {
    held: Arc<Mutex<HashSet<String>>>,
}

impl AccountLocks {
    pub fn new() -> Self {
        Self::default()
    }

    fn held(&self) -> MutexGuard<'_, HashSet<String>> {
        self.held.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Takes the lock for `username`, or `None` if it is already held.
    pub fn try_acquire(&self, username: &str) -> Option<AccountLockGuard> {
        if !self.held().insert(username.to_string()) {
            return None;
        }
        Some(AccountLockGuard {
            locks: self.clone(),
            username: username.to_string(),
        })
    }

    pub fn is_locked(&self, username: &str) -> bool {
        self.held().contains(username)
    }
}

/// Releases the account lock when dropped.
#[derive(Debug)]
pub struct AccountLockGuard {
    locks: AccountLocks,
    username: String,
}

impl Drop for AccountLockGuard {
    fn drop(&mut self) {
        self.locks.held().remove(&self.username);
    }
}
