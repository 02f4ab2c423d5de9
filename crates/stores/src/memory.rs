//! In-memory implementation of every store collaborator.
//!
//! Behaves like the document store it stands in for: dropping a missing
//! collection fails with `NotFound`, deleting a missing account record and
//! removing zero sessions succeed.

use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard, PoisonError};

use userpurge_protocol::{AccountIdentity, StoreDomain};

use crate::error::StoreError;
use crate::traits::{AccountLookup, RecordStore, SeriesStore, SessionStore, StoreFuture};

#[derive(Debug, Default)]
struct MemoryState {
    /// Account records keyed by username.
    accounts: HashMap<String, AccountIdentity>,
    /// Existing collections: name to owning account id.
    collections: HashMap<String, String>,
    /// Session rows as (session id, username).
    sessions: Vec<(String, String)>,
    /// Time-series database names.
    series: HashSet<String>,
}

/// Per-account collection name, e.g. `events.u1`.
fn collection_name(domain: StoreDomain, account_id: &str) -> String {
    format!("{}.{account_id}", domain.collection())
}

/// Thread-safe in-memory store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Mutex<MemoryState>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Inserts an account record and creates all of its collections.
    pub fn insert_account(&self, identity: AccountIdentity) {
        let mut state = self.state();
        for domain in StoreDomain::ALL {
            state
                .collections
                .insert(collection_name(domain, &identity.id), identity.id.clone());
        }
        state.accounts.insert(identity.username.clone(), identity);
    }

    /// Adds a session row for `username`.
    pub fn insert_session(&self, session_id: &str, username: &str) {
        self.state()
            .sessions
            .push((session_id.to_string(), username.to_string()));
    }

    /// Creates a time-series database.
    pub fn create_series(&self, name: &str) {
        self.state().series.insert(name.to_string());
    }

    pub fn has_account(&self, username: &str) -> bool {
        self.state().accounts.contains_key(username)
    }

    /// Number of collections still present for an account id.
    pub fn collection_count(&self, account_id: &str) -> usize {
        self.state()
            .collections
            .values()
            .filter(|id| *id == account_id)
            .count()
    }

    pub fn session_count(&self, username: &str) -> usize {
        self.state()
            .sessions
            .iter()
            .filter(|(_, user)| user == username)
            .count()
    }

    pub fn series_exists(&self, name: &str) -> bool {
        self.state().series.contains(name)
    }
}

impl AccountLookup for MemoryStore {
    fn get_account_by_username<'a>(
        &'a self,
        username: &'a str,
    ) -> StoreFuture<'a, Option<AccountIdentity>> {
        Box::pin(async move { Ok(self.state().accounts.get(username).cloned()) })
    }

    fn delete_one<'a>(&'a self, id: &'a str) -> StoreFuture<'a, ()> {
        Box::pin(async move {
            self.state().accounts.retain(|_, account| account.id != id);
            Ok(())
        })
    }
}

impl RecordStore for MemoryStore {
    fn drop_collection<'a>(
        &'a self,
        domain: StoreDomain,
        identity: &'a AccountIdentity,
    ) -> StoreFuture<'a, ()> {
        Box::pin(async move {
            let name = collection_name(domain, &identity.id);
            match self.state().collections.remove(&name) {
                Some(_) => Ok(()),
                None => Err(StoreError::NotFound(name)),
            }
        })
    }
}

impl SessionStore for MemoryStore {
    fn remove_by_username<'a>(&'a self, username: &'a str) -> StoreFuture<'a, u64> {
        Box::pin(async move {
            let mut state = self.state();
            let before = state.sessions.len();
            state.sessions.retain(|(_, user)| user != username);
            Ok((before - state.sessions.len()) as u64)
        })
    }
}

impl SeriesStore for MemoryStore {
    fn drop_database<'a>(&'a self, name: &'a str) -> StoreFuture<'a, ()> {
        Box::pin(async move {
            self.state().series.remove(name);
            Ok(())
        })
    }
}
