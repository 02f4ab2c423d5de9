//! Collaborator interfaces consumed by the deletion workflow.
//!
//! The host application implements these on top of its real drivers.
//! Keeping them as traits decouples deletion logic from storage and lets
//! tests substitute recording mocks.

use std::future::Future;
use std::pin::Pin;

use userpurge_protocol::{AccountIdentity, StoreDomain};

use crate::error::StoreError;

/// A boxed future returned by store methods.
pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, StoreError>> + Send + 'a>>;

/// Canonical account records.
pub trait AccountLookup: Send + Sync {
    /// Looks up an account by username. `Ok(None)` if there is none.
    fn get_account_by_username<'a>(
        &'a self,
        username: &'a str,
    ) -> StoreFuture<'a, Option<AccountIdentity>>;

    /// Removes the account record with the given id.
    fn delete_one<'a>(&'a self, id: &'a str) -> StoreFuture<'a, ()>;
}

/// Per-account collections, one per [`StoreDomain`].
pub trait RecordStore: Send + Sync {
    /// Drops the account's collection for `domain`.
    ///
    /// Must fail with [`StoreError::NotFound`] if the collection does not
    /// exist.
    fn drop_collection<'a>(
        &'a self,
        domain: StoreDomain,
        identity: &'a AccountIdentity,
    ) -> StoreFuture<'a, ()>;
}

/// Login sessions.
pub trait SessionStore: Send + Sync {
    /// Removes every session belonging to `username`; returns how many.
    fn remove_by_username<'a>(&'a self, username: &'a str) -> StoreFuture<'a, u64>;
}

/// Optional time-series store holding high-frequency data.
pub trait SeriesStore: Send + Sync {
    /// Drops the named database and everything in it.
    fn drop_database<'a>(&'a self, name: &'a str) -> StoreFuture<'a, ()>;
}
