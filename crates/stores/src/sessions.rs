//! Session removal.

use std::time::Duration;

use crate::error::{StoreError, with_timeout};
use crate::traits::SessionStore;

/// Removes every login session of `username`.
///
/// No matching session is success. Returns the number removed.
pub async fn remove_sessions(
    store: &dyn SessionStore,
    username: &str,
    limit: Duration,
) -> Result<u64, StoreError> {
    match with_timeout(limit, store.remove_by_username(username)).await {
        Ok(removed) => {
            tracing::info!(username, removed, "removed sessions");
            Ok(removed)
        }
        Err(e) if e.is_not_found() => Ok(0),
        Err(e) => Err(e),
    }
}
