//! Canonical account record lookup and removal.

use std::time::Duration;

use userpurge_protocol::AccountIdentity;

use crate::error::{StoreError, with_timeout};
use crate::traits::AccountLookup;

/// Resolves a username to an account identity.
///
/// A record without an id is treated as no account at all.
pub async fn resolve_account(
    lookup: &dyn AccountLookup,
    username: &str,
    limit: Duration,
) -> Result<Option<AccountIdentity>, StoreError> {
    let account = with_timeout(limit, lookup.get_account_by_username(username)).await?;
    Ok(account.filter(|a| !a.id.is_empty()))
}

/// Removes the canonical account record. An absent record is success.
pub async fn remove_account(
    lookup: &dyn AccountLookup,
    id: &str,
    limit: Duration,
) -> Result<(), StoreError> {
    match with_timeout(limit, lookup.delete_one(id)).await {
        Ok(()) => {
            tracing::info!(account = id, "removed account record");
            Ok(())
        }
        Err(e) if e.is_not_found() => Ok(()),
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryStore;
    use crate::traits::StoreFuture;

    const LIMIT: Duration = Duration::from_secs(5);

    struct FixedLookup(Option<AccountIdentity>);

    impl AccountLookup for FixedLookup {
        fn get_account_by_username<'a>(
            &'a self,
            _username: &'a str,
        ) -> StoreFuture<'a, Option<AccountIdentity>> {
            let account = self.0.clone();
            Box::pin(async move { Ok(account) })
        }

        fn delete_one<'a>(&'a self, _id: &'a str) -> StoreFuture<'a, ()> {
            Box::pin(async move { Err(StoreError::NotFound("users".into())) })
        }
    }

    #[tokio::test]
    async fn resolves_existing_account() {
        let store = MemoryStore::new();
        store.insert_account(AccountIdentity::new("u1", "alice"));

        let account = resolve_account(&store, "alice", LIMIT).await.unwrap();
        assert_eq!(account.unwrap().id, "u1");
    }

    #[tokio::test]
    async fn unknown_username_resolves_to_none() {
        let store = MemoryStore::new();
        assert!(resolve_account(&store, "ghost", LIMIT).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn empty_id_resolves_to_none() {
        let lookup = FixedLookup(Some(AccountIdentity::new("", "alice")));
        assert!(resolve_account(&lookup, "alice", LIMIT).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn remove_absent_record_is_success() {
        let lookup = FixedLookup(None);
        remove_account(&lookup, "u1", LIMIT).await.unwrap();
    }
}
