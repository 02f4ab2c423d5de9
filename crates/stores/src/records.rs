//! Per-domain collection drops.

use std::time::Duration;

use futures_util::future::join_all;
use userpurge_protocol::{AccountIdentity, StoreDomain};

use crate::error::{StoreError, with_timeout};
use crate::traits::RecordStore;

/// Outcome of dropping one domain's collection.
#[derive(Debug)]
pub struct DomainDrop {
    pub domain: StoreDomain,
    pub result: Result<(), StoreError>,
}

impl DomainDrop {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Drops the account's collection in every domain, concurrently.
///
/// A failing domain never stops its siblings: every drop is awaited and
/// reported, in the order of `domains`. `NotFound` is already folded into
/// success.
pub async fn drop_account_data(
    store: &dyn RecordStore,
    domains: &[StoreDomain],
    identity: &AccountIdentity,
    limit: Duration,
) -> Vec<DomainDrop> {
    let drops = domains.iter().map(|&domain| async move {
        let result = match with_timeout(limit, store.drop_collection(domain, identity)).await {
            Err(e) if e.is_not_found() => {
                tracing::debug!(
                    %domain,
                    collection = domain.collection(),
                    account = %identity.id,
                    "collection already absent"
                );
                Ok(())
            }
            other => other,
        };
        DomainDrop { domain, result }
    });

    join_all(drops).await
}
