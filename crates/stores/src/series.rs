//! Optional time-series namespace removal.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use userpurge_protocol::series_namespace;

use crate::error::{StoreError, with_timeout};
use crate::traits::SeriesStore;

/// What happened to the user's time-series namespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SeriesDrop {
    /// No time-series store is configured in this deployment.
    Disabled,
    Dropped { namespace: String },
}

/// Drops per-user time-series namespaces when the subsystem is enabled.
///
/// Whether a store is present is decided once, at construction.
#[derive(Clone, Default)]
pub struct SeriesEraser {
    store: Option<Arc<dyn SeriesStore>>,
}

impl fmt::Debug for SeriesEraser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SeriesEraser")
            .field("enabled", &self.is_enabled())
            .finish()
    }
}

impl SeriesEraser {
    pub fn new(store: Option<Arc<dyn SeriesStore>>) -> Self {
        Self { store }
    }

    pub fn disabled() -> Self {
        Self { store: None }
    }

    pub fn is_enabled(&self) -> bool {
        self.store.is_some()
    }

    /// Drops `user.<username>`. Errors other than not-found are fatal.
    pub async fn drop_namespace(
        &self,
        username: &str,
        limit: Duration,
    ) -> Result<SeriesDrop, StoreError> {
        let Some(store) = &self.store else {
            return Ok(SeriesDrop::Disabled);
        };

        let namespace = series_namespace(username);
        match with_timeout(limit, store.drop_database(&namespace)).await {
            Ok(()) => tracing::info!(%namespace, "dropped time-series namespace"),
            Err(e) if e.is_not_found() => {
                tracing::debug!(%namespace, "time-series namespace already absent");
            }
            Err(e) => return Err(e),
        }
        Ok(SeriesDrop::Dropped { namespace })
    }
}
