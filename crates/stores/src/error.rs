//! Store error types.

use std::future::Future;
use std::time::Duration;

/// MongoDB `NamespaceNotFound` server error code.
const NAMESPACE_NOT_FOUND_CODE: i32 = 26;

/// Errors reported by store collaborators.
///
/// `NotFound` is structured so erasers can treat already-absent data as a
/// successful drop without inspecting message text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("timed out after {0:?}")]
    Timeout(Duration),

    #[error("store error: {0}")]
    Backend(String),
}

impl StoreError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound(_))
    }

    /// Classifies a driver error that only carries a message.
    ///
    /// Drivers that expose a numeric code should use [`from_driver_code`]
    /// instead; this exists for drivers that surface the server's
    /// `ns not found` text and nothing else.
    ///
    /// [`from_driver_code`]: StoreError::from_driver_code
    pub fn from_driver_message(message: impl Into<String>) -> Self {
        let message = message.into();
        if message.contains("ns not found") || message.contains("NamespaceNotFound") {
            StoreError::NotFound(message)
        } else {
            StoreError::Backend(message)
        }
    }

    /// Classifies a driver error from its server error code.
    pub fn from_driver_code(code: i32, message: impl Into<String>) -> Self {
        if code == NAMESPACE_NOT_FOUND_CODE {
            StoreError::NotFound(message.into())
        } else {
            StoreError::Backend(message.into())
        }
    }
}

/// Runs a store call with an upper time bound.
///
/// Elapsed time is reported as [`StoreError::Timeout`].
pub async fn with_timeout<T, F>(limit: Duration, fut: F) -> Result<T, StoreError>
where
    F: Future<Output = Result<T, StoreError>>,
{
    match tokio::time::timeout(limit, fut).await {
        Ok(result) => result,
        Err(_) => Err(StoreError::Timeout(limit)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn driver_message_ns_not_found() {
        let err = StoreError::from_driver_message("ns not found");
        assert!(err.is_not_found());
    }

    #[test]
    fn driver_message_other() {
        let err = StoreError::from_driver_message("connection reset by peer");
        assert_eq!(err, StoreError::Backend("connection reset by peer".into()));
    }

    #[test]
    fn driver_code_namespace_not_found() {
        assert!(StoreError::from_driver_code(26, "drop failed").is_not_found());
        assert!(!StoreError::from_driver_code(13, "unauthorized").is_not_found());
    }

    #[tokio::test(start_paused = true)]
    async fn with_timeout_reports_elapsed_limit() {
        let limit = Duration::from_secs(5);
        let result: Result<(), _> = with_timeout(limit, async {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(())
        })
        .await;
        assert_eq!(result, Err(StoreError::Timeout(limit)));
    }

    #[tokio::test]
    async fn with_timeout_passes_through_result() {
        let result = with_timeout(Duration::from_secs(5), async {
            Err::<(), _>(StoreError::Unavailable("down".into()))
        })
        .await;
        assert_eq!(result, Err(StoreError::Unavailable("down".into())));
    }
}
