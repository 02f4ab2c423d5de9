use std::time::Duration;

/// Upper bound for a single call into an external store.
///
/// An administrative deletion must never hang; every lookup, drop and
/// removal is wrapped in a timeout of this length unless configured
/// otherwise.
pub const DEFAULT_CALL_TIMEOUT: Duration = Duration::from_secs(30);

/// Prefix of the per-user time-series database name (`user.<username>`).
pub const SERIES_NAMESPACE_PREFIX: &str = "user.";

/// Returns the time-series namespace holding a user's high-frequency data.
pub fn series_namespace(username: &str) -> String {
    format!("{SERIES_NAMESPACE_PREFIX}{username}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn namespace_is_prefixed_username() {
        assert_eq!(series_namespace("alice"), "user.alice");
    }

    #[test]
    fn namespace_keeps_username_verbatim() {
        assert_eq!(series_namespace("a.b-c"), "user.a.b-c");
    }
}
