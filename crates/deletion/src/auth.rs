//! Admin credential validation.

/// Checks a caller credential against the configured admin key.
///
/// Uses constant-time comparison to prevent timing attacks. An empty
/// expected key never matches.
pub fn credential_matches(received: &str, expected: &str) -> bool {
    if expected.is_empty() || received.len() != expected.len() {
        return false;
    }
    let mut diff = 0u8;
    for (a, b) in received.bytes().zip(expected.bytes()) {
        diff |= a ^ b;
    }
    diff == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matching_credential() {
        assert!(credential_matches("admin-secret", "admin-secret"));
    }

    #[test]
    fn mismatched_credential() {
        assert!(!credential_matches("admin-secreT", "admin-secret"));
    }

    #[test]
    fn different_lengths() {
        assert!(!credential_matches("admin", "admin-secret"));
        assert!(!credential_matches("", "admin-secret"));
    }

    #[test]
    fn empty_key_never_matches() {
        assert!(!credential_matches("", ""));
    }
}
