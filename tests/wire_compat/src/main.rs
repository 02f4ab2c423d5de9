fn main() {
    println!("Run `cargo test -p wire-compat` to execute wire compatibility tests.");
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::PathBuf;

    use userpurge_deletion::{DeletionError, Stage, StageFailure};
    use userpurge_protocol::{DeleteAccountRequest, ErrorId, ErrorResponse, StoreDomain};

    /// Returns the path to the fixtures directory.
    fn fixtures_dir() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("fixtures")
    }

    /// Loads a fixture JSON file and returns it as a `serde_json::Value`.
    fn load_fixture(name: &str) -> serde_json::Value {
        let path = fixtures_dir().join(name);
        let data = fs::read_to_string(&path)
            .unwrap_or_else(|e| panic!("failed to read fixture {}: {e}", path.display()));
        serde_json::from_str(&data)
            .unwrap_or_else(|e| panic!("failed to parse fixture {}: {e}", path.display()))
    }

    /// Serializes `value` and compares it with the fixture (order-independent).
    fn assert_matches_fixture<T: serde::Serialize>(value: &T, name: &str) {
        let fixture = load_fixture(name);
        let serialized = serde_json::to_value(value)
            .unwrap_or_else(|e| panic!("failed to serialize for {name}: {e}"));
        assert_eq!(
            fixture, serialized,
            "payload mismatch for {name}:\n  fixture: {fixture}\n  rust:    {serialized}"
        );
    }

    /// Deserializes a fixture, re-serializes it, and compares the JSON values.
    fn roundtrip_test<T>(name: &str)
    where
        T: serde::de::DeserializeOwned + serde::Serialize,
    {
        let fixture = load_fixture(name);
        let parsed: T = serde_json::from_value(fixture.clone())
            .unwrap_or_else(|e| panic!("failed to deserialize {name}: {e}"));
        assert_matches_fixture(&parsed, name);
    }

    // --- Request ---

    #[test]
    fn fixture_delete_account_request() {
        roundtrip_test::<DeleteAccountRequest>("delete_account_request.json");
        let parsed: DeleteAccountRequest =
            serde_json::from_value(load_fixture("delete_account_request.json")).unwrap();
        assert_eq!(parsed.username, "alice");
    }

    // --- Error payloads ---

    #[test]
    fn fixture_error_unknown_resource() {
        roundtrip_test::<ErrorResponse>("error_unknown_resource.json");
        assert_matches_fixture(
            &ErrorResponse::unknown_resource(),
            "error_unknown_resource.json",
        );
    }

    #[test]
    fn fixture_error_unexpected() {
        roundtrip_test::<ErrorResponse>("error_unexpected.json");
        assert_matches_fixture(&ErrorResponse::unexpected_error(), "error_unexpected.json");
    }

    // --- Deletion errors as seen by callers ---

    #[test]
    fn rejected_deletions_share_one_payload() {
        assert_matches_fixture(
            &DeletionError::InvalidCredential.response(),
            "error_unknown_resource.json",
        );
        assert_matches_fixture(
            &DeletionError::UnknownUser {
                username: "ghost".into(),
            }
            .response(),
            "error_unknown_resource.json",
        );
    }

    #[test]
    fn internal_failures_share_one_payload() {
        let failures = [
            DeletionError::Busy {
                username: "alice".into(),
            },
            DeletionError::DeploymentMisconfigured {
                path: "/srv/previews".into(),
            },
            DeletionError::Inaccessible {
                path: "/srv/attachments/u1".into(),
            },
            DeletionError::Failed {
                stage: Stage::DropDomain(StoreDomain::Webhooks),
                source: StageFailure::Timeout(std::time::Duration::from_secs(30)),
            },
        ];
        for failure in &failures {
            assert_eq!(failure.error_id(), ErrorId::UnexpectedError);
            assert_matches_fixture(&failure.response(), "error_unexpected.json");
        }
    }
}
