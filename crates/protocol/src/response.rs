use serde::{Deserialize, Serialize};

/// Request to delete one account.
///
/// The credential normally comes from the `Authorization` header and is
/// compared against the configured admin key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteAccountRequest {
    pub caller_credential: String,
    pub username: String,
}

/// Error identifiers visible to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ErrorId {
    UnknownResource,
    UnexpectedError,
}

impl ErrorId {
    fn default_message(self) -> &'static str {
        match self {
            ErrorId::UnknownResource => "Unknown resource",
            ErrorId::UnexpectedError => "An unexpected error occurred",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub id: ErrorId,
    pub message: String,
}

/// Error payload returned to the caller of a deletion.
///
/// Carries only the error id and a generic message. Causes are logged
/// server-side and never echoed back, so an invalid credential and an
/// unknown username produce the same payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

impl ErrorResponse {
    pub fn new(id: ErrorId) -> Self {
        Self {
            error: ErrorBody {
                id,
                message: id.default_message().to_string(),
            },
        }
    }

    pub fn unknown_resource() -> Self {
        Self::new(ErrorId::UnknownResource)
    }

    pub fn unexpected_error() -> Self {
        Self::new(ErrorId::UnexpectedError)
    }

    pub fn id(&self) -> ErrorId {
        self.error.id
    }
}
