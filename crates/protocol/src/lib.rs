pub mod constants;
pub mod response;
pub mod types;

// Re-export primary types for convenience.
pub use constants::{DEFAULT_CALL_TIMEOUT, SERIES_NAMESPACE_PREFIX, series_namespace};
pub use response::{DeleteAccountRequest, ErrorBody, ErrorId, ErrorResponse};
pub use types::{AccountIdentity, StoreDomain};
