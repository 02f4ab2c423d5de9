//! Store collaborators and per-store erasers for account deletion.
//!
//! The deletion workflow never talks to a database driver directly. It
//! goes through the object-safe traits in [`traits`], implemented by the
//! host application on top of its real drivers (and by [`memory`] for
//! tests and embedding). Each eraser module wraps one trait call with a
//! timeout and folds "already absent" into success.

pub mod accounts;
pub mod error;
#[cfg(feature = "influx")]
pub mod influx;
pub mod memory;
pub mod records;
pub mod series;
pub mod sessions;
pub mod traits;

// Re-export primary types for convenience.
pub use accounts::{remove_account, resolve_account};
pub use error::{StoreError, with_timeout};
#[cfg(feature = "influx")]
pub use influx::InfluxSeries;
pub use memory::MemoryStore;
pub use records::{DomainDrop, drop_account_data};
pub use series::{SeriesDrop, SeriesEraser};
pub use sessions::remove_sessions;
pub use traits::{AccountLookup, RecordStore, SeriesStore, SessionStore, StoreFuture};
