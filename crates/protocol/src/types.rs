use std::fmt;

use serde::{Deserialize, Serialize};

/// Identity of the account being deleted.
///
/// Resolved once from a username lookup and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountIdentity {
    pub id: String,
    pub username: String,
}

impl AccountIdentity {
    pub fn new(id: impl Into<String>, username: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            username: username.into(),
        }
    }
}

/// A category of per-account data held in its own collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StoreDomain {
    Authorizations,
    Events,
    Streams,
    SharedSlices,
    Profile,
    Webhooks,
}

impl StoreDomain {
    /// Every domain, in the order drops are issued and errors are reported.
    pub const ALL: [StoreDomain; 6] = [
        StoreDomain::Authorizations,
        StoreDomain::Events,
        StoreDomain::Streams,
        StoreDomain::SharedSlices,
        StoreDomain::Profile,
        StoreDomain::Webhooks,
    ];

    /// Collection name stem used by the record store for this domain.
    pub fn collection(self) -> &'static str {
        match self {
            StoreDomain::Authorizations => "accesses",
            StoreDomain::Events => "events",
            StoreDomain::Streams => "streams",
            StoreDomain::SharedSlices => "followedSlices",
            StoreDomain::Profile => "profile",
            StoreDomain::Webhooks => "webhooks",
        }
    }

    /// Stable kebab-case name, used in logs.
    pub fn as_str(self) -> &'static str {
        match self {
            StoreDomain::Authorizations => "authorizations",
            StoreDomain::Events => "events",
            StoreDomain::Streams => "streams",
            StoreDomain::SharedSlices => "shared-slices",
            StoreDomain::Profile => "profile",
            StoreDomain::Webhooks => "webhooks",
        }
    }
}

impl fmt::Display for StoreDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
