//! The learned network-domain allowlist.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Hostnames a human has previously approved for URL-carrying tool calls.
///
/// Hostnames are stored lower-cased, so membership is case-insensitive and
/// duplicates are impossible. The set grows only through granted approvals;
/// it is persisted as `domains.json` in the workspace state directory.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DomainAllowlist {
    allowed: BTreeSet<String>,
}

impl DomainAllowlist {
    /// Create an empty allowlist.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Check whether a hostname is allowed. Case-insensitive.
    #[must_use]
    pub fn contains(&self, hostname: &str) -> bool {
        self.allowed.contains(&hostname.to_ascii_lowercase())
    }

    /// Add a hostname to the allowlist.
    ///
    /// Returns `true` if the hostname was not already present.
    pub fn insert(&mut self, hostname: &str) -> bool {
        self.allowed.insert(hostname.to_ascii_lowercase())
    }

    /// Number of allowed hostnames.
    #[must_use]
    pub fn len(&self) -> usize {
        self.allowed.len()
    }

    /// Check whether the allowlist is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.allowed.is_empty()
    }

    /// Iterate over the allowed hostnames in sorted order.
    pub fn hostnames(&self) -> impl Iterator<Item = &str> {
        self.allowed.iter().map(String::as_str)
    }
}
