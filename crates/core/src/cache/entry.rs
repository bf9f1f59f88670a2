//! Cache entry type and address normalization.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// A single address lookup result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheEntry {
    pub address: String,
    /// `None` records that no name could be resolved.
    #[serde(default)]
    pub name: Option<String>,
    pub resolved_at: DateTime<Utc>,
}

impl CacheEntry {
    pub fn new(address: &str, name: Option<String>, resolved_at: DateTime<Utc>) -> Self {
        Self { address: normalize_address(address), name, resolved_at }
    }

    /// Stale once strictly older than `expiry`. The boundary itself is fresh.
    pub fn is_expired(&self, expiry: Duration, now: DateTime<Utc>) -> bool {
        now.signed_duration_since(self.resolved_at) > expiry
    }
}

/// Canonical cache key for an address: trimmed and lowercased.
pub fn normalize_address(address: &str) -> String {
    address.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_address() {
        assert_eq!(normalize_address("  0xABCdef "), "0xabcdef");
        assert_eq!(normalize_address("0xabc"), normalize_address("0xABC"));
    }

    #[test]
    fn test_new_normalizes() {
        let entry = CacheEntry::new("0xABC", Some("alice.eth".into()), Utc::now());
        assert_eq!(entry.address, "0xabc");
    }

    #[test]
    fn test_expiry_boundary() {
        let resolved_at = Utc::now();
        let entry = CacheEntry::new("0xabc", None, resolved_at);
        let window = Duration::hours(24);

        assert!(!entry.is_expired(window, resolved_at));
        assert!(!entry.is_expired(window, resolved_at + window));
        assert!(entry.is_expired(window, resolved_at + window + Duration::seconds(1)));
    }

    #[test]
    fn test_future_timestamp_is_fresh() {
        let now = Utc::now();
        let entry = CacheEntry::new("0xabc", None, now + Duration::hours(1));
        assert!(!entry.is_expired(Duration::hours(24), now));
    }

    #[test]
    fn test_missing_name_deserializes_as_none() {
        let json = r#"{"address":"0xabc","resolved_at":"2025-04-09T12:00:00Z"}"#;
        let entry: CacheEntry = serde_json::from_str(json).unwrap();
        assert!(entry.name.is_none());
    }
}
