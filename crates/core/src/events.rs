//! Delegation event model.
//!
//! Token amounts are carried in base units (18 decimals) exactly as the
//! indexing service reports them. Conversion to whole GRT truncates.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Base units per whole GRT.
pub const WEI_PER_GRT: u128 = 10u128.pow(18);

/// Direction of a stake movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    Delegation,
    Undelegation,
}

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::Delegation => "delegation",
            EventKind::Undelegation => "undelegation",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single delegation or undelegation observed on chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DelegationEvent {
    pub indexer: String,
    pub delegator: String,
    /// Raw amount in base units.
    pub tokens: u128,
    /// Seconds since the Unix epoch.
    pub block_timestamp: i64,
    pub transaction_hash: String,
    pub kind: EventKind,
}

impl DelegationEvent {
    /// Amount in whole GRT, truncated.
    pub fn tokens_grt(&self) -> u128 {
        self.tokens / WEI_PER_GRT
    }

    /// Block time as a UTC datetime. Out-of-range timestamps map to the epoch.
    pub fn block_datetime(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(self.block_timestamp, 0).unwrap_or_default()
    }

    /// Whether the event moves at least `threshold_grt` whole GRT.
    pub fn meets_threshold(&self, threshold_grt: u64) -> bool {
        self.tokens >= u128::from(threshold_grt).saturating_mul(WEI_PER_GRT)
    }
}

/// Sort events newest first. Ties keep their input order.
pub fn sort_newest_first(events: &mut [DelegationEvent]) {
    events.sort_by(|a, b| b.block_timestamp.cmp(&a.block_timestamp));
}

/// Aggregate token movement across a set of events, in whole GRT.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Totals {
    pub delegated: u128,
    pub undelegated: u128,
}

impl Totals {
    /// Sum raw amounts per kind, then truncate each sum to whole GRT.
    pub fn from_events(events: &[DelegationEvent]) -> Self {
        let (delegated, undelegated) = events.iter().fold((0u128, 0u128), |(d, u), e| match e.kind {
            EventKind::Delegation => (d.saturating_add(e.tokens), u),
            EventKind::Undelegation => (d, u.saturating_add(e.tokens)),
        });

        Self { delegated: delegated / WEI_PER_GRT, undelegated: undelegated / WEI_PER_GRT }
    }

    pub fn net(&self) -> i128 {
        let delegated = i128::try_from(self.delegated).unwrap_or(i128::MAX);
        let undelegated = i128::try_from(self.undelegated).unwrap_or(i128::MAX);
        delegated - undelegated
    }
}
