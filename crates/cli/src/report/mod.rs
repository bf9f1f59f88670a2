//! Report model shared by the CSV and HTML writers.
//!
//! The dashboard shows only events at or above the GRT threshold, enriched
//! with display names and avatars. Totals cover every fetched event.

pub mod csv;
pub mod html;

use chrono::{DateTime, Utc};
use delegators_core::cache::normalize_address;
use delegators_core::{AppConfig, DelegationEvent, Totals};
use std::collections::HashMap;

pub const CSV_FILE: &str = "delegators.csv";
pub const HTML_FILE: &str = "index.html";

/// One dashboard table row.
#[derive(Debug, Clone)]
pub struct ReportRow {
    pub event: DelegationEvent,
    pub indexer_name: Option<String>,
    pub delegator_name: Option<String>,
    pub indexer_avatar: Option<String>,
}

impl ReportRow {
    pub fn indexer_label(&self) -> &str {
        self.indexer_name.as_deref().unwrap_or(&self.event.indexer)
    }

    pub fn delegator_label(&self) -> &str {
        self.delegator_name.as_deref().unwrap_or(&self.event.delegator)
    }
}

/// Everything the HTML page needs.
#[derive(Debug, Clone)]
pub struct Dashboard {
    pub rows: Vec<ReportRow>,
    pub totals: Totals,
    pub generated_at: DateTime<Utc>,
    pub transaction_count: u32,
    pub grt_threshold: u64,
    pub profile_url: String,
    pub tx_url: String,
    pub version: &'static str,
}

impl Dashboard {
    pub fn new(
        config: &AppConfig, events: &[DelegationEvent], names: &HashMap<String, String>,
        avatars: &HashMap<String, String>, generated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            rows: build_rows(events, config.grt_threshold, names, avatars),
            totals: Totals::from_events(events),
            generated_at,
            transaction_count: config.transaction_count,
            grt_threshold: config.grt_threshold,
            profile_url: config.profile_url.trim_end_matches('/').to_string(),
            tx_url: config.tx_url.trim_end_matches('/').to_string(),
            version: env!("CARGO_PKG_VERSION"),
        }
    }

    /// Total events requested across both event kinds.
    pub fn window_size(&self) -> u64 {
        u64::from(self.transaction_count) * 2
    }
}

/// Events at or above the threshold, in input order.
pub fn visible_events(events: &[DelegationEvent], grt_threshold: u64) -> impl Iterator<Item = &DelegationEvent> {
    events.iter().filter(move |e| e.meets_threshold(grt_threshold))
}

/// Indexer and delegator addresses of `events`, indexer first, duplicates kept.
pub fn participants<'a>(events: impl IntoIterator<Item = &'a DelegationEvent>) -> Vec<&'a str> {
    events
        .into_iter()
        .flat_map(|e| [e.indexer.as_str(), e.delegator.as_str()])
        .collect()
}

/// Build table rows for events at or above the threshold.
///
/// `names` and `avatars` are keyed by normalized address.
pub fn build_rows(
    events: &[DelegationEvent], grt_threshold: u64, names: &HashMap<String, String>,
    avatars: &HashMap<String, String>,
) -> Vec<ReportRow> {
    visible_events(events, grt_threshold)
        .map(|event| {
            let indexer = normalize_address(&event.indexer);
            let delegator = normalize_address(&event.delegator);
            ReportRow {
                indexer_name: names.get(&indexer).cloned(),
                delegator_name: names.get(&delegator).cloned(),
                indexer_avatar: avatars.get(&indexer).cloned(),
                event: event.clone(),
            }
        })
        .collect()
}


#[cfg(test)]
mod tests {
    use super::fixtures::event;
    use super::*;
    use delegators_core::EventKind;

    #[test]
    fn test_build_rows_filters_by_threshold() {
        let events = vec![
            event(EventKind::Delegation, 25_000, 3, "0xaaa", "0xbbb"),
            event(EventKind::Undelegation, 500, 2, "0xaaa", "0xccc"),
            event(EventKind::Undelegation, 10_000, 1, "0xddd", "0xbbb"),
        ];

        let rows = build_rows(&events, 10_000, &HashMap::new(), &HashMap::new());

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].event.block_timestamp, 3);
        assert_eq!(rows[1].event.block_timestamp, 1);
    }

    #[test]
    fn test_build_rows_attaches_names_and_avatars() {
        let events = vec![event(EventKind::Delegation, 20_000, 1, "0xAAA", "0xBBB")];
        let names = HashMap::from([("0xaaa".to_string(), "indexer.eth".to_string())]);
        let avatars = HashMap::from([("0xaaa".to_string(), "https://img/a.png".to_string())]);

        let rows = build_rows(&events, 10_000, &names, &avatars);

        assert_eq!(rows[0].indexer_label(), "indexer.eth");
        assert_eq!(rows[0].delegator_label(), "0xBBB");
        assert_eq!(rows[0].indexer_avatar.as_deref(), Some("https://img/a.png"));
    }

    #[test]
    fn test_participants() {
        let events = vec![
            event(EventKind::Delegation, 1, 1, "0xaaa", "0xbbb"),
            event(EventKind::Delegation, 1, 2, "0xaaa", "0xccc"),
        ];
        assert_eq!(participants(&events), vec!["0xaaa", "0xbbb", "0xaaa", "0xccc"]);
    }

    #[test]
    fn test_dashboard_totals_cover_all_events() {
        let config = AppConfig::default();
        let events = vec![
            event(EventKind::Delegation, 50_000, 2, "0xaaa", "0xbbb"),
            event(EventKind::Delegation, 10, 1, "0xaaa", "0xbbb"),
        ];

        let dashboard = Dashboard::new(&config, &events, &HashMap::new(), &HashMap::new(), Utc::now());

        assert_eq!(dashboard.rows.len(), 1);
        assert_eq!(dashboard.totals.delegated, 50_010);
        assert_eq!(dashboard.window_size(), 200);
    }
}
