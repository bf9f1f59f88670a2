//! CSV export of every fetched event.

use anyhow::{Context, Result};
use delegators_core::DelegationEvent;
use serde::Serialize;
use std::fs::File;
use std::io::Write;
use std::path::Path;

const HEADER: [&str; 7] = [
    "indexer",
    "tokens",
    "delegator",
    "block_timestamp",
    "block_datetime",
    "transaction_hash",
    "event_type",
];

#[derive(Serialize)]
struct CsvRecord<'a> {
    indexer: &'a str,
    tokens: String,
    delegator: &'a str,
    block_timestamp: i64,
    block_datetime: String,
    transaction_hash: &'a str,
    event_type: &'static str,
}

impl<'a> From<&'a DelegationEvent> for CsvRecord<'a> {
    fn from(event: &'a DelegationEvent) -> Self {
        Self {
            indexer: &event.indexer,
            tokens: event.tokens.to_string(),
            delegator: &event.delegator,
            block_timestamp: event.block_timestamp,
            block_datetime: event.block_datetime().format("%Y-%m-%d %H:%M:%S+00:00").to_string(),
            transaction_hash: &event.transaction_hash,
            event_type: event.kind.as_str(),
        }
    }
}

/// Write `events` as CSV to `writer`. The header is always written.
pub fn write_events<W: Write>(writer: W, events: &[DelegationEvent]) -> Result<(), csv::Error> {
    let mut wtr = csv::WriterBuilder::new().has_headers(false).from_writer(writer);
    wtr.write_record(HEADER)?;
    for event in events {
        wtr.serialize(CsvRecord::from(event))?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_csv(path: &Path, events: &[DelegationEvent]) -> Result<()> {
    let file = File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
    write_events(file, events).with_context(|| format!("failed to write {}", path.display()))?;
    tracing::info!(path = %path.display(), rows = events.len(), "wrote CSV export");
    Ok(())
}
