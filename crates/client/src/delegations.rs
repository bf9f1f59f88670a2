//! Delegation event queries against the network subgraph.

use crate::graph::{GraphClient, GraphError};
use delegators_core::events::sort_newest_first;
use delegators_core::{DelegationEvent, EventKind};
use serde::Deserialize;

/// Both event lists in one request, newest first.
const EVENTS_QUERY: &str = r#"
query RecentDelegations($first: Int!) {
  stakeDelegateds(orderBy: blockTimestamp, orderDirection: desc, first: $first) {
    indexer
    tokens
    delegator
    blockTimestamp
    transactionHash
  }
  stakeDelegatedLockeds(orderBy: blockTimestamp, orderDirection: desc, first: $first) {
    indexer
    tokens
    delegator
    blockTimestamp
    transactionHash
  }
}
"#;

/// `data` payload of [`EVENTS_QUERY`].
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawEvents {
    #[serde(default)]
    pub stake_delegateds: Vec<RawStakeEvent>,
    #[serde(default)]
    pub stake_delegated_lockeds: Vec<RawStakeEvent>,
}

/// One stake event as the subgraph encodes it. BigInt fields arrive as strings.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawStakeEvent {
    pub indexer: String,
    pub tokens: BigIntField,
    pub delegator: String,
    pub block_timestamp: BigIntField,
    pub transaction_hash: String,
}

/// BigInt value, accepted either as a decimal string or a JSON number.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum BigIntField {
    Text(String),
    Number(u64),
}

impl BigIntField {
    fn parse<T: std::str::FromStr + TryFrom<u64>>(&self, field: &str) -> Result<T, GraphError> {
        match self {
            BigIntField::Text(text) => text
                .trim()
                .parse::<T>()
                .map_err(|_| GraphError::Parse(format!("{field}: not an integer: {text:?}"))),
            BigIntField::Number(n) => {
                T::try_from(*n).map_err(|_| GraphError::Parse(format!("{field}: out of range: {n}")))
            }
        }
    }
}

impl RawStakeEvent {
    fn into_event(self, kind: EventKind) -> Result<DelegationEvent, GraphError> {
        Ok(DelegationEvent {
            tokens: self.tokens.parse::<u128>("tokens")?,
            block_timestamp: self.block_timestamp.parse::<i64>("blockTimestamp")?,
            indexer: self.indexer,
            delegator: self.delegator,
            transaction_hash: self.transaction_hash,
            kind,
        })
    }
}

impl RawEvents {
    /// Map both lists to domain events, newest first.
    pub fn into_events(self) -> Result<Vec<DelegationEvent>, GraphError> {
        let delegations = self
            .stake_delegateds
            .into_iter()
            .map(|raw| raw.into_event(EventKind::Delegation));
        let undelegations = self
            .stake_delegated_lockeds
            .into_iter()
            .map(|raw| raw.into_event(EventKind::Undelegation));

        let mut events = delegations.chain(undelegations).collect::<Result<Vec<_>, _>>()?;
        sort_newest_first(&mut events);
        Ok(events)
    }
}

impl GraphClient {
    /// Fetch the latest `count` delegations and `count` undelegations.
    ///
    /// Returns up to `2 * count` events sorted by block time, newest first.
    pub async fn fetch_delegation_events(
        &self, subgraph_id: &str, count: u32,
    ) -> Result<Vec<DelegationEvent>, GraphError> {
        let raw: RawEvents = self
            .query(subgraph_id, EVENTS_QUERY, serde_json::json!({ "first": count }))
            .await?;

        let events = raw.into_events()?;
        tracing::info!(count = events.len(), "fetched delegation events");
        Ok(events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::GraphResponse;

    const FIXTURE_JSON: &str = r#"{
        "data": {
            "stakeDelegateds": [
                {
                    "indexer": "0x1111111111111111111111111111111111111111",
                    "tokens": "25000000000000000000000",
                    "delegator": "0xaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa",
                    "blockTimestamp": "1744200000",
                    "transactionHash": "0xdelegation1"
                },
                {
                    "indexer": "0x2222222222222222222222222222222222222222",
                    "tokens": "1000000000000000000",
                    "delegator": "0xbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb",
                    "blockTimestamp": "1744100000",
                    "transactionHash": "0xdelegation2"
                }
            ],
            "stakeDelegatedLockeds": [
                {
                    "indexer": "0x1111111111111111111111111111111111111111",
                    "tokens": "500000000000000000000000",
                    "delegator": "0xcccccccccccccccccccccccccccccccccccccccc",
                    "blockTimestamp": 1744150000,
                    "transactionHash": "0xundelegation1"
                }
            ]
        }
    }"#;

    #[test]
    fn test_deserialize_and_map_events() {
        let raw: GraphResponse<RawEvents> = serde_json::from_str(FIXTURE_JSON).unwrap();
        let events = raw.into_data().unwrap().into_events().unwrap();

        assert_eq!(events.len(), 3);
        let hashes: Vec<&str> = events.iter().map(|e| e.transaction_hash.as_str()).collect();
        assert_eq!(hashes, vec!["0xdelegation1", "0xundelegation1", "0xdelegation2"]);

        assert_eq!(events[0].kind, EventKind::Delegation);
        assert_eq!(events[0].tokens_grt(), 25_000);
        assert_eq!(events[1].kind, EventKind::Undelegation);
        assert_eq!(events[1].tokens_grt(), 500_000);
        assert_eq!(events[1].block_timestamp, 1_744_150_000);
    }

    #[test]
    fn test_missing_lists_are_empty() {
        let raw: RawEvents = serde_json::from_str("{}").unwrap();
        assert!(raw.into_events().unwrap().is_empty());
    }

    #[test]
    fn test_invalid_tokens() {
        let json = r#"{
            "stakeDelegateds": [{
                "indexer": "0x1", "tokens": "lots", "delegator": "0x2",
                "blockTimestamp": "1", "transactionHash": "0x3"
            }]
        }"#;
        let raw: RawEvents = serde_json::from_str(json).unwrap();
        assert!(matches!(raw.into_events(), Err(GraphError::Parse(msg)) if msg.contains("tokens")));
    }

    #[test]
    fn test_tokens_beyond_u64() {
        let field = BigIntField::Text("340282366920938463463374607431768211455".to_string());
        assert_eq!(field.parse::<u128>("tokens").unwrap(), u128::MAX);
    }
}
