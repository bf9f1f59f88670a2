//! Address → name resolution.
//!
//! [`NameResolver`] is the seam between the dashboard and a live lookup
//! service. [`EnsResolver`] queries the ENS subgraph; [`CachedResolver`]
//! puts the on-disk resolution cache in front of any resolver.

pub mod cached;

pub use cached::{CachedResolver, NegativeCaching, ResolveStats};

use crate::graph::{GraphClient, GraphError};
use async_trait::async_trait;
use delegators_core::cache::normalize_address;
use serde::Deserialize;

/// A live address → name lookup.
#[async_trait]
pub trait NameResolver {
    /// Resolve `address`. `Ok(None)` means the service has no name for it.
    async fn resolve(&self, address: &str) -> Result<Option<String>, GraphError>;
}

const ENS_QUERY: &str = r#"
query GetEnsName($address: String!) {
  domains(where: { resolvedAddress: $address, name_ends_with: ".eth" }, first: 1) {
    name
  }
}
"#;

#[derive(Debug, Deserialize)]
struct DomainsData {
    #[serde(default)]
    domains: Vec<Domain>,
}

#[derive(Debug, Deserialize)]
struct Domain {
    name: Option<String>,
}

impl DomainsData {
    fn first_name(self) -> Option<String> {
        self.domains
            .into_iter()
            .next()
            .and_then(|d| d.name)
            .filter(|name| !name.trim().is_empty())
    }
}

/// Resolves `.eth` names through the ENS subgraph.
#[derive(Debug, Clone)]
pub struct EnsResolver {
    graph: GraphClient,
    subgraph_id: String,
}

impl EnsResolver {
    pub fn new(graph: GraphClient, subgraph_id: impl Into<String>) -> Self {
        Self { graph, subgraph_id: subgraph_id.into() }
    }
}

#[async_trait]
impl NameResolver for EnsResolver {
    async fn resolve(&self, address: &str) -> Result<Option<String>, GraphError> {
        let address = normalize_address(address);
        let data: DomainsData = self
            .graph
            .query(&self.subgraph_id, ENS_QUERY, serde_json::json!({ "address": address }))
            .await?;
        Ok(data.first_name())
    }
}
