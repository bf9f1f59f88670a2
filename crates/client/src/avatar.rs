//! Indexer avatar lookup.

use crate::graph::{GraphClient, GraphError};
use delegators_core::cache::normalize_address;
use serde::Deserialize;

const AVATAR_QUERY: &str = r#"
query IndexerAvatar($id: ID!) {
  indexers(where: { id: $id }) {
    account {
      metadata {
        image
      }
    }
  }
}
"#;

#[derive(Debug, Deserialize)]
struct IndexersData {
    #[serde(default)]
    indexers: Vec<Indexer>,
}

#[derive(Debug, Deserialize)]
struct Indexer {
    account: Option<Account>,
}

#[derive(Debug, Deserialize)]
struct Account {
    metadata: Option<Metadata>,
}

#[derive(Debug, Deserialize)]
struct Metadata {
    image: Option<String>,
}

impl IndexersData {
    fn image(self, address: &str) -> Option<String> {
        let indexer = self.indexers.into_iter().next()?;
        let Some(metadata) = indexer.account.and_then(|a| a.metadata) else {
            tracing::debug!(address, "no metadata for indexer");
            return None;
        };
        metadata.image.filter(|url| !url.trim().is_empty())
    }
}

impl GraphClient {
    /// Avatar image URL published in the indexer's account metadata.
    pub async fn fetch_indexer_avatar(&self, subgraph_id: &str, address: &str) -> Result<Option<String>, GraphError> {
        let id = normalize_address(address);
        let data: IndexersData = self
            .query(subgraph_id, AVATAR_QUERY, serde_json::json!({ "id": id }))
            .await?;
        Ok(data.image(&id))
    }
}
