//! Subgraph gateway client.
//!
//! Sends GraphQL queries to subgraphs through The Graph gateway.
//!
//! ### Specification
//!
//! - **Endpoint**: `{gateway_url}/{api_key}/subgraphs/id/{subgraph_id}`
//! - **Authentication**: The API key is part of the endpoint path.
//! - **Transport**: `POST` with a JSON body `{"query", "variables"}`.
//! - **Errors**: HTTP status, transport failures, and the GraphQL `errors`
//!   array are mapped to [`GraphError`]. A request is attempted once.

pub mod error;
pub mod response;

pub use error::GraphError;
pub use response::{GraphQlError, GraphResponse};

use delegators_core::AppConfig;
use reqwest::header;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::{Duration, Instant};
use url::Url;

/// Gateway client configuration.
#[derive(Debug, Clone)]
pub struct GraphConfig {
    /// Gateway API key.
    pub api_key: String,
    /// Base URL, e.g. `https://gateway.thegraph.com/api`.
    pub gateway_url: String,
    pub timeout: Duration,
    /// User-agent string.
    pub user_agent: String,
}

impl GraphConfig {
    /// Build the client configuration from application settings.
    pub fn from_app_config(config: &AppConfig) -> Result<Self, GraphError> {
        let api_key = config.require_graph_api_key().map_err(|_| GraphError::MissingApiKey)?;

        Ok(Self {
            api_key: api_key.to_string(),
            gateway_url: config.gateway_url.clone(),
            timeout: config.timeout(),
            user_agent: config.user_agent.clone(),
        })
    }
}

/// GraphQL client for subgraphs behind the gateway.
#[derive(Debug, Clone)]
pub struct GraphClient {
    http: reqwest::Client,
    config: Arc<GraphConfig>,
}

impl GraphClient {
    /// Create a new gateway client with the given configuration.
    pub fn new(config: GraphConfig) -> Result<Self, GraphError> {
        if config.api_key.trim().is_empty() {
            return Err(GraphError::MissingApiKey);
        }

        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;

        Ok(Self { http, config: Arc::new(config) })
    }

    /// Full query URL for `subgraph_id`.
    ///
    /// The URL embeds the API key and must not be logged.
    pub fn endpoint(&self, subgraph_id: &str) -> Result<Url, GraphError> {
        let mut url =
            Url::parse(&self.config.gateway_url).map_err(|e| GraphError::InvalidEndpoint(e.to_string()))?;

        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| GraphError::InvalidEndpoint(format!("not a base URL: {}", self.config.gateway_url)))?;
            segments
                .pop_if_empty()
                .extend([self.config.api_key.as_str(), "subgraphs", "id", subgraph_id]);
        }

        Ok(url)
    }

    /// Run `query` against `subgraph_id` and decode the `data` payload.
    pub async fn query<T: DeserializeOwned>(
        &self, subgraph_id: &str, query: &str, variables: serde_json::Value,
    ) -> Result<T, GraphError> {
        let url = self.endpoint(subgraph_id)?;
        let start = Instant::now();

        tracing::debug!(subgraph = subgraph_id, "querying gateway");

        let http_response = self
            .http
            .post(url)
            .header("Accept", "application/json")
            .header(header::USER_AGENT, &self.config.user_agent)
            .json(&serde_json::json!({ "query": query, "variables": variables }))
            .send()
            .await?;

        let status = http_response.status();
        tracing::debug!(subgraph = subgraph_id, "gateway response status: {}", status);

        if status == 401 || status == 403 {
            return Err(GraphError::AuthError);
        }

        if status == 429 {
            return Err(GraphError::RateLimited);
        }

        if status.is_client_error() || status.is_server_error() {
            return Err(GraphError::HttpError { status: status.as_u16() });
        }

        let bytes = http_response.bytes().await?;
        let envelope: GraphResponse<T> =
            serde_json::from_slice(&bytes).map_err(|e| GraphError::Parse(e.to_string()))?;

        tracing::debug!(subgraph = subgraph_id, "query completed in {:?}", start.elapsed());

        envelope.into_data()
    }
}
