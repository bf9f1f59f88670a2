//! Gateway client error types.

use std::sync::Arc;

/// Errors from the subgraph gateway client.
#[derive(Debug, Clone, thiserror::Error)]
pub enum GraphError {
    /// No gateway API key configured.
    #[error("missing API key: DELEGATORS_GRAPH_API_KEY not set")]
    MissingApiKey,

    /// Gateway URL could not be combined into an endpoint.
    #[error("invalid endpoint: {0}")]
    InvalidEndpoint(String),

    /// Authentication failed (invalid API key).
    #[error("authentication failed: invalid API key")]
    AuthError,

    /// Rate limited by the gateway.
    #[error("rate limited: too many requests")]
    RateLimited,

    /// HTTP error response.
    #[error("HTTP error: {status}")]
    HttpError { status: u16 },

    /// Request timeout.
    #[error("request timeout")]
    Timeout,

    /// Network error.
    #[error("network error: {0}")]
    Network(Arc<reqwest::Error>),

    /// GraphQL errors returned in the response envelope.
    #[error("query error: {0}")]
    Query(String),

    /// Response carried neither data nor errors.
    #[error("empty response: no data returned")]
    EmptyData,

    /// Response parse error.
    #[error("parse error: {0}")]
    Parse(String),
}

/// The request URL carries the API key, so it is stripped before wrapping.
impl From<reqwest::Error> for GraphError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() { GraphError::Timeout } else { GraphError::Network(Arc::new(err.without_url())) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = GraphError::MissingApiKey;
        assert!(err.to_string().contains("API key"));

        let err = GraphError::Query("bad field".to_string());
        assert!(err.to_string().contains("bad field"));

        let err = GraphError::HttpError { status: 502 };
        assert_eq!(err.to_string(), "HTTP error: 502");
    }
}
