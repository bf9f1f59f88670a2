//! GraphQL response envelope.

use super::GraphError;
use serde::Deserialize;

/// Raw `{ "data": ..., "errors": [...] }` envelope returned by the gateway.
#[derive(Debug, Deserialize)]
pub struct GraphResponse<T> {
    pub data: Option<T>,
    #[serde(default)]
    pub errors: Vec<GraphQlError>,
}

/// A single entry of the `errors` array.
#[derive(Debug, Deserialize)]
pub struct GraphQlError {
    pub message: String,
}

impl<T> GraphResponse<T> {
    /// Unwrap the payload.
    ///
    /// Any reported error fails the whole response, even if partial data
    /// was returned alongside it.
    pub fn into_data(self) -> Result<T, GraphError> {
        if !self.errors.is_empty() {
            let messages: Vec<&str> = self.errors.iter().map(|e| e.message.as_str()).collect();
            return Err(GraphError::Query(messages.join("; ")));
        }
        self.data.ok_or(GraphError::EmptyData)
    }
}
