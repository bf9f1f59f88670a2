//! Configuration validation rules.
//!
//! This module provides validation logic for `AppConfig` values
//! after they have been loaded from environment, files, or defaults.

use crate::config::AppConfig;
use thiserror::Error;

/// Largest page size the gateway accepts for `first`.
pub const MAX_TRANSACTION_COUNT: u32 = 1000;

/// One year.
pub const MAX_CACHE_EXPIRY_HOURS: u64 = 8760;

/// Configuration validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    LoadFailed(String),

    #[error("invalid configuration: {field} - {reason}")]
    Invalid { field: String, reason: String },

    #[error("missing required configuration: {field} ({hint})")]
    Missing { field: String, hint: String },
}

fn invalid(field: &str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid { field: field.into(), reason: reason.into() }
}

fn is_http_url(value: &str) -> bool {
    value.starts_with("https://") || value.starts_with("http://")
}

impl AppConfig {
    /// Validate configuration values after loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if:
    /// - `transaction_count` is 0 or exceeds 1000
    /// - `cache_expiry_hours` is 0 or exceeds one year
    /// - `timeout_ms` is less than 100ms or exceeds 5 minutes
    /// - `user_agent` is empty
    /// - a URL setting is not http(s)
    /// - a subgraph id or output path is empty
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.transaction_count == 0 {
            return Err(invalid("transaction_count", "must be greater than 0"));
        }
        if self.transaction_count > MAX_TRANSACTION_COUNT {
            return Err(invalid("transaction_count", format!("must not exceed {MAX_TRANSACTION_COUNT}")));
        }

        if self.cache_expiry_hours == 0 {
            return Err(invalid("cache_expiry_hours", "must be greater than 0"));
        }
        if self.cache_expiry_hours > MAX_CACHE_EXPIRY_HOURS {
            return Err(invalid("cache_expiry_hours", format!("must not exceed {MAX_CACHE_EXPIRY_HOURS}")));
        }

        if self.timeout_ms < 100 {
            return Err(invalid("timeout_ms", "must be at least 100ms"));
        }
        if self.timeout_ms > 300_000 {
            return Err(invalid("timeout_ms", "must not exceed 5 minutes (300000ms)"));
        }

        if self.user_agent.is_empty() {
            return Err(invalid("user_agent", "must not be empty"));
        }

        for (field, value) in
            [("gateway_url", &self.gateway_url), ("profile_url", &self.profile_url), ("tx_url", &self.tx_url)]
        {
            if !is_http_url(value) {
                return Err(invalid(field, "must be an http(s) URL"));
            }
        }

        for (field, value) in [
            ("network_subgraph_id", &self.network_subgraph_id),
            ("ens_subgraph_id", &self.ens_subgraph_id),
            ("avatar_subgraph_id", &self.avatar_subgraph_id),
        ] {
            if value.trim().is_empty() {
                return Err(invalid(field, "must not be empty"));
            }
        }

        if self.cache_path.as_os_str().is_empty() {
            return Err(invalid("cache_path", "must not be empty"));
        }
        if self.output_dir.as_os_str().is_empty() {
            return Err(invalid("output_dir", "must not be empty"));
        }

        if self.grt_threshold == 0 {
            tracing::warn!("grt_threshold is 0; every event will be listed");
        }

        Ok(())
    }
}
