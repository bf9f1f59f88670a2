//! Application configuration with layered loading.
//!
//! This module provides configuration management using figment for layered
//! configuration loading from multiple sources:
//!
//! 1. Environment variables (DELEGATORS_*)
//! 2. Unprefixed `GRAPH_API_KEY`, `TRANSACTION_COUNT` and `GRT_SIZE`, as
//!    found in `.env` files written for the earlier dashboard script
//! 3. TOML config file (if DELEGATORS_CONFIG_FILE set or passed explicitly)
//! 4. Built-in defaults

use std::path::{Path, PathBuf};
use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

mod validation;

pub use validation::ConfigError;

/// Environment variable prefix for all settings.
pub const ENV_PREFIX: &str = "DELEGATORS_";

/// Environment variable naming an optional TOML config file.
pub const CONFIG_FILE_VAR: &str = "DELEGATORS_CONFIG_FILE";

/// Unprefixed variables accepted as fallbacks, with the setting each one feeds.
pub const LEGACY_ENV_KEYS: [(&str, &str); 3] = [
    ("graph_api_key", "graph_api_key"),
    ("transaction_count", "transaction_count"),
    ("grt_size", "grt_threshold"),
];

/// Application configuration with layered loading.
///
/// Loading precedence (highest wins):
/// 1. Environment variables (DELEGATORS_*)
/// 2. Legacy unprefixed variables ([`LEGACY_ENV_KEYS`])
/// 3. TOML config file
/// 4. Built-in defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// API key for The Graph gateway.
    ///
    /// Set via DELEGATORS_GRAPH_API_KEY environment variable. Required.
    #[serde(default)]
    pub graph_api_key: Option<String>,

    /// Gateway base URL; the API key and subgraph id are appended.
    #[serde(default = "default_gateway_url")]
    pub gateway_url: String,

    /// Subgraph serving stake delegation events.
    #[serde(default = "default_network_subgraph_id")]
    pub network_subgraph_id: String,

    /// Subgraph serving ENS domains.
    #[serde(default = "default_ens_subgraph_id")]
    pub ens_subgraph_id: String,

    /// Subgraph serving indexer account metadata.
    #[serde(default = "default_avatar_subgraph_id")]
    pub avatar_subgraph_id: String,

    /// Events requested per event type.
    ///
    /// Set via DELEGATORS_TRANSACTION_COUNT environment variable.
    #[serde(default = "default_transaction_count")]
    pub transaction_count: u32,

    /// Dashboard rows below this many whole GRT are hidden.
    ///
    /// Set via DELEGATORS_GRT_THRESHOLD environment variable.
    #[serde(default = "default_grt_threshold")]
    pub grt_threshold: u64,

    /// Path to the name resolution cache file.
    ///
    /// Set via DELEGATORS_CACHE_PATH environment variable.
    #[serde(default = "default_cache_path")]
    pub cache_path: PathBuf,

    /// Hours after which a cached name is re-resolved.
    ///
    /// Set via DELEGATORS_CACHE_EXPIRY_HOURS environment variable.
    #[serde(default = "default_cache_expiry_hours")]
    pub cache_expiry_hours: u64,

    /// Cache failed or empty resolutions so they are not retried until expiry.
    #[serde(default)]
    pub cache_negative: bool,

    /// Save the cache after every update instead of once at exit.
    #[serde(default)]
    pub cache_write_through: bool,

    /// Whether to look up indexer avatar images.
    #[serde(default = "default_true")]
    pub resolve_avatars: bool,

    /// Directory receiving `delegators.csv` and `index.html`.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Directory receiving the daily log file.
    #[serde(default = "default_log_dir")]
    pub log_dir: PathBuf,

    /// User-Agent string for HTTP requests.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// HTTP request timeout in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Base URL of participant profile pages.
    #[serde(default = "default_profile_url")]
    pub profile_url: String,

    /// Base URL of the transaction explorer.
    #[serde(default = "default_tx_url")]
    pub tx_url: String,
}

fn default_gateway_url() -> String {
    "https://gateway.thegraph.com/api".into()
}

fn default_network_subgraph_id() -> String {
    "9wzatP4KXm4WinEhB31MdKST949wCH8ZnkGe8o3DLTwp".into()
}

fn default_ens_subgraph_id() -> String {
    "5XqPmWe6gjyrJtFn9cLy237i4cWw2j9HcUJEXsP5qGtH".into()
}

fn default_avatar_subgraph_id() -> String {
    "DZz4kDTdmzWLWsV373w2bSmoar3umKKH9y82SUKr5qmp".into()
}

fn default_transaction_count() -> u32 {
    100
}

fn default_grt_threshold() -> u64 {
    10_000
}

fn default_cache_path() -> PathBuf {
    PathBuf::from("./cache/ens_cache.json")
}

fn default_cache_expiry_hours() -> u64 {
    24
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("./reports")
}

fn default_log_dir() -> PathBuf {
    PathBuf::from("./logs")
}

fn default_user_agent() -> String {
    concat!("delegators/", env!("CARGO_PKG_VERSION")).into()
}

fn default_timeout_ms() -> u64 {
    20_000
}

fn default_profile_url() -> String {
    "https://thegraph.com/explorer/profile".into()
}

fn default_tx_url() -> String {
    "https://arbiscan.io/tx".into()
}

fn default_true() -> bool {
    true
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            graph_api_key: None,
            gateway_url: default_gateway_url(),
            network_subgraph_id: default_network_subgraph_id(),
            ens_subgraph_id: default_ens_subgraph_id(),
            avatar_subgraph_id: default_avatar_subgraph_id(),
            transaction_count: default_transaction_count(),
            grt_threshold: default_grt_threshold(),
            cache_path: default_cache_path(),
            cache_expiry_hours: default_cache_expiry_hours(),
            cache_negative: false,
            cache_write_through: false,
            resolve_avatars: true,
            output_dir: default_output_dir(),
            log_dir: default_log_dir(),
            user_agent: default_user_agent(),
            timeout_ms: default_timeout_ms(),
            profile_url: default_profile_url(),
            tx_url: default_tx_url(),
        }
    }
}

impl AppConfig {
    /// Timeout as Duration for use with reqwest.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Cache expiry window.
    pub fn cache_expiry(&self) -> chrono::Duration {
        let hours = self.cache_expiry_hours.min(validation::MAX_CACHE_EXPIRY_HOURS);
        chrono::Duration::hours(i64::try_from(hours).unwrap_or_default())
    }

    /// Load configuration from all sources with layered precedence.
    ///
    /// The TOML file is taken from `DELEGATORS_CONFIG_FILE` when set.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Configuration file cannot be read
    /// - Environment variables cannot be parsed
    /// - Validation fails after loading
    pub fn load() -> Result<Self, ConfigError> {
        let config_file = std::env::var_os(CONFIG_FILE_VAR).map(PathBuf::from);
        Self::load_with(config_file.as_deref())
    }

    /// Load configuration, reading TOML from `config_file` if given.
    ///
    /// # Errors
    ///
    /// Same as [`AppConfig::load`]. A named file that does not exist is an error.
    pub fn load_with(config_file: Option<&Path>) -> Result<Self, ConfigError> {
        let config = Self::figment(config_file)?
            .extract::<Self>()
            .map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }

    fn figment(config_file: Option<&Path>) -> Result<Figment, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(path) = config_file {
            if !path.exists() {
                return Err(ConfigError::LoadFailed(format!("config file not found: {}", path.display())));
            }
            figment = figment.merge(Toml::file(path));
        }

        let legacy_keys = LEGACY_ENV_KEYS.map(|(var, _)| var);
        figment = figment.merge(Env::raw().only(&legacy_keys).map(|key| {
            let var = key.as_str().to_lowercase();
            let field = LEGACY_ENV_KEYS
                .iter()
                .find(|(legacy, _)| *legacy == var)
                .map_or(var.as_str(), |(_, field)| *field);
            field.to_string().into()
        }));

        Ok(figment.merge(
            Env::prefixed(ENV_PREFIX)
                .ignore(&["config_file"])
                .map(|key| key.as_str().to_lowercase().into()),
        ))
    }

    /// Return the gateway API key, or the missing-setting error.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Missing` if the key is unset or blank.
    pub fn require_graph_api_key(&self) -> Result<&str, ConfigError> {
        self.graph_api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .ok_or_else(|| ConfigError::Missing {
                field: "graph_api_key".into(),
                hint: "Set DELEGATORS_GRAPH_API_KEY (or GRAPH_API_KEY) environment variable".into(),
            })
    }
}
