//! Command-line arguments.

use clap::Parser;
use delegators_core::{AppConfig, ConfigError};
use std::path::PathBuf;

const ENV_HELP: &str = "\
Settings are read from DELEGATORS_* environment variables (a .env file is loaded first),
e.g. DELEGATORS_GRAPH_API_KEY, DELEGATORS_TRANSACTION_COUNT, DELEGATORS_GRT_THRESHOLD.
The unprefixed GRAPH_API_KEY, TRANSACTION_COUNT and GRT_SIZE are accepted as fallbacks.";

/// Build the delegators activity dashboard.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None, after_help = ENV_HELP)]
pub struct Args {
    /// TOML config file; takes precedence over DELEGATORS_CONFIG_FILE.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Directory for delegators.csv and index.html.
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Directory for the daily log file.
    #[arg(long)]
    pub log_dir: Option<PathBuf>,

    /// Skip indexer avatar lookups.
    #[arg(long)]
    pub no_avatars: bool,
}

impl Args {
    /// Load configuration, apply flag overrides, and require the API key.
    pub fn load_config(&self) -> Result<AppConfig, ConfigError> {
        let mut config = match &self.config {
            Some(path) => AppConfig::load_with(Some(path.as_path()))?,
            None => AppConfig::load()?,
        };

        self.apply(&mut config);
        config.require_graph_api_key()?;

        Ok(config)
    }

    fn apply(&self, config: &mut AppConfig) {
        if let Some(dir) = &self.output_dir {
            config.output_dir = dir.clone();
        }
        if let Some(dir) = &self.log_dir {
            config.log_dir = dir.clone();
        }
        if self.no_avatars {
            config.resolve_avatars = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_parse_defaults() {
        let args = Args::try_parse_from(["delegators"]).unwrap();
        assert!(args.config.is_none());
        assert!(args.output_dir.is_none());
        assert!(!args.no_avatars);
    }

    #[test]
    fn test_apply_overrides() {
        let args = Args::try_parse_from(["delegators", "-o", "/tmp/out", "--log-dir", "/tmp/logs", "--no-avatars"])
            .unwrap();
        let mut config = AppConfig::default();
        args.apply(&mut config);

        assert_eq!(config.output_dir, PathBuf::from("/tmp/out"));
        assert_eq!(config.log_dir, PathBuf::from("/tmp/logs"));
        assert!(!config.resolve_avatars);
    }

    #[test]
    fn test_help_lists_env_names() {
        let help = Args::command().render_long_help().to_string();
        assert!(help.contains("DELEGATORS_GRAPH_API_KEY"));
        assert!(help.contains("GRT_SIZE"));
    }

    #[test]
    fn test_apply_keeps_config_without_flags() {
        let args = Args::try_parse_from(["delegators"]).unwrap();
        let mut config = AppConfig::default();
        args.apply(&mut config);

        assert_eq!(config.output_dir, AppConfig::default().output_dir);
        assert!(config.resolve_avatars);
    }
}
