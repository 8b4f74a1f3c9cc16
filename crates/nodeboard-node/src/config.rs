//! Server configuration.
//!
//! Values are layered: built-in defaults, then an optional YAML file, then
//! `NODEBOARD__*` environment variables. Command-line flags are applied on
//! top by the binary.

use nodeboard_edge::{StaticMatcher, DEFAULT_ENTRY_DOCUMENT};
use nodeboard_web::DEFAULT_DATASET_PATH;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use crate::observability::LogFormat;

/// Environment variable prefix.
pub const ENV_PREFIX: &str = "NODEBOARD";

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A source could not be read or deserialized.
    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("refresh_interval_secs must be greater than zero")]
    ZeroRefreshInterval,

    #[error("dataset.timeout_secs must be greater than zero")]
    ZeroTimeout,

    #[error("entry_document must start with '/': {0}")]
    EntryDocument(String),

    #[error("dataset.path must start with '/': {0}")]
    DatasetPath(String),

    #[error("unknown static_matcher: {0}")]
    StaticMatcher(String),

    #[error("failed to encode configuration: {0}")]
    Encode(#[from] serde_yaml::Error),
}

/// Where the dataset is read from.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct DatasetConfig {
    /// Path of the dataset inside the site.
    pub path: String,
    /// Remote URL; when set it replaces the site file.
    pub url: Option<String>,
    /// Request timeout for `url`.
    pub timeout_secs: u64,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            path: DEFAULT_DATASET_PATH.to_string(),
            url: None,
            timeout_secs: 10,
        }
    }
}

/// Configuration for the nodeboard server.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// HTTP listen address.
    pub listen_addr: SocketAddr,
    /// Directory holding the pre-built site.
    pub site_dir: PathBuf,
    /// Document served for navigational paths.
    pub entry_document: String,
    pub dataset: DatasetConfig,
    /// Seconds between background reloads.
    pub refresh_interval_secs: u64,
    /// `extensions` or `any-dot`.
    pub static_matcher: String,
    /// Log level.
    pub log_level: String,
    pub log_format: LogFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::from(([127, 0, 0, 1], 8080)),
            site_dir: PathBuf::from("./site"),
            entry_document: DEFAULT_ENTRY_DOCUMENT.to_string(),
            dataset: DatasetConfig::default(),
            refresh_interval_secs: 300,
            static_matcher: "extensions".to_string(),
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
        }
    }
}

impl Config {
    /// Loads configuration from `path` (if it exists) and the environment.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = config::Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path).required(false));
        }
        let settings = builder
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    /// Checks values that deserialize fine but cannot be served.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.refresh_interval_secs == 0 {
            return Err(ConfigError::ZeroRefreshInterval);
        }
        if self.dataset.timeout_secs == 0 {
            return Err(ConfigError::ZeroTimeout);
        }
        if !self.entry_document.starts_with('/') {
            return Err(ConfigError::EntryDocument(self.entry_document.clone()));
        }
        if !self.dataset.path.starts_with('/') {
            return Err(ConfigError::DatasetPath(self.dataset.path.clone()));
        }
        self.matcher()?;
        Ok(())
    }

    /// Parsed static-file matcher.
    pub fn matcher(&self) -> Result<StaticMatcher, ConfigError> {
        StaticMatcher::parse(&self.static_matcher)
            .ok_or_else(|| ConfigError::StaticMatcher(self.static_matcher.clone()))
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs)
    }

    pub fn dataset_timeout(&self) -> Duration {
        Duration::from_secs(self.dataset.timeout_secs)
    }

    /// Effective configuration as YAML.
    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml::to_string(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.refresh_interval(), Duration::from_secs(300));
        assert_eq!(config.dataset.path, "/nodes.json");
        assert_eq!(config.matcher().unwrap(), StaticMatcher::Extensions);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let config = Config {
            refresh_interval_secs: 0,
            ..Config::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::ZeroRefreshInterval)));

        let config = Config {
            entry_document: "index.html".into(),
            ..Config::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::EntryDocument(_))));

        let config = Config {
            static_matcher: "glob".into(),
            ..Config::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::StaticMatcher(_))));
    }

    #[test]
    fn test_load_yaml_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nodeboard.yaml");
        std::fs::write(
            &path,
            "listen_addr: \"0.0.0.0:9000\"\nrefresh_interval_secs: 60\nlog_format: json\ndataset:\n  url: https://example.com/nodes.json\n",
        )
        .unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.listen_addr.port(), 9000);
        assert_eq!(config.refresh_interval_secs, 60);
        assert_eq!(config.log_format, LogFormat::Json);
        assert_eq!(config.dataset.url.as_deref(), Some("https://example.com/nodes.json"));
        // Unset fields keep their defaults.
        assert_eq!(config.dataset.timeout_secs, 10);
        assert_eq!(config.entry_document, "/index.html");
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(Some(&dir.path().join("absent.yaml"))).unwrap();
        assert_eq!(config.site_dir, PathBuf::from("./site"));
    }

    #[test]
    fn test_yaml_round_trip() {
        let yaml = Config::default().to_yaml().unwrap();
        assert!(yaml.contains("refresh_interval_secs: 300"));
        assert!(yaml.contains("log_format: pretty"));
    }
}
