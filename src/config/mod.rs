//! Environment-backed configuration.
//!
//! Every setting has a default. Override with `RADAR_*` environment variables.

pub mod error;


pub use error::ConfigError;

use std::env;
use std::net::IpAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::constants::{
    DEFAULT_EMBEDDER_TIMEOUT, DEFAULT_EMBEDDING_DIM, DEFAULT_SEARCH_TIMEOUT,
    DEFAULT_STRONG_THRESHOLD, DEFAULT_WEAK_THRESHOLD,
};
use crate::embedding::HttpEmbedderConfig;
use crate::ranking::Thresholds;
use crate::search::SearchConfig;
use crate::vectordb::DEFAULT_COLLECTION_NAME;

/// Server configuration loaded from environment variables.
///
/// Use [`Config::from_env`] to read `RADAR_*` overrides on top of defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// HTTP server port. Default: `8080`.
    pub port: u16,

    /// IP address to bind to. Default: `127.0.0.1`.
    pub bind_addr: IpAddr,

    /// Qdrant endpoint URL. Default: `http://localhost:6334`.
    pub qdrant_url: String,

    /// Qdrant collection holding issue points. Default: `issues`.
    pub collection: String,

    /// Embedding worker base URL. When unset the server runs the stub embedder.
    pub embedder_url: Option<String>,

    pub embedder_timeout: Duration,

    /// Deadline for embedding plus retrieval in one search. Default: 10 s.
    pub search_timeout: Duration,

    pub strong_threshold: f64,

    pub weak_threshold: f64,

    /// Vector dimension shared by the embedder and the collection. Default: `384`.
    pub embedding_dim: usize,

    /// JSON file read by mock-mode ingestion. Default: `./data/mock_issues.json`.
    pub issues_path: PathBuf,
}

/// Default Qdrant URL used when `RADAR_QDRANT_URL` is not set.
pub const DEFAULT_QDRANT_URL: &str = "http://localhost:6334";

pub const DEFAULT_ISSUES_PATH: &str = "./data/mock_issues.json";

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8080,
            bind_addr: IpAddr::V4(std::net::Ipv4Addr::new(127, 0, 0, 1)),
            qdrant_url: DEFAULT_QDRANT_URL.to_string(),
            collection: DEFAULT_COLLECTION_NAME.to_string(),
            embedder_url: None,
            embedder_timeout: DEFAULT_EMBEDDER_TIMEOUT,
            search_timeout: DEFAULT_SEARCH_TIMEOUT,
            strong_threshold: DEFAULT_STRONG_THRESHOLD,
            weak_threshold: DEFAULT_WEAK_THRESHOLD,
            embedding_dim: DEFAULT_EMBEDDING_DIM,
            issues_path: PathBuf::from(DEFAULT_ISSUES_PATH),
        }
    }
}

impl Config {
    const ENV_PORT: &'static str = "RADAR_PORT";
    const ENV_BIND_ADDR: &'static str = "RADAR_BIND_ADDR";
    const ENV_QDRANT_URL: &'static str = "RADAR_QDRANT_URL";
    const ENV_COLLECTION: &'static str = "RADAR_COLLECTION";
    const ENV_EMBEDDER_URL: &'static str = "RADAR_EMBEDDER_URL";
    const ENV_EMBEDDER_TIMEOUT_MS: &'static str = "RADAR_EMBEDDER_TIMEOUT_MS";
    const ENV_SEARCH_TIMEOUT_MS: &'static str = "RADAR_SEARCH_TIMEOUT_MS";
    const ENV_STRONG_THRESHOLD: &'static str = "RADAR_STRONG_THRESHOLD";
    const ENV_WEAK_THRESHOLD: &'static str = "RADAR_WEAK_THRESHOLD";
    const ENV_EMBEDDING_DIM: &'static str = "RADAR_EMBEDDING_DIM";
    const ENV_ISSUES_PATH: &'static str = "RADAR_ISSUES_PATH";

    /// Loads configuration from environment variables (falling back to defaults).
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let port = Self::parse_port_from_env(defaults.port)?;
        let bind_addr = Self::parse_bind_addr_from_env(defaults.bind_addr)?;
        let qdrant_url = Self::parse_string_from_env(Self::ENV_QDRANT_URL, defaults.qdrant_url);
        let collection = Self::parse_string_from_env(Self::ENV_COLLECTION, defaults.collection);
        let embedder_url = Self::parse_optional_string_from_env(Self::ENV_EMBEDDER_URL);
        let embedder_timeout =
            Self::parse_millis_from_env(Self::ENV_EMBEDDER_TIMEOUT_MS, defaults.embedder_timeout)?;
        let search_timeout =
            Self::parse_millis_from_env(Self::ENV_SEARCH_TIMEOUT_MS, defaults.search_timeout)?;
        let strong_threshold =
            Self::parse_number_from_env(Self::ENV_STRONG_THRESHOLD, defaults.strong_threshold)?;
        let weak_threshold =
            Self::parse_number_from_env(Self::ENV_WEAK_THRESHOLD, defaults.weak_threshold)?;
        let embedding_dim =
            Self::parse_number_from_env(Self::ENV_EMBEDDING_DIM, defaults.embedding_dim)?;
        let issues_path = Self::parse_path_from_env(Self::ENV_ISSUES_PATH, defaults.issues_path);

        Ok(Self {
            port,
            bind_addr,
            qdrant_url,
            collection,
            embedder_url,
            embedder_timeout,
            search_timeout,
            strong_threshold,
            weak_threshold,
            embedding_dim,
            issues_path,
        })
    }

    /// Checks thresholds, timeouts, dimension and URLs (does not touch the network).
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.thresholds()?;

        if self.embedder_timeout.is_zero() {
            return Err(ConfigError::ZeroTimeout {
                name: Self::ENV_EMBEDDER_TIMEOUT_MS,
            });
        }
        if self.search_timeout.is_zero() {
            return Err(ConfigError::ZeroTimeout {
                name: Self::ENV_SEARCH_TIMEOUT_MS,
            });
        }
        if self.embedding_dim == 0 {
            return Err(ConfigError::ZeroDimension);
        }

        if !is_http_url(&self.qdrant_url) {
            return Err(ConfigError::InvalidUrl {
                name: Self::ENV_QDRANT_URL,
                value: self.qdrant_url.clone(),
            });
        }
        if let Some(url) = &self.embedder_url
            && !is_http_url(url)
        {
            return Err(ConfigError::InvalidUrl {
                name: Self::ENV_EMBEDDER_URL,
                value: url.clone(),
            });
        }

        if self.issues_path.exists() && !self.issues_path.is_file() {
            return Err(ConfigError::NotAFile {
                path: self.issues_path.clone(),
            });
        }

        Ok(())
    }

    /// Returns `"{bind_addr}:{port}"` (useful for logging/binding).
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }

    pub fn thresholds(&self) -> Result<Thresholds, ConfigError> {
        Ok(Thresholds::new(self.strong_threshold, self.weak_threshold)?)
    }

    pub fn search_config(&self) -> Result<SearchConfig, ConfigError> {
        Ok(SearchConfig::new(self.thresholds()?, self.search_timeout))
    }

    /// HTTP embedder settings, or `None` when the stub embedder should be used.
    pub fn http_embedder_config(&self) -> Option<HttpEmbedderConfig> {
        self.embedder_url.as_ref().map(|url| {
            HttpEmbedderConfig::new(url.clone())
                .timeout(self.embedder_timeout)
                .embedding_dim(self.embedding_dim)
        })
    }

    fn parse_port_from_env(default: u16) -> Result<u16, ConfigError> {
        match env::var(Self::ENV_PORT) {
            Ok(value) => {
                let port: u16 = value.parse().map_err(|e| ConfigError::PortParseError {
                    value: value.clone(),
                    source: e,
                })?;

                if port == 0 {
                    return Err(ConfigError::InvalidPort { value });
                }

                Ok(port)
            }
            Err(_) => Ok(default),
        }
    }

    fn parse_bind_addr_from_env(default: IpAddr) -> Result<IpAddr, ConfigError> {
        match env::var(Self::ENV_BIND_ADDR) {
            Ok(value) => value
                .parse()
                .map_err(|e| ConfigError::InvalidBindAddr { value, source: e }),
            Err(_) => Ok(default),
        }
    }

    fn parse_path_from_env(var_name: &str, default: PathBuf) -> PathBuf {
        env::var(var_name)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or(default)
    }

    fn parse_string_from_env(var_name: &str, default: String) -> String {
        env::var(var_name)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or(default)
    }

    fn parse_optional_string_from_env(var_name: &str) -> Option<String> {
        env::var(var_name)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    fn parse_number_from_env<T: FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
        match env::var(name) {
            Ok(value) => value
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidNumber { name, value }),
            Err(_) => Ok(default),
        }
    }

    fn parse_millis_from_env(
        name: &'static str,
        default: Duration,
    ) -> Result<Duration, ConfigError> {
        let default_ms = u64::try_from(default.as_millis()).unwrap_or(u64::MAX);
        Self::parse_number_from_env(name, default_ms).map(Duration::from_millis)
    }
}

fn is_http_url(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}
