//! Configuration management for Rover Photos
//!
//! This module provides layered configuration loading with zero-config
//! defaults: built-in values, then a TOML file, then the environment (including
//! a `.env` file). The only environment contract is the API credential.

use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use tracing_subscriber::filter::Directive;
use tracing_subscriber::{fmt, EnvFilter};
use url::Url;

use crate::app::{CacheConfig, ClientConfig, LatestStrategy, ServiceConfig, SourceConfig};
use crate::constants::{api, cache, env, http, limits, logging, service};
use crate::errors::{ConfigError, ConfigResult};

/// Project-local configuration file name
pub const LOCAL_CONFIG_FILE: &str = "rover-photos.toml";

/// Unified application configuration for TOML serialization
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Upstream endpoint and credential
    pub api: ApiConfigToml,
    /// HTTP client settings
    pub client: ClientConfigToml,
    /// Response cache settings
    pub cache: CacheConfigToml,
    /// Aggregation service settings
    pub service: ServiceConfigToml,
    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Runtime configuration for every component, converted from [`AppConfig`]
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub client: ClientConfig,
    pub cache: CacheConfig,
    pub service: ServiceConfig,
}

/// TOML-friendly upstream API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfigToml {
    /// Base endpoint every path is appended to
    pub base_url: String,
    /// Access credential (None = environment, then the public placeholder)
    pub api_key: Option<String>,
}

impl Default for ApiConfigToml {
    fn default() -> Self {
        Self {
            base_url: api::BASE_URL.to_string(),
            api_key: None,
        }
    }
}

/// TOML-friendly client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfigToml {
    /// TCP keep-alive timeout in seconds (None = disabled)
    pub tcp_keepalive_secs: Option<u64>,
    /// Connection pool idle timeout in seconds (None = no timeout)
    pub pool_idle_timeout_secs: Option<u64>,
    /// Maximum connections per host
    pub pool_max_per_host: usize,
    /// Request timeout in seconds
    pub request_timeout_secs: u64,
    /// Connect timeout in seconds
    pub connect_timeout_secs: u64,
    /// Rate limit (requests per second)
    pub rate_limit_rps: u32,
}

impl Default for ClientConfigToml {
    fn default() -> Self {
        Self {
            tcp_keepalive_secs: Some(30),
            pool_idle_timeout_secs: Some(http::POOL_IDLE_TIMEOUT.as_secs()),
            pool_max_per_host: http::POOL_MAX_PER_HOST,
            request_timeout_secs: http::DEFAULT_TIMEOUT.as_secs(),
            connect_timeout_secs: http::CONNECT_TIMEOUT.as_secs(),
            rate_limit_rps: limits::DEFAULT_RATE_LIMIT_RPS,
        }
    }
}

/// TOML-friendly cache configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfigToml {
    /// Entry time-to-live in seconds
    pub ttl_secs: u64,
}

impl Default for CacheConfigToml {
    fn default() -> Self {
        Self {
            ttl_secs: cache::DEFAULT_TTL.as_secs(),
        }
    }
}

/// TOML-friendly aggregation service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfigToml {
    /// Per-call bound in seconds
    pub call_timeout_secs: u64,
    /// Fallback date for sources missing from the table
    pub default_fallback_date: String,
    /// Latest-photos strategies, in evaluation order
    pub latest_strategies: Vec<LatestStrategy>,
    /// Known sources and their known-good dates, in declaration order
    pub sources: Vec<SourceConfig>,
}

impl Default for ServiceConfigToml {
    fn default() -> Self {
        let defaults = ServiceConfig::default();
        Self {
            call_timeout_secs: service::DEFAULT_CALL_TIMEOUT.as_secs(),
            default_fallback_date: defaults.default_fallback_date,
            latest_strategies: defaults.latest_strategies,
            sources: defaults.sources,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level for this crate (error, warn, info, debug, trace)
    pub level: String,
    /// Enable colored output
    pub colored_output: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: logging::DEFAULT_LOG_LEVEL.to_string(),
            colored_output: true,
        }
    }
}

impl LoggingConfig {
    /// Install a global `tracing` subscriber for this crate's level
    ///
    /// `RUST_LOG` directives are honoured in addition to the configured level.
    /// Returns `false` when a global subscriber was already installed.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if the level is not a valid directive
    pub fn init_subscriber(&self) -> ConfigResult<bool> {
        let directive = format!("{}={}", logging::CRATE_TARGET, self.level)
            .parse::<Directive>()
            .map_err(|e| ConfigError::InvalidValue {
                field: "logging.level".to_string(),
                value: self.level.clone(),
                reason: e.to_string(),
            })?;

        let filter = EnvFilter::from_default_env().add_directive(directive);

        Ok(fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_ansi(self.colored_output)
            .try_init()
            .is_ok())
    }
}

impl AppConfig {
    /// Convert TOML-friendly configuration to runtime configuration
    pub fn to_runtime_config(&self) -> RuntimeConfig {
        RuntimeConfig {
            client: self.client.to_runtime_config(&self.api),
            cache: self.cache.to_runtime_config(),
            service: self.service.to_runtime_config(),
        }
    }

    /// Load configuration with multi-source precedence:
    /// 1. Default values
    /// 2. Config file (explicit path, else the first standard location found)
    /// 3. Environment variables, including a `.env` file
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NotFound` if an explicit path does not exist, and
    /// read or parse errors for a config file that does.
    pub async fn load(config_file_override: Option<PathBuf>) -> ConfigResult<Self> {
        let mut config = Self::default();

        let config_path = match config_file_override {
            Some(path) if !path.exists() => return Err(ConfigError::NotFound { path }),
            Some(path) => Some(path),
            None => Self::find_config_file(),
        };

        if let Some(path) = config_path {
            debug!("Loading config from: {}", path.display());
            config = Self::load_from_file(&path).await?;
        }

        if dotenv::dotenv().is_ok() {
            debug!("Loaded environment from .env");
        }
        config.apply_env_overrides(|name| std::env::var(name).ok());

        Ok(config)
    }

    /// Apply environment overrides using `lookup` to read variables
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = lookup(env::API_KEY).filter(|k| !k.trim().is_empty()) {
            debug!("Using API key from {}", env::API_KEY);
            self.api.api_key = Some(key);
        }
    }

    /// The credential to send, falling back to the public placeholder
    pub fn api_key(&self) -> &str {
        self.api.api_key.as_deref().unwrap_or(api::DEMO_API_KEY)
    }

    /// Whether the public placeholder credential is in use
    pub fn uses_demo_key(&self) -> bool {
        self.api_key() == api::DEMO_API_KEY
    }

    /// Check values the runtime cannot work with
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ValidationFailed` listing every problem found
    pub fn validate(&self) -> ConfigResult<()> {
        let mut errors = Vec::new();

        if let Err(e) = Url::parse(&self.api.base_url) {
            errors.push(format!(
                "api.base_url '{}' is not a URL: {}",
                self.api.base_url, e
            ));
        }
        if self.client.rate_limit_rps == 0 {
            errors.push("client.rate_limit_rps must be greater than zero".to_string());
        }
        if self.cache.ttl_secs == 0 {
            errors.push("cache.ttl_secs must be greater than zero".to_string());
        }
        if self.service.sources.is_empty() {
            errors.push("service.sources must list at least one source".to_string());
        }
        if self
            .service
            .latest_strategies
            .iter()
            .any(|s| matches!(s, LatestStrategy::SolScan { probes: 0 }))
        {
            errors.push("service.latest_strategies: sol_scan probes must be greater than zero".into());
        }

        let default_date = (
            "service.default_fallback_date".to_string(),
            &self.service.default_fallback_date,
        );
        let source_dates = self.service.sources.iter().map(|s| {
            (
                format!("service.sources.{}.fallback_date", s.name),
                &s.fallback_date,
            )
        });
        for (field, date) in std::iter::once(default_date).chain(source_dates) {
            if NaiveDate::parse_from_str(date, "%Y-%m-%d").is_err() {
                errors.push(format!("{} '{}' is not a YYYY-MM-DD date", field, date));
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::ValidationFailed { errors })
        }
    }

    /// Find configuration file in standard locations
    fn find_config_file() -> Option<PathBuf> {
        let mut search_paths = vec![PathBuf::from(format!("./{}", LOCAL_CONFIG_FILE))];
        if let Some(path) = Self::default_config_path() {
            search_paths.push(path);
        }

        let found = search_paths.into_iter().find(|path| path.exists());
        match &found {
            Some(path) => debug!("Found config file: {}", path.display()),
            None => debug!("No config file found in standard locations"),
        }
        found
    }

    /// Default config file path for the current user
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("rover-photos").join("config.toml"))
    }

    /// Load configuration from a TOML file
    async fn load_from_file(path: &Path) -> ConfigResult<Self> {
        let content = tokio::fs::read_to_string(path).await?;
        let config: AppConfig = toml::from_str(&content)?;

        info!("Loaded configuration from: {}", path.display());
        Ok(config)
    }
}

impl ClientConfigToml {
    /// Convert to runtime ClientConfig
    pub fn to_runtime_config(&self, api: &ApiConfigToml) -> ClientConfig {
        ClientConfig {
            base_url: api.base_url.clone(),
            api_key: api
                .api_key
                .clone()
                .unwrap_or_else(|| api::DEMO_API_KEY.to_string()),
            tcp_keepalive: self.tcp_keepalive_secs.map(Duration::from_secs),
            pool_idle_timeout: self.pool_idle_timeout_secs.map(Duration::from_secs),
            pool_max_per_host: self.pool_max_per_host,
            request_timeout: Duration::from_secs(self.request_timeout_secs),
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            rate_limit_rps: self.rate_limit_rps,
        }
    }
}

impl CacheConfigToml {
    /// Convert to runtime CacheConfig
    pub fn to_runtime_config(&self) -> CacheConfig {
        CacheConfig::with_ttl(Duration::from_secs(self.ttl_secs))
    }
}

impl ServiceConfigToml {
    /// Convert to runtime ServiceConfig
    pub fn to_runtime_config(&self) -> ServiceConfig {
        ServiceConfig {
            sources: self.sources.clone(),
            default_fallback_date: self.default_fallback_date.clone(),
            latest_strategies: self.latest_strategies.clone(),
            call_timeout: Duration::from_secs(self.call_timeout_secs),
        }
    }
}
