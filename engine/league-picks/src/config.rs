//! Configuration for the league picks collector
//!
//! Values are layered with the `config` crate: built-in defaults, then an
//! optional TOML file, then `FPL_`-prefixed environment variables. Nested
//! keys use `__` (e.g. `FPL_RETRY__MAX_ATTEMPTS=5`).

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable holding the path of an optional TOML config file
pub const CONFIG_FILE_ENV: &str = "LEAGUE_PICKS_CONFIG";

/// Prefix for environment overrides
pub const ENV_PREFIX: &str = "FPL";

/// Default public API root
pub const DEFAULT_BASE_URL: &str = "https://fantasy.premierleague.com/api/";

/// Configuration for a single collection run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PicksConfig {
    /// Classic mini-league to collect
    pub league_id: u64,

    /// Only include gameweeks whose data has been checked
    pub include_only_finalised: bool,

    /// Fixed delay between upstream requests in milliseconds
    pub request_delay_ms: u64,

    /// Hard cap on standings pages fetched for one league
    pub max_pages: u32,

    /// Where to write the CSV; derived from the league id when unset
    pub output_path: Option<PathBuf>,

    /// Upstream API configuration
    pub api: ApiConfig,

    /// Retry configuration
    pub retry: RetryConfig,

    /// Logging configuration
    pub logging: LoggingConfig,

    /// League activity report configuration
    pub report: ReportConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// API root, must end with a slash
    pub base_url: String,

    /// User-Agent sent with every request
    pub user_agent: String,

    /// Per-request timeout in seconds
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Total attempts per request, including the first
    pub max_attempts: u32,

    /// Linear backoff unit in milliseconds; attempt `n` waits `n` units
    pub backoff_base_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Log format (pretty, compact, json)
    pub format: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Also collect transfers, chip usage and captaincy
    pub enabled: bool,

    /// Directory for the report sheets; the working directory when unset
    pub output_dir: Option<PathBuf>,

    /// Last gameweek in which a wildcard counts as the first wildcard
    pub wildcard_split_gameweek: u32,
}

impl Default for PicksConfig {
    fn default() -> Self {
        Self {
            league_id: 542663,
            include_only_finalised: true,
            request_delay_ms: 350,
            max_pages: 1000,
            output_path: None,
            api: ApiConfig::default(),
            retry: RetryConfig::default(),
            logging: LoggingConfig::default(),
            report: ReportConfig::default(),
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            user_agent: "FPL-Data-Collector/1.0 (+https://example.com)".to_string(),
            timeout_secs: 20,
        }
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self { max_attempts: 3, backoff_base_ms: 800 }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "info".to_string(), format: "pretty".to_string() }
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self { enabled: false, output_dir: None, wildcard_split_gameweek: 20 }
    }
}

impl PicksConfig {
    /// Load configuration from the optional file named by
    /// `LEAGUE_PICKS_CONFIG` and from the process environment
    pub fn from_env() -> Result<Self> {
        let file = std::env::var(CONFIG_FILE_ENV).ok().map(PathBuf::from);
        Self::load(file.as_deref())
    }

    /// Load configuration from an optional file plus the process environment
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::layered(path, Environment::with_prefix(ENV_PREFIX))
    }

    /// Layer defaults, file and the given environment source, then validate
    pub fn layered(path: Option<&Path>, environment: Environment) -> Result<Self> {
        let defaults =
            Config::try_from(&Self::default()).context("Failed to serialize default config")?;

        let mut builder = Config::builder().add_source(defaults);

        if let Some(path) = path {
            tracing::debug!("Loading configuration from file: {:?}", path);
            builder = builder.add_source(File::from(path).required(true));
        }

        builder = builder.add_source(
            environment.prefix_separator("_").separator("__").try_parsing(true),
        );

        let config: Self = builder
            .build()
            .context("Failed to build configuration")?
            .try_deserialize()
            .context("Failed to deserialize configuration")?;

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.league_id == 0 {
            return Err(anyhow::anyhow!("Invalid league id: 0"));
        }

        if self.retry.max_attempts == 0 {
            return Err(anyhow::anyhow!("retry.max_attempts must be at least 1"));
        }

        if self.max_pages == 0 {
            return Err(anyhow::anyhow!("max_pages must be at least 1"));
        }

        if self.api.base_url.trim().is_empty() {
            return Err(anyhow::anyhow!("api.base_url must not be empty"));
        }

        match self.logging.level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => return Err(anyhow::anyhow!("Invalid log level: {}", self.logging.level)),
        }

        match self.logging.format.as_str() {
            "pretty" | "compact" | "json" => {}
            _ => return Err(anyhow::anyhow!("Invalid log format: {}", self.logging.format)),
        }

        if self.report.wildcard_split_gameweek == 0 {
            return Err(anyhow::anyhow!("report.wildcard_split_gameweek must be at least 1"));
        }

        Ok(())
    }

    /// Output file, defaulting to `fpl_league_<id>_picks_wide.csv`
    pub fn output_path(&self) -> PathBuf {
        self.output_path
            .clone()
            .unwrap_or_else(|| PathBuf::from(format!("fpl_league_{}_picks_wide.csv", self.league_id)))
    }

    /// Report directory, defaulting to the working directory
    pub fn report_dir(&self) -> PathBuf {
        self.report.output_dir.clone().unwrap_or_else(|| PathBuf::from("."))
    }

    pub fn request_delay(&self) -> Duration {
        Duration::from_millis(self.request_delay_ms)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.api.timeout_secs)
    }

    pub fn backoff_base(&self) -> Duration {
        Duration::from_millis(self.retry.backoff_base_ms)
    }
}
