//! Configuration management
//!
//! Handles loading and parsing of the optional JSON configuration file, with
//! an environment variable override for the API base URL.

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;
use tracing::{info, warn};

use crate::api::{ClientConfig, StrategyClient, DEFAULT_BASE_URL};
use crate::types::{parse_tickers, DataSource, FilterParams};

/// Environment variable overriding `api.base_url`
pub const BASE_URL_ENV: &str = "WHEEL_API_BASE_URL";

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub search: SearchDefaults,
}

impl Config {
    /// Load configuration from JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = fs::read_to_string(path.as_ref()).context("Failed to read config file")?;
        let config: Config =
            serde_json::from_str(&contents).context("Failed to parse config JSON")?;
        Ok(config)
    }

    /// Load the configuration file if given (defaults otherwise), then apply
    /// `.env` and environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        dotenv::dotenv().ok();

        let mut config = match path {
            Some(path) => {
                let config = Self::from_file(path)?;
                info!("Loaded configuration from: {}", path.display());
                config
            }
            None => Config::default(),
        };

        if let Ok(base_url) = std::env::var(BASE_URL_ENV) {
            info!("Using API base URL from {}: {}", BASE_URL_ENV, base_url);
            config.api.base_url = base_url;
        }

        Ok(config)
    }

    /// Reject values the dashboard cannot run with
    pub fn validate(&self) -> Result<()> {
        reqwest::Url::parse(&self.api.base_url)
            .with_context(|| format!("Invalid API base URL: {}", self.api.base_url))?;
        if self.api.timeout_secs == 0 {
            bail!("api.timeout_secs must be greater than 0");
        }
        if self.search.max_ideas == 0 {
            bail!("search.max_ideas must be at least 1");
        }
        if self.search.min_dte > self.search.max_dte {
            warn!(
                "search.min_dte ({}) is greater than search.max_dte ({})",
                self.search.min_dte, self.search.max_dte
            );
        }
        Ok(())
    }

    /// Build the HTTP client described by the `api` section
    pub fn client(&self) -> Result<StrategyClient> {
        StrategyClient::with_config(&self.api.base_url, self.api.client_config())
            .context("Failed to create strategy API client")
    }
}

/// Strategy backend connection settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout_secs: u64,
    pub source: DataSource,
}

impl Default for ApiConfig {
    fn default() -> Self {
        ApiConfig {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 30,
            source: DataSource::Polygon,
        }
    }
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn client_config(&self) -> ClientConfig {
        ClientConfig::default()
            .with_timeout(self.timeout())
            .with_source(self.source)
    }
}

/// Initial values of the search inputs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchDefaults {
    /// Comma-separated ticker symbols
    pub tickers: String,
    /// Minimum ROI in percent
    pub min_roi: f64,
    pub min_dte: i64,
    pub max_dte: i64,
    pub max_ideas: usize,
}

impl Default for SearchDefaults {
    fn default() -> Self {
        SearchDefaults {
            tickers: "AAPL,MSFT".to_string(),
            min_roi: 0.5,
            min_dte: 7,
            max_dte: 45,
            max_ideas: 10,
        }
    }
}

impl SearchDefaults {
    pub fn filters(&self) -> FilterParams {
        FilterParams {
            symbols: parse_tickers(&self.tickers),
            min_roi: self.min_roi,
            min_dte: self.min_dte,
            max_dte: self.max_dte,
            max_ideas: self.max_ideas,
        }
    }
}
