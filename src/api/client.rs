//! Strategy API HTTP client
//!
//! # Example
//! ```no_run
//! use wheel_dashboard::api::StrategyClient;
//! use wheel_dashboard::{FilterParams, Strategy};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = StrategyClient::new("http://localhost:8000")?;
//!     let filters = FilterParams {
//!         symbols: vec!["AAPL".into()],
//!         min_roi: 0.5,
//!         min_dte: 7,
//!         max_dte: 45,
//!         max_ideas: 10,
//!     };
//!     let rows = client.get_candidates(Strategy::Csp, "AAPL", &filters).await?;
//!     println!("Fetched {} put ideas", rows.len());
//!     Ok(())
//! }
//! ```

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::{Client, Url};
use serde_json::{Map, Value};
use std::time::Duration;
use tracing::{debug, error};

use super::error::{FetchError, FetchResult};
use crate::types::{CandidateRow, DataSource, FilterParams, Strategy};

/// Base URL of a locally running strategy backend
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Per-request timeout used when none is configured
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Request timeout duration
    pub timeout: Duration,
    /// Which backend endpoint family to call
    pub source: DataSource,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            source: DataSource::default(),
        }
    }
}

impl ClientConfig {
    /// Set request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set data source
    pub fn with_source(mut self, source: DataSource) -> Self {
        self.source = source;
        self
    }
}

/// Strategy backend client
#[derive(Debug, Clone)]
pub struct StrategyClient {
    base_url: String,
    source: DataSource,
    http_client: Client,
}

impl StrategyClient {
    /// Create a client with default timeout and data source
    pub fn new(base_url: impl Into<String>) -> FetchResult<Self> {
        Self::with_config(base_url, ClientConfig::default())
    }

    /// Create a client with custom configuration
    pub fn with_config(base_url: impl Into<String>, config: ClientConfig) -> FetchResult<Self> {
        let base_url = base_url.into();
        Url::parse(&base_url).map_err(|e| FetchError::InvalidBaseUrl {
            url: base_url.clone(),
            reason: e.to_string(),
        })?;

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let http_client = Client::builder()
            .timeout(config.timeout)
            .default_headers(headers)
            .build()
            .map_err(FetchError::Client)?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            source: config.source,
            http_client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn source(&self) -> DataSource {
        self.source
    }

    /// Full URL of a strategy endpoint, without query
    pub fn endpoint_url(&self, strategy: Strategy) -> String {
        format!("{}{}", self.base_url, self.source.endpoint(strategy))
    }

    /// Fetch candidate rows for one symbol and strategy.
    ///
    /// Rows come back exactly as the backend sent them; tagging with the
    /// ticker happens during the merge.
    pub async fn get_candidates(
        &self,
        strategy: Strategy,
        symbol: &str,
        filters: &FilterParams,
    ) -> FetchResult<Vec<CandidateRow>> {
        let url = self.endpoint_url(strategy);
        let params = filters.query_for(symbol);

        debug!("Making GET request to {} (ticker={})", url, symbol);

        let response = self
            .http_client
            .get(&url)
            .query(&params)
            .send()
            .await
            .map_err(|e| FetchError::from_transport(&url, e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| FetchError::from_transport(&url, e))?;

        if !status.is_success() {
            error!(%status, url = %url, body = %body, "API error");
            return Err(FetchError::Status { url, status, body });
        }

        let objects: Vec<Map<String, Value>> =
            serde_json::from_str(&body).map_err(|source| FetchError::Decode {
                url: url.clone(),
                source,
            })?;

        debug!(
            "Received {} {} rows for {}",
            objects.len(),
            strategy,
            symbol
        );

        Ok(objects.into_iter().map(CandidateRow::from_json).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_url_trims_trailing_slash() {
        let client = StrategyClient::new("http://localhost:8000/").unwrap();
        assert_eq!(
            client.endpoint_url(Strategy::Csp),
            "http://localhost:8000/api/strategy/csp/polygon"
        );
    }

    #[test]
    fn test_endpoint_url_for_yfinance_source() {
        let config = ClientConfig::default().with_source(DataSource::Yfinance);
        let client = StrategyClient::with_config(DEFAULT_BASE_URL, config).unwrap();
        assert_eq!(
            client.endpoint_url(Strategy::Cc),
            "http://localhost:8000/api/strategy/cc"
        );
    }

    #[test]
    fn test_rejects_invalid_base_url() {
        let err = StrategyClient::new("not a url").unwrap_err();
        assert!(matches!(err, FetchError::InvalidBaseUrl { .. }));
    }

    #[test]
    fn test_default_timeout_is_thirty_seconds() {
        assert_eq!(ClientConfig::default().timeout, Duration::from_secs(30));
    }
}
