//! Strategy API error types

use reqwest::StatusCode;
use thiserror::Error;

/// A failed strategy request.
///
/// Callers treat every variant the same way ("fetch failed"); the variants only
/// exist so logs say what went wrong.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("invalid base URL {url:?}: {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("request to {url} timed out")]
    Timeout { url: String },

    #[error("network error calling {url}: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("API error {status} from {url}: {body}")]
    Status {
        url: String,
        status: StatusCode,
        body: String,
    },

    #[error("failed to parse response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

impl FetchError {
    pub(crate) fn from_transport(url: &str, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            FetchError::Timeout {
                url: url.to_string(),
            }
        } else {
            FetchError::Network {
                url: url.to_string(),
                source: err,
            }
        }
    }

    /// HTTP status, when the backend answered at all
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            FetchError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

pub type FetchResult<T> = Result<T, FetchError>;
