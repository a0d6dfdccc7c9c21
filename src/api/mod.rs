//! Strategy API client
//!
//! Thin HTTP client for the wheel strategy backend. The backend exposes one
//! GET endpoint per strategy and data source; every endpoint takes the same
//! filter query and answers with a JSON array of open-ended row objects.

pub mod client;
pub mod error;

pub use client::{ClientConfig, StrategyClient, DEFAULT_BASE_URL};
pub use error::{FetchError, FetchResult};
