//! Wheel Strategy Dashboard
//!
//! Client for a wheel-strategy backend: fans out one request per ticker per
//! strategy (cash-secured puts and covered calls), merges the answers into two
//! ticker-tagged lists, and presents them as sortable, row-limited tables,
//! either printed once or in an interactive terminal dashboard.
//!
//! # Example
//! ```no_run
//! use wheel_dashboard::{Config, Dashboard, SearchInputs, Strategy};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::default();
//!     let client = config.client()?;
//!     let mut dashboard = Dashboard::new(SearchInputs::from(&config.search));
//!     dashboard.search(&client).await?;
//!     dashboard.sort_by(Strategy::Csp, "roi_%");
//!     if let Some(table) = dashboard.presentation(Strategy::Csp) {
//!         println!("{}", table.render_text());
//!     }
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod config;
pub mod dashboard;
pub mod export;
pub mod fanout;
pub mod table;
pub mod tui;
pub mod types;

pub use api::{FetchError, StrategyClient};
pub use config::Config;
pub use dashboard::{Dashboard, SearchInputs};
pub use table::{present, Presentation, SortDirection, SortState};
pub use types::*;
