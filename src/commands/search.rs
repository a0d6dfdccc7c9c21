//! Search command implementation

use anyhow::{Context, Result};
use clap::Args;
use std::io;
use std::path::PathBuf;
use wheel_dashboard::export::{self, OutputFormat};
use wheel_dashboard::{Config, DataSource, Dashboard, SearchInputs, Strategy};
use tracing::{debug, info};

#[derive(Args, Debug)]
pub struct SearchArgs {
    /// Path to configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Tickers to search (comma-separated). E.g., "AAPL,MSFT,QQQ"
    #[arg(short, long)]
    pub tickers: Option<String>,

    /// Minimum ROI in percent
    #[arg(long)]
    pub min_roi: Option<f64>,

    /// Minimum days to expiration
    #[arg(long)]
    pub min_dte: Option<i64>,

    /// Maximum days to expiration
    #[arg(long)]
    pub max_dte: Option<i64>,

    /// Number of ideas to show per table
    #[arg(short = 'n', long, value_parser = clap::value_parser!(u64).range(1..))]
    pub max_ideas: Option<u64>,

    /// Backend data source
    #[arg(long, value_enum)]
    pub source: Option<DataSource>,

    /// Strategy API base URL
    #[arg(long)]
    pub base_url: Option<String>,

    /// Request timeout in seconds
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Column to sort both tables by (e.g. "roi_%", "dte")
    #[arg(short, long)]
    pub sort: Option<String>,

    /// Sort descending instead of ascending
    #[arg(long, requires = "sort")]
    pub descending: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,
}

fn apply_overrides(config: &mut Config, args: &SearchArgs) {
    if let Some(tickers) = &args.tickers {
        info!("Overriding tickers to: {}", tickers);
        config.search.tickers = tickers.clone();
    }
    if let Some(min_roi) = args.min_roi {
        info!("Overriding min ROI to: {}%", min_roi);
        config.search.min_roi = min_roi;
    }
    if let Some(min_dte) = args.min_dte {
        info!("Overriding min DTE to: {}", min_dte);
        config.search.min_dte = min_dte;
    }
    if let Some(max_dte) = args.max_dte {
        info!("Overriding max DTE to: {}", max_dte);
        config.search.max_dte = max_dte;
    }
    if let Some(max_ideas) = args.max_ideas {
        info!("Overriding number of ideas to: {}", max_ideas);
        config.search.max_ideas = max_ideas as usize;
    }
    if let Some(source) = args.source {
        info!("Overriding data source to: {}", source);
        config.api.source = source;
    }
    if let Some(base_url) = &args.base_url {
        info!("Overriding API base URL to: {}", base_url);
        config.api.base_url = base_url.clone();
    }
    if let Some(timeout) = args.timeout {
        info!("Overriding request timeout to: {}s", timeout);
        config.api.timeout_secs = timeout;
    }
}

pub fn run(args: SearchArgs) -> Result<()> {
    info!("Starting search");

    let mut config = Config::load(args.config.as_deref())?;
    apply_overrides(&mut config, &args);
    config.validate()?;
    debug!("Configuration: {:?}", config);

    let client = config.client()?;
    let mut dashboard = Dashboard::new(SearchInputs::from(&config.search));

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(dashboard.search(&client))
        .context("Search failed, no results to show")?;

    if let Some(column) = &args.sort {
        for strategy in Strategy::ALL {
            dashboard.sort_by(strategy, column);
            if args.descending {
                dashboard.sort_by(strategy, column);
            }
        }
    }

    let csp = dashboard
        .presentation(Strategy::Csp)
        .context("Cash-secured put table unavailable")?;
    let cc = dashboard
        .presentation(Strategy::Cc)
        .context("Covered call table unavailable")?;

    match args.format {
        OutputFormat::Table => {
            println!("\n{}\n", csp.render_text());
            println!("{}\n", cc.render_text());
            println!(
                "{} CSP and {} CC candidates for {:?} via {}",
                dashboard.results().csp.len(),
                dashboard.results().cc.len(),
                dashboard.inputs().filters().symbols,
                config.api.source
            );
        }
        OutputFormat::Csv => {
            export::write_csv(io::stdout().lock(), &csp)?;
            println!();
            export::write_csv(io::stdout().lock(), &cc)?;
        }
        OutputFormat::Json => {
            export::write_json(io::stdout().lock(), &csp, &cc)?;
        }
    }

    info!("Search completed successfully");

    Ok(())
}
