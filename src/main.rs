//! Wheel strategy dashboard - main entry point
//!
//! This binary provides two subcommands:
//! - search: Fetch, merge and print CSP and CC ideas once
//! - dashboard: Interactive terminal dashboard

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use wheel_dashboard::DataSource;

mod commands;

#[derive(Parser, Debug)]
#[command(name = "wheel-dashboard")]
#[command(about = "Cash-secured put and covered call ideas from a wheel strategy API", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Fetch ideas for the given tickers and print both tables
    Search(commands::search::SearchArgs),

    /// Run the interactive terminal dashboard
    Dashboard {
        /// Path to configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Backend data source
        #[arg(long, value_enum)]
        source: Option<DataSource>,

        /// Strategy API base URL
        #[arg(long)]
        base_url: Option<String>,
    },
}

fn setup_logging(verbose: bool, command_name: &str, file_only: bool) -> Result<()> {
    // Create logs directory
    std::fs::create_dir_all("logs")?;

    // Log file naming pattern: {command}_{date}.log
    let log_filename = format!(
        "{}_{}.log",
        command_name,
        chrono::Local::now().format("%Y-%m-%d_%H-%M-%S")
    );
    let log_path = PathBuf::from("logs").join(&log_filename);

    // Filter out noisy HTTP crates
    let level = if verbose { "debug" } else { "info" };
    let filter_str = format!(
        "{},hyper=warn,hyper_util=warn,reqwest=warn,rustls=warn,h2=warn",
        level
    );
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&filter_str));

    // File appender
    let file_appender = tracing_appender::rolling::never("logs", &log_filename);

    if file_only {
        // The dashboard owns the terminal; log to file only
        let file_layer = tracing_subscriber::fmt::layer()
            .with_writer(file_appender)
            .with_target(true)
            .with_line_number(true)
            .with_file(true)
            .with_ansi(false);

        tracing_subscriber::registry()
            .with(env_filter)
            .with(file_layer)
            .init();
    } else {
        // Console logs go to stderr so table/CSV/JSON output on stdout stays clean
        let console_layer = tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_line_number(true)
            .with_file(true)
            .with_ansi(true);

        // File layer - same format but without ANSI colors
        let file_layer = tracing_subscriber::fmt::layer()
            .with_writer(file_appender)
            .with_target(true)
            .with_line_number(true)
            .with_file(true)
            .with_ansi(false);

        tracing_subscriber::registry()
            .with(env_filter)
            .with(console_layer)
            .with(file_layer)
            .init();
    }

    info!("Logging initialized");
    info!("Log file: {}", log_path.display());

    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let (command_name, file_only) = match &cli.command {
        Commands::Search(_) => ("search", false),
        Commands::Dashboard { .. } => ("dashboard", true),
    };

    setup_logging(cli.verbose, command_name, file_only)?;

    match cli.command {
        Commands::Search(args) => commands::search::run(args),

        Commands::Dashboard {
            config,
            source,
            base_url,
        } => commands::dashboard::run(config, source, base_url),
    }
}
