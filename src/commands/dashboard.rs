//! Interactive dashboard command implementation

use anyhow::Result;
use std::path::PathBuf;
use wheel_dashboard::{tui, Config, DataSource, Dashboard, SearchInputs};
use tracing::info;

pub fn run(
    config_path: Option<PathBuf>,
    source_override: Option<DataSource>,
    base_url_override: Option<String>,
) -> Result<()> {
    info!("Starting dashboard");

    let mut config = Config::load(config_path.as_deref())?;

    if let Some(source) = source_override {
        info!("Overriding data source to: {}", source);
        config.api.source = source;
    }
    if let Some(base_url) = base_url_override {
        info!("Overriding API base URL to: {}", base_url);
        config.api.base_url = base_url;
    }
    config.validate()?;

    let client = config.client()?;
    info!(
        "Using {} endpoints at {}",
        config.api.source,
        client.base_url()
    );
    let dashboard = Dashboard::new(SearchInputs::from(&config.search));

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(tui::run(dashboard, client))
}
