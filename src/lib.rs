pub mod bot;
pub mod config;
pub mod feedback;
pub mod logging;
pub mod mode;
pub mod model;
pub mod model_gateway;
pub mod providers;
pub mod telegram;

use anyhow::{Context, Result};
use reqwest::Client;
use tracing::info;

use config::Config;

pub async fn run() -> Result<()> {
    dotenvy::dotenv().ok();
    logging::init();
    info!("starting english feedback bot");

    let cfg = Config::from_env()?;
    info!(
        api_url = %cfg.api_url,
        model_timeout_secs = cfg.model_timeout_secs,
        "loaded runtime configuration"
    );

    let client = Client::builder()
        .build()
        .context("Failed to initialize HTTP client")?;

    telegram::run_bot(cfg, client).await
}
