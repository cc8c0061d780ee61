//! Vigil Watcher
//!
//! Watches a single homework submission and sends a Telegram message each
//! time its review status changes.
//!
//! Architecture:
//! - Configuration: credentials and timing from the environment
//! - Repositories: status API and messaging channel adapters
//! - Services: notification delivery
//! - Scheduler: the poll / validate / interpret / notify / sleep cycle
//!
//! The watcher never exits on its own. Missing credentials stop it before
//! the first cycle.

mod config;
mod repository;
mod scheduler;
mod service;

use anyhow::{Context, Result};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use vigil_client::{StatusClient, TelegramClient};
use vigil_core::domain::PollWindow;

use crate::config::Config;
use crate::repository::{HttpStatusSource, TelegramChannel};
use crate::scheduler::CycleDriver;

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env file is fine; real environment variables still apply
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "vigil_watcher=debug,vigil_core=debug,vigil_client=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Vigil watcher");

    let config = match load_config() {
        Ok(config) => config,
        Err(e) => {
            error!("CRITICAL: {:#}. Shutting down", e);
            return Ok(());
        }
    };
    info!(
        "Loaded configuration: endpoint={}, chat_id={}, retry_period={:?}",
        config.endpoint, config.telegram_chat_id, config.retry_period
    );

    let http = reqwest::Client::builder()
        .timeout(config.request_timeout)
        .build()
        .context("Failed to build HTTP client")?;

    let source = HttpStatusSource::new(StatusClient::with_client(
        &config.endpoint,
        &config.practicum_token,
        http.clone(),
    ));
    let channel = TelegramChannel::new(
        TelegramClient::with_base_url(&config.telegram_api_url, &config.telegram_token, http),
        config.telegram_chat_id.clone(),
    );

    let window = PollWindow::starting_at(chrono::Utc::now().timestamp(), config.retry_period);
    let mut driver = CycleDriver::new(
        source,
        channel,
        config.verdict_table(),
        config.retry_period,
        window,
    );

    tokio::select! {
        _ = driver.run() => {}
        result = tokio::signal::ctrl_c() => {
            result.context("Failed to listen for shutdown signal")?;
            info!("Shutdown signal received, stopping watcher");
        }
    }

    info!("Watcher stopped ({})", driver.window());

    Ok(())
}

/// Loads and validates configuration from the environment
fn load_config() -> Result<Config> {
    let config = Config::from_env()?;
    config.validate().context("Invalid configuration")?;
    Ok(config)
}
