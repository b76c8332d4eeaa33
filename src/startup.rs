//! Process startup helpers called once from `main`.

use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::Config;
use crate::error::AppError;
use crate::service::log::{local::LocalLog, webhook::DiscordWebhook, LogPipeline};

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));
const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Installs the global tracing subscriber.
///
/// Filters with `RUST_LOG` when set, otherwise logs at `info` and above.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();
}

/// Builds the HTTP client shared by all webhook deliveries.
///
/// # Returns
/// - `Ok(reqwest::Client)` - Client with the crate user agent and a connect timeout
/// - `Err(AppError::ReqwestErr)` - The TLS backend failed to initialize
pub fn setup_reqwest_client() -> Result<reqwest::Client, AppError> {
    let client = reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .connect_timeout(CONNECT_TIMEOUT)
        .build()?;

    Ok(client)
}

/// Creates the per-run log file and the pipeline delivering to Discord webhooks.
///
/// # Arguments
/// - `config` - Configuration providing the log directory, webhooks and flush settings
/// - `client` - HTTP client used for webhook requests
///
/// # Returns
/// - `Ok(LogPipeline)` - Pipeline with the `bot` and `site` channels
/// - `Err(AppError::LogErr)` - The log directory or file could not be created
pub fn setup_log_pipeline(config: &Config, client: reqwest::Client) -> Result<LogPipeline, AppError> {
    let local = LocalLog::create(&config.log_dir)?;
    tracing::info!("Writing logs to {}", local.path().display());

    for channel in config.log_channels() {
        if channel.webhook.is_none() {
            tracing::info!(
                "No webhook configured for '{}' channel, logging locally only",
                channel.name
            );
        }
    }

    Ok(LogPipeline::new(
        config.log_channels(),
        local,
        Arc::new(DiscordWebhook::new(client)),
        config.flush,
    ))
}
