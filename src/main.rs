mod bot;
mod config;
mod error;
mod model;
mod service;
mod startup;
mod state;

use chrono::Utc;

use crate::{config::Config, error::AppError, service::site::SiteSupervisor, state::BotState};

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    startup::init_tracing();

    let config = Config::from_env()?;

    let http_client = startup::setup_reqwest_client()?;
    let pipeline = startup::setup_log_pipeline(&config, http_client)?;

    let site = SiteSupervisor::new(pipeline.clone());
    if let Some(command_line) = config.site_command.as_deref() {
        // The bot keeps running so `/site` can report the failure
        if let Err(e) = site.start(command_line) {
            tracing::error!("Failed to start site process: {}", e);
        }
    }

    let state = BotState::new(pipeline.clone(), site, Utc::now(), config.discord_guild_id);

    tracing::info!("Starting bot");

    let bot_client = bot::start::init_bot(&config, state).await?;
    let mut bot_task = tokio::spawn(bot::start::start_bot(bot_client));

    tokio::select! {
        result = &mut bot_task => match result {
            Ok(Ok(())) => tracing::info!("Discord client stopped"),
            Ok(Err(e)) => tracing::error!("Discord bot error: {}", e),
            Err(e) => tracing::error!("Discord bot task failed: {}", e),
        },
        result = tokio::signal::ctrl_c() => {
            if let Err(e) = result {
                tracing::error!("Failed to listen for shutdown signal: {}", e);
            }
            tracing::info!("Shutting down");
            bot_task.abort();
        }
    }

    pipeline.shutdown().await;

    Ok(())
}
