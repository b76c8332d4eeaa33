//! Bot state shared across all event handlers.
//!
//! The state is created once during startup and cloned into the Discord event handler.
//! All fields are cheap to clone:
//! - `LogPipeline` and `SiteSupervisor` are reference-counted handles
//! - `DateTime<Utc>` and `Option<u64>` are `Copy`

use chrono::{DateTime, Utc};

use crate::model::log::BOT_CHANNEL;
use crate::service::{log::LogPipeline, site::SiteSupervisor};

#[derive(Clone)]
pub struct BotState {
    /// Log pipeline receiving bot and site log lines.
    pub pipeline: LogPipeline,

    /// Supervisor of the secondary web server, queried by the `/site` command.
    pub site: SiteSupervisor,

    /// Time the bot process started, reported by the `/uptime` command.
    pub started_at: DateTime<Utc>,

    /// Guild to register slash commands in, global registration when `None`.
    pub guild_id: Option<u64>,
}

impl BotState {
    pub fn new(
        pipeline: LogPipeline,
        site: SiteSupervisor,
        started_at: DateTime<Utc>,
        guild_id: Option<u64>,
    ) -> Self {
        Self {
            pipeline,
            site,
            started_at,
            guild_id,
        }
    }

    /// Records a line on the bot channel.
    ///
    /// Event handlers cannot propagate errors, so a local log failure is reported
    /// through `tracing` instead.
    pub fn record_bot(&self, message: impl AsRef<str>) {
        if let Err(e) = self.pipeline.record(BOT_CHANNEL, message) {
            tracing::error!("Failed to record bot log line: {}", e);
        }
    }
}
