//! Slash commands answered by the bot.
//!
//! Each command lives in its own module exposing a pure `run` function that builds the
//! reply text, so the replies can be tested without a Discord connection. This module
//! maps command names to those functions and supplies the definitions registered with
//! Discord.

use chrono::{DateTime, TimeZone, Utc};

use crate::model::command::CommandDefinition;
use crate::state::BotState;

pub mod ping;
pub mod site;
pub mod uptime;

/// Milliseconds between the Unix epoch and the Discord epoch (2015-01-01T00:00:00Z).
const DISCORD_EPOCH_MS: i64 = 1_420_070_400_000;

/// Slash commands known to the bot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BotCommand {
    Ping,
    Uptime,
    Site,
}

impl BotCommand {
    pub const ALL: [BotCommand; 3] = [BotCommand::Ping, BotCommand::Uptime, BotCommand::Site];

    /// Resolves a command from the name Discord reports for an interaction.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|command| command.definition().name == name)
    }

    pub fn definition(self) -> CommandDefinition {
        match self {
            Self::Ping => CommandDefinition {
                name: "ping",
                description: "Check that the bot is responsive",
            },
            Self::Uptime => CommandDefinition {
                name: "uptime",
                description: "Show how long the bot has been running",
            },
            Self::Site => CommandDefinition {
                name: "site",
                description: "Show the status of the web server",
            },
        }
    }

    /// Runs the command and builds its reply
    ///
    /// # Arguments
    /// - `ctx` - State and timestamps of the invocation
    ///
    /// # Returns
    /// - `CommandReply` - Reply content and visibility
    pub fn run(self, ctx: &CommandContext<'_>) -> CommandReply {
        match self {
            Self::Ping => ping::run(ctx.invoked_at, ctx.now),
            Self::Uptime => uptime::run(ctx.state.started_at, ctx.now),
            Self::Site => site::run(&ctx.state.site.status()),
        }
    }
}

/// Definitions of every command, in registration order.
pub fn definitions() -> Vec<CommandDefinition> {
    BotCommand::ALL
        .into_iter()
        .map(BotCommand::definition)
        .collect()
}

/// Invocation context passed to a command.
pub struct CommandContext<'a> {
    pub state: &'a BotState,
    /// Creation time of the interaction, derived from its snowflake id
    pub invoked_at: DateTime<Utc>,
    pub now: DateTime<Utc>,
}

/// Reply sent back for a command interaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandReply {
    pub content: String,
    /// Only visible to the invoking user
    pub ephemeral: bool,
}

impl CommandReply {
    pub fn public(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ephemeral: false,
        }
    }

    pub fn ephemeral(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ephemeral: true,
        }
    }
}

/// Extracts the creation time embedded in a Discord snowflake id.
pub fn snowflake_timestamp(id: u64) -> DateTime<Utc> {
    let millis = (id >> 22) as i64 + DISCORD_EPOCH_MS;

    Utc.timestamp_millis_opt(millis)
        .single()
        .unwrap_or(DateTime::UNIX_EPOCH)
}
