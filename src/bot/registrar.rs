//! Slash command registration.
//!
//! Commands are registered with a bulk overwrite, so the set on Discord always matches
//! the definitions the bot was built with. Guild registration takes effect immediately
//! and is used during development, global registration can take up to an hour to
//! propagate.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serenity::all::{Command, CreateCommand, GuildId, Http};

use crate::error::AppError;
use crate::model::command::CommandDefinition;

/// Where a registrar submits its commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistrationScope {
    Global,
    Guild(u64),
}

impl fmt::Display for RegistrationScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Global => write!(f, "global"),
            Self::Guild(id) => write!(f, "guild {}", id),
        }
    }
}

#[async_trait]
pub trait CommandRegistrar: Send + Sync {
    /// Replaces the registered commands with `definitions`
    ///
    /// # Arguments
    /// - `definitions` - Commands to register
    ///
    /// # Returns
    /// - `Ok(usize)` - Number of commands Discord now has registered
    /// - `Err(AppError::DiscordErr)` - Discord rejected the registration
    async fn register(&self, definitions: &[CommandDefinition]) -> Result<usize, AppError>;

    fn scope(&self) -> RegistrationScope;
}

/// Registers commands for every guild the bot is in.
pub struct GlobalRegistrar {
    http: Arc<Http>,
}

impl GlobalRegistrar {
    pub fn new(http: Arc<Http>) -> Self {
        Self { http }
    }
}

#[async_trait]
impl CommandRegistrar for GlobalRegistrar {
    async fn register(&self, definitions: &[CommandDefinition]) -> Result<usize, AppError> {
        let commands = Command::set_global_commands(&self.http, builders(definitions)).await?;

        Ok(commands.len())
    }

    fn scope(&self) -> RegistrationScope {
        RegistrationScope::Global
    }
}

/// Registers commands for a single guild.
pub struct GuildRegistrar {
    http: Arc<Http>,
    guild_id: GuildId,
}

impl GuildRegistrar {
    pub fn new(http: Arc<Http>, guild_id: u64) -> Self {
        Self {
            http,
            guild_id: GuildId::new(guild_id),
        }
    }
}

#[async_trait]
impl CommandRegistrar for GuildRegistrar {
    async fn register(&self, definitions: &[CommandDefinition]) -> Result<usize, AppError> {
        let commands = self
            .guild_id
            .set_commands(&self.http, builders(definitions))
            .await?;

        Ok(commands.len())
    }

    fn scope(&self) -> RegistrationScope {
        RegistrationScope::Guild(self.guild_id.get())
    }
}

/// Picks the guild registrar when a guild is configured, the global one otherwise.
pub fn registrar_for(http: Arc<Http>, guild_id: Option<u64>) -> Box<dyn CommandRegistrar> {
    match guild_id {
        Some(id) => Box::new(GuildRegistrar::new(http, id)),
        None => Box::new(GlobalRegistrar::new(http)),
    }
}

fn builders(definitions: &[CommandDefinition]) -> Vec<CreateCommand> {
    definitions.iter().map(CommandDefinition::to_builder).collect()
}
