//! Ready event handler for bot initialization.
//!
//! This module handles the `ready` event which is fired when the bot successfully
//! connects to Discord's gateway and completes the initial handshake. The handler is
//! used to:
//! - Record the connection on the bot log channel
//! - Register the bot's slash commands

use serenity::all::{Context, Ready};

use crate::bot::{command, registrar};
use crate::state::BotState;

/// Handles the ready event when the bot connects to Discord.
///
/// Fires after every (re)connection, so commands are re-registered each time; Discord
/// treats a bulk overwrite with identical definitions as a no-op. A registration failure
/// is recorded but does not stop the bot.
///
/// # Arguments
/// - `state` - Shared bot state for logging and the registration scope
/// - `ctx` - Discord context providing the HTTP client
/// - `ready` - Ready event data containing bot user information
pub async fn handle_ready(state: &BotState, ctx: Context, ready: Ready) {
    state.record_bot(format!("{} is connected to Discord", ready.user.name));

    let registrar = registrar::registrar_for(ctx.http.clone(), state.guild_id);
    let definitions = command::definitions();

    match registrar.register(&definitions).await {
        Ok(count) => state.record_bot(format!(
            "Registered {} slash commands ({})",
            count,
            registrar.scope()
        )),
        Err(e) => {
            tracing::error!("Failed to register slash commands: {}", e);
            state.record_bot(format!("Failed to register slash commands: {}", e));
        }
    }
}
