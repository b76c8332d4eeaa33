//! Interaction handler routing slash commands to their command modules.

use chrono::{DateTime, Utc};
use serenity::all::{Context, CreateInteractionResponse, CreateInteractionResponseMessage, Interaction};

use crate::bot::command::{snowflake_timestamp, BotCommand, CommandContext, CommandReply};
use crate::state::BotState;

/// Handles an incoming interaction.
///
/// Only application commands are handled, other interaction kinds (autocomplete,
/// components, modals) are ignored since the bot registers none.
pub async fn handle_interaction(state: &BotState, ctx: Context, interaction: Interaction) {
    let Interaction::Command(command) = interaction else {
        return;
    };

    let reply = route_command(
        state,
        &command.data.name,
        &command.user.name,
        snowflake_timestamp(command.id.get()),
        Utc::now(),
    );
    let response = CreateInteractionResponse::Message(
        CreateInteractionResponseMessage::new()
            .content(reply.content)
            .ephemeral(reply.ephemeral),
    );

    if let Err(e) = command.create_response(&ctx, response).await {
        tracing::error!("Failed to respond to /{}: {:?}", command.data.name, e);
    }
}

/// Records the invocation and runs the matching command
///
/// # Arguments
/// - `state` - Shared bot state
/// - `name` - Command name reported by Discord
/// - `user` - Name of the invoking user
/// - `invoked_at` - Creation time of the interaction
/// - `now` - Time the interaction is handled
///
/// # Returns
/// - `CommandReply` - The command's reply, or an ephemeral `Unknown command`
pub fn route_command(
    state: &BotState,
    name: &str,
    user: &str,
    invoked_at: DateTime<Utc>,
    now: DateTime<Utc>,
) -> CommandReply {
    state.record_bot(format!("/{} used by {}", name, user));

    let Some(bot_command) = BotCommand::from_name(name) else {
        tracing::warn!("Received unknown command '{}'", name);
        return CommandReply::ephemeral("Unknown command");
    };

    let command_ctx = CommandContext {
        state,
        invoked_at,
        now,
    };

    bot_command.run(&command_ctx)
}
