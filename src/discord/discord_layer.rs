// Discord layer - commands and event handlers.
//
// Everything here only translates between serenity/poise types and the
// core BridgeService. No decisions are made in this layer.

#[path = "commands/command_catalog.rs"]
pub mod commands;

#[path = "events/message_events.rs"]
pub mod events;

use crate::core::bridge::{BridgeService, COMMAND_FAILURE_REPLY, UNKNOWN_COMMAND_REPLY};
use crate::infra::ai::DeepSeekClient;
use crate::infra::attachments::CodeFileWriter;
use crate::infra::exchange::ExchangeRateApiClient;
use poise::serenity_prelude as serenity;
use std::sync::Arc;

pub type Error = Box<dyn std::error::Error + Send + Sync>;
pub type Context<'a> = poise::Context<'a, Data, Error>;

/// Shared state handed to every command and event.
pub struct Data {
    pub bridge: Arc<BridgeService<DeepSeekClient, ExchangeRateApiClient>>,
    pub code_files: Arc<CodeFileWriter>,
}

/// Framework-wide error hook. Every failure is logged and, where there is
/// someone to answer, turned into a short reply.
pub async fn on_error(error: poise::FrameworkError<'_, Data, Error>) {
    match error {
        poise::FrameworkError::Command { error, ctx, .. } => {
            tracing::error!(
                command = %ctx.command().qualified_name,
                "Error processing command: {}",
                error
            );
            if let Err(e) = ctx.say(COMMAND_FAILURE_REPLY).await {
                tracing::error!("Failed to send command error reply: {}", e);
            }
        }
        poise::FrameworkError::UnknownInteraction {
            ctx, interaction, ..
        } => {
            tracing::warn!(command = %interaction.data.name, "Unrecognized command");
            let response = serenity::CreateInteractionResponse::Message(
                serenity::CreateInteractionResponseMessage::new().content(UNKNOWN_COMMAND_REPLY),
            );
            if let Err(e) = interaction.create_response(ctx, response).await {
                tracing::error!("Failed to answer unknown command: {}", e);
            }
        }
        other => {
            if let Err(e) = poise::builtins::on_error(other).await {
                tracing::error!("Error while handling framework error: {}", e);
            }
        }
    }
}
