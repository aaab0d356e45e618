// This is the entry point of the Discord bot.
//
// **Architecture Overview:**
// - `core/` = Business logic (platform-agnostic): memory, chunking, conversion, routing
// - `infra/` = Implementations of core traits (DeepSeek API, exchange-rate API, files)
// - `discord/` = Discord-specific adapters (commands, events)
//
// This file's job is to:
// 1. Load configuration
// 2. Initialize services (dependency injection)
// 3. Set up the Discord framework
// 4. Register commands and event handlers

// These attrs point each module declaration at a more descriptive root file
// so we don't end up with half a dozen mod.rs files that all look the same.
#[path = "core/core_layer.rs"]
mod core;
#[path = "discord/discord_layer.rs"]
mod discord;
#[path = "infra/infra_layer.rs"]
mod infra;

mod config;

use crate::config::BotConfig;
use crate::core::ai::{AiService, MemoryStore};
use crate::core::bridge::{BridgeService, ChannelPolicy, MESSAGE_FAILURE_REPLY};
use crate::core::exchange::ExchangeService;
use crate::discord::events::handle_message;
use crate::discord::{Data, Error};
use crate::infra::ai::DeepSeekClient;
use crate::infra::attachments::CodeFileWriter;
use crate::infra::exchange::ExchangeRateApiClient;
use anyhow::Context as _;
use poise::serenity_prelude as serenity;
use std::sync::Arc;

/// Event handler for non-command Discord events.
/// Plain messages in the allowed channel become chat exchanges.
async fn event_handler(
    ctx: &serenity::Context,
    event: &serenity::FullEvent,
    _framework: poise::FrameworkContext<'_, Data, Error>,
    data: &Data,
) -> Result<(), Error> {
    if let serenity::FullEvent::Message { new_message } = event {
        if let Err(e) = handle_message(ctx, data, new_message).await {
            tracing::error!(
                channel_id = new_message.channel_id.get(),
                "Error processing message: {}",
                e
            );
            if let Err(e) = new_message.reply(&ctx.http, MESSAGE_FAILURE_REPLY).await {
                tracing::error!("Failed to send message error reply: {}", e);
            }
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging so we can see what's happening
    tracing_subscriber::fmt::init();

    // Load environment variables from .env file (if it exists)
    dotenv::dotenv().ok();

    let config = BotConfig::from_env()?;
    config.log_summary();
    if config.channel_id.is_none() {
        tracing::warn!("CHANNEL_ID is not set; every command and message will be rejected");
    }

    // ========================================================================
    // DEPENDENCY INJECTION
    // ========================================================================
    // This is the "composition root" where we wire everything together.

    // Conversation memory lives for the whole process and is shared by every handler.
    let memory = Arc::new(MemoryStore::with_retention(config.global_retention));

    let deepseek = DeepSeekClient::new(
        config.deepseek_api_key.clone(),
        config.deepseek_base_url.clone(),
        config.system_prompt.clone(),
        config.http_timeout,
    )
    .context("Failed to create DeepSeek client")?;
    let ai_service = AiService::new(deepseek, Arc::clone(&memory));

    let rates = ExchangeRateApiClient::new(
        config.exchange_rate_api_key.clone(),
        config.exchange_rate_base_url.clone(),
        config.http_timeout,
    )
    .context("Failed to create exchange-rate client")?;
    let exchange_service = ExchangeService::new(rates);

    let bridge = Arc::new(BridgeService::new(
        ai_service,
        exchange_service,
        ChannelPolicy::new(config.channel_id),
        config.models.clone(),
    ));

    let data = Data {
        bridge,
        code_files: Arc::new(CodeFileWriter::new(config.code_file_path.clone())),
    };

    // ========================================================================
    // DISCORD FRAMEWORK SETUP
    // ========================================================================

    let intents = serenity::GatewayIntents::GUILDS
        | serenity::GatewayIntents::GUILD_MESSAGES
        | serenity::GatewayIntents::MESSAGE_CONTENT; // Required to read message content

    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands: discord::commands::all(),
            event_handler: |ctx, event, framework, data| {
                Box::pin(event_handler(ctx, event, framework, data))
            },
            on_error: |error| Box::pin(discord::on_error(error)),
            ..Default::default()
        })
        .setup(|ctx, ready, framework| {
            Box::pin(async move {
                tracing::info!("Bot connected as {}", ready.user.tag());

                // A failed registration leaves the previous commands in place; keep running.
                tracing::info!("Updating slash commands...");
                match poise::builtins::register_globally(ctx, &framework.options().commands).await
                {
                    Ok(()) => tracing::info!("Slash commands updated"),
                    Err(e) => tracing::error!("Error updating slash commands: {}", e),
                }

                Ok(data)
            })
        })
        .build();

    let mut client = serenity::ClientBuilder::new(&config.bot_token, intents)
        .framework(framework)
        .await
        .context("Error creating client")?;

    client.start().await.context("Error running bot")?;

    Ok(())
}
