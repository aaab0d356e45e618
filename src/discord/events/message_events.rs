// Plain channel messages: history-enabled chat with the model.

use crate::core::bridge::{InboundMessage, MessageOutcome, WRONG_CHANNEL_REPLY};
use crate::discord::{Data, Error};
use poise::serenity_prelude as serenity;

pub async fn handle_message(
    ctx: &serenity::Context,
    data: &Data,
    message: &serenity::Message,
) -> Result<(), Error> {
    let bot_id = ctx.cache.current_user().id;
    let addressed_to_bot = message.mentions.iter().any(|u| u.id == bot_id)
        || message
            .referenced_message
            .as_ref()
            .is_some_and(|referenced| referenced.author.id == bot_id);

    let inbound = InboundMessage {
        channel_id: message.channel_id.get(),
        author_id: message.author.id.get(),
        author_is_bot: message.author.bot,
        addressed_to_bot,
        content: message.content.clone(),
    };

    if !inbound.author_is_bot && data.bridge.allows_channel(inbound.channel_id) {
        let _ = message.channel_id.broadcast_typing(&ctx.http).await;
    }

    match data.bridge.chat(&inbound).await {
        MessageOutcome::Ignored => {}
        MessageOutcome::Rejected => {
            message.reply(&ctx.http, WRONG_CHANNEL_REPLY).await?;
        }
        MessageOutcome::Reply(parts) => {
            for part in parts {
                message.channel_id.say(&ctx.http, part).await?;
            }
        }
    }

    Ok(())
}
