use super::replies::send_command_reply;
use crate::discord::{Context, Error};

/// Envía un mensaje a DeepSeek usando el modelo R1
#[poise::command(slash_command)]
pub async fn deepthink(
    ctx: Context<'_>,
    #[description = "El mensaje que deseas enviar"] message: String,
) -> Result<(), Error> {
    let bridge = &ctx.data().bridge;
    let channel_id = ctx.channel_id().get();

    // Reasoning can take far longer than the 3s Discord allows before a reply.
    if bridge.allows_channel(channel_id) {
        ctx.defer().await?;
    }

    let reply = bridge
        .deepthink(channel_id, ctx.author().id.get(), &message)
        .await;

    send_command_reply(ctx, reply).await
}
