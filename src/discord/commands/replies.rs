// Turns a CommandReply into Discord messages.

use crate::core::bridge::{
    CommandReply, CODE_FILE_FAILURE_REPLY, CODE_FILE_NOTICE, COMMAND_FAILURE_REPLY,
    WRONG_CHANNEL_REPLY,
};
use crate::discord::{Context, Error};
use poise::serenity_prelude as serenity;

pub async fn send_command_reply(ctx: Context<'_>, reply: CommandReply) -> Result<(), Error> {
    match reply {
        CommandReply::Rejected => {
            ctx.say(WRONG_CHANNEL_REPLY).await?;
        }
        CommandReply::Text(text) => {
            ctx.say(text).await?;
        }
        CommandReply::Chunks(parts) => {
            if parts.is_empty() {
                ctx.say(COMMAND_FAILURE_REPLY).await?;
            }
            // The first say fills the deferred response, the rest are follow-ups.
            for part in parts {
                ctx.say(part).await?;
            }
        }
        CommandReply::CodeFile(contents) => send_code_file(ctx, contents).await?,
    }

    Ok(())
}

async fn send_code_file(ctx: Context<'_>, contents: String) -> Result<(), Error> {
    let writer = &ctx.data().code_files;

    if let Err(e) = writer.save(&contents).await {
        tracing::error!(path = %writer.path().display(), "Error saving code file: {}", e);
        ctx.say(CODE_FILE_FAILURE_REPLY).await?;
        return Ok(());
    }

    let file_name = writer
        .path()
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "codigo.txt".to_string());

    // Attach what we just wrote rather than re-reading the shared file,
    // which another command may already be overwriting.
    let attachment = serenity::CreateAttachment::bytes(contents.into_bytes(), file_name);
    ctx.send(
        poise::CreateReply::default()
            .content(CODE_FILE_NOTICE)
            .attachment(attachment),
    )
    .await?;

    Ok(())
}
