// Routing of inbound commands and messages.
//
// This is where the channel restriction, model choice and reply shaping
// live, so the Discord layer only has to translate types and send things.

use super::channel_policy::ChannelPolicy;
use crate::core::ai::{split_message, AiProvider, AiService, ModelConfig, DISCORD_MESSAGE_LIMIT};
use crate::core::exchange::{ConversionRequest, ExchangeService, RateProvider};

pub const WRONG_CHANNEL_REPLY: &str = "Este bot solo puede utilizarse en el canal especificado.";
pub const UNKNOWN_COMMAND_REPLY: &str = "Comando no reconocido.";
pub const COMMAND_FAILURE_REPLY: &str = "Hubo un error procesando tu solicitud.";
pub const MESSAGE_FAILURE_REPLY: &str = "Hubo un error procesando tu mensaje.";
pub const CODE_FILE_NOTICE: &str =
    "El código generado es demasiado largo. Aquí tienes el archivo con el código:";
pub const CODE_FILE_FAILURE_REPLY: &str = "No se pudo guardar el archivo con el código.";

/// Marker that sends a reply as a file instead of chat messages.
const CODE_FENCE: &str = "```";

/// What a slash command should send back.
#[derive(Debug, Clone, PartialEq)]
pub enum CommandReply {
    /// Invoked outside the allowed channel.
    Rejected,
    /// Send each segment as its own message, in order.
    Chunks(Vec<String>),
    /// Save the whole reply to the code file and attach it.
    CodeFile(String),
    /// A single short message.
    Text(String),
}

/// A plain channel message, stripped of Discord types.
#[derive(Debug, Clone)]
pub struct InboundMessage {
    pub channel_id: u64,
    pub author_id: u64,
    pub author_is_bot: bool,
    /// Mentions the bot or replies to one of its messages.
    pub addressed_to_bot: bool,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum MessageOutcome {
    /// Nothing to do.
    Ignored,
    /// Addressed to the bot from another channel; answer with the rejection.
    Rejected,
    Reply(Vec<String>),
}

pub struct BridgeService<P: AiProvider, R: RateProvider> {
    ai: AiService<P>,
    exchange: ExchangeService<R>,
    policy: ChannelPolicy,
    models: ModelConfig,
    max_message_len: usize,
}

impl<P: AiProvider, R: RateProvider> BridgeService<P, R> {
    pub fn new(
        ai: AiService<P>,
        exchange: ExchangeService<R>,
        policy: ChannelPolicy,
        models: ModelConfig,
    ) -> Self {
        Self {
            ai,
            exchange,
            policy,
            models,
            max_message_len: DISCORD_MESSAGE_LIMIT,
        }
    }

    pub fn allows_channel(&self, channel_id: u64) -> bool {
        self.policy.allows(channel_id)
    }

    /// `/deepthink`: one stateless question to the reasoning model.
    pub async fn deepthink(&self, channel_id: u64, user_id: u64, message: &str) -> CommandReply {
        if !self.policy.allows(channel_id) {
            tracing::debug!(channel_id, user_id, "Rejected /deepthink outside allowed channel");
            return CommandReply::Rejected;
        }

        let reply = self
            .ai
            .respond(user_id, message, &self.models.reasoner_model, false)
            .await;

        if reply.contains(CODE_FENCE) {
            CommandReply::CodeFile(reply)
        } else {
            CommandReply::Chunks(self.chunk(&reply))
        }
    }

    /// `/convertir`: converts `amount` between two currencies.
    pub async fn convert(&self, channel_id: u64, amount: f64, from: &str, to: &str) -> CommandReply {
        if !self.policy.allows(channel_id) {
            tracing::debug!(channel_id, "Rejected /convertir outside allowed channel");
            return CommandReply::Rejected;
        }

        match ConversionRequest::new(amount, from, to) {
            Ok(request) => CommandReply::Text(self.exchange.convert(&request).await),
            Err(e) => {
                tracing::warn!("Invalid conversion request: {}", e);
                CommandReply::Text(e.user_message())
            }
        }
    }

    /// A message posted in a channel: chat with memory.
    pub async fn chat(&self, message: &InboundMessage) -> MessageOutcome {
        if message.author_is_bot {
            return MessageOutcome::Ignored;
        }

        if !self.policy.allows(message.channel_id) {
            return if message.addressed_to_bot {
                MessageOutcome::Rejected
            } else {
                MessageOutcome::Ignored
            };
        }

        let content = message.content.trim();
        if content.is_empty() {
            return MessageOutcome::Ignored;
        }

        let reply = self
            .ai
            .respond(message.author_id, content, &self.models.chat_model, true)
            .await;

        MessageOutcome::Reply(self.chunk(&reply))
    }

    fn chunk(&self, text: &str) -> Vec<String> {
        split_message(text, self.max_message_len)
            .map(str::to_string)
            .collect()
    }
}
