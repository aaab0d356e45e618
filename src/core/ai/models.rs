use serde::{Deserialize, Serialize};

/// Who authored a conversation turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

/// One message of a conversation. Turns are never edited after creation;
/// memory only ever clones or drops them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub role: Role,
    pub content: String,
}

impl ConversationTurn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Model names used by the two kinds of exchange.
#[derive(Debug, Clone)]
pub struct ModelConfig {
    /// Used for history-enabled channel chat.
    pub chat_model: String,
    /// Used for the stateless `/deepthink` command.
    pub reasoner_model: String,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            chat_model: "deepseek-chat".to_string(),
            reasoner_model: "deepseek-reasoner".to_string(),
        }
    }
}
