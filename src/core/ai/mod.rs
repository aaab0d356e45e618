pub mod ai_service;
pub mod chunking;
pub mod memory;
pub mod models;

pub use ai_service::{AiProvider, AiService, CompletionError};
pub use chunking::{split_message, DISCORD_MESSAGE_LIMIT};
pub use memory::MemoryStore;
pub use models::{ConversationTurn, ModelConfig};
