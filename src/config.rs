// Runtime configuration, read from the environment (and .env) at startup.
//
// Only the bot token is mandatory. Everything else has a default or is
// left empty for the upstream API to reject later.

use crate::core::ai::memory::DEFAULT_GLOBAL_RETENTION;
use crate::core::ai::ModelConfig;
use crate::infra::attachments::DEFAULT_CODE_FILE;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 300;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing BOT_TOKEN environment variable! Create a .env file with your bot token.")]
    MissingToken,
}

pub struct BotConfig {
    pub bot_token: String,
    pub deepseek_api_key: String,
    pub exchange_rate_api_key: String,
    /// The only channel the bot answers in.
    pub channel_id: Option<u64>,
    pub deepseek_base_url: String,
    pub models: ModelConfig,
    pub system_prompt: Option<String>,
    pub exchange_rate_base_url: String,
    pub code_file_path: PathBuf,
    pub global_retention: usize,
    pub http_timeout: Duration,
}

impl BotConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup; blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let bot_token = get("BOT_TOKEN").ok_or(ConfigError::MissingToken)?;

        let channel_id = get("CHANNEL_ID").and_then(|raw| match raw.parse::<u64>() {
            Ok(id) => Some(id),
            Err(_) => {
                tracing::warn!("CHANNEL_ID {:?} is not a valid channel id", raw);
                None
            }
        });

        let defaults = ModelConfig::default();
        let models = ModelConfig {
            chat_model: get("DEEPSEEK_CHAT_MODEL").unwrap_or(defaults.chat_model),
            reasoner_model: get("DEEPSEEK_REASONER_MODEL").unwrap_or(defaults.reasoner_model),
        };

        Ok(Self {
            bot_token,
            deepseek_api_key: get("DEEPSEEK_API_KEY").unwrap_or_default(),
            exchange_rate_api_key: get("EXCHANGE_RATE_API_KEY").unwrap_or_default(),
            channel_id,
            deepseek_base_url: get("DEEPSEEK_BASE_URL")
                .unwrap_or_else(|| crate::infra::ai::deepseek_client::DEFAULT_BASE_URL.to_string()),
            models,
            system_prompt: get("DEEPSEEK_SYSTEM_PROMPT"),
            exchange_rate_base_url: get("EXCHANGE_RATE_BASE_URL").unwrap_or_else(|| {
                crate::infra::exchange::exchange_rate_client::DEFAULT_BASE_URL.to_string()
            }),
            code_file_path: get("CODE_FILE_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_CODE_FILE)),
            global_retention: parse_or(
                "MEMORY_GLOBAL_RETENTION",
                get("MEMORY_GLOBAL_RETENTION"),
                DEFAULT_GLOBAL_RETENTION,
            ),
            http_timeout: Duration::from_secs(parse_or(
                "HTTP_TIMEOUT_SECS",
                get("HTTP_TIMEOUT_SECS"),
                DEFAULT_HTTP_TIMEOUT_SECS,
            )),
        })
    }

    /// Logs the effective settings with secrets masked.
    pub fn log_summary(&self) {
        tracing::info!(
            channel_id = ?self.channel_id,
            chat_model = %self.models.chat_model,
            reasoner_model = %self.models.reasoner_model,
            deepseek_base_url = %self.deepseek_base_url,
            deepseek_api_key = %mask_token(&self.deepseek_api_key),
            exchange_rate_api_key = %mask_token(&self.exchange_rate_api_key),
            global_retention = self.global_retention,
            "Configuration loaded"
        );
    }
}

fn parse_or<T: FromStr + Copy>(key: &str, raw: Option<String>, default: T) -> T {
    match raw {
        Some(raw) => raw.parse().unwrap_or_else(|_| {
            tracing::warn!("{} has invalid value {:?}, using default", key, raw);
            default
        }),
        None => default,
    }
}

/// Masks a secret for logs: first 7 chars + "***" + last 4, or just "***"
/// when the secret is too short to reveal anything.
pub fn mask_token(token: &str) -> String {
    let chars: Vec<char> = token.chars().collect();
    if chars.len() <= 11 {
        return "***".to_string();
    }
    let head: String = chars[..7].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}***{}", head, tail)
}
