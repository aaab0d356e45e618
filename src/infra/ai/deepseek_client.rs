use crate::core::ai::{AiProvider, CompletionError, ConversationTurn};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://api.deepseek.com";

/// Client for DeepSeek's OpenAI-compatible chat completions endpoint.
pub struct DeepSeekClient {
    client: Client,
    api_key: String,
    base_url: String,
    system_prompt: Option<String>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Option<ResponseMessage>,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

impl DeepSeekClient {
    pub fn new(
        api_key: String,
        base_url: impl Into<String>,
        system_prompt: Option<String>,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            api_key,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            system_prompt,
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }

    fn build_request<'a>(&'a self, messages: &'a [ConversationTurn], model: &'a str) -> ChatRequest<'a> {
        let mut wire = Vec::with_capacity(messages.len() + 1);
        if let Some(prompt) = &self.system_prompt {
            wire.push(ChatMessage {
                role: "system",
                content: prompt,
            });
        }
        wire.extend(messages.iter().map(|turn| ChatMessage {
            role: turn.role.as_str(),
            content: &turn.content,
        }));

        ChatRequest {
            model,
            messages: wire,
        }
    }
}

/// Pulls the first choice's text out of a completion response body.
fn parse_completion(body: &str) -> Result<String, CompletionError> {
    let response: ChatResponse = serde_json::from_str(body)
        .map_err(|e| CompletionError::MalformedResponse(format!("invalid JSON: {}", e)))?;

    let content = response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message)
        .and_then(|message| message.content)
        .ok_or_else(|| CompletionError::MalformedResponse("no message content".to_string()))?;

    if content.trim().is_empty() {
        return Err(CompletionError::MalformedResponse(
            "empty message content".to_string(),
        ));
    }

    Ok(content)
}

#[async_trait]
impl AiProvider for DeepSeekClient {
    async fn chat_complete(
        &self,
        messages: &[ConversationTurn],
        model: &str,
    ) -> Result<String, CompletionError> {
        let payload = self.build_request(messages, model);

        let response = self
            .client
            .post(self.endpoint())
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&payload)
            .send()
            .await
            .map_err(|e| CompletionError::Transport(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| CompletionError::Transport(e.to_string()))?;

        if !status.is_success() {
            return Err(CompletionError::Api {
                status: status.as_u16(),
                body: text,
            });
        }

        parse_completion(&text)
    }
}
