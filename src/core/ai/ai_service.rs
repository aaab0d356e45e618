use super::memory::MemoryStore;
use super::models::ConversationTurn;
use async_trait::async_trait;
use std::sync::Arc;

/// Reply used when the upstream answer could not be decoded.
pub const MALFORMED_REPLY: &str =
    "La respuesta de DeepSeek fue incompleta o malformada. Inténtalo nuevamente.";

/// Reply used for every other completion failure.
pub const FAILURE_REPLY: &str = "Hubo un error procesando tu solicitud. Inténtalo de nuevo.";

#[derive(Debug, thiserror::Error)]
pub enum CompletionError {
    #[error("Request to completion API failed: {0}")]
    Transport(String),
    #[error("Completion API error: {status} - {body}")]
    Api { status: u16, body: String },
    #[error("Malformed completion response: {0}")]
    MalformedResponse(String),
}

impl CompletionError {
    /// Fixed text shown to the user for this failure.
    pub fn user_message(&self) -> &'static str {
        match self {
            CompletionError::MalformedResponse(_) => MALFORMED_REPLY,
            _ => FAILURE_REPLY,
        }
    }
}

#[async_trait]
pub trait AiProvider: Send + Sync {
    /// Sends the conversation to the model and returns the generated reply.
    async fn chat_complete(
        &self,
        messages: &[ConversationTurn],
        model: &str,
    ) -> Result<String, CompletionError>;
}

pub struct AiService<P: AiProvider> {
    provider: P,
    memory: Arc<MemoryStore>,
}

impl<P: AiProvider> AiService<P> {
    pub fn new(provider: P, memory: Arc<MemoryStore>) -> Self {
        Self { provider, memory }
    }

    #[allow(dead_code)]
    pub fn provider(&self) -> &P {
        &self.provider
    }

    #[allow(dead_code)]
    pub fn memory(&self) -> &MemoryStore {
        &self.memory
    }

    /// Runs one exchange and always produces text for the user.
    ///
    /// With `use_history` the user's previous turns are sent along and the
    /// exchange is remembered once it succeeds. Failures are logged, answered
    /// with a fixed fallback, and leave memory untouched.
    pub async fn respond(&self, user_id: u64, prompt: &str, model: &str, use_history: bool) -> String {
        // Held until commit so a user's concurrent messages cannot overwrite each other.
        let _user_guard = if use_history {
            Some(self.memory.lock_user(user_id).await)
        } else {
            None
        };

        let context = self.memory.build_context(user_id, prompt, use_history).await;
        tracing::debug!(
            user_id,
            model,
            use_history,
            turns = context.len(),
            "Requesting completion"
        );

        match self.provider.chat_complete(&context, model).await {
            Ok(reply) => {
                tracing::info!(user_id, model, reply_chars = reply.len(), "Completion received");
                self.memory.commit(user_id, context, &reply, use_history).await;
                reply
            }
            Err(e) => {
                tracing::error!(user_id, model, "Completion failed: {}", e);
                e.user_message().to_string()
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Provider that replays scripted results and records what it was sent.
    pub(crate) struct MockProvider {
        replies: Mutex<Vec<Result<String, CompletionError>>>,
        pub calls: Mutex<Vec<(Vec<ConversationTurn>, String)>>,
    }

    impl MockProvider {
        pub(crate) fn new(replies: Vec<Result<String, CompletionError>>) -> Self {
            Self {
                replies: Mutex::new(replies),
                calls: Mutex::new(Vec::new()),
            }
        }

        pub(crate) fn replying(reply: &str) -> Self {
            Self::new(vec![Ok(reply.to_string())])
        }

        pub(crate) fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl AiProvider for MockProvider {
        async fn chat_complete(
            &self,
            messages: &[ConversationTurn],
            model: &str,
        ) -> Result<String, CompletionError> {
            self.calls
                .lock()
                .unwrap()
                .push((messages.to_vec(), model.to_string()));
            let mut replies = self.replies.lock().unwrap();
            if replies.is_empty() {
                Ok("default reply".to_string())
            } else {
                replies.remove(0)
            }
        }
    }

    fn service(provider: MockProvider) -> AiService<MockProvider> {
        AiService::new(provider, Arc::new(MemoryStore::new()))
    }

    #[tokio::test]
    async fn test_respond_with_history_commits() {
        let service = service(MockProvider::replying("¡Hola!"));

        let reply = service.respond(1, "hola", "deepseek-chat", true).await;
        assert_eq!(reply, "¡Hola!");

        let global = service.memory().global_log().await;
        assert_eq!(
            global,
            vec![
                ConversationTurn::user("hola"),
                ConversationTurn::assistant("¡Hola!")
            ]
        );
        assert_eq!(service.memory().user_log(1).unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_respond_without_history_sends_only_prompt() {
        let service = service(MockProvider::new(vec![
            Ok("first".to_string()),
            Ok("second".to_string()),
        ]));
        service.respond(1, "remember me", "deepseek-chat", true).await;

        let reply = service.respond(1, "think", "deepseek-reasoner", false).await;
        assert_eq!(reply, "second");

        let calls = service.provider.calls.lock().unwrap();
        assert_eq!(calls[1].0, vec![ConversationTurn::user("think")]);
        assert_eq!(calls[1].1, "deepseek-reasoner");
        drop(calls);

        // The stateless exchange was not remembered.
        assert_eq!(service.memory().global_log().await.len(), 2);
    }

    #[tokio::test]
    async fn test_history_is_sent_on_next_exchange() {
        let service = service(MockProvider::new(vec![
            Ok("uno".to_string()),
            Ok("dos".to_string()),
        ]));
        service.respond(3, "a", "deepseek-chat", true).await;
        service.respond(3, "b", "deepseek-chat", true).await;

        let calls = service.provider.calls.lock().unwrap();
        let second = &calls[1].0;
        assert_eq!(second.last(), Some(&ConversationTurn::user("b")));
        assert!(second.contains(&ConversationTurn::assistant("uno")));
    }

    #[tokio::test]
    async fn test_malformed_response_uses_malformed_fallback() {
        let service = service(MockProvider::new(vec![Err(
            CompletionError::MalformedResponse("no choices".to_string()),
        )]));

        let reply = service.respond(1, "hola", "deepseek-chat", true).await;
        assert_eq!(reply, MALFORMED_REPLY);
        assert!(service.memory().global_log().await.is_empty());
        assert!(service.memory().user_log(1).is_none());
    }

    #[tokio::test]
    async fn test_other_failures_use_generic_fallback() {
        let service = service(MockProvider::new(vec![
            Err(CompletionError::Transport("connection reset".to_string())),
            Err(CompletionError::Api {
                status: 401,
                body: "unauthorized".to_string(),
            }),
        ]));

        assert_eq!(service.respond(1, "a", "m", true).await, FAILURE_REPLY);
        assert_eq!(service.respond(1, "b", "m", false).await, FAILURE_REPLY);
        assert!(service.memory().global_log().await.is_empty());
    }
}
