// Conversation memory shared by every history-enabled exchange.
//
// Two logs are kept:
// - a global log of every committed exchange, across all users
// - one log per user, replaced wholesale on each of their exchanges
//
// The context for a request is the tail of (global ++ user) capped at
// HISTORY_WINDOW turns, followed by the new prompt.

use super::models::{ConversationTurn, Role};
use dashmap::DashMap;
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard, RwLock};

/// Number of prior turns handed to the model.
pub const HISTORY_WINDOW: usize = 10;

/// Default cap on stored global turns.
pub const DEFAULT_GLOBAL_RETENTION: usize = HISTORY_WINDOW * 50;

pub struct MemoryStore {
    global: RwLock<VecDeque<ConversationTurn>>,
    users: DashMap<u64, Vec<ConversationTurn>>,
    /// One async mutex per user so a user's exchanges run one after another.
    user_locks: DashMap<u64, Arc<Mutex<()>>>,
    retention: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::with_retention(DEFAULT_GLOBAL_RETENTION)
    }

    /// Creates a store that keeps at most `retention` global turns.
    /// Values below the history window are raised to it.
    pub fn with_retention(retention: usize) -> Self {
        Self {
            global: RwLock::new(VecDeque::new()),
            users: DashMap::new(),
            user_locks: DashMap::new(),
            retention: retention.max(HISTORY_WINDOW),
        }
    }

    /// Waits for any in-flight exchange of this user and holds their slot
    /// until the returned guard is dropped.
    pub async fn lock_user(&self, user_id: u64) -> OwnedMutexGuard<()> {
        let lock = self
            .user_locks
            .entry(user_id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        lock.lock_owned().await
    }

    /// Builds the message list for a completion request.
    ///
    /// Without history this is just the prompt. With history it is the last
    /// `HISTORY_WINDOW` turns of the global log followed by the user's log,
    /// then the prompt.
    pub async fn build_context(
        &self,
        user_id: u64,
        prompt: &str,
        use_history: bool,
    ) -> Vec<ConversationTurn> {
        let mut context = Vec::with_capacity(HISTORY_WINDOW + 1);

        if use_history {
            let user_log = self
                .users
                .get(&user_id)
                .map(|entry| entry.value().clone())
                .unwrap_or_default();

            // Only as many global turns as the user log leaves room for.
            let from_global = HISTORY_WINDOW.saturating_sub(user_log.len());
            if from_global > 0 {
                let global = self.global.read().await;
                let skip = global.len().saturating_sub(from_global);
                context.extend(global.iter().skip(skip).cloned());
            }

            let skip = user_log.len().saturating_sub(HISTORY_WINDOW);
            context.extend(user_log.into_iter().skip(skip));
        }

        context.push(ConversationTurn::user(prompt));
        context
    }

    /// Records a successful exchange.
    ///
    /// The user's log becomes `context` plus the reply. The prompt (the last
    /// user turn of `context`) and the reply are appended to the global log.
    pub async fn commit(
        &self,
        user_id: u64,
        context: Vec<ConversationTurn>,
        reply: &str,
        use_history: bool,
    ) {
        if !use_history {
            return;
        }

        let prompt = context
            .iter()
            .rev()
            .find(|turn| turn.role == Role::User)
            .cloned();
        let reply_turn = ConversationTurn::assistant(reply);

        let mut user_log = context;
        user_log.push(reply_turn.clone());
        self.users.insert(user_id, user_log);

        let mut global = self.global.write().await;
        if let Some(prompt) = prompt {
            global.push_back(prompt);
        }
        global.push_back(reply_turn);
        while global.len() > self.retention {
            global.pop_front();
        }
    }

    /// Snapshot of the global log, oldest first.
    #[allow(dead_code)]
    pub async fn global_log(&self) -> Vec<ConversationTurn> {
        self.global.read().await.iter().cloned().collect()
    }

    /// Snapshot of a user's log, if they have one.
    #[allow(dead_code)]
    pub fn user_log(&self, user_id: u64) -> Option<Vec<ConversationTurn>> {
        self.users.get(&user_id).map(|entry| entry.value().clone())
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}
