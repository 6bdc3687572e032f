//! The conversation core: per-user transcript + message counter, prompt
//! composition, the remote-model call, and the fallback substitution that
//! keeps the five-stage report flow advancing when the model is unavailable.

use crate::conversation::fallback::fallback_reply;
use crate::conversation::store::SessionStore;
use crate::health;
use crate::prompt;
use crate::providers::{ChatMessage, Provider};
use std::sync::Arc;

/// User identifier applied by callers when the request names none.
pub const DEFAULT_USER_ID: &str = "default_user";

/// Outcome of one inbound message. Always a success from the caller's point
/// of view: remote failures have already been converted to scripted text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatOutcome {
    pub response: String,
    pub user_id: String,
    pub message_count: u32,
    /// True whenever the scripted reply was substituted — for remote-call
    /// failures and for empty model output alike.
    pub used_fallback: bool,
}

pub struct ConversationManager {
    store: SessionStore,
    provider: Arc<dyn Provider>,
    model: String,
    temperature: f64,
}

impl ConversationManager {
    pub fn new(provider: Arc<dyn Provider>, model: impl Into<String>, temperature: f64) -> Self {
        Self {
            store: SessionStore::new(),
            provider,
            model: model.into(),
            temperature,
        }
    }

    /// Relay one user message, returning the model's reply or the scripted
    /// fallback. Remote failures of any kind are absorbed here; this method
    /// never surfaces an error for them.
    ///
    /// The session lock is held across the provider await, so concurrent
    /// requests for the same user id are serialized; different user ids
    /// proceed independently.
    pub async fn handle_message(&self, user_id: &str, text: &str) -> ChatOutcome {
        let session = self.store.get_or_create(user_id);
        let mut session = session.lock().await;

        session.message_count += 1;
        let message_count = session.message_count;

        let composed = prompt::compose_turn(text, message_count);
        let mut context: Vec<ChatMessage> = session.transcript.clone();
        context.push(ChatMessage::user(&composed));

        let (response, used_fallback) = match self
            .provider
            .chat_with_history(&context, &self.model, self.temperature)
            .await
        {
            Ok(reply) if !reply.trim().is_empty() => {
                health::mark_component_ok("provider");
                let reply = reply.trim().to_string();
                // Only a successful exchange extends the transcript.
                session.transcript.push(ChatMessage::user(composed));
                session.transcript.push(ChatMessage::model(&reply));
                (reply, false)
            }
            Ok(_) => {
                tracing::warn!(user_id, message_count, "model returned empty output, using fallback");
                (fallback_reply(message_count).to_string(), true)
            }
            Err(e) => {
                tracing::warn!(user_id, message_count, error = %e, "model call failed, using fallback");
                health::mark_component_error("provider", &e);
                (fallback_reply(message_count).to_string(), true)
            }
        };

        ChatOutcome {
            response,
            user_id: user_id.to_string(),
            message_count,
            used_fallback,
        }
    }

    /// Forget everything about `user_id`. Idempotent.
    pub fn clear_session(&self, user_id: &str) {
        self.store.remove(user_id);
    }

    /// Number of live sessions (diagnostics only).
    pub fn session_count(&self) -> usize {
        self.store.len()
    }
}
