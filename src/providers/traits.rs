use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// One turn of conversation context. Roles follow the Gemini wire format:
/// `"user"` for inbound prompts, `"model"` for prior replies.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".into(),
            content: content.into(),
        }
    }

    pub fn model(content: impl Into<String>) -> Self {
        Self {
            role: "model".into(),
            content: content.into(),
        }
    }
}

/// A remote text-generation service. The outcome is always an explicit
/// `Result`: generated text on success, an error value for any transport,
/// auth, quota, or malformed-response failure. Callers decide what a failure
/// means; nothing here panics or retries.
#[async_trait]
pub trait Provider: Send + Sync {
    async fn chat(&self, message: &str, model: &str, temperature: f64) -> anyhow::Result<String> {
        let messages = [ChatMessage::user(message)];
        self.chat_with_history(&messages, model, temperature).await
    }

    async fn chat_with_history(
        &self,
        messages: &[ChatMessage],
        model: &str,
        temperature: f64,
    ) -> anyhow::Result<String>;
}
