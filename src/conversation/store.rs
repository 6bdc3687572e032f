//! In-memory session store.
//!
//! Sessions are created lazily on first message, live only in process memory,
//! and are removed only by an explicit clear. The store is an owned value
//! injected into the [`ConversationManager`](crate::conversation::manager),
//! not ambient global state, so the core can be exercised in tests without a
//! network in sight.
//!
//! Locking is two-level: a `parking_lot::Mutex` guards the map itself (held
//! only for lookup/insert/remove, never across an await), and each session
//! sits behind its own `tokio::sync::Mutex`. Holding the session lock across
//! the remote-model await serializes all operations for one user id while
//! leaving different user ids fully concurrent.

use crate::providers::ChatMessage;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

/// Per-user conversation state: the transcript handed to the remote model as
/// prior context, and the monotonically increasing message counter that
/// drives the fallback script stage.
#[derive(Debug, Default)]
pub struct Session {
    pub transcript: Vec<ChatMessage>,
    pub message_count: u32,
}

#[derive(Default)]
pub struct SessionStore {
    sessions: Mutex<HashMap<String, Arc<tokio::sync::Mutex<Session>>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch the session for `user_id`, creating an empty one if absent.
    pub fn get_or_create(&self, user_id: &str) -> Arc<tokio::sync::Mutex<Session>> {
        let mut sessions = self.sessions.lock();
        sessions
            .entry(user_id.to_string())
            .or_insert_with(|| Arc::new(tokio::sync::Mutex::new(Session::default())))
            .clone()
    }

    /// Drop the session for `user_id`. Absent key is a no-op.
    pub fn remove(&self, user_id: &str) {
        self.sessions.lock().remove(user_id);
    }

    pub fn len(&self) -> usize {
        self.sessions.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.lock().is_empty()
    }
}
