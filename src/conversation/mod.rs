pub mod fallback;
pub mod manager;
pub mod store;

pub use fallback::fallback_reply;
pub use manager::{ChatOutcome, ConversationManager, DEFAULT_USER_ID};
pub use store::{Session, SessionStore};
