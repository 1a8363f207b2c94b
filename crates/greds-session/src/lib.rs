//! # greds-session
//!
//! Session lifecycle management: live sessions in a concurrent map,
//! checkpoints persisted through the session store, and rehydration that
//! spins a new session up from a chosen checkpoint with enough context
//! to continue the conversation.

pub mod cleanup;
pub mod manager;

pub use cleanup::{cleanup_stale_sessions, DEFAULT_IDLE_TIMEOUT};
pub use manager::SessionManager;
