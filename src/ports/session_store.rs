//! Session Store Port - keyed conversation-state storage.
//!
//! The store owns session lifecycle: implementations expire entries after
//! a per-key TTL, so abandoned conversations do not accumulate for the
//! life of the process.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::dialogue::ConversationSession;
use crate::domain::foundation::ConversationId;

/// Errors from the session store.
#[derive(Debug, Error)]
pub enum SessionStoreError {
    #[error("Failed to serialize session: {0}")]
    Serialization(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

/// Port for persisting and loading conversation sessions.
///
/// Keyed by conversation id; each key has a single legitimate mutator at
/// a time (the handler processing that conversation's current turn).
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Loads a session, or `None` if absent or expired.
    async fn get(
        &self,
        id: ConversationId,
    ) -> Result<Option<ConversationSession>, SessionStoreError>;

    /// Stores a session, refreshing its TTL.
    async fn put(&self, session: ConversationSession) -> Result<(), SessionStoreError>;

    /// Removes a session. Removing an absent session is not an error.
    async fn delete(&self, id: ConversationId) -> Result<(), SessionStoreError>;
}
