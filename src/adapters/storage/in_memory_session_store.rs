//! In-memory session store with per-key TTL.
//!
//! Expiry is lazy: an expired entry is dropped on the next read of its
//! key, and a `put` refreshes the deadline. Good enough for a single
//! process; swap the port implementation for anything shared.

use async_trait::async_trait;
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

use crate::domain::dialogue::ConversationSession;
use crate::domain::foundation::ConversationId;
use crate::ports::{SessionStore, SessionStoreError};

/// Default session TTL: thirty minutes of inactivity.
pub const DEFAULT_SESSION_TTL: Duration = Duration::from_secs(30 * 60);

struct Entry {
    session: ConversationSession,
    expires_at: Instant,
}

/// HashMap-backed [`SessionStore`].
pub struct InMemorySessionStore {
    entries: RwLock<HashMap<ConversationId, Entry>>,
    ttl: Duration,
}

impl Default for InMemorySessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemorySessionStore {
    /// Creates a store with the default TTL.
    pub fn new() -> Self {
        Self::with_ttl(DEFAULT_SESSION_TTL)
    }

    /// Creates a store with a custom TTL.
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    /// Number of live (possibly expired but not yet reaped) entries.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// True when no entries are held.
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn get(
        &self,
        id: ConversationId,
    ) -> Result<Option<ConversationSession>, SessionStoreError> {
        let mut entries = self.entries.write().await;
        match entries.get(&id) {
            Some(entry) if entry.expires_at > Instant::now() => {
                Ok(Some(entry.session.clone()))
            }
            Some(_) => {
                entries.remove(&id);
                Ok(None)
            }
            None => Ok(None),
        }
    }

    async fn put(&self, session: ConversationSession) -> Result<(), SessionStoreError> {
        let entry = Entry {
            expires_at: Instant::now() + self.ttl,
            session,
        };
        self.entries.write().await.insert(entry.session.id, entry);
        Ok(())
    }

    async fn delete(&self, id: ConversationId) -> Result<(), SessionStoreError> {
        self.entries.write().await.remove(&id);
        Ok(())
    }
}
