//! Session workflow state storage.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};
use storytellers_core::clock::Clock;
use storytellers_core::error::GatewayError;
use storytellers_core::identity::SessionId;
use tokio::sync::RwLock;
use tracing::debug;

use crate::domain::state::WorkflowState;

/// Keyed storage for one `WorkflowState` per session.
///
/// Each call replaces or removes a session's state as a single unit.
#[async_trait]
pub trait WorkflowStateStore: Send + Sync {
    /// Loads a session's state; `None` if it never existed or expired.
    async fn load(&self, session: SessionId) -> Result<Option<WorkflowState>, GatewayError>;

    /// Replaces a session's state.
    async fn save(&self, session: SessionId, state: WorkflowState) -> Result<(), GatewayError>;

    /// Removes a session's state.
    async fn clear(&self, session: SessionId) -> Result<(), GatewayError>;
}

#[derive(Debug)]
struct Entry {
    state: WorkflowState,
    touched_at: DateTime<Utc>,
}

/// Process-local store that forgets sessions idle for longer than the TTL.
pub struct InMemoryWorkflowStore {
    entries: RwLock<HashMap<SessionId, Entry>>,
    ttl: TimeDelta,
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for InMemoryWorkflowStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryWorkflowStore")
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

impl InMemoryWorkflowStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new(ttl: TimeDelta, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            ttl,
            clock,
        }
    }

    fn expired(&self, entry: &Entry, now: DateTime<Utc>) -> bool {
        now - entry.touched_at > self.ttl
    }

    /// Drops every expired session and returns how many were dropped.
    pub async fn purge_expired(&self) -> usize {
        let now = self.clock.now();
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, entry| !self.expired(entry, now));
        before - entries.len()
    }

    /// Number of sessions currently holding state.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Returns `true` if no session holds state.
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[async_trait]
impl WorkflowStateStore for InMemoryWorkflowStore {
    async fn load(&self, session: SessionId) -> Result<Option<WorkflowState>, GatewayError> {
        let now = self.clock.now();
        let mut entries = self.entries.write().await;
        let Some(entry) = entries.get_mut(&session) else {
            return Ok(None);
        };
        if self.expired(entry, now) {
            debug!(%session, "workflow state expired");
            entries.remove(&session);
            return Ok(None);
        }
        entry.touched_at = now;
        Ok(Some(entry.state.clone()))
    }

    async fn save(&self, session: SessionId, state: WorkflowState) -> Result<(), GatewayError> {
        let touched_at = self.clock.now();
        self.entries
            .write()
            .await
            .insert(session, Entry { state, touched_at });
        Ok(())
    }

    async fn clear(&self, session: SessionId) -> Result<(), GatewayError> {
        self.entries.write().await.remove(&session);
        Ok(())
    }
}
