//! Session isolation: one board and router per session id.
//!
//! Sessions are handed out as [`SharedSession`] handles. Holding the
//! session lock for the whole of a dispatch keeps hand-offs atomic with
//! respect to every other holder of the same handle.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::config::KanbanConfig;
use crate::error::{KanbanError, KanbanResult};
use crate::session::{
    context::{Session, SessionId},
    payload::SessionPayload,
};

/// A session behind its own lock.
pub type SharedSession = Arc<Mutex<Session>>;

/// Keeps sessions apart and bootstraps them on first use.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Return the session for `id`, bootstrapping it if it does not exist.
    /// Opening an existing session leaves it untouched.
    async fn open(&self, id: &SessionId) -> KanbanResult<SharedSession>;

    /// Like [`SessionStore::open`], but a new session is seeded from
    /// `payload`. The payload is ignored when the session already exists.
    async fn open_with(&self, id: &SessionId, payload: SessionPayload)
        -> KanbanResult<SharedSession>;

    /// Existing session only. Returns `KanbanError::SessionNotFound` if absent.
    async fn get(&self, id: &SessionId) -> KanbanResult<SharedSession>;

    /// Discard a session. Returns `KanbanError::SessionNotFound` if absent.
    async fn close(&self, id: &SessionId) -> KanbanResult<()>;

    /// Ids of all open sessions, sorted.
    async fn list(&self) -> KanbanResult<Vec<SessionId>>;
}

/// In-process session store backed by a `HashMap<SessionId, SharedSession>`.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    config: KanbanConfig,
    sessions: Mutex<HashMap<SessionId, SharedSession>>,
}

impl MemorySessionStore {
    pub fn new(config: KanbanConfig) -> Self {
        Self {
            config,
            sessions: Mutex::new(HashMap::new()),
        }
    }

    pub fn config(&self) -> &KanbanConfig {
        &self.config
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn open(&self, id: &SessionId) -> KanbanResult<SharedSession> {
        let mut sessions = self.sessions.lock().await;
        if let Some(existing) = sessions.get(id) {
            return Ok(Arc::clone(existing));
        }
        let session = Arc::new(Mutex::new(Session::new(id.clone(), &self.config)?));
        sessions.insert(id.clone(), Arc::clone(&session));
        Ok(session)
    }

    async fn open_with(
        &self,
        id: &SessionId,
        payload: SessionPayload,
    ) -> KanbanResult<SharedSession> {
        let mut sessions = self.sessions.lock().await;
        if let Some(existing) = sessions.get(id) {
            tracing::debug!(session_id = %id, "session exists, seed payload ignored");
            return Ok(Arc::clone(existing));
        }
        let session = Session::from_payload(id.clone(), payload, &self.config)?;
        let session = Arc::new(Mutex::new(session));
        sessions.insert(id.clone(), Arc::clone(&session));
        Ok(session)
    }

    async fn get(&self, id: &SessionId) -> KanbanResult<SharedSession> {
        let sessions = self.sessions.lock().await;
        sessions
            .get(id)
            .cloned()
            .ok_or_else(|| KanbanError::SessionNotFound(id.to_string()))
    }

    async fn close(&self, id: &SessionId) -> KanbanResult<()> {
        let mut sessions = self.sessions.lock().await;
        sessions
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| KanbanError::SessionNotFound(id.to_string()))
    }

    async fn list(&self) -> KanbanResult<Vec<SessionId>> {
        let sessions = self.sessions.lock().await;
        let mut ids: Vec<SessionId> = sessions.keys().cloned().collect();
        ids.sort();
        Ok(ids)
    }
}
