use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tokio::time::Instant;
use tracing::{debug, info};

use super::model::*;
use super::repo::*;

/// In-process session store. Sessions live until they go idle for longer
/// than `max_idle`; nothing survives a restart.
pub struct MemorySessionStore {
    sessions: Arc<RwLock<HashMap<SessionId, SessionData>>>,
    max_idle: Duration,
}

impl MemorySessionStore {
    pub fn new(max_idle: Duration) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            max_idle,
        }
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }

    pub fn start_background_tasks(self: Arc<Self>, sweep_interval: Duration) {
        let store = Arc::clone(&self);
        tokio::spawn(async move {
            store.expiry_loop(sweep_interval).await;
        });
    }

    async fn expiry_loop(&self, sweep_interval: Duration) {
        let mut interval = tokio::time::interval(sweep_interval);
        loop {
            interval.tick().await;
            let purged = self.purge_expired().await;
            if purged > 0 {
                info!("Expired {} idle session(s)", purged);
            }
        }
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn create(&self) -> SessionId {
        let id = SessionId::generate();
        let mut sessions = self.sessions.write().await;
        sessions.insert(id.clone(), SessionData::new());
        debug!(session = %id, "Created session");
        id
    }

    async fn touch(&self, id: &SessionId) -> bool {
        let now = Instant::now();
        let mut sessions = self.sessions.write().await;

        let expired = match sessions.get(id) {
            Some(data) => data.is_expired(now, self.max_idle),
            None => return false,
        };
        if expired {
            sessions.remove(id);
            debug!(session = %id, "Session expired");
            return false;
        }

        if let Some(data) = sessions.get_mut(id) {
            data.last_accessed = now;
        }
        true
    }

    async fn get_attribute(&self, id: &SessionId, name: &str) -> SessionResult<Option<serde_json::Value>> {
        let sessions = self.sessions.read().await;
        let data = sessions
            .get(id)
            .ok_or_else(|| SessionError::NotFound(id.clone()))?;
        Ok(data.attributes.get(name).cloned())
    }

    async fn set_attribute(&self, id: &SessionId, name: &str, value: serde_json::Value) -> SessionResult<()> {
        let mut sessions = self.sessions.write().await;
        let data = sessions
            .get_mut(id)
            .ok_or_else(|| SessionError::NotFound(id.clone()))?;
        data.attributes.insert(name.to_string(), value);
        Ok(())
    }

    async fn purge_expired(&self) -> usize {
        let now = Instant::now();

        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, data| !data.is_expired(now, self.max_idle));
        before - sessions.len()
    }
}
