use async_trait::async_trait;

use super::model::*;

/// Server-side key-value storage scoped to one client session.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn create(&self) -> SessionId;
    /// Returns false if the session is unknown or has gone idle for too long.
    /// Refreshes the idle timer otherwise.
    async fn touch(&self, id: &SessionId) -> bool;
    async fn get_attribute(&self, id: &SessionId, name: &str) -> SessionResult<Option<serde_json::Value>>;
    async fn set_attribute(&self, id: &SessionId, name: &str, value: serde_json::Value) -> SessionResult<()>;
    /// Drops every idle session, returning how many were dropped.
    async fn purge_expired(&self) -> usize;
}
