//! Session store port trait

use async_trait::async_trait;

use crate::domain::entities::{SessionData, SessionId};
use crate::error::DomainError;

/// Per-visitor state kept between requests
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Load a session; unknown or expired sessions come back empty
    async fn load(&self, id: &SessionId) -> Result<SessionData, DomainError>;

    /// Replace the stored data and refresh the session's idle timer
    async fn save(&self, id: &SessionId, data: SessionData) -> Result<(), DomainError>;

    /// Forget a session
    async fn remove(&self, id: &SessionId) -> Result<(), DomainError>;
}
