//! In-process session store

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};

use crate::domain::entities::{SessionData, SessionId};
use crate::domain::ports::SessionStore;
use crate::error::DomainError;

struct Entry {
    data: SessionData,
    last_seen: DateTime<Utc>,
}

/// Sessions kept in memory, dropped after `ttl` without a save
pub struct InMemorySessionStore {
    sessions: RwLock<HashMap<SessionId, Entry>>,
    ttl: Duration,
}

impl InMemorySessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    fn is_expired(&self, entry: &Entry, now: DateTime<Utc>) -> bool {
        now - entry.last_seen > self.ttl
    }

    /// Drop every expired session, returning how many were removed
    pub fn purge_expired(&self) -> usize {
        self.purge_expired_at(Utc::now())
    }

    fn purge_expired_at(&self, now: DateTime<Utc>) -> usize {
        let Ok(mut sessions) = self.sessions.write() else {
            tracing::error!("Session store lock poisoned, skipping purge");
            return 0;
        };
        let before = sessions.len();
        sessions.retain(|_, entry| now - entry.last_seen <= self.ttl);
        before - sessions.len()
    }

    fn load_at(&self, id: &SessionId, now: DateTime<Utc>) -> Result<SessionData, DomainError> {
        let sessions = self.sessions.read().map_err(lock_poisoned)?;
        Ok(sessions
            .get(id)
            .filter(|entry| !self.is_expired(entry, now))
            .map(|entry| entry.data.clone())
            .unwrap_or_default())
    }

    fn save_at(
        &self,
        id: &SessionId,
        data: SessionData,
        now: DateTime<Utc>,
    ) -> Result<(), DomainError> {
        let mut sessions = self.sessions.write().map_err(lock_poisoned)?;
        sessions.insert(
            id.clone(),
            Entry {
                data,
                last_seen: now,
            },
        );
        Ok(())
    }
}

fn lock_poisoned<T>(_: T) -> DomainError {
    DomainError::Internal("session store lock poisoned".to_string())
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn load(&self, id: &SessionId) -> Result<SessionData, DomainError> {
        self.load_at(id, Utc::now())
    }

    async fn save(&self, id: &SessionId, data: SessionData) -> Result<(), DomainError> {
        self.save_at(id, data, Utc::now())
    }

    async fn remove(&self, id: &SessionId) -> Result<(), DomainError> {
        let mut sessions = self.sessions.write().map_err(lock_poisoned)?;
        sessions.remove(id);
        Ok(())
    }
}
