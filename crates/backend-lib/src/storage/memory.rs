// ============================
// boathouse-backend-lib/src/storage/memory.rs
// ============================
//! In-process store backed by concurrent maps.
use std::sync::Arc;

use async_trait::async_trait;
use boathouse_common::Credential;
use chrono::{DateTime, Utc};
use dashmap::{mapref::entry::Entry, DashMap};

use super::{CredentialStore, SessionRecord, SessionStore, StoreError};

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    credentials: Arc<DashMap<String, Credential>>,
    sessions: Arc<DashMap<String, SessionRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a login; identifiers are unique
    pub fn insert_credential(&self, credential: Credential) -> Result<(), StoreError> {
        match self.credentials.entry(credential.identifier.clone()) {
            Entry::Occupied(_) => Err(StoreError::Duplicate),
            Entry::Vacant(slot) => {
                slot.insert(credential);
                Ok(())
            },
        }
    }

    /// Number of live session rows
    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }
}

#[async_trait]
impl CredentialStore for MemoryStore {
    async fn find_by_identifier(
        &self,
        identifier: &str,
    ) -> Result<Option<Credential>, StoreError> {
        Ok(self.credentials.get(identifier).map(|c| c.clone()))
    }
}

#[async_trait]
impl SessionStore for MemoryStore {
    async fn insert(&self, session: &SessionRecord) -> Result<(), StoreError> {
        match self.sessions.entry(session.token_digest.clone()) {
            Entry::Occupied(_) => Err(StoreError::Duplicate),
            Entry::Vacant(slot) => {
                slot.insert(session.clone());
                Ok(())
            },
        }
    }

    async fn find(&self, token_digest: &str) -> Result<Option<SessionRecord>, StoreError> {
        Ok(self.sessions.get(token_digest).map(|s| s.clone()))
    }

    async fn delete(&self, token_digest: &str) -> Result<(), StoreError> {
        self.sessions.remove(token_digest);
        Ok(())
    }

    async fn purge_expired(&self, now: DateTime<Utc>) -> Result<u64, StoreError> {
        let before = self.sessions.len();
        self.sessions.retain(|_, session| !session.is_expired_at(now));
        Ok(before.saturating_sub(self.sessions.len()) as u64)
    }
}
