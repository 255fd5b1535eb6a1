// ============================
// boathouse-backend-lib/src/storage/mod.rs
// ============================
//! Credential and session store contracts plus their backends.
//!
//! Both stores are owned by the persistence layer; the auth core only reads
//! credentials and inserts, finds and deletes session rows.
pub mod memory;
pub mod sqlite;

use std::{future::Future, sync::Arc, time::Duration};

use async_trait::async_trait;
use boathouse_common::Credential;
use chrono::{DateTime, Utc};
use thiserror::Error;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

/// `database_url` value selecting the in-process store
pub const MEMORY_URL: &str = "memory:";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("store operation timed out after {0:?}")]
    Timeout(Duration),

    #[error("duplicate key")]
    Duplicate,

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// A persisted session binding, keyed by the digest of its token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionRecord {
    pub token_digest: String,
    pub subject: String,
    pub created_at: DateTime<Utc>,
    /// `None` means the row lives until revoked
    pub expires_at: Option<DateTime<Utc>>,
}

impl SessionRecord {
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|expiry| expiry <= now)
    }
}

/// Read-only credential lookup
#[async_trait]
pub trait CredentialStore: Send + Sync {
    async fn find_by_identifier(&self, identifier: &str)
        -> Result<Option<Credential>, StoreError>;
}

/// Token-digest to subject bindings
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Insert a new binding; a single atomic write
    async fn insert(&self, session: &SessionRecord) -> Result<(), StoreError>;

    async fn find(&self, token_digest: &str) -> Result<Option<SessionRecord>, StoreError>;

    /// Delete a binding; deleting an absent row is not an error
    async fn delete(&self, token_digest: &str) -> Result<(), StoreError>;

    /// Remove every row that expired at or before `now`, returning the count
    async fn purge_expired(&self, now: DateTime<Utc>) -> Result<u64, StoreError>;
}

/// Bound a store call so a stalled backend surfaces as an error
pub async fn with_timeout<T, F>(limit: Duration, fut: F) -> Result<T, StoreError>
where
    F: Future<Output = Result<T, StoreError>>,
{
    tokio::time::timeout(limit, fut)
        .await
        .map_err(|_| StoreError::Timeout(limit))?
}

/// Backend selected by `database_url`
#[derive(Clone)]
pub enum Store {
    Memory(MemoryStore),
    Sqlite(SqliteStore),
}

impl Store {
    /// `memory:` selects the in-process store, anything else is a SQLite URL
    pub async fn connect(database_url: &str) -> Result<Self, StoreError> {
        if database_url == MEMORY_URL {
            return Ok(Self::Memory(MemoryStore::new()));
        }
        Ok(Self::Sqlite(SqliteStore::connect(database_url).await?))
    }

    pub fn credentials(&self) -> Arc<dyn CredentialStore> {
        match self {
            Self::Memory(store) => Arc::new(store.clone()),
            Self::Sqlite(store) => Arc::new(store.clone()),
        }
    }

    pub fn sessions(&self) -> Arc<dyn SessionStore> {
        match self {
            Self::Memory(store) => Arc::new(store.clone()),
            Self::Sqlite(store) => Arc::new(store.clone()),
        }
    }

    /// Close pooled connections; the in-memory backend has nothing to release
    pub async fn close(&self) {
        if let Self::Sqlite(store) = self {
            store.close().await;
        }
    }

    /// Operator path for seeding logins; not part of the auth core
    pub async fn insert_credential(&self, credential: &Credential) -> Result<(), StoreError> {
        match self {
            Self::Memory(store) => store.insert_credential(credential.clone()),
            Self::Sqlite(store) => store.insert_credential(credential).await,
        }
    }
}
