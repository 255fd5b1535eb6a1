//! Fakes shared by unit tests.
use std::time::Duration;

use async_trait::async_trait;
use boathouse_common::Credential;
use chrono::{DateTime, Utc};

use crate::auth::PasswordHasher;
use crate::storage::{CredentialStore, MemoryStore, SessionRecord, SessionStore, StoreError};

/// Cheap work factor so tests don't spend seconds in scrypt
pub fn test_hasher() -> PasswordHasher {
    PasswordHasher::new(4).unwrap()
}

pub fn seeded_store(identifier: &str, password: &str) -> MemoryStore {
    let store = MemoryStore::new();
    let hash = test_hasher().hash(password).unwrap();
    store
        .insert_credential(Credential::new(identifier, hash.into_string()))
        .unwrap();
    store
}

/// Every call fails as if the database were unreachable
pub struct FailingStore;

fn unreachable_db() -> StoreError {
    StoreError::Unavailable("connection refused".to_string())
}

#[async_trait]
impl CredentialStore for FailingStore {
    async fn find_by_identifier(&self, _: &str) -> Result<Option<Credential>, StoreError> {
        Err(unreachable_db())
    }
}

#[async_trait]
impl SessionStore for FailingStore {
    async fn insert(&self, _: &SessionRecord) -> Result<(), StoreError> {
        Err(unreachable_db())
    }

    async fn find(&self, _: &str) -> Result<Option<SessionRecord>, StoreError> {
        Err(unreachable_db())
    }

    async fn delete(&self, _: &str) -> Result<(), StoreError> {
        Err(unreachable_db())
    }

    async fn purge_expired(&self, _: DateTime<Utc>) -> Result<u64, StoreError> {
        Err(unreachable_db())
    }
}

/// Every call hangs far past any test timeout
pub struct StallingStore;

async fn stall<T>() -> Result<T, StoreError> {
    tokio::time::sleep(Duration::from_secs(60)).await;
    Err(unreachable_db())
}

#[async_trait]
impl SessionStore for StallingStore {
    async fn insert(&self, _: &SessionRecord) -> Result<(), StoreError> {
        stall().await
    }

    async fn find(&self, _: &str) -> Result<Option<SessionRecord>, StoreError> {
        stall().await
    }

    async fn delete(&self, _: &str) -> Result<(), StoreError> {
        stall().await
    }

    async fn purge_expired(&self, _: DateTime<Utc>) -> Result<u64, StoreError> {
        stall().await
    }
}
