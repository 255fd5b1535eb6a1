// ============================
// boathouse-backend-lib/src/storage/sqlite.rs
// ============================
//! SQLite-backed credential and session store.
//!
//! Every statement binds its inputs; no value is ever spliced into SQL text.
use std::str::FromStr;

use async_trait::async_trait;
use boathouse_common::Credential;
use chrono::{DateTime, Utc};
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    SqlitePool,
};
use tracing::{debug, info};

use super::{CredentialStore, SessionRecord, SessionStore, StoreError};

const SCHEMA: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS credentials (
        identifier    TEXT PRIMARY KEY NOT NULL,
        password_hash TEXT NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS sessions (
        token_digest TEXT PRIMARY KEY NOT NULL,
        subject      TEXT NOT NULL,
        created_at   INTEGER NOT NULL,
        expires_at   INTEGER
    )",
    "CREATE INDEX IF NOT EXISTS sessions_expires_at ON sessions (expires_at)",
];

type SessionRow = (String, String, i64, Option<i64>);

#[derive(Debug, Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Open (creating if needed) the database and bootstrap the schema
    pub async fn connect(database_url: &str) -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
        // each in-memory connection is its own database
        let max_connections = if database_url.contains(":memory:") { 1 } else { 5 };
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await?;

        let store = Self { pool };
        store.migrate().await?;
        info!(max_connections, "sqlite store ready");
        Ok(store)
    }

    async fn migrate(&self) -> Result<(), StoreError> {
        for statement in SCHEMA {
            sqlx::query(*statement).execute(&self.pool).await?;
        }
        Ok(())
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }

    pub async fn insert_credential(&self, credential: &Credential) -> Result<(), StoreError> {
        sqlx::query("INSERT INTO credentials (identifier, password_hash) VALUES (?, ?)")
            .bind(&credential.identifier)
            .bind(&credential.password_hash)
            .execute(&self.pool)
            .await
            .map_err(unique_as_duplicate)?;
        Ok(())
    }
}

fn unique_as_duplicate(err: sqlx::Error) -> StoreError {
    match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => StoreError::Duplicate,
        _ => StoreError::Database(err),
    }
}

fn to_timestamp(secs: i64) -> Result<DateTime<Utc>, StoreError> {
    DateTime::from_timestamp(secs, 0)
        .ok_or_else(|| StoreError::Unavailable(format!("timestamp out of range: {secs}")))
}

fn session_from_row(
    (token_digest, subject, created_at, expires_at): SessionRow,
) -> Result<SessionRecord, StoreError> {
    Ok(SessionRecord {
        token_digest,
        subject,
        created_at: to_timestamp(created_at)?,
        expires_at: expires_at.map(to_timestamp).transpose()?,
    })
}

#[async_trait]
impl CredentialStore for SqliteStore {
    async fn find_by_identifier(
        &self,
        identifier: &str,
    ) -> Result<Option<Credential>, StoreError> {
        let row: Option<(String, String)> = sqlx::query_as(
            "SELECT identifier, password_hash FROM credentials WHERE identifier = ?",
        )
        .bind(identifier)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|(identifier, password_hash)| Credential {
            identifier,
            password_hash,
        }))
    }
}

#[async_trait]
impl SessionStore for SqliteStore {
    async fn insert(&self, session: &SessionRecord) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO sessions (token_digest, subject, created_at, expires_at) \
             VALUES (?, ?, ?, ?)",
        )
        .bind(&session.token_digest)
        .bind(&session.subject)
        .bind(session.created_at.timestamp())
        .bind(session.expires_at.map(|t| t.timestamp()))
        .execute(&self.pool)
        .await
        .map_err(unique_as_duplicate)?;
        Ok(())
    }

    async fn find(&self, token_digest: &str) -> Result<Option<SessionRecord>, StoreError> {
        let row: Option<SessionRow> = sqlx::query_as(
            "SELECT token_digest, subject, created_at, expires_at \
             FROM sessions WHERE token_digest = ?",
        )
        .bind(token_digest)
        .fetch_optional(&self.pool)
        .await?;

        row.map(session_from_row).transpose()
    }

    async fn delete(&self, token_digest: &str) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM sessions WHERE token_digest = ?")
            .bind(token_digest)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn purge_expired(&self, now: DateTime<Utc>) -> Result<u64, StoreError> {
        let result = sqlx::query(
            "DELETE FROM sessions WHERE expires_at IS NOT NULL AND expires_at <= ?",
        )
        .bind(now.timestamp())
        .execute(&self.pool)
        .await?;
        debug!(purged = result.rows_affected(), "expired sessions purged");
        Ok(result.rows_affected())
    }
}
