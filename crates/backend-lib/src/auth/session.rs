// ============================
// boathouse-backend-lib/src/auth/session.rs
// ============================
//! Session issuing, resolution and revocation.
//!
//! Nothing is cached in-process: every `resolve` is a fresh store round-trip,
//! and any doubt (missing row, expired row, store error) resolves to anonymous.
use std::{sync::Arc, time::Duration};

use boathouse_common::{SessionLifetime, PERSISTENT_SESSION_TTL};
use chrono::{DateTime, SubsecRound, TimeDelta, Utc};
use metrics::counter;
use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::token_generator::{generate_session_token, SessionToken, TokenError};
use crate::config::SessionSettings;
use crate::metrics::{SESSION_EXPIRED_PURGED, SESSION_ISSUED, SESSION_LOOKUP_ERROR, SESSION_REVOKED};
use crate::storage::{with_timeout, SessionRecord, SessionStore, StoreError};

/// Default bound on a single store call
pub const DEFAULT_STORE_TIMEOUT: Duration = Duration::from_secs(5);

/// Default interval between expired-session sweeps
pub const DEFAULT_CLEANUP_INTERVAL: Duration = Duration::from_secs(60 * 60);

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("failed to persist session: {0}")]
    Persist(#[source] StoreError),

    #[error("failed to revoke session: {0}")]
    Revoke(#[source] StoreError),

    #[error(transparent)]
    Token(#[from] TokenError),

    #[error("session lifetime out of range: {0:?}")]
    Lifetime(Duration),
}

/// Lifetime rules applied when a session is issued
#[derive(Debug, Clone, Copy)]
pub struct SessionPolicy {
    /// Server-side and cookie lifetime of "remember me" sessions
    pub persistent_ttl: Duration,
    /// Server-side lifetime of browser sessions; `None` keeps them until logout
    pub ephemeral_ttl: Option<Duration>,
    pub store_timeout: Duration,
}

impl Default for SessionPolicy {
    fn default() -> Self {
        Self {
            persistent_ttl: PERSISTENT_SESSION_TTL,
            ephemeral_ttl: None,
            store_timeout: DEFAULT_STORE_TIMEOUT,
        }
    }
}

impl From<&SessionSettings> for SessionPolicy {
    fn from(settings: &SessionSettings) -> Self {
        Self {
            persistent_ttl: Duration::from_secs(settings.persistent_ttl_secs),
            ephemeral_ttl: settings.ephemeral_ttl_secs.map(Duration::from_secs),
            store_timeout: Duration::from_millis(settings.store_timeout_ms),
        }
    }
}

/// A freshly minted session, handed back so the caller can set the cookie
#[derive(Debug, Clone)]
pub struct IssuedSession {
    pub token: SessionToken,
    pub subject: String,
    pub lifetime: SessionLifetime,
    pub expires_at: Option<DateTime<Utc>>,
    /// Cookie `Max-Age`; `None` for a browser-session cookie
    pub max_age: Option<Duration>,
}

/// Session manager for minting and checking session tokens
#[derive(Clone)]
pub struct SessionManager {
    store: Arc<dyn SessionStore>,
    policy: SessionPolicy,
}

impl SessionManager {
    pub fn new(store: Arc<dyn SessionStore>, policy: SessionPolicy) -> Self {
        Self { store, policy }
    }

    pub fn policy(&self) -> &SessionPolicy {
        &self.policy
    }

    /// Mint a token for `subject` and persist its binding.
    ///
    /// Fails rather than handing out a token the store never recorded.
    pub async fn issue(&self, subject: &str, persistent: bool) -> Result<IssuedSession, SessionError> {
        let token = generate_session_token()?;
        let lifetime = SessionLifetime::from_remember_me(persistent);
        let now = Utc::now().trunc_subsecs(0);

        let (ttl, max_age) = match lifetime {
            SessionLifetime::Persistent => {
                (Some(self.policy.persistent_ttl), Some(self.policy.persistent_ttl))
            },
            SessionLifetime::Browser => (self.policy.ephemeral_ttl, None),
        };
        let expires_at = ttl
            .map(|ttl| expiry_after(now, ttl).ok_or(SessionError::Lifetime(ttl)))
            .transpose()?;

        let record = SessionRecord {
            token_digest: token.digest(),
            subject: subject.to_owned(),
            created_at: now,
            expires_at,
        };
        with_timeout(self.policy.store_timeout, self.store.insert(&record))
            .await
            .map_err(SessionError::Persist)?;

        counter!(SESSION_ISSUED).increment(1);
        debug!(subject, persistent, "session issued");

        Ok(IssuedSession {
            token,
            subject: record.subject,
            lifetime,
            expires_at,
            max_age,
        })
    }

    /// Look up the subject bound to `token`. Fail-closed.
    pub async fn resolve(&self, token: &SessionToken) -> Option<String> {
        let lookup = with_timeout(self.policy.store_timeout, self.store.find(&token.digest())).await;
        match lookup {
            Ok(Some(record)) if record.is_expired_at(Utc::now()) => {
                debug!(subject = %record.subject, "session expired");
                None
            },
            Ok(Some(record)) => Some(record.subject),
            Ok(None) => None,
            Err(e) => {
                counter!(SESSION_LOOKUP_ERROR).increment(1);
                warn!(error = %e, "session lookup failed, treating request as anonymous");
                None
            },
        }
    }

    /// Delete the server-side binding for `token`. Idempotent.
    pub async fn revoke(&self, token: &SessionToken) -> Result<(), SessionError> {
        with_timeout(self.policy.store_timeout, self.store.delete(&token.digest()))
            .await
            .map_err(SessionError::Revoke)?;
        counter!(SESSION_REVOKED).increment(1);
        debug!("session revoked");
        Ok(())
    }

    /// Remove expired rows from the store
    pub async fn purge_expired(&self) -> Result<u64, StoreError> {
        let removed =
            with_timeout(self.policy.store_timeout, self.store.purge_expired(Utc::now())).await?;
        if removed > 0 {
            counter!(SESSION_EXPIRED_PURGED).increment(removed);
        }
        Ok(removed)
    }

    /// Spawn the task that periodically purges expired sessions
    pub fn spawn_cleanup(&self, interval: Duration) -> JoinHandle<()> {
        let manager = self.clone();
        tokio::spawn(async move {
            manager.cleanup_task(interval).await;
        })
    }

    async fn cleanup_task(&self, interval: Duration) {
        loop {
            tokio::time::sleep(interval).await;

            match self.purge_expired().await {
                Ok(0) => {},
                Ok(removed) => info!(removed, "purged expired sessions"),
                Err(e) => warn!(error = %e, "expired session sweep failed"),
            }
        }
    }
}

fn expiry_after(now: DateTime<Utc>, ttl: Duration) -> Option<DateTime<Utc>> {
    TimeDelta::from_std(ttl)
        .ok()
        .and_then(|delta| now.checked_add_signed(delta))
}
