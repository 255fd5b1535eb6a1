// =============
// boathouse-backend-lib/src/auth/service.rs
// =============
//! This module defines the `AuthService` trait consumed by route handlers
use async_trait::async_trait;
use boathouse_common::AuthResult;
use thiserror::Error;

use super::{HashingError, IssuedSession, SessionError, SessionToken};
use crate::storage::StoreError;

/// Caller-facing authentication failures
#[derive(Debug, Error)]
pub enum AuthError {
    /// Unknown identifier or wrong password; the two are never distinguished
    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("storage failure: {0}")]
    StorageFailure(String),

    #[error("password hashing failure: {0}")]
    Hashing(#[from] HashingError),
}

impl From<StoreError> for AuthError {
    fn from(err: StoreError) -> Self {
        AuthError::StorageFailure(err.to_string())
    }
}

impl From<SessionError> for AuthError {
    fn from(err: SessionError) -> Self {
        AuthError::StorageFailure(err.to_string())
    }
}

#[async_trait]
pub trait AuthService: Send + Sync {
    /// Verify credentials and open a session
    async fn login(
        &self,
        identifier: &str,
        password: &str,
        persistent: bool,
    ) -> Result<IssuedSession, AuthError>;

    /// Revoke the session behind `token`; revoking an unknown token succeeds
    async fn logout(&self, token: &SessionToken) -> Result<(), AuthError>;

    /// The gate every protected handler runs
    async fn check(&self, token: Option<&SessionToken>) -> AuthResult;
}
