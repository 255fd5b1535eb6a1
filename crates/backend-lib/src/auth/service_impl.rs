use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use boathouse_common::AuthResult;
use metrics::counter;
use tracing::{error, info};
use zeroize::Zeroizing;

use super::{
    AuthError, AuthService, HashedPassword, HashingError, IssuedSession, PasswordHasher,
    SessionManager, SessionToken,
};
use crate::metrics::{LOGIN_FAILURE, LOGIN_SUCCESS};
use crate::storage::{with_timeout, CredentialStore};

/// Verified against when the identifier is unknown, so both rejection paths
/// cost one hash verification.
const DUMMY_PASSWORD: &str = "boathouse-timing-equaliser";

pub struct DefaultAuth {
    credentials: Arc<dyn CredentialStore>,
    sessions: SessionManager,
    hasher: PasswordHasher,
    dummy_hash: HashedPassword,
}

impl DefaultAuth {
    pub fn new(
        credentials: Arc<dyn CredentialStore>,
        sessions: SessionManager,
        hasher: PasswordHasher,
    ) -> Result<Self, HashingError> {
        let dummy_hash = hasher.hash(DUMMY_PASSWORD)?;
        Ok(Self {
            credentials,
            sessions,
            hasher,
            dummy_hash,
        })
    }

    fn store_timeout(&self) -> Duration {
        self.sessions.policy().store_timeout
    }

    /// Run the deliberately slow verification off the async workers
    async fn verify_blocking(
        &self,
        password: &str,
        hashed: HashedPassword,
    ) -> Result<bool, HashingError> {
        let hasher = self.hasher.clone();
        let password = Zeroizing::new(password.to_owned());
        tokio::task::spawn_blocking(move || hasher.verify(&password, &hashed))
            .await
            .map_err(|e| HashingError::Primitive(e.to_string()))?
    }
}

#[async_trait]
impl AuthService for DefaultAuth {
    async fn login(
        &self,
        identifier: &str,
        password: &str,
        persistent: bool,
    ) -> Result<IssuedSession, AuthError> {
        let credential = with_timeout(
            self.store_timeout(),
            self.credentials.find_by_identifier(identifier),
        )
        .await
        .map_err(|e| {
            error!(error = %e, "credential lookup failed");
            AuthError::from(e)
        })?;

        let (subject, hashed) = match credential {
            Some(c) => (Some(c.identifier), HashedPassword::from(c.password_hash)),
            None => (None, self.dummy_hash.clone()),
        };

        let verified = self.verify_blocking(password, hashed).await.map_err(|e| {
            error!(error = %e, "stored password hash could not be verified");
            AuthError::from(e)
        })?;

        let subject = match subject {
            Some(subject) if verified => subject,
            _ => {
                counter!(LOGIN_FAILURE).increment(1);
                info!(identifier, "login rejected");
                return Err(AuthError::InvalidCredentials);
            },
        };

        let issued = self.sessions.issue(&subject, persistent).await.map_err(|e| {
            error!(error = %e, "session could not be persisted");
            AuthError::from(e)
        })?;

        counter!(LOGIN_SUCCESS).increment(1);
        info!(subject = %issued.subject, persistent, "login succeeded");
        Ok(issued)
    }

    async fn logout(&self, token: &SessionToken) -> Result<(), AuthError> {
        self.sessions.revoke(token).await.map_err(|e| {
            error!(error = %e, "session revocation failed");
            AuthError::from(e)
        })
    }

    async fn check(&self, token: Option<&SessionToken>) -> AuthResult {
        let Some(token) = token else {
            return AuthResult::Anonymous;
        };
        match self.sessions.resolve(token).await {
            Some(subject) => AuthResult::Authenticated { subject },
            None => AuthResult::Anonymous,
        }
    }
}
