// ============================
// boathouse-backend-lib/src/lib.rs
// ============================
//! Session authentication core for the boathouse web application.

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod router;
pub mod storage;
pub mod views;

#[cfg(test)]
mod test_support;

use std::sync::Arc;

use crate::auth::{AuthService, DefaultAuth, HashingError, PasswordHasher, SessionManager, SessionPolicy};
use crate::config::Settings;
use crate::storage::{CredentialStore, SessionStore};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    /// Authentication service
    pub auth: Arc<dyn AuthService>,
    /// Session manager, kept for the expiry sweep
    pub sessions: SessionManager,
    /// Settings, immutable after startup
    pub settings: Arc<Settings>,
}

impl AppState {
    /// Create a new application state over the given stores
    pub fn new(
        credentials: Arc<dyn CredentialStore>,
        session_store: Arc<dyn SessionStore>,
        settings: Settings,
    ) -> Result<Self, HashingError> {
        let hasher = PasswordHasher::new(settings.password.work_factor)?;
        let sessions = SessionManager::new(session_store, SessionPolicy::from(&settings.session));
        let auth = Arc::new(DefaultAuth::new(credentials, sessions.clone(), hasher)?);

        Ok(Self {
            auth,
            sessions,
            settings: Arc::new(settings),
        })
    }
}
