// ============================
// boathouse-backend-lib/src/auth/mod.rs
// ============================
//! Authentication module.
pub mod cookie;
pub mod password;
mod service;
mod service_impl;
pub mod session;
pub mod token_generator;

pub use password::{HashedPassword, HashingError, PasswordHasher, DEFAULT_WORK_FACTOR, MAX_PASSWORD_BYTES};
pub use service::{AuthError, AuthService};
pub use service_impl::DefaultAuth;
pub use session::{
    IssuedSession, SessionError, SessionManager, SessionPolicy, DEFAULT_CLEANUP_INTERVAL,
    DEFAULT_STORE_TIMEOUT,
};
pub use token_generator::{generate_session_token, SessionToken, TokenError};
