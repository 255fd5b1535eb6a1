// ============================
// boathouse-common/src/lib.rs
// ============================
//! Shared types for the boathouse authentication core.
use std::fmt;
use std::time::Duration;

/// Name of the cookie carrying the session token
pub const SESSION_COOKIE: &str = "sid";

/// Path the session cookie is scoped to
pub const SESSION_COOKIE_PATH: &str = "/";

/// Lifetime of a "remember me" session (365 days)
pub const PERSISTENT_SESSION_TTL: Duration = Duration::from_secs(365 * 24 * 60 * 60);

/// A stored login: unique identifier plus an opaque password hash.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    pub identifier: String,
    /// Self-describing PHC string, never the plaintext
    pub password_hash: String,
}

impl Credential {
    pub fn new(identifier: impl Into<String>, password_hash: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            password_hash: password_hash.into(),
        }
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("identifier", &self.identifier)
            .field("password_hash", &"<redacted>")
            .finish()
    }
}

/// How long the client should keep its session cookie.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionLifetime {
    /// "Remember me": the cookie carries a fixed Max-Age
    Persistent,
    /// Cookie is dropped when the browser session ends
    Browser,
}

impl SessionLifetime {
    pub fn from_remember_me(persistent: bool) -> Self {
        if persistent {
            Self::Persistent
        } else {
            Self::Browser
        }
    }

    pub fn is_persistent(self) -> bool {
        matches!(self, Self::Persistent)
    }
}

/// Per-request authentication decision. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AuthResult {
    #[default]
    Anonymous,
    Authenticated { subject: String },
}

impl AuthResult {
    pub fn authenticated(subject: impl Into<String>) -> Self {
        Self::Authenticated {
            subject: subject.into(),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated { .. })
    }

    /// Identifier of the signed-in subject, if any
    pub fn subject(&self) -> Option<&str> {
        match self {
            Self::Authenticated { subject } => Some(subject),
            Self::Anonymous => None,
        }
    }
}
