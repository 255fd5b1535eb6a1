// ============================
// boathouse-backend-lib/src/auth/token_generator.rs
// ============================
/** Secure session token generation
Tokens are drawn from the OS entropy source and never derived from counters
or timestamps. Only the SHA-256 digest of a token is ever written to the
session store. */
use std::fmt;

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use rand::{rngs::OsRng, TryRngCore};
use sha2::{Digest, Sha256};
use thiserror::Error;

/// Token size in bytes (32 bytes = 256 bits of entropy)
pub const SESSION_TOKEN_BYTES: usize = 32;

#[derive(Debug, Error)]
#[error("OS entropy source failed: {0}")]
pub struct TokenError(String);

/// Opaque session token as carried by the `sid` cookie
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct SessionToken(String);

impl SessionToken {
    /// Wrap a token value read back from a client cookie
    pub fn from_cookie(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Hex SHA-256 of the token, the key the session store is indexed by
    pub fn digest(&self) -> String {
        hex::encode(Sha256::digest(self.0.as_bytes()))
    }
}

impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SessionToken(<redacted>)")
    }
}

/** Generate a cryptographically secure session token
# Returns
A base64 URL-safe encoded token without padding */
pub fn generate_session_token() -> Result<SessionToken, TokenError> {
    generate_secure_token_with_size(SESSION_TOKEN_BYTES).map(SessionToken)
}

/** Generate a cryptographically secure random token with specified size
# Arguments
* `bytes` - The size of the random token in bytes */
pub fn generate_secure_token_with_size(bytes: usize) -> Result<String, TokenError> {
    let mut buffer = vec![0u8; bytes];
    OsRng
        .try_fill_bytes(&mut buffer)
        .map_err(|e| TokenError(e.to_string()))?;
    Ok(URL_SAFE_NO_PAD.encode(buffer))
}
