// ============================
// boathouse-backend-lib/src/auth/password.rs
// ============================
//! Password hashing and verification.
use std::fmt;

use rand::{rngs::OsRng, TryRngCore};
use scrypt::{
    password_hash::{Error as PhcError, PasswordHash, PasswordHasher as _, PasswordVerifier, SaltString},
    Params, Scrypt,
};
use thiserror::Error;

/// Default scrypt cost (`log2(N)`)
pub const DEFAULT_WORK_FACTOR: u8 = 14;

/// Longest password accepted for hashing
pub const MAX_PASSWORD_BYTES: usize = 1024;

const SCRYPT_R: u32 = 8;
const SCRYPT_P: u32 = 1;
const OUTPUT_LEN: usize = 32;
const SALT_BYTES: usize = 16;

#[derive(Debug, Error)]
pub enum HashingError {
    #[error("password exceeds {MAX_PASSWORD_BYTES} bytes")]
    TooLong,

    #[error("invalid work factor: {0}")]
    InvalidWorkFactor(u8),

    #[error("stored password hash is malformed: {0}")]
    Malformed(String),

    #[error("hashing primitive failed: {0}")]
    Primitive(String),
}

/// An encoded password hash. The PHC string embeds the salt and cost
/// parameters, so old hashes stay verifiable after the work factor changes.
#[derive(Clone, PartialEq, Eq)]
pub struct HashedPassword(String);

impl HashedPassword {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl From<String> for HashedPassword {
    fn from(encoded: String) -> Self {
        Self(encoded)
    }
}

impl fmt::Debug for HashedPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("HashedPassword(<redacted>)")
    }
}

/// Salted scrypt hasher with a fixed work factor
#[derive(Debug, Clone)]
pub struct PasswordHasher {
    params: Params,
    work_factor: u8,
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self {
            params: Params::new(DEFAULT_WORK_FACTOR, SCRYPT_R, SCRYPT_P, OUTPUT_LEN)
                .unwrap_or_else(|_| unreachable!("default scrypt params are valid")),
            work_factor: DEFAULT_WORK_FACTOR,
        }
    }
}

impl PasswordHasher {
    pub fn new(work_factor: u8) -> Result<Self, HashingError> {
        let params = Params::new(work_factor, SCRYPT_R, SCRYPT_P, OUTPUT_LEN)
            .map_err(|_| HashingError::InvalidWorkFactor(work_factor))?;
        Ok(Self {
            params,
            work_factor,
        })
    }

    pub fn work_factor(&self) -> u8 {
        self.work_factor
    }

    /// Hash a password with a fresh random salt
    pub fn hash(&self, plain: &str) -> Result<HashedPassword, HashingError> {
        if plain.len() > MAX_PASSWORD_BYTES {
            return Err(HashingError::TooLong);
        }

        let mut salt_bytes = [0u8; SALT_BYTES];
        OsRng
            .try_fill_bytes(&mut salt_bytes)
            .map_err(|e| HashingError::Primitive(e.to_string()))?;
        let salt = SaltString::encode_b64(&salt_bytes)
            .map_err(|e| HashingError::Primitive(e.to_string()))?;

        let hash = Scrypt
            .hash_password_customized(plain.as_bytes(), None, None, self.params, &salt)
            .map_err(|e| HashingError::Primitive(e.to_string()))?;
        Ok(HashedPassword(hash.to_string()))
    }

    /// Verify a password against a stored hash.
    ///
    /// A mismatch is `Ok(false)`; only an unparsable or foreign hash is an error.
    pub fn verify(&self, plain: &str, hashed: &HashedPassword) -> Result<bool, HashingError> {
        let parsed = PasswordHash::new(hashed.as_str())
            .map_err(|e| HashingError::Malformed(e.to_string()))?;

        // nothing this long was ever hashed
        if plain.len() > MAX_PASSWORD_BYTES {
            return Ok(false);
        }

        match Scrypt.verify_password(plain.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(PhcError::Password) => Ok(false),
            Err(e) => Err(HashingError::Malformed(e.to_string())),
        }
    }
}
