// ============================
// boathouse-backend-lib/src/config.rs
// ============================
//! Configuration management.
//!
//! Settings are assembled once at startup (defaults, then `boathouse.toml`,
//! then `BOATHOUSE_*` environment variables) and shared read-only afterwards.
use std::net::SocketAddr;
use std::path::Path;

use boathouse_common::PERSISTENT_SESSION_TTL;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::auth::{DEFAULT_CLEANUP_INTERVAL, DEFAULT_STORE_TIMEOUT, DEFAULT_WORK_FACTOR};
use crate::error::AppError;

/// Config file read when no explicit path is given
pub const DEFAULT_CONFIG_FILE: &str = "boathouse.toml";

/// Prefix for environment overrides; nested keys split on `__`
pub const ENV_PREFIX: &str = "BOATHOUSE_";

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Upper bound on any configured session lifetime (ten years)
pub const MAX_SESSION_TTL_SECS: u64 = 10 * 365 * 24 * 60 * 60;

/// Application settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Server bind address
    pub bind_addr: SocketAddr,
    /// `memory:` or a SQLite URL
    pub database_url: String,
    /// Default log filter when `RUST_LOG` is unset
    pub log_level: String,
    pub log_format: LogFormat,
    pub password: PasswordSettings,
    pub session: SessionSettings,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

/// Password hashing settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PasswordSettings {
    /// scrypt cost, `log2(N)`
    pub work_factor: u8,
}

/// Session lifetime settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionSettings {
    /// Lifetime of "remember me" sessions, server-side and in the cookie
    pub persistent_ttl_secs: u64,
    /// Server-side lifetime of browser sessions; unset means until logout
    pub ephemeral_ttl_secs: Option<u64>,
    pub cleanup_interval_secs: u64,
    pub store_timeout_ms: u64,
    /// Mark the `sid` cookie `Secure`
    pub secure_cookie: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            database_url: "sqlite://boathouse.db".to_string(),
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            password: PasswordSettings::default(),
            session: SessionSettings::default(),
        }
    }
}

impl Default for PasswordSettings {
    fn default() -> Self {
        Self {
            work_factor: DEFAULT_WORK_FACTOR,
        }
    }
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            persistent_ttl_secs: PERSISTENT_SESSION_TTL.as_secs(),
            ephemeral_ttl_secs: None,
            cleanup_interval_secs: DEFAULT_CLEANUP_INTERVAL.as_secs(),
            store_timeout_ms: DEFAULT_STORE_TIMEOUT.as_millis() as u64,
            secure_cookie: false,
        }
    }
}

impl Settings {
    /// Load from `boathouse.toml` and the environment
    pub fn load() -> Result<Self, AppError> {
        Self::load_from(None)
    }

    /// Load from an explicit config file (or the default one) and the environment
    pub fn load_from(path: Option<&Path>) -> Result<Self, AppError> {
        let settings: Self = Self::figment(path)
            .extract()
            .map_err(|e| AppError::Config(e.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn figment(path: Option<&Path>) -> Figment {
        let file = path.unwrap_or_else(|| Path::new(DEFAULT_CONFIG_FILE));
        Figment::from(Serialized::defaults(Settings::default()))
            .merge(Toml::file(file))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    pub fn validate(&self) -> Result<(), AppError> {
        if !LOG_LEVELS.contains(&self.log_level.as_str()) {
            return Err(AppError::Config(format!(
                "log_level must be one of {LOG_LEVELS:?}, got {:?}",
                self.log_level
            )));
        }
        if self.database_url.trim().is_empty() {
            return Err(AppError::Config("database_url must not be empty".into()));
        }
        if !(10..=20).contains(&self.password.work_factor) {
            return Err(AppError::Config(format!(
                "password.work_factor must be within 10..=20, got {}",
                self.password.work_factor
            )));
        }
        check_ttl("session.persistent_ttl_secs", self.session.persistent_ttl_secs)?;
        if let Some(ttl) = self.session.ephemeral_ttl_secs {
            check_ttl("session.ephemeral_ttl_secs", ttl)?;
        }
        if self.session.store_timeout_ms == 0 {
            return Err(AppError::Config(
                "session.store_timeout_ms must be positive".into(),
            ));
        }
        if self.session.cleanup_interval_secs == 0 {
            return Err(AppError::Config(
                "session.cleanup_interval_secs must be positive".into(),
            ));
        }
        Ok(())
    }
}

fn check_ttl(key: &str, secs: u64) -> Result<(), AppError> {
    if secs == 0 || secs > MAX_SESSION_TTL_SECS {
        return Err(AppError::Config(format!(
            "{key} must be within 1..={MAX_SESSION_TTL_SECS}, got {secs}"
        )));
    }
    Ok(())
}
