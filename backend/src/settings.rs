//! Service configuration loaded via OrthoConfig.
//!
//! Values come from CLI flags, `CITY_LOCATOR_*` environment variables and
//! configuration files, merged by [`ortho_config`]. [`AppSettings`] holds the
//! raw layer; [`AppSettings::validate`] turns it into typed settings before
//! the server starts so configuration mistakes stop the process early.

use std::fmt;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use actix_web::cookie::Key;
use ortho_config::OrthoConfig;
use url::Url;
use serde::Deserialize;
use tracing::warn;
use zeroize::{Zeroize, Zeroizing};

use crate::domain::{AdminAccount, CacheScope, ParseCacheScopeError};

const DEFAULT_COLLECTION: &str = "cities";
const DEFAULT_CACHE_TTL_SECS: u64 = 5;
const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const SESSION_KEY_DEFAULT_PATH: &str = "/var/run/secrets/session_key";
const SESSION_KEY_MIN_LEN: usize = 64;

/// Raw configuration layer.
#[derive(Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "CITY_LOCATOR")]
pub struct AppSettings {
    /// Base URL of the record store, e.g. `https://example.firebaseio.com`.
    pub store_url: Option<String>,
    /// Credential appended to every store call as `auth`.
    pub store_auth: Option<String>,
    /// Collection path under the base URL. Defaults to `cities`.
    pub store_collection: Option<String>,
    /// Per-request timeout for store calls, in seconds.
    pub store_timeout_secs: Option<u64>,
    /// Keep records in process memory instead of calling a remote store.
    #[ortho_config(default = false)]
    pub use_memory_store: bool,
    /// Listing cache lifetime in seconds. `0` disables caching.
    pub cache_ttl_secs: Option<u64>,
    /// `process` or `session`.
    pub cache_scope: Option<String>,
    pub admin_email: Option<String>,
    pub admin_password: Option<String>,
    /// Listener address. Defaults to `0.0.0.0:8080`.
    pub bind_addr: Option<String>,
    /// File holding the session cookie key material.
    pub session_key_file: Option<PathBuf>,
    /// Mark session cookies `Secure`.
    #[ortho_config(default = true)]
    pub session_cookie_secure: bool,
    /// Fall back to a generated session key when the key file is unreadable.
    #[ortho_config(default = false)]
    pub session_allow_ephemeral: bool,
}

impl fmt::Debug for AppSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let redacted = |value: &Option<String>| value.as_ref().map(|_| "<redacted>");
        f.debug_struct("AppSettings")
            .field("store_url", &self.store_url)
            .field("store_auth", &redacted(&self.store_auth))
            .field("store_collection", &self.store_collection)
            .field("store_timeout_secs", &self.store_timeout_secs)
            .field("use_memory_store", &self.use_memory_store)
            .field("cache_ttl_secs", &self.cache_ttl_secs)
            .field("cache_scope", &self.cache_scope)
            .field("admin_email", &self.admin_email)
            .field("admin_password", &redacted(&self.admin_password))
            .field("bind_addr", &self.bind_addr)
            .field("session_key_file", &self.session_key_file)
            .field("session_cookie_secure", &self.session_cookie_secure)
            .field("session_allow_ephemeral", &self.session_allow_ephemeral)
            .finish()
    }
}

/// Build mode used to decide how strict session validation is.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BuildMode {
    /// Debug builds fall back to a generated session key.
    Debug,
    /// Release builds require a readable key file unless ephemeral keys are
    /// explicitly allowed.
    Release,
}

impl BuildMode {
    /// Determine the build mode from `cfg!(debug_assertions)`.
    #[must_use]
    pub fn from_debug_assertions() -> Self {
        if cfg!(debug_assertions) {
            Self::Debug
        } else {
            Self::Release
        }
    }
}

/// Errors raised while validating configuration.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    /// Configuration sources could not be read or merged.
    #[error("failed to load configuration: {0}")]
    Load(String),
    /// A required value is absent.
    #[error("missing required setting: {name}")]
    Missing { name: &'static str },
    /// The store URL does not parse or is not HTTP(S).
    #[error("invalid store_url '{value}': {reason}")]
    InvalidStoreUrl { value: String, reason: String },
    /// The collection path is blank.
    #[error("store_collection must not be empty")]
    EmptyCollection,
    /// The cache scope is not recognised.
    #[error(transparent)]
    InvalidCacheScope(#[from] ParseCacheScopeError),
    /// The bind address does not parse.
    #[error("invalid bind_addr '{value}': {source}")]
    InvalidBindAddr {
        value: String,
        #[source]
        source: std::net::AddrParseError,
    },
    /// Reading the session key file failed.
    #[error("failed to read session key at {path}: {source}")]
    KeyRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The session key file is too short to derive a cookie key.
    #[error("session key at {path} too short: need >= {min_len} bytes, got {length}")]
    KeyTooShort {
        path: PathBuf,
        length: usize,
        min_len: usize,
    },
}

/// Connection details for the remote record store.
pub struct StoreSettings {
    pub base_url: Url,
    pub collection: String,
    pub auth: Zeroizing<String>,
    pub timeout: Option<Duration>,
}

impl fmt::Debug for StoreSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoreSettings")
            .field("base_url", &self.base_url.as_str())
            .field("collection", &self.collection)
            .field("auth", &"<redacted>")
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Which record store backs the service.
#[derive(Debug)]
pub enum StoreBackend {
    /// Remote REST document store.
    Rest(StoreSettings),
    /// Process-local store, for demos and tests.
    Memory,
}

/// Listing cache behaviour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheSettings {
    /// `None` disables caching.
    pub ttl: Option<Duration>,
    pub scope: CacheScope,
}

/// Session cookie settings.
pub struct SessionSettings {
    pub key: Key,
    pub cookie_secure: bool,
}

/// Fully validated configuration.
pub struct ValidatedSettings {
    pub store: StoreBackend,
    pub cache: CacheSettings,
    pub admin: AdminAccount,
    pub bind_addr: SocketAddr,
    pub session: SessionSettings,
}

impl AppSettings {
    /// Load settings from the process arguments, environment and files.
    ///
    /// # Errors
    /// Returns [`SettingsError::Load`] when a source is malformed.
    pub fn load_from_process() -> Result<Self, SettingsError> {
        Self::load().map_err(|error| SettingsError::Load(error.to_string()))
    }

    /// Validate every section.
    ///
    /// # Errors
    /// Returns the first [`SettingsError`] encountered.
    pub fn validate(&self, mode: BuildMode) -> Result<ValidatedSettings, SettingsError> {
        Ok(ValidatedSettings {
            store: self.store_backend()?,
            cache: self.cache_settings()?,
            admin: self.admin_account()?,
            bind_addr: self.bind_addr()?,
            session: self.session_settings(mode)?,
        })
    }

    /// Select and validate the record store.
    ///
    /// # Errors
    /// Fails when the REST store is selected but its URL or credential is
    /// missing or malformed.
    pub fn store_backend(&self) -> Result<StoreBackend, SettingsError> {
        if self.use_memory_store {
            return Ok(StoreBackend::Memory);
        }
        let raw_url = required(self.store_url.as_deref(), "store_url")?;
        let base_url = parse_store_url(raw_url)?;
        let auth = required(self.store_auth.as_deref(), "store_auth")?;
        let collection = self
            .store_collection
            .as_deref()
            .unwrap_or(DEFAULT_COLLECTION)
            .trim()
            .trim_matches('/');
        if collection.is_empty() {
            return Err(SettingsError::EmptyCollection);
        }
        Ok(StoreBackend::Rest(StoreSettings {
            base_url,
            collection: collection.to_owned(),
            auth: Zeroizing::new(auth.to_owned()),
            timeout: self
                .store_timeout_secs
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs),
        }))
    }

    /// Cache lifetime and scope.
    ///
    /// # Errors
    /// Fails when the scope is not `process` or `session`.
    pub fn cache_settings(&self) -> Result<CacheSettings, SettingsError> {
        let scope = match self.cache_scope.as_deref() {
            Some(raw) => raw.parse()?,
            None => CacheScope::default(),
        };
        let secs = self.cache_ttl_secs.unwrap_or(DEFAULT_CACHE_TTL_SECS);
        Ok(CacheSettings {
            ttl: (secs > 0).then(|| Duration::from_secs(secs)),
            scope,
        })
    }

    /// The single admin account.
    ///
    /// # Errors
    /// Fails when either half of the pair is missing or blank.
    pub fn admin_account(&self) -> Result<AdminAccount, SettingsError> {
        let email = required(self.admin_email.as_deref(), "admin_email")?;
        let password = self
            .admin_password
            .as_deref()
            .filter(|value| !value.is_empty())
            .ok_or(SettingsError::Missing {
                name: "admin_password",
            })?;
        Ok(AdminAccount::new(email, password))
    }

    /// Listener address.
    ///
    /// # Errors
    /// Fails when the configured value does not parse.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let value = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR).trim();
        value
            .parse()
            .map_err(|source| SettingsError::InvalidBindAddr {
                value: value.to_owned(),
                source,
            })
    }

    /// Session key and cookie flags.
    ///
    /// # Errors
    /// In release mode, fails when the key file is unreadable and ephemeral
    /// keys are not allowed. In any mode, fails when the key file is too short.
    pub fn session_settings(&self, mode: BuildMode) -> Result<SessionSettings, SettingsError> {
        let path = self
            .session_key_file
            .clone()
            .unwrap_or_else(|| PathBuf::from(SESSION_KEY_DEFAULT_PATH));
        let allow_ephemeral = mode == BuildMode::Debug || self.session_allow_ephemeral;
        Ok(SessionSettings {
            key: load_session_key(&path, allow_ephemeral)?,
            cookie_secure: self.session_cookie_secure,
        })
    }
}

fn required<'a>(value: Option<&'a str>, name: &'static str) -> Result<&'a str, SettingsError> {
    value
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .ok_or(SettingsError::Missing { name })
}

fn parse_store_url(raw: &str) -> Result<Url, SettingsError> {
    let invalid = |reason: String| SettingsError::InvalidStoreUrl {
        value: raw.to_owned(),
        reason,
    };
    let url = Url::parse(raw).map_err(|error| invalid(error.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme {}", url.scheme())));
    }
    Ok(url)
}

fn load_session_key(path: &Path, allow_ephemeral: bool) -> Result<Key, SettingsError> {
    match std::fs::read(path) {
        Ok(mut bytes) => {
            let length = bytes.len();
            if length < SESSION_KEY_MIN_LEN {
                bytes.zeroize();
                return Err(SettingsError::KeyTooShort {
                    path: path.to_path_buf(),
                    length,
                    min_len: SESSION_KEY_MIN_LEN,
                });
            }
            let key = Key::derive_from(&bytes);
            bytes.zeroize();
            Ok(key)
        }
        Err(error) if allow_ephemeral => {
            warn!(
                path = %path.display(),
                error = %error,
                "using temporary session key (dev only)"
            );
            Ok(Key::generate())
        }
        Err(source) => Err(SettingsError::KeyRead {
            path: path.to_path_buf(),
            source,
        }),
    }
}

#[cfg(test)]
mod tests;
