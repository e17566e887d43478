//! HTTP server configuration object.

use std::net::SocketAddr;

use actix_web::cookie::{Key, SameSite};

use city_locator::domain::AdminAccount;
use city_locator::settings::{CacheSettings, StoreBackend, ValidatedSettings};

/// Everything `create_server` needs, built from validated settings.
pub struct ServerConfig {
    pub(crate) key: Key,
    pub(crate) cookie_secure: bool,
    pub(crate) same_site: SameSite,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) store: StoreBackend,
    pub(crate) cache: CacheSettings,
    pub(crate) admin: AdminAccount,
}

impl From<ValidatedSettings> for ServerConfig {
    fn from(settings: ValidatedSettings) -> Self {
        let ValidatedSettings {
            store,
            cache,
            admin,
            bind_addr,
            session,
        } = settings;
        Self {
            key: session.key,
            cookie_secure: session.cookie_secure,
            same_site: SameSite::Lax,
            bind_addr,
            store,
            cache,
            admin,
        }
    }
}

impl ServerConfig {
    /// Replace the listener address, e.g. with `127.0.0.1:0` in tests.
    #[cfg_attr(
        not(test),
        expect(dead_code, reason = "Exercised by server tests")
    )]
    #[must_use]
    pub fn with_bind_addr(mut self, bind_addr: SocketAddr) -> Self {
        self.bind_addr = bind_addr;
        self
    }
}
