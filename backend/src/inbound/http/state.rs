//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::CityDirectory;
use crate::domain::ports::{CityCatalogueCommand, CityCatalogueQuery, LoginService};

/// Parameter object bundling the port implementations handlers call.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub login: Arc<dyn LoginService>,
    pub cities_query: Arc<dyn CityCatalogueQuery>,
    pub cities_command: Arc<dyn CityCatalogueCommand>,
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub login: Arc<dyn LoginService>,
    pub cities_query: Arc<dyn CityCatalogueQuery>,
    pub cities_command: Arc<dyn CityCatalogueCommand>,
    pub directory: CityDirectory,
}

impl From<HttpStatePorts> for HttpState {
    fn from(ports: HttpStatePorts) -> Self {
        Self::new(ports)
    }
}

impl HttpState {
    /// Construct state from a ports bundle with the built-in directory.
    ///
    /// # Examples
    /// ```no_run
    /// use std::sync::Arc;
    ///
    /// use city_locator::domain::ports::{AdminLoginService, NoOpListingCache};
    /// use city_locator::domain::{AdminAccount, CacheScope, CityCatalogueService};
    /// use city_locator::inbound::http::state::{HttpState, HttpStatePorts};
    /// use city_locator::outbound::record_store::InMemoryCityRecordStore;
    /// use mockable::DefaultClock;
    ///
    /// let catalogue = Arc::new(CityCatalogueService::new(
    ///     Arc::new(InMemoryCityRecordStore::default()),
    ///     Arc::new(NoOpListingCache),
    ///     Arc::new(DefaultClock),
    ///     CacheScope::Process,
    /// ));
    /// let state = HttpState::new(HttpStatePorts {
    ///     login: Arc::new(AdminLoginService::new(AdminAccount::new("a@example.com", "pw"))),
    ///     cities_query: catalogue.clone(),
    ///     cities_command: catalogue,
    /// });
    /// let _login = state.login.clone();
    /// ```
    pub fn new(ports: HttpStatePorts) -> Self {
        let HttpStatePorts {
            login,
            cities_query,
            cities_command,
        } = ports;
        Self {
            login,
            cities_query,
            cities_command,
            directory: CityDirectory::builtin(),
        }
    }
}
