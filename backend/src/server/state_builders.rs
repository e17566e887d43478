//! Builders wiring outbound adapters into the HTTP state.

use std::sync::Arc;

use actix_web::web;
use mockable::{Clock, DefaultClock};
use tracing::info;

use city_locator::domain::ports::{
    AdminLoginService, CityRecordStore, ListingCache, ListingCacheError, NoOpListingCache,
};
use city_locator::domain::CityCatalogueService;
use city_locator::inbound::http::state::{HttpState, HttpStatePorts};
use city_locator::outbound::cache::TtlListingCache;
use city_locator::outbound::record_store::{
    InMemoryCityRecordStore, RestCityRecordStore, RestStoreConfigError,
};
use city_locator::settings::{CacheSettings, StoreBackend};

use super::ServerConfig;

/// Errors raised while assembling adapters at start-up.
#[derive(Debug, thiserror::Error)]
pub enum StateBuildError {
    #[error("record store configuration rejected: {0}")]
    Store(#[from] RestStoreConfigError),
    #[error("listing cache configuration rejected: {0}")]
    Cache(#[from] ListingCacheError),
}

impl From<StateBuildError> for std::io::Error {
    fn from(error: StateBuildError) -> Self {
        Self::other(error.to_string())
    }
}

fn build_store(backend: &StoreBackend) -> Result<Arc<dyn CityRecordStore>, StateBuildError> {
    match backend {
        StoreBackend::Rest(settings) => {
            info!(
                base_url = %settings.base_url,
                collection = %settings.collection,
                "using REST record store"
            );
            let store = RestCityRecordStore::new(
                settings.base_url.clone(),
                &settings.collection,
                settings.auth.clone(),
                settings.timeout,
            )?;
            Ok(Arc::new(store))
        }
        StoreBackend::Memory => {
            info!("using in-memory record store");
            Ok(Arc::new(InMemoryCityRecordStore::default()))
        }
    }
}

fn build_cache(
    settings: CacheSettings,
    clock: Arc<dyn Clock>,
) -> Result<Arc<dyn ListingCache>, StateBuildError> {
    match settings.ttl {
        Some(ttl) => Ok(Arc::new(TtlListingCache::new(ttl, clock)?)),
        None => {
            info!("listing cache disabled");
            Ok(Arc::new(NoOpListingCache))
        }
    }
}

/// Build the shared HTTP state from server configuration.
pub(super) fn build_http_state(
    config: &ServerConfig,
) -> Result<web::Data<HttpState>, StateBuildError> {
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    let store = build_store(&config.store)?;
    let cache = build_cache(config.cache, Arc::clone(&clock))?;
    let catalogue = Arc::new(CityCatalogueService::new(
        store,
        cache,
        clock,
        config.cache.scope,
    ));

    Ok(web::Data::new(HttpState::new(HttpStatePorts {
        login: Arc::new(AdminLoginService::new(config.admin.clone())),
        cities_query: catalogue.clone(),
        cities_command: catalogue,
    })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::time::Duration;

    use city_locator::domain::CacheScope;

    #[rstest]
    #[case(Some(Duration::from_secs(5)))]
    #[case(None)]
    fn cache_builds_for_every_ttl(#[case] ttl: Option<Duration>) {
        let cache = build_cache(
            CacheSettings {
                ttl,
                scope: CacheScope::Process,
            },
            Arc::new(DefaultClock),
        );
        assert!(cache.is_ok());
    }

    #[test]
    fn memory_backend_builds() {
        assert!(build_store(&StoreBackend::Memory).is_ok());
    }
}
