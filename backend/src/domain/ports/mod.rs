//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (`CityRecordStore`, `ListingCache`) describe what the domain
//! needs from infrastructure. Driving ports (`CityCatalogueQuery`,
//! `CityCatalogueCommand`, `LoginService`) are what inbound adapters call.

mod macros;
pub(crate) use macros::define_port_error;

mod cache_key;
mod city_catalogue;
mod city_record_store;
mod listing_cache;
mod login_service;

pub use cache_key::{CacheKey, CacheKeyValidationError};
#[cfg(test)]
pub use city_catalogue::{MockCityCatalogueCommand, MockCityCatalogueQuery};
pub use city_catalogue::{CityCatalogueCommand, CityCatalogueQuery, CityListing};
#[cfg(test)]
pub use city_record_store::MockCityRecordStore;
pub use city_record_store::{CityRecordStore, CityRecordStoreError};
#[cfg(test)]
pub use listing_cache::MockListingCache;
pub use listing_cache::{CacheGeneration, ListingCache, ListingCacheError, NoOpListingCache};
#[cfg(test)]
pub use login_service::MockLoginService;
pub use login_service::{AdminLoginService, LoginService};
