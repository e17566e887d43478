//! City catalogue service implementing the catalogue driving ports.
//!
//! Listings go through the [`ListingCache`]; every mutation drops all cached
//! listings once the store call has been attempted, whatever its outcome.
//! A listing is cached under the generation read before its fetch, so a
//! fetch that overlaps a write cannot repopulate the cache with the old
//! snapshot.

use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::json;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::domain::ports::{
    CacheKey, CityCatalogueCommand, CityCatalogueQuery, CityListing, CityRecordStore,
    CityRecordStoreError, ListingCache,
};
use crate::domain::{
    CityFields, CityId, CityRecord, Error, NewCityRecord, Notice, SessionId,
};

/// How cached listings are partitioned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CacheScope {
    /// One listing shared by every session in the process.
    #[default]
    Process,
    /// One listing per admin session.
    Session,
}

/// Error returned when parsing an unknown [`CacheScope`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown cache scope `{0}`; expected `process` or `session`")]
pub struct ParseCacheScopeError(String);

impl FromStr for CacheScope {
    type Err = ParseCacheScopeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "process" => Ok(Self::Process),
            "session" => Ok(Self::Session),
            _ => Err(ParseCacheScopeError(s.to_owned())),
        }
    }
}

/// Catalogue service over a record store and a listing cache.
pub struct CityCatalogueService<S: ?Sized, C: ?Sized> {
    store: Arc<S>,
    cache: Arc<C>,
    clock: Arc<dyn Clock>,
    scope: CacheScope,
}

impl<S: ?Sized, C: ?Sized> Clone for CityCatalogueService<S, C> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            cache: Arc::clone(&self.cache),
            clock: Arc::clone(&self.clock),
            scope: self.scope,
        }
    }
}

impl<S: ?Sized, C: ?Sized> CityCatalogueService<S, C> {
    /// Create a service.
    ///
    /// ```rust,no_run
    /// # use std::sync::Arc;
    /// # use city_locator::domain::{CacheScope, CityCatalogueService};
    /// # use city_locator::domain::ports::NoOpListingCache;
    /// # use city_locator::outbound::record_store::InMemoryCityRecordStore;
    /// # use mockable::DefaultClock;
    /// let service = CityCatalogueService::new(
    ///     Arc::new(InMemoryCityRecordStore::default()),
    ///     Arc::new(NoOpListingCache),
    ///     Arc::new(DefaultClock),
    ///     CacheScope::Process,
    /// );
    /// # let _ = service;
    /// ```
    pub fn new(store: Arc<S>, cache: Arc<C>, clock: Arc<dyn Clock>, scope: CacheScope) -> Self {
        Self {
            store,
            cache,
            clock,
            scope,
        }
    }

    fn listing_key(&self, session: &SessionId) -> CacheKey {
        match self.scope {
            CacheScope::Process => CacheKey::city_listing(None),
            CacheScope::Session => CacheKey::city_listing(Some(session)),
        }
    }
}

impl<S: ?Sized, C: ?Sized> CityCatalogueService<S, C>
where
    S: CityRecordStore,
    C: ListingCache,
{
    fn map_store_error(error: CityRecordStoreError) -> Error {
        match error {
            CityRecordStoreError::Transport { .. }
            | CityRecordStoreError::Timeout { .. }
            | CityRecordStoreError::Status { .. } => {
                Error::service_unavailable(format!("record store unavailable: {error}"))
            }
            CityRecordStoreError::Decode { .. } => {
                Error::internal(format!("record store returned malformed data: {error}"))
            }
        }
    }

    async fn require_existing(&self, id: &CityId) -> Result<CityRecord, Error> {
        self.store
            .fetch_one(id)
            .await
            .map_err(Self::map_store_error)?
            .ok_or_else(|| {
                Error::not_found(format!("city record {id} not found"))
                    .with_details(json!({ "id": id.as_ref(), "code": "city_not_found" }))
            })
    }

    async fn invalidate_listings(&self) {
        if let Err(error) = self.cache.invalidate_all().await {
            warn!(%error, "failed to invalidate cached city listings");
        }
    }
}

#[async_trait]
impl<S: ?Sized, C: ?Sized> CityCatalogueQuery for CityCatalogueService<S, C>
where
    S: CityRecordStore,
    C: ListingCache,
{
    async fn list(&self, session: &SessionId) -> CityListing {
        let key = self.listing_key(session);
        match self.cache.get(&key).await {
            Ok(Some(records)) => {
                debug!(%key, count = records.len(), "city listing served from cache");
                return CityListing {
                    records,
                    notice: None,
                };
            }
            Ok(None) => {}
            Err(error) => warn!(%error, %key, "listing cache read failed"),
        }

        let fetched_at = self.cache.generation();
        match self.store.fetch_all().await {
            Ok(records) => {
                if let Err(error) = self.cache.put(&key, &records, fetched_at).await {
                    warn!(%error, %key, "failed to cache city listing");
                }
                debug!(%key, count = records.len(), "city listing fetched from store");
                CityListing {
                    records,
                    notice: None,
                }
            }
            Err(error) => {
                warn!(%error, "failed to fetch city records");
                CityListing {
                    records: Vec::new(),
                    notice: Some(Notice::error(format!("Error fetching data: {error}"))),
                }
            }
        }
    }
}

#[async_trait]
impl<S: ?Sized, C: ?Sized> CityCatalogueCommand for CityCatalogueService<S, C>
where
    S: CityRecordStore,
    C: ListingCache,
{
    async fn add(&self, fields: CityFields) -> Result<CityRecord, Error> {
        let record = NewCityRecord {
            fields,
            timestamp: self.clock.utc().timestamp(),
        };
        let outcome = self.store.create(&record).await;
        self.invalidate_listings().await;

        let id = outcome.map_err(Self::map_store_error)?;
        info!(%id, city = %record.fields.city(), "city record created");
        Ok(CityRecord::from_new(id, record))
    }

    async fn update(&self, id: &CityId, fields: CityFields) -> Result<CityRecord, Error> {
        let existing = self.require_existing(id).await?;
        let outcome = self.store.replace_fields(id, &fields).await;
        self.invalidate_listings().await;

        outcome.map_err(Self::map_store_error)?;
        info!(%id, city = %fields.city(), "city record updated");
        Ok(existing.with_fields(fields))
    }

    async fn delete(&self, id: &CityId) -> Result<(), Error> {
        self.require_existing(id).await?;
        let outcome = self.store.remove(id).await;
        self.invalidate_listings().await;

        outcome.map_err(Self::map_store_error)?;
        info!(%id, "city record deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests;
