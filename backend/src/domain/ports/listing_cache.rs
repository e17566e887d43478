//! Driven port for caching record listings between store round trips.

use async_trait::async_trait;

use crate::domain::CityRecord;

use super::{CacheKey, define_port_error};

define_port_error! {
    /// Errors surfaced by listing cache adapters.
    pub enum ListingCacheError {
        /// Cache backend is unavailable.
        Backend { message: String } => "listing cache backend failure: {message}",
    }
}

/// Invalidation epoch of a [`ListingCache`].
///
/// Callers read it before fetching from the store and hand it back to
/// [`ListingCache::put`]. A listing fetched before an invalidation carries an
/// older generation and is never cached.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct CacheGeneration(u64);

impl CacheGeneration {
    /// Wrap a raw epoch counter.
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// The raw epoch counter.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

/// Short-lived cache of record listings keyed by operation and parameters.
///
/// Entries expire after the adapter's TTL. `invalidate_all` must drop every
/// entry for every key and advance the generation, since any write can
/// change any listing.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ListingCache: Send + Sync {
    /// Current invalidation epoch.
    fn generation(&self) -> CacheGeneration;

    /// Read a fresh listing, `None` on miss or expiry.
    async fn get(&self, key: &CacheKey) -> Result<Option<Vec<CityRecord>>, ListingCacheError>;

    /// Store a listing under `key`, restarting its TTL.
    ///
    /// Adapters discard the write when `fetched_at` is older than the current
    /// generation.
    async fn put(
        &self,
        key: &CacheKey,
        records: &[CityRecord],
        fetched_at: CacheGeneration,
    ) -> Result<(), ListingCacheError>;

    /// Drop every cached listing.
    async fn invalidate_all(&self) -> Result<(), ListingCacheError>;
}

/// Cache that never holds anything. Used when caching is disabled.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpListingCache;

#[async_trait]
impl ListingCache for NoOpListingCache {
    fn generation(&self) -> CacheGeneration {
        CacheGeneration::default()
    }

    async fn get(&self, _key: &CacheKey) -> Result<Option<Vec<CityRecord>>, ListingCacheError> {
        Ok(None)
    }

    async fn put(
        &self,
        _key: &CacheKey,
        _records: &[CityRecord],
        _fetched_at: CacheGeneration,
    ) -> Result<(), ListingCacheError> {
        Ok(())
    }

    async fn invalidate_all(&self) -> Result<(), ListingCacheError> {
        Ok(())
    }
}
