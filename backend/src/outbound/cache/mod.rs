//! In-process listing cache with a fixed time to live.
//!
//! Entries are stamped with the injected clock when written and treated as
//! absent once older than the TTL. Expired entries are evicted lazily on
//! read. `DashMap` keeps reads from different workers off a single lock.
//!
//! Each entry also remembers the cache generation its listing was fetched
//! in. `invalidate_all` advances the generation, so a listing that was in
//! flight while a write landed is rejected on `put`, and one that slipped in
//! between the check and the insert is never served.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use mockable::Clock;
use tracing::debug;

use crate::domain::CityRecord;
use crate::domain::ports::{CacheGeneration, CacheKey, ListingCache, ListingCacheError};

#[derive(Debug, Clone)]
struct CachedListing {
    records: Vec<CityRecord>,
    stored_at: DateTime<Utc>,
    generation: CacheGeneration,
}

/// Listing cache shared by every worker in the process.
#[derive(Clone)]
pub struct TtlListingCache {
    entries: Arc<DashMap<CacheKey, CachedListing>>,
    generation: Arc<AtomicU64>,
    ttl: chrono::Duration,
    clock: Arc<dyn Clock>,
}

impl TtlListingCache {
    /// Create an empty cache whose entries live for `ttl`.
    ///
    /// # Errors
    /// Returns [`ListingCacheError::Backend`] when `ttl` does not fit a
    /// `chrono::Duration`.
    pub fn new(ttl: Duration, clock: Arc<dyn Clock>) -> Result<Self, ListingCacheError> {
        let ttl = chrono::Duration::from_std(ttl)
            .map_err(|err| ListingCacheError::backend(format!("cache ttl out of range: {err}")))?;
        Ok(Self {
            entries: Arc::new(DashMap::new()),
            generation: Arc::new(AtomicU64::new(0)),
            ttl,
            clock,
        })
    }

    /// Number of entries currently held, expired ones included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn is_fresh(&self, entry: &CachedListing, now: DateTime<Utc>) -> bool {
        entry.generation == self.generation()
            && now.signed_duration_since(entry.stored_at) < self.ttl
    }
}

#[async_trait]
impl ListingCache for TtlListingCache {
    fn generation(&self) -> CacheGeneration {
        CacheGeneration::new(self.generation.load(Ordering::SeqCst))
    }

    async fn get(&self, key: &CacheKey) -> Result<Option<Vec<CityRecord>>, ListingCacheError> {
        let now = self.clock.utc();
        let hit = self.entries.get(key).and_then(|entry| {
            self.is_fresh(entry.value(), now)
                .then(|| entry.value().records.clone())
        });
        if hit.is_none() {
            self.entries
                .remove_if(key, |_, entry| !self.is_fresh(entry, now));
        }
        Ok(hit)
    }

    async fn put(
        &self,
        key: &CacheKey,
        records: &[CityRecord],
        fetched_at: CacheGeneration,
    ) -> Result<(), ListingCacheError> {
        if fetched_at != self.generation() {
            debug!(%key, "discarding listing fetched before the last invalidation");
            return Ok(());
        }
        self.entries.insert(
            key.clone(),
            CachedListing {
                records: records.to_vec(),
                stored_at: self.clock.utc(),
                generation: fetched_at,
            },
        );
        Ok(())
    }

    async fn invalidate_all(&self) -> Result<(), ListingCacheError> {
        self.generation.fetch_add(1, Ordering::SeqCst);
        self.entries.clear();
        Ok(())
    }
}
