//! Behaviour of the catalogue service over the in-memory store and the TTL
//! listing cache, driven by a mock clock.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use city_locator::domain::ports::{
    CityCatalogueCommand, CityCatalogueQuery, CityRecordStore, CityRecordStoreError,
};
use city_locator::domain::{
    CacheScope, CityCatalogueService, CityFields, CityId, CityRecord, NewCityRecord, SessionId,
};
use city_locator::outbound::cache::TtlListingCache;
use city_locator::outbound::record_store::InMemoryCityRecordStore;
use mockable::MockClock;
use rstest::{fixture, rstest};
use tokio::sync::Notify;

const START: i64 = 1_700_000_000;

struct World {
    now: Arc<AtomicI64>,
    store: Arc<InMemoryCityRecordStore>,
    service: CityCatalogueService<InMemoryCityRecordStore, TtlListingCache>,
}

impl World {
    fn advance(&self, seconds: i64) {
        self.now.fetch_add(seconds, Ordering::SeqCst);
    }
}

fn mock_clock(now: Arc<AtomicI64>) -> MockClock {
    let mut clock = MockClock::new();
    clock.expect_utc().returning(move || {
        DateTime::<Utc>::from_timestamp(now.load(Ordering::SeqCst), 0).expect("valid timestamp")
    });
    clock
}

fn fields(city: &str, country: &str) -> CityFields {
    CityFields::try_from_parts(city, country, "Africa", 1.0, 2.0).expect("valid fields")
}

#[fixture]
fn world() -> World {
    world_with_scope(CacheScope::Process)
}

fn world_with_scope(scope: CacheScope) -> World {
    let now = Arc::new(AtomicI64::new(START));
    let clock = Arc::new(mock_clock(Arc::clone(&now)));
    let store = Arc::new(InMemoryCityRecordStore::default());
    let cache = Arc::new(
        TtlListingCache::new(Duration::from_secs(5), clock.clone()).expect("valid ttl"),
    );
    let service = CityCatalogueService::new(Arc::clone(&store), cache, clock, scope);
    World {
        now,
        store,
        service,
    }
}

async fn a_listing_has_been_cached(world: &World, session: &SessionId) {
    world
        .service
        .add(fields("Lagos", "Nigeria"))
        .await
        .expect("add succeeds");
    let listing = world.service.list(session).await;
    assert_eq!(listing.records.len(), 1);
}

async fn another_writer_changes_the_store_directly(world: &World) {
    world
        .store
        .create(&NewCityRecord {
            fields: fields("Nairobi", "Kenya"),
            timestamp: START,
        })
        .await
        .expect("direct write succeeds");
}

async fn the_listing_has_records(world: &World, session: &SessionId, count: usize) {
    let listing = world.service.list(session).await;
    assert_eq!(listing.records.len(), count);
    assert!(listing.notice.is_none());
}

#[rstest]
#[tokio::test]
async fn stale_listing_is_served_until_the_ttl_expires(world: World) {
    let session = SessionId::random();
    a_listing_has_been_cached(&world, &session).await;
    another_writer_changes_the_store_directly(&world).await;

    world.advance(4);
    the_listing_has_records(&world, &session, 1).await;

    world.advance(1);
    the_listing_has_records(&world, &session, 2).await;
}

#[rstest]
#[tokio::test]
async fn writes_through_the_service_invalidate_immediately(world: World) {
    let session = SessionId::random();
    a_listing_has_been_cached(&world, &session).await;

    world
        .service
        .add(fields("Nairobi", "Kenya"))
        .await
        .expect("add succeeds");
    the_listing_has_records(&world, &session, 2).await;

    let first = world
        .service
        .list(&session)
        .await
        .records
        .into_iter()
        .next()
        .expect("one record");
    world
        .service
        .delete(&first.id)
        .await
        .expect("delete succeeds");
    the_listing_has_records(&world, &session, 1).await;
}

#[rstest]
#[tokio::test]
async fn added_records_carry_the_clock_timestamp(world: World) {
    world.advance(42);
    let record = world
        .service
        .add(fields("Lagos", "Nigeria"))
        .await
        .expect("add succeeds");
    assert_eq!(record.timestamp, START + 42);
}

#[tokio::test]
async fn session_scoped_caches_do_not_share_listings() {
    let world = world_with_scope(CacheScope::Session);
    let alice = SessionId::random();
    let bob = SessionId::random();

    a_listing_has_been_cached(&world, &alice).await;
    another_writer_changes_the_store_directly(&world).await;

    the_listing_has_records(&world, &alice, 1).await;
    the_listing_has_records(&world, &bob, 2).await;
}

fn lagos_moved() -> CityFields {
    CityFields::try_from_parts("Lagos", "Nigeria", "Africa", 6.45, 3.40).expect("valid fields")
}

#[rstest]
#[tokio::test]
async fn update_is_listed_with_identity_and_timestamp_unchanged(world: World) {
    let session = SessionId::random();
    let created = world
        .service
        .add(fields("Lagos", "Nigeria"))
        .await
        .expect("add succeeds");
    the_listing_has_records(&world, &session, 1).await;

    world.advance(1);
    world
        .service
        .update(&created.id, lagos_moved())
        .await
        .expect("update succeeds");

    let listing = world.service.list(&session).await;
    let record = listing.records.first().expect("one record");
    assert_eq!(record.id, created.id);
    assert_eq!(record.timestamp, created.timestamp);
    assert_eq!(record.fields.lat(), 6.45);
    assert_eq!(record.fields.lon(), 3.40);
}

#[rstest]
#[tokio::test]
async fn repeating_an_update_leaves_the_same_state(world: World) {
    let session = SessionId::random();
    let created = world
        .service
        .add(fields("Lagos", "Nigeria"))
        .await
        .expect("add succeeds");

    let once = world
        .service
        .update(&created.id, lagos_moved())
        .await
        .expect("first update succeeds");
    let after_once = world.service.list(&session).await.records;

    let twice = world
        .service
        .update(&created.id, lagos_moved())
        .await
        .expect("second update succeeds");
    let after_twice = world.service.list(&session).await.records;

    assert_eq!(once, twice);
    assert_eq!(after_once, after_twice);
    assert_eq!(after_twice.len(), 1);
}

/// Store whose first listing pauses after reading its snapshot until the
/// test releases it.
struct PausedListingStore {
    inner: InMemoryCityRecordStore,
    paused: AtomicBool,
    snapshot_taken: Notify,
    release: Notify,
}

impl PausedListingStore {
    fn new() -> Self {
        Self {
            inner: InMemoryCityRecordStore::default(),
            paused: AtomicBool::new(true),
            snapshot_taken: Notify::new(),
            release: Notify::new(),
        }
    }
}

#[async_trait]
impl CityRecordStore for PausedListingStore {
    async fn fetch_all(&self) -> Result<Vec<CityRecord>, CityRecordStoreError> {
        let snapshot = self.inner.fetch_all().await?;
        if self.paused.swap(false, Ordering::SeqCst) {
            self.snapshot_taken.notify_one();
            self.release.notified().await;
        }
        Ok(snapshot)
    }

    async fn fetch_one(&self, id: &CityId) -> Result<Option<CityRecord>, CityRecordStoreError> {
        self.inner.fetch_one(id).await
    }

    async fn create(&self, record: &NewCityRecord) -> Result<CityId, CityRecordStoreError> {
        self.inner.create(record).await
    }

    async fn replace_fields(
        &self,
        id: &CityId,
        fields: &CityFields,
    ) -> Result<(), CityRecordStoreError> {
        self.inner.replace_fields(id, fields).await
    }

    async fn remove(&self, id: &CityId) -> Result<(), CityRecordStoreError> {
        self.inner.remove(id).await
    }
}

#[tokio::test]
async fn listing_in_flight_during_a_write_is_not_cached() {
    let now = Arc::new(AtomicI64::new(START));
    let clock = Arc::new(mock_clock(Arc::clone(&now)));
    let store = Arc::new(PausedListingStore::new());
    let cache = Arc::new(
        TtlListingCache::new(Duration::from_secs(60), clock.clone()).expect("valid ttl"),
    );
    let service =
        CityCatalogueService::new(Arc::clone(&store), cache, clock, CacheScope::Process);
    let session = SessionId::random();

    let (in_flight, added) = tokio::join!(service.list(&session), async {
        store.snapshot_taken.notified().await;
        let added = service.add(fields("Lagos", "Nigeria")).await;
        store.release.notify_one();
        added
    });

    added.expect("add succeeds");
    assert!(in_flight.records.is_empty(), "snapshot predates the write");
    let listing = service.list(&session).await;
    assert_eq!(listing.records.len(), 1);
}
