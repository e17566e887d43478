//! Behavioural coverage for the catalogue service.

use std::sync::Arc;

use chrono::{DateTime, Local, TimeZone, Utc};
use mockable::Clock;
use rstest::{fixture, rstest};

use super::*;
use crate::domain::ErrorCode;
use crate::domain::NoticeLevel;
use crate::domain::ports::{
    CacheGeneration, ListingCacheError, MockCityRecordStore, MockListingCache,
};

struct FixtureClock {
    utc_now: DateTime<Utc>,
}

impl Clock for FixtureClock {
    fn local(&self) -> DateTime<Local> {
        self.utc_now.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.utc_now
    }
}

const FIXTURE_SECONDS: i64 = 1_700_000_000;

fn fixture_clock() -> Arc<dyn Clock> {
    let utc_now = Utc
        .timestamp_opt(FIXTURE_SECONDS, 0)
        .single()
        .expect("valid fixture timestamp");
    Arc::new(FixtureClock { utc_now })
}

fn lagos() -> CityFields {
    CityFields::try_from_parts("Lagos", "Nigeria", "Africa", 6.5244, 3.3792).expect("valid fields")
}

fn lagos_island() -> CityFields {
    CityFields::try_from_parts("Lagos Island", "Nigeria", "Africa", 6.45, 3.4).expect("valid")
}

fn stored(id: &str, fields: CityFields) -> CityRecord {
    CityRecord {
        id: CityId::new(id).expect("valid id"),
        fields,
        timestamp: 1_600_000_000,
    }
}

#[fixture]
fn session() -> SessionId {
    SessionId::random()
}

fn make_service(
    store: MockCityRecordStore,
    cache: MockListingCache,
    scope: CacheScope,
) -> CityCatalogueService<MockCityRecordStore, MockListingCache> {
    CityCatalogueService::new(Arc::new(store), Arc::new(cache), fixture_clock(), scope)
}

fn transport_error() -> CityRecordStoreError {
    CityRecordStoreError::transport("connection refused")
}

#[rstest]
#[tokio::test]
async fn list_miss_fetches_from_store_and_caches(session: SessionId) {
    let mut store = MockCityRecordStore::new();
    store
        .expect_fetch_all()
        .times(1)
        .return_once(|| Ok(vec![stored("a1", lagos())]));
    let mut cache = MockListingCache::new();
    cache
        .expect_generation()
        .return_const(CacheGeneration::default());
    cache
        .expect_get()
        .withf(|key| key.as_str() == "cities:list")
        .times(1)
        .return_once(|_| Ok(None));
    cache
        .expect_put()
        .withf(|key, records, fetched_at| {
            key.as_str() == "cities:list"
                && records.len() == 1
                && *fetched_at == CacheGeneration::default()
        })
        .times(1)
        .return_once(|_, _, _| Ok(()));

    let listing = make_service(store, cache, CacheScope::Process)
        .list(&session)
        .await;

    assert_eq!(listing.records, vec![stored("a1", lagos())]);
    assert!(listing.notice.is_none());
}

#[rstest]
#[tokio::test]
async fn list_hit_skips_the_store(session: SessionId) {
    let mut store = MockCityRecordStore::new();
    store.expect_fetch_all().times(0);
    let mut cache = MockListingCache::new();
    cache
        .expect_generation()
        .return_const(CacheGeneration::default());
    cache
        .expect_get()
        .times(1)
        .return_once(|_| Ok(Some(vec![stored("a1", lagos())])));
    cache.expect_put().times(0);

    let listing = make_service(store, cache, CacheScope::Process)
        .list(&session)
        .await;

    assert_eq!(listing.records.len(), 1);
}

#[rstest]
#[tokio::test]
async fn session_scope_partitions_cache_keys(session: SessionId) {
    let expected = format!("session:{session}:cities:list");
    let mut store = MockCityRecordStore::new();
    store.expect_fetch_all().return_once(|| Ok(Vec::new()));
    let mut cache = MockListingCache::new();
    cache
        .expect_generation()
        .return_const(CacheGeneration::default());
    let get_key = expected.clone();
    cache
        .expect_get()
        .withf(move |key| key.as_str() == get_key)
        .times(1)
        .return_once(|_| Ok(None));
    cache
        .expect_put()
        .withf(move |key, _, _| key.as_str() == expected)
        .times(1)
        .return_once(|_, _, _| Ok(()));

    let listing = make_service(store, cache, CacheScope::Session)
        .list(&session)
        .await;

    assert!(listing.records.is_empty());
}

#[rstest]
#[tokio::test]
async fn list_failure_degrades_to_empty_listing_with_notice(session: SessionId) {
    let mut store = MockCityRecordStore::new();
    store
        .expect_fetch_all()
        .times(1)
        .return_once(|| Err(transport_error()));
    let mut cache = MockListingCache::new();
    cache
        .expect_generation()
        .return_const(CacheGeneration::default());
    cache.expect_get().return_once(|_| Ok(None));
    cache.expect_put().times(0);

    let listing = make_service(store, cache, CacheScope::Process)
        .list(&session)
        .await;

    assert!(listing.records.is_empty());
    let notice = listing.notice.expect("failure notice");
    assert_eq!(notice.level(), NoticeLevel::Error);
    assert!(notice.message().starts_with("Error fetching data:"));
    assert!(notice.message().contains("connection refused"));
}

#[rstest]
#[tokio::test]
async fn list_survives_cache_read_failure(session: SessionId) {
    let mut store = MockCityRecordStore::new();
    store
        .expect_fetch_all()
        .times(1)
        .return_once(|| Ok(vec![stored("a1", lagos())]));
    let mut cache = MockListingCache::new();
    cache
        .expect_generation()
        .return_const(CacheGeneration::default());
    cache
        .expect_get()
        .return_once(|_| Err(ListingCacheError::backend("poisoned")));
    cache.expect_put().return_once(|_, _, _| Ok(()));

    let listing = make_service(store, cache, CacheScope::Process)
        .list(&session)
        .await;

    assert_eq!(listing.records.len(), 1);
    assert!(listing.notice.is_none());
}

#[tokio::test]
async fn add_stamps_creation_time_and_invalidates() {
    let mut store = MockCityRecordStore::new();
    store
        .expect_create()
        .withf(|record| record.timestamp == FIXTURE_SECONDS && record.fields.city() == "Lagos")
        .times(1)
        .return_once(|_| Ok(CityId::new("-Nx1").expect("valid id")));
    let mut cache = MockListingCache::new();
    cache
        .expect_invalidate_all()
        .times(1)
        .return_once(|| Ok(()));

    let record = make_service(store, cache, CacheScope::Process)
        .add(lagos())
        .await
        .expect("add succeeds");

    assert_eq!(record.id.as_ref(), "-Nx1");
    assert_eq!(record.timestamp, FIXTURE_SECONDS);
    assert_eq!(record.fields, lagos());
}

#[tokio::test]
async fn failed_add_still_invalidates_and_reports_unavailable() {
    let mut store = MockCityRecordStore::new();
    store
        .expect_create()
        .times(1)
        .return_once(|_| Err(transport_error()));
    let mut cache = MockListingCache::new();
    cache
        .expect_invalidate_all()
        .times(1)
        .return_once(|| Ok(()));

    let error = make_service(store, cache, CacheScope::Process)
        .add(lagos())
        .await
        .expect_err("add fails");

    assert_eq!(error.code(), ErrorCode::ServiceUnavailable);
}

#[tokio::test]
async fn add_succeeds_when_invalidation_fails() {
    let mut store = MockCityRecordStore::new();
    store
        .expect_create()
        .return_once(|_| Ok(CityId::new("-Nx1").expect("valid id")));
    let mut cache = MockListingCache::new();
    cache
        .expect_invalidate_all()
        .times(1)
        .return_once(|| Err(ListingCacheError::backend("down")));

    let result = make_service(store, cache, CacheScope::Process)
        .add(lagos())
        .await;

    assert!(result.is_ok());
}

#[tokio::test]
async fn update_keeps_identifier_and_timestamp() {
    let mut store = MockCityRecordStore::new();
    store
        .expect_fetch_one()
        .withf(|id| id.as_ref() == "a1")
        .times(1)
        .return_once(|_| Ok(Some(stored("a1", lagos()))));
    store
        .expect_replace_fields()
        .withf(|id, fields| id.as_ref() == "a1" && fields.city() == "Lagos Island")
        .times(1)
        .return_once(|_, _| Ok(()));
    let mut cache = MockListingCache::new();
    cache
        .expect_invalidate_all()
        .times(1)
        .return_once(|| Ok(()));

    let id = CityId::new("a1").expect("valid id");
    let record = make_service(store, cache, CacheScope::Process)
        .update(&id, lagos_island())
        .await
        .expect("update succeeds");

    assert_eq!(record, stored("a1", lagos_island()));
}

#[tokio::test]
async fn update_of_unknown_record_is_not_found_and_writes_nothing() {
    let mut store = MockCityRecordStore::new();
    store.expect_fetch_one().return_once(|_| Ok(None));
    store.expect_replace_fields().times(0);
    let mut cache = MockListingCache::new();
    cache.expect_invalidate_all().times(0);

    let id = CityId::new("missing").expect("valid id");
    let error = make_service(store, cache, CacheScope::Process)
        .update(&id, lagos())
        .await
        .expect_err("update fails");

    assert_eq!(error.code(), ErrorCode::NotFound);
    let details = error.details().expect("details");
    assert_eq!(details["id"], "missing");
}

#[tokio::test]
async fn delete_removes_existing_record_and_invalidates() {
    let mut store = MockCityRecordStore::new();
    store
        .expect_fetch_one()
        .return_once(|_| Ok(Some(stored("a1", lagos()))));
    store
        .expect_remove()
        .withf(|id| id.as_ref() == "a1")
        .times(1)
        .return_once(|_| Ok(()));
    let mut cache = MockListingCache::new();
    cache
        .expect_invalidate_all()
        .times(1)
        .return_once(|| Ok(()));

    let id = CityId::new("a1").expect("valid id");
    make_service(store, cache, CacheScope::Process)
        .delete(&id)
        .await
        .expect("delete succeeds");
}

#[rstest]
#[case(CityRecordStoreError::timeout("5s elapsed"), ErrorCode::ServiceUnavailable)]
#[case(CityRecordStoreError::status(502_u16, "bad gateway"), ErrorCode::ServiceUnavailable)]
#[case(CityRecordStoreError::decode("expected map"), ErrorCode::InternalError)]
#[tokio::test]
async fn delete_maps_store_failures(
    #[case] failure: CityRecordStoreError,
    #[case] expected: ErrorCode,
) {
    let mut store = MockCityRecordStore::new();
    store
        .expect_fetch_one()
        .return_once(|_| Ok(Some(stored("a1", lagos()))));
    store.expect_remove().return_once(move |_| Err(failure));
    let mut cache = MockListingCache::new();
    cache
        .expect_invalidate_all()
        .times(1)
        .return_once(|| Ok(()));

    let id = CityId::new("a1").expect("valid id");
    let error = make_service(store, cache, CacheScope::Process)
        .delete(&id)
        .await
        .expect_err("delete fails");

    assert_eq!(error.code(), expected);
}

#[rstest]
#[case("process", CacheScope::Process)]
#[case("Session", CacheScope::Session)]
#[case(" session ", CacheScope::Session)]
fn cache_scope_parses(#[case] raw: &str, #[case] expected: CacheScope) {
    assert_eq!(raw.parse::<CacheScope>().expect("valid scope"), expected);
}

#[test]
fn cache_scope_rejects_unknown_values() {
    let error = "cluster".parse::<CacheScope>().expect_err("invalid scope");
    assert!(error.to_string().contains("cluster"));
}
