//! Driven port for the remote city record store.
//!
//! The store is a schemaless collection mapping generated identifiers to
//! flat field sets. Adapters own transport and decoding; they never decide
//! whether a missing record is an error, that policy lives in the domain
//! service.

use async_trait::async_trait;

use crate::domain::{CityFields, CityId, CityRecord, NewCityRecord};

use super::define_port_error;

define_port_error! {
    /// Errors raised by record store adapters.
    pub enum CityRecordStoreError {
        /// Network failure before a response arrived.
        Transport { message: String } => "record store transport failed: {message}",
        /// The call exceeded the configured timeout.
        Timeout { message: String } => "record store timed out: {message}",
        /// The store answered with a non-success status.
        Status { status: u16, message: String } =>
            "record store rejected the call with status {status}: {message}",
        /// The response body could not be decoded.
        Decode { message: String } => "record store response could not be decoded: {message}",
    }
}

/// Port for reading and writing city records.
///
/// Implementations must:
/// - return an empty list (not an error) for an empty collection;
/// - omit entries that do not decode into a complete record;
/// - assign identifiers on `create` that are never reused.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CityRecordStore: Send + Sync {
    /// Fetch every record in one round trip, ordered by identifier.
    async fn fetch_all(&self) -> Result<Vec<CityRecord>, CityRecordStoreError>;

    /// Fetch a single record, `None` when the identifier is unknown.
    async fn fetch_one(&self, id: &CityId) -> Result<Option<CityRecord>, CityRecordStoreError>;

    /// Create a record and return the identifier the store assigned.
    async fn create(&self, record: &NewCityRecord) -> Result<CityId, CityRecordStoreError>;

    /// Replace the five mutable fields of an existing record.
    async fn replace_fields(
        &self,
        id: &CityId,
        fields: &CityFields,
    ) -> Result<(), CityRecordStoreError>;

    /// Remove a record.
    async fn remove(&self, id: &CityId) -> Result<(), CityRecordStoreError>;
}
