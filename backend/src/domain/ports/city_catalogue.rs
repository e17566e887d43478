//! Driving ports for managing city records.
//!
//! Queries degrade to an empty listing plus a notice when the store is down;
//! commands return explicit errors.

use async_trait::async_trait;

use crate::domain::{CityFields, CityId, CityRecord, Error, Notice, SessionId};

/// Result of listing the catalogue.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CityListing {
    /// Records ordered by identifier.
    pub records: Vec<CityRecord>,
    /// Set when the listing could not be fetched and is empty as a result.
    pub notice: Option<Notice>,
}

/// Read side of the catalogue.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CityCatalogueQuery: Send + Sync {
    /// List every record on behalf of the given admin session.
    async fn list(&self, session: &SessionId) -> CityListing;
}

/// Write side of the catalogue.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CityCatalogueCommand: Send + Sync {
    /// Create a record, returning it with its assigned id and timestamp.
    async fn add(&self, fields: CityFields) -> Result<CityRecord, Error>;

    /// Replace the mutable fields of an existing record.
    async fn update(&self, id: &CityId, fields: CityFields) -> Result<CityRecord, Error>;

    /// Remove an existing record.
    async fn delete(&self, id: &CityId) -> Result<(), Error>;
}
