//! Domain primitives, services and ports.
//!
//! Purpose: define strongly typed city records, the admin login gate and the
//! catalogue service that fronts the remote record store. Adapters depend on
//! this module; it depends on none of them.
//!
//! Public surface:
//! - `Error` / `ErrorCode`: transport-agnostic failure payload.
//! - `CityId`, `CityFields`, `CityRecord`: validated record types.
//! - `CityCatalogueService`: cached reads and invalidating writes.
//! - `CityDirectory`: built-in read-only lookup table.

mod auth;
mod city;
mod city_catalogue_service;
mod city_directory;
pub mod error;
mod notice;
pub mod ports;
mod trace_id;

pub use self::auth::{
    AdminAccount, AdminIdentity, LoginCredentials, LoginValidationError, SessionId,
};
pub use self::city::{CityFields, CityId, CityRecord, CityValidationError, NewCityRecord};
pub use self::city_catalogue_service::{CacheScope, CityCatalogueService, ParseCacheScopeError};
pub use self::city_directory::{CityDirectory, DirectoryEntry};
pub use self::error::{Error, ErrorCode, ErrorValidationError, TRACE_ID_HEADER};
pub use self::notice::{Notice, NoticeLevel};
pub use self::trace_id::TraceId;
