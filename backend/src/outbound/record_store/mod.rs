//! Record store adapters.
//!
//! `RestCityRecordStore` talks to the remote document store; the in-memory
//! store backs local development and tests.

mod dto;
mod memory_store;
mod rest_store;

pub use memory_store::InMemoryCityRecordStore;
pub use rest_store::{RestCityRecordStore, RestStoreConfigError};
