//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **record_store**: REST document store client plus an in-memory stand-in
//! - **cache**: in-process TTL cache for record listings
//!
//! Adapters are thin translators between domain types and infrastructure
//! representations. They contain no business logic.

pub mod cache;
pub mod record_store;
