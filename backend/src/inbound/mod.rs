//! Inbound adapters (driving side) that translate requests into domain calls.

pub mod http;
