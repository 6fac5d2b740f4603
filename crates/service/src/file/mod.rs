//! JSON-file backed stores.

pub mod accommodation_store;
