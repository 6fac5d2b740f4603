//! Database backed stores (sea-orm).

pub mod accommodation_store;
