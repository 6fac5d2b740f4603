//! Accommodation listing: the record store abstraction and the query service on top.

pub mod store;
pub mod service;

pub use service::AccommodationService;
pub use store::RecordStore;
