//! Service layer for the accommodation listing.
//! - `RecordStore` abstracts persistence; file and table backends implement it.
//! - `AccommodationService` is the backend-agnostic query layer on top.
//! - Errors use one taxonomy (`ServiceError`) and never carry protocol details.

pub mod errors;
pub mod accommodation;
pub mod storage;
pub mod file;
pub mod db;
pub mod runtime;
#[cfg(test)]
pub mod test_support;
