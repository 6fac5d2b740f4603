//! Storage abstractions for service layer
//!
//! Contains the reusable file-backed document store used by the file backend.

pub mod json_array_store;
