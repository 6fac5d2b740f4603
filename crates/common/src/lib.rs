//! Shared building blocks for the accommodation service crates:
//! response types, logging setup, and runtime environment checks.

pub mod types;
pub mod utils;
pub mod env;
