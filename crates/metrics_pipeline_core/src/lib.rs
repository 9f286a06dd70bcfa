//! Shared metrics pipeline domain primitives.
//!
//! This crate owns payload contracts, request parsing, numeric coercion for
//! storage, and synthetic data generation. It intentionally excludes AWS SDK
//! and Lambda runtime concerns.

pub mod coercion;
pub mod contract;
pub mod storage_keys;
pub mod synthetic;
