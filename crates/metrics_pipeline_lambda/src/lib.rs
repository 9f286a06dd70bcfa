//! AWS-oriented adapters and handlers for the metrics pipeline.
//!
//! This crate owns runtime integration details (Lambda handler, storage and
//! stack-metadata adapters, environment configuration) on top of the pure
//! contracts in `metrics_pipeline_core`.

pub mod adapters;
pub mod config;
pub mod error;
pub mod handlers;
pub mod logging;
pub mod scraper;
