//! Crop recommendation and sensor telemetry core.
//!
//! Builds an immutable in-memory model from the curated crop dataset
//! (nearest-neighbor suggestions, per-crop baselines, min/max envelopes
//! for synthetic readings) and provides the warehouse-backed sensor
//! repository behind the HTTP API.

pub mod config;
pub mod engine;
pub mod ingest;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
