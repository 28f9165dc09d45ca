//! gpxkit Test - Fixtures and strategies for codec validation
//!
//! This crate provides:
//! - Seeded random GPX graphs, restricted per schema version
//! - Proptest strategies for scalar values and whole documents
//! - Round-trip and mode-acceptance integration tests (`tests/`)
//! - Criterion benchmarks for the XML and binary codecs (`benches/`)

pub mod fixtures;
pub mod strategies;

pub use fixtures::*;
pub use strategies::*;
