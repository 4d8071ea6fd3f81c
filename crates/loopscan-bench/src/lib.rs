//! Random graph generator and benchmark utilities for loopscan.
//!
//! This crate provides deterministic generation of datasets with known
//! cycles through a source vertex, for benchmarking and property-based
//! testing of `loopscan-core`.

pub mod correctness;
pub mod generator;

pub use generator::{GeneratorConfig, SOURCE_VERTEX, SizeTier, generate_graph};
