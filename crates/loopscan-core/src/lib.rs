#![deny(clippy::print_stdout, clippy::print_stderr)]
//! Detection of simple cycles through a source vertex, computed
//! vertex-centrically in bulk-synchronous supersteps.
//!
//! ```
//! use loopscan_core::{Dataset, MemorySink, RunConfiguration, VertexId, detect_cycles};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let source = VertexId::try_from("A")?;
//! let config = RunConfiguration::new(source).with_lengths(3, 5);
//! let (summary, sink) = detect_cycles(&Dataset::sample(), config, MemorySink::new())?;
//! assert_eq!(summary.cycles_reported, 2);
//! assert_eq!(sink.cycles()[0].to_string(), "A->B->C->A");
//! # Ok(())
//! # }
//! ```

pub mod collector;
pub mod config;
pub mod coordinator;
pub mod dataset;
pub mod error;
pub mod graph;
pub mod program;
pub mod token;

pub use collector::{
    CanonicalSignature, CycleCollector, CycleSink, DiscoveredCycle, MemorySink, TracingSink,
};
pub use config::{
    ConfigError, DEFAULT_MAX_CYCLE_LENGTH, DEFAULT_MAX_SUPERSTEPS, DEFAULT_MIN_CYCLE_LENGTH,
    MIN_CYCLE_LENGTH_FLOOR, RunConfiguration,
};
pub use coordinator::{Coordinator, RunSummary, StopHandle, Termination, detect_cycles};
pub use dataset::{Dataset, DatasetError, EdgeRecord, InvalidVertexId, VertexId};
pub use error::DetectError;
pub use graph::{CycleGraph, GraphBuildError, build_graph};
pub use program::{ComputeOutput, VertexContext, VertexState, compute};
pub use token::{Message, PathToken};

/// Returns the current version of the loopscan-core library.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
