//! Top-level error type for detection runs.
//!
//! Every variant except [`DetectError::Internal`] is raised before the first
//! superstep, so a failed run never reports a cycle. Hitting the superstep
//! bound is not an error; see [`crate::coordinator::Termination`].

use crate::config::ConfigError;
use crate::dataset::VertexId;
use crate::graph::GraphBuildError;

/// Errors that abort a detection run.
#[derive(Debug, thiserror::Error)]
pub enum DetectError {
    /// The run configuration is out of range.
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    /// The dataset could not be turned into a graph.
    #[error("invalid dataset: {0}")]
    Graph(#[from] GraphBuildError),

    /// The configured source is not in the vertex set.
    #[error("invalid configuration: source vertex '{0}' is not in the dataset")]
    UnknownSource(VertexId),

    /// The worker pool for parallel rounds could not be started.
    #[error("failed to start worker pool: {0}")]
    WorkerPool(#[from] rayon::ThreadPoolBuildError),

    /// The coordinator broke one of its own invariants mid-run.
    #[error("internal error in superstep {superstep}: {detail}")]
    Internal {
        /// Round in which the violation was detected.
        superstep: u64,
        /// What went wrong.
        detail: String,
    },
}

impl DetectError {
    /// Returns `true` for failures caused by the caller's input rather than
    /// by the engine.
    pub fn is_input_error(&self) -> bool {
        match self {
            Self::Config(_) | Self::Graph(_) | Self::UnknownSource(_) => true,
            Self::WorkerPool(_) | Self::Internal { .. } => false,
        }
    }
}
