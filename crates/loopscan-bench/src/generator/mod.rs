//! Cycle-rich graph generator.
//!
//! Produces [`Dataset`] instances with a configurable number of rings
//! through the source vertex, a random mesh over the remaining vertices and
//! some disconnected two-cycles the source can never reach.

pub mod topology;

use loopscan_core::{Dataset, DatasetError};
use rand::SeedableRng;
use rand::rngs::StdRng;

use topology::build_graph_dataset;

/// Key of the vertex every generated ring passes through.
pub const SOURCE_VERTEX: &str = "v0";

/// Configuration for the graph generator.
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    /// Seed for the random number generator (deterministic).
    pub seed: u64,
    /// Vertices in the connected part, including the source.
    pub num_vertices: usize,
    /// Rings through the source.
    pub rings: usize,
    /// Shortest ring, in edges.
    pub ring_length_min: usize,
    /// Longest ring, in edges.
    pub ring_length_max: usize,
    /// Extra random edges between any two connected-part vertices.
    pub mesh_edges: usize,
    /// Disconnected `x{i}a <-> x{i}b` pairs.
    pub isolated_pairs: usize,
}

/// Predefined size tiers for benchmarking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeTier {
    /// 12 vertices, a handful of short rings
    Small,
    /// 200 vertices, sparse mesh
    Medium,
    /// 2000 vertices, sparse mesh
    Large,
}

impl SizeTier {
    /// Returns the default `GeneratorConfig` for this size tier.
    pub fn config(self, seed: u64) -> GeneratorConfig {
        match self {
            SizeTier::Small => GeneratorConfig {
                seed,
                num_vertices: 12,
                rings: 4,
                ring_length_min: 2,
                ring_length_max: 5,
                mesh_edges: 10,
                isolated_pairs: 1,
            },
            SizeTier::Medium => GeneratorConfig {
                seed,
                num_vertices: 200,
                rings: 20,
                ring_length_min: 3,
                ring_length_max: 6,
                mesh_edges: 300,
                isolated_pairs: 5,
            },
            SizeTier::Large => GeneratorConfig {
                seed,
                num_vertices: 2000,
                rings: 60,
                ring_length_min: 3,
                ring_length_max: 6,
                mesh_edges: 2500,
                isolated_pairs: 20,
            },
        }
    }
}

/// Generates a dataset from the given configuration.
///
/// All randomness is deterministic, seeded from `config.seed`.
///
/// # Errors
///
/// Returns [`DatasetError`] only if a generated key is invalid, which the
/// `v{n}` / `x{n}a` naming scheme never produces.
pub fn generate_graph(config: &GeneratorConfig) -> Result<Dataset, DatasetError> {
    let mut rng = StdRng::seed_from_u64(config.seed);
    build_graph_dataset(config, &mut rng)
}
