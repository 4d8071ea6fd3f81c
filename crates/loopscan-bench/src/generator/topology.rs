//! Topology strategies: rings through the source, mesh overlay and
//! disconnected pairs.

use loopscan_core::{Dataset, DatasetError};
use rand::Rng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use super::{GeneratorConfig, SOURCE_VERTEX};

fn vertex_name(i: usize) -> String {
    format!("v{i}")
}

/// Builds a complete dataset from the generator configuration.
pub fn build_graph_dataset(
    config: &GeneratorConfig,
    rng: &mut StdRng,
) -> Result<Dataset, DatasetError> {
    let n = config.num_vertices.max(1);
    let names: Vec<String> = (0..n).map(vertex_name).collect();
    let mut dataset = Dataset::new().vertices(names.iter().map(String::as_str))?;

    // Rings: v0 -> r1 -> ... -> r(k-1) -> v0 over distinct non-source vertices.
    let others: Vec<usize> = (1..n).collect();
    let lo = config.ring_length_min.max(2);
    let hi = config.ring_length_max.max(lo);
    for _ in 0..config.rings {
        let len = rng.gen_range(lo..=hi).min(others.len() + 1);
        if len < 2 {
            break;
        }
        let members: Vec<usize> = others.choose_multiple(rng, len - 1).copied().collect();
        let mut prev = SOURCE_VERTEX.to_owned();
        for m in members {
            dataset = dataset.edge(&prev, &names[m])?;
            prev.clone_from(&names[m]);
        }
        dataset = dataset.edge(&prev, SOURCE_VERTEX)?;
    }

    for _ in 0..config.mesh_edges {
        let from = rng.gen_range(0..n);
        let to = rng.gen_range(0..n);
        dataset = dataset.edge(&names[from], &names[to])?;
    }

    for i in 0..config.isolated_pairs {
        let a = format!("x{i}a");
        let b = format!("x{i}b");
        dataset = dataset
            .vertex(&a)?
            .vertex(&b)?
            .edge(&a, &b)?
            .edge(&b, &a)?;
    }

    Ok(dataset)
}
