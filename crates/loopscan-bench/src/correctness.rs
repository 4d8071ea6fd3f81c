//! Post-run invariant checkers for correctness validation.

use std::collections::{BTreeSet, HashSet};

use loopscan_core::{
    CanonicalSignature, CycleGraph, DiscoveredCycle, RunConfiguration, RunSummary, Termination,
    VertexId,
};
use petgraph::stable_graph::NodeIndex;

/// Verifies a single reported cycle:
/// - closes at the configured source
/// - length within `min_cycle_length ..= max_cycle_length - 1`
/// - every consecutive pair is connected by a real edge
/// - no vertex repeats except the closing source
pub fn check_cycle(
    graph: &CycleGraph,
    config: &RunConfiguration,
    cycle: &DiscoveredCycle,
) -> Result<(), String> {
    let path = &cycle.path;
    if cycle.source != config.source {
        return Err(format!("cycle {cycle} reported for wrong source"));
    }
    let (Some(first), Some(last)) = (path.first(), path.last()) else {
        return Err("cycle path is empty".to_owned());
    };
    if *first != config.source || *last != config.source {
        return Err(format!("cycle {cycle} does not start and end at the source"));
    }

    let len = cycle.len();
    if len < config.min_cycle_length || len >= config.max_cycle_length {
        return Err(format!(
            "cycle {cycle} has length {len}, outside {}..{}",
            config.min_cycle_length, config.max_cycle_length
        ));
    }

    for pair in path.windows(2) {
        if !graph.has_edge(&pair[0], &pair[1]) {
            return Err(format!("cycle {cycle} uses missing edge {}->{}", pair[0], pair[1]));
        }
    }

    let interior: HashSet<&str> = cycle.vertices().iter().map(VertexId::as_str).collect();
    if interior.len() != cycle.vertices().len() {
        return Err(format!("cycle {cycle} repeats a vertex"));
    }
    Ok(())
}

/// Verifies the run as a whole: every cycle passes [`check_cycle`], no two
/// share a signature, and the summary counters agree with the cycle list.
pub fn check_run(
    graph: &CycleGraph,
    config: &RunConfiguration,
    summary: &RunSummary,
    cycles: &[DiscoveredCycle],
) -> Result<(), String> {
    let mut signatures: HashSet<CanonicalSignature> = HashSet::new();
    for cycle in cycles {
        check_cycle(graph, config, cycle)?;
        if !signatures.insert(cycle.signature()) {
            return Err(format!("signature of {cycle} reported twice"));
        }
    }

    if summary.cycles_reported != cycles.len() {
        return Err(format!(
            "summary reports {} cycles, sink received {}",
            summary.cycles_reported,
            cycles.len()
        ));
    }
    if summary.supersteps > config.max_supersteps {
        return Err(format!(
            "{} supersteps exceeds bound {}",
            summary.supersteps, config.max_supersteps
        ));
    }

    // Tokens die once their path reaches max_cycle_length, so with enough
    // rounds the run always drains by then.
    let rounds_needed = config.max_cycle_length as u64;
    if config.max_supersteps >= rounds_needed {
        if summary.termination != Termination::Converged {
            return Err(format!("expected convergence, got {}", summary.termination));
        }
        if summary.supersteps > rounds_needed {
            return Err(format!(
                "converged after {} supersteps, expected at most {rounds_needed}",
                summary.supersteps
            ));
        }
    }
    Ok(())
}

/// Enumerates, by depth-first search, the signatures of every simple cycle
/// through the source that a converged run must report.
pub fn reference_signatures(graph: &CycleGraph, config: &RunConfiguration) -> BTreeSet<String> {
    let mut found = BTreeSet::new();
    let Some(start) = graph.index_of(&config.source) else {
        return found;
    };
    let mut path = vec![start];
    extend(graph, config, &mut path, &mut found);
    found
}

fn extend(
    graph: &CycleGraph,
    config: &RunConfiguration,
    path: &mut Vec<NodeIndex>,
    found: &mut BTreeSet<String>,
) {
    let (Some(&start), Some(&tip)) = (path.first(), path.last()) else {
        return;
    };
    for next in graph.successors(tip) {
        if next == start {
            if path.len() >= config.min_cycle_length {
                let ids: Vec<_> = path
                    .iter()
                    .filter_map(|&i| graph.vertex_id(i).cloned())
                    .collect();
                found.insert(CanonicalSignature::of(&ids).as_str().to_owned());
            }
        } else if !path.contains(&next) && path.len() + 1 < config.max_cycle_length {
            path.push(next);
            extend(graph, config, path, found);
            path.pop();
        }
    }
}
