/// Per-vertex state transition executed once per superstep.
///
/// [`compute`] is a pure function of the vertex, its state, its inbound
/// tokens and the run configuration. It never touches other vertices; the
/// coordinator applies the returned state and routes the returned messages.
///
/// # Seed step
///
/// The first time the source vertex runs (its bookkeeping path is empty) it
/// records itself, marks itself visited and sends a fresh
/// `{origin: source, path: [source]}` token along every outgoing edge.
/// Inbound tokens are ignored on that invocation.
///
/// # Propagation step
///
/// Every other invocation checks each inbound token independently, in this
/// order:
/// 1. already a cycle → report it unchanged;
/// 2. at its origin with `len >= min_cycle_length` → close and report;
/// 3. path already contains this vertex → drop;
/// 4. otherwise extend with this vertex and, if the new length is still
///    below `max_cycle_length`, send one copy per outgoing edge.
use crate::config::RunConfiguration;
use crate::dataset::VertexId;
use crate::token::{Message, PathToken};

/// Mutable per-run record kept for every vertex.
///
/// Only the source vertex ever fills `path`; for it, a non-empty path means
/// the seed tokens have gone out. Everything else about an exploration
/// travels in the tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VertexState {
    /// The run's source vertex.
    pub source_id: VertexId,
    /// Seed bookkeeping; see the type docs.
    pub path: Vec<VertexId>,
    /// Set once the vertex has executed at least once.
    pub visited: bool,
}

impl VertexState {
    /// Fresh, unvisited state for a run rooted at `source`.
    pub fn new(source: &VertexId) -> Self {
        Self {
            source_id: source.clone(),
            path: Vec::new(),
            visited: false,
        }
    }
}

/// Read-only view of the vertex being computed.
#[derive(Debug, Clone, Copy)]
pub struct VertexContext<'a> {
    /// Key of the vertex.
    pub id: &'a VertexId,
    /// Heads of its outgoing edges, one entry per edge.
    pub out_edges: &'a [VertexId],
}

/// Everything one invocation produces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComputeOutput {
    /// Replacement state for the vertex.
    pub state: VertexState,
    /// Messages to deliver at the start of the next superstep.
    pub messages: Vec<Message>,
    /// Closed cycles for the collector.
    pub cycles: Vec<PathToken>,
}

/// Returns `true` if `id` is the source and has not sent its seed tokens.
pub fn needs_seed(id: &VertexId, state: &VertexState, config: &RunConfiguration) -> bool {
    *id == config.source && state.path.is_empty()
}

/// Runs the vertex program for one vertex in one superstep.
pub fn compute(
    vertex: VertexContext<'_>,
    state: &VertexState,
    inbox: &[PathToken],
    config: &RunConfiguration,
) -> ComputeOutput {
    let mut next = state.clone();

    if needs_seed(vertex.id, state, config) {
        next.path.push(config.source.clone());
        next.visited = true;
        let seed = PathToken::seed(&config.source);
        return ComputeOutput {
            state: next,
            messages: fan_out(vertex.out_edges, &seed),
            cycles: Vec::new(),
        };
    }

    let mut messages = Vec::new();
    let mut cycles = Vec::new();

    for token in inbox {
        if token.is_cycle {
            cycles.push(token.clone());
            continue;
        }

        if *vertex.id == token.origin && token.len() >= config.min_cycle_length {
            cycles.push(token.clone().closed_at(vertex.id));
            continue;
        }

        if token.visits(vertex.id) {
            continue;
        }

        let extended = token.extended(vertex.id);
        if extended.len() < config.max_cycle_length {
            messages.extend(fan_out(vertex.out_edges, &extended));
        }
    }

    next.visited = true;
    ComputeOutput {
        state: next,
        messages,
        cycles,
    }
}

/// One independent copy of `token` per outgoing edge.
fn fan_out(out_edges: &[VertexId], token: &PathToken) -> Vec<Message> {
    out_edges
        .iter()
        .map(|target| Message {
            target: target.clone(),
            payload: token.clone(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used)]

    use super::*;

    fn id(s: &str) -> VertexId {
        VertexId::try_from(s).expect("valid id")
    }

    fn ids(keys: &[&str]) -> Vec<VertexId> {
        keys.iter().map(|k| id(k)).collect()
    }

    fn config(min: usize, max: usize) -> RunConfiguration {
        RunConfiguration::new(id("A")).with_lengths(min, max)
    }

    fn open(path: &[&str]) -> PathToken {
        PathToken {
            origin: id(path[0]),
            path: ids(path),
            is_cycle: false,
        }
    }

    fn run(
        vertex: &str,
        out: &[&str],
        state: &VertexState,
        inbox: &[PathToken],
        cfg: &RunConfiguration,
    ) -> ComputeOutput {
        let vid = id(vertex);
        let out_edges = ids(out);
        compute(
            VertexContext {
                id: &vid,
                out_edges: &out_edges,
            },
            state,
            inbox,
            cfg,
        )
    }

    fn seeded_source() -> VertexState {
        VertexState {
            source_id: id("A"),
            path: ids(&["A"]),
            visited: true,
        }
    }

    #[test]
    fn source_seeds_every_out_edge() {
        let cfg = config(3, 5);
        let out = run("A", &["B", "D"], &VertexState::new(&id("A")), &[], &cfg);
        assert_eq!(out.state.path, ids(&["A"]));
        assert!(out.state.visited);
        let targets: Vec<&str> = out.messages.iter().map(|m| m.target.as_str()).collect();
        assert_eq!(targets, ["B", "D"]);
        assert!(out.messages.iter().all(|m| m.payload == open(&["A"])));
        assert!(out.cycles.is_empty());
    }

    #[test]
    fn seed_step_ignores_inbox() {
        let cfg = config(2, 5);
        let inbox = [open(&["A", "B"])];
        let out = run("A", &["B"], &VertexState::new(&id("A")), &inbox, &cfg);
        assert!(out.cycles.is_empty());
        assert_eq!(out.messages.len(), 1);
        assert_eq!(out.messages[0].payload, open(&["A"]));
    }

    #[test]
    fn non_source_never_seeds() {
        let cfg = config(3, 5);
        let out = run("B", &["C"], &VertexState::new(&id("A")), &[], &cfg);
        assert!(out.messages.is_empty());
        assert!(out.state.path.is_empty());
        assert!(out.state.visited);
    }

    #[test]
    fn intermediate_vertex_extends_and_forwards() {
        let cfg = config(3, 5);
        let state = VertexState::new(&id("A"));
        let out = run("B", &["C", "E"], &state, &[open(&["A"])], &cfg);
        assert_eq!(out.messages.len(), 2);
        for m in &out.messages {
            assert_eq!(m.payload, open(&["A", "B"]));
        }
    }

    #[test]
    fn closure_at_origin_reports_closed_path() {
        let cfg = config(3, 5);
        let out = run("A", &["B"], &seeded_source(), &[open(&["A", "B", "C"])], &cfg);
        assert_eq!(out.cycles.len(), 1);
        assert!(out.cycles[0].is_cycle);
        assert_eq!(out.cycles[0].path, ids(&["A", "B", "C", "A"]));
        assert!(out.messages.is_empty());
    }

    #[test]
    fn short_return_to_origin_is_dropped() {
        let cfg = config(3, 5);
        let out = run("A", &["B"], &seeded_source(), &[open(&["A", "B"])], &cfg);
        assert!(out.cycles.is_empty());
        assert!(out.messages.is_empty());
    }

    #[test]
    fn revisit_is_dropped() {
        let cfg = config(3, 6);
        let state = VertexState::new(&id("A"));
        let out = run("B", &["C"], &state, &[open(&["A", "B", "C"])], &cfg);
        assert!(out.messages.is_empty());
        assert!(out.cycles.is_empty());
    }

    #[test]
    fn depth_bound_drops_token() {
        let cfg = config(3, 3);
        let state = VertexState::new(&id("A"));
        let out = run("C", &["A"], &state, &[open(&["A", "B"])], &cfg);
        assert!(out.messages.is_empty());
    }

    #[test]
    fn completed_cycle_is_reported_unchanged() {
        let cfg = config(3, 5);
        let done = open(&["A", "B", "C"]).closed_at(&id("A"));
        let out = run("B", &["C"], &VertexState::new(&id("A")), &[done.clone()], &cfg);
        assert_eq!(out.cycles, vec![done]);
        assert!(out.messages.is_empty());
    }

    #[test]
    fn tokens_in_one_batch_are_independent() {
        let cfg = config(2, 5);
        let inbox = [open(&["A", "B"]), open(&["A"]), open(&["A", "C"])];
        let out = run("A", &["B"], &seeded_source(), &inbox, &cfg);
        // [A,B] and [A,C] close; [A] is a revisit.
        assert_eq!(out.cycles.len(), 2);
        assert!(out.messages.is_empty());
    }

    #[test]
    fn self_loop_closes_only_when_min_allows() {
        let after_seed = seeded_source();
        let inbox = [open(&["A"])];

        let strict = run("A", &["A"], &after_seed, &inbox, &config(2, 5));
        assert!(strict.cycles.is_empty());

        let loose = run("A", &["A"], &after_seed, &inbox, &config(1, 5));
        assert_eq!(loose.cycles.len(), 1);
        assert_eq!(loose.cycles[0].path, ids(&["A", "A"]));
    }

    #[test]
    fn needs_seed_only_for_unseeded_source() {
        let cfg = config(3, 5);
        assert!(needs_seed(&id("A"), &VertexState::new(&id("A")), &cfg));
        assert!(!needs_seed(&id("A"), &seeded_source(), &cfg));
        assert!(!needs_seed(&id("B"), &VertexState::new(&id("A")), &cfg));
    }
}
