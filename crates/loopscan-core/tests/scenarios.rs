//! End-to-end detection scenarios over small hand-built graphs.
#![allow(clippy::expect_used)]

use std::collections::BTreeSet;

use loopscan_core::{
    ConfigError, CycleCollector, Dataset, DetectError, MemorySink, PathToken, RunConfiguration,
    Termination, VertexContext, VertexId, VertexState, compute, detect_cycles,
};
use proptest::prelude::*;

fn id(s: &str) -> VertexId {
    VertexId::try_from(s).expect("valid id")
}

fn dataset(vertices: &[&str], edges: &[(&str, &str)]) -> Dataset {
    let mut d = Dataset::new()
        .vertices(vertices.iter().copied())
        .expect("valid vertices");
    for (from, to) in edges {
        d = d.edge(from, to).expect("valid edge");
    }
    d
}

fn config(min: usize, max: usize) -> RunConfiguration {
    RunConfiguration::new(id("A")).with_lengths(min, max)
}

fn run(d: &Dataset, cfg: RunConfiguration) -> Vec<String> {
    let (_, sink) = detect_cycles(d, cfg, MemorySink::new()).expect("run succeeds");
    sink.cycles().iter().map(ToString::to_string).collect()
}

const TWO_TRIANGLES: [(&str, &str); 8] = [
    ("A", "B"),
    ("B", "C"),
    ("C", "A"),
    ("A", "D"),
    ("D", "E"),
    ("E", "A"),
    ("F", "G"),
    ("G", "F"),
];

const SEVEN: [&str; 7] = ["A", "B", "C", "D", "E", "F", "G"];

// ---------------------------------------------------------------------------
// Scenarios
// ---------------------------------------------------------------------------

#[test]
fn scenario_a_two_cycle_below_min_is_not_reported() {
    let d = dataset(&["A", "B"], &[("A", "B"), ("B", "A")]);
    assert!(run(&d, config(3, 5)).is_empty());
}

#[test]
fn scenario_b_two_cycle_reported_once() {
    let d = dataset(&["A", "B"], &[("A", "B"), ("B", "A")]);
    assert_eq!(run(&d, config(2, 5)), ["A->B->A"]);
}

#[test]
fn scenario_c_two_triangles_and_nothing_from_f_g() {
    let d = dataset(&SEVEN, &TWO_TRIANGLES);
    let cycles = run(&d, config(3, 5));
    assert_eq!(cycles, ["A->B->C->A", "A->D->E->A"]);
    assert!(cycles.iter().all(|c| !c.contains('F') && !c.contains('G')));
}

#[test]
fn scenario_c_matches_builtin_sample() {
    assert_eq!(
        run(&Dataset::sample(), config(3, 5)),
        run(&dataset(&SEVEN, &TWO_TRIANGLES), config(3, 5))
    );
}

#[test]
fn scenario_d_depth_cap_drops_triangles() {
    let d = dataset(&SEVEN, &TWO_TRIANGLES);
    let (summary, sink) =
        detect_cycles(&d, RunConfiguration::new(id("A")).with_lengths(2, 2), MemorySink::new())
            .expect("runs");
    assert!(sink.cycles().is_empty());
    assert_eq!(summary.termination, Termination::Converged);
}

#[test]
fn scenario_e_self_loop_rejected_at_min_two() {
    let d = dataset(&["A"], &[("A", "A")]);
    assert!(run(&d, config(2, 5)).is_empty());
}

#[test]
fn scenario_e_self_loop_closes_when_program_allows_length_one() {
    // A run refuses min = 1, but the vertex program applies the bound it is
    // given: the seed token arriving back at A closes immediately.
    let a = id("A");
    let out_edges = [a.clone()];
    let cfg = config(1, 5);
    let seeded = VertexState {
        source_id: a.clone(),
        path: vec![a.clone()],
        visited: true,
    };
    let out = compute(
        VertexContext {
            id: &a,
            out_edges: &out_edges,
        },
        &seeded,
        &[PathToken::seed(&a)],
        &cfg,
    );
    let mut collector = CycleCollector::new(MemorySink::new());
    for token in out.cycles {
        collector.collect(token);
    }
    let cycles = collector.into_sink().into_cycles();
    assert_eq!(cycles.len(), 1);
    assert_eq!(cycles[0].len(), 1);
    assert_eq!(cycles[0].to_string(), "A->A");
}

#[test]
fn scenario_e_run_with_min_one_fails_fast() {
    let d = dataset(&["A"], &[("A", "A")]);
    let err = detect_cycles(&d, config(1, 5), MemorySink::new()).expect_err("min 1 invalid");
    assert!(matches!(
        err,
        DetectError::Config(ConfigError::MinCycleLengthTooSmall(1))
    ));
}

// ---------------------------------------------------------------------------
// Dedup and ordering
// ---------------------------------------------------------------------------

#[test]
fn reverse_orientation_is_merged_into_first_found() {
    // Both orientations of the A,B,C triangle close in round 3. B runs before
    // C in round 2, so A receives A->C->B first and that order is the one kept.
    let (summary, sink) = detect_cycles(
        &Dataset::sample_with_reverse_triangle(),
        config(3, 5),
        MemorySink::new(),
    )
    .expect("runs");
    let cycles: Vec<String> = sink.cycles().iter().map(ToString::to_string).collect();
    assert_eq!(cycles, ["A->C->B->A", "A->D->E->A"]);
    assert_eq!(summary.duplicates_suppressed, 1);
}

#[test]
fn parallel_edges_collapse_to_one_cycle() {
    let d = dataset(
        &["A", "B", "C"],
        &[("A", "B"), ("A", "B"), ("B", "C"), ("C", "A")],
    );
    let (summary, sink) = detect_cycles(&d, config(3, 5), MemorySink::new()).expect("runs");
    assert_eq!(sink.cycles().len(), 1);
    assert_eq!(summary.duplicates_suppressed, 1);
}

#[test]
fn longest_reportable_cycle_is_one_below_cap() {
    // Square A->B->C->D->A needs a path of four vertices to arrive at A,
    // which the cap of 5 allows and a cap of 4 does not.
    let d = dataset(
        &["A", "B", "C", "D"],
        &[("A", "B"), ("B", "C"), ("C", "D"), ("D", "A")],
    );
    assert_eq!(run(&d, config(3, 5)), ["A->B->C->D->A"]);
    assert!(run(&d, config(3, 4)).is_empty());
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

fn signatures(d: &Dataset, cfg: RunConfiguration) -> BTreeSet<String> {
    let (_, sink) = detect_cycles(d, cfg, MemorySink::new()).expect("run succeeds");
    sink.cycles()
        .iter()
        .map(|c| c.signature().as_str().to_owned())
        .collect()
}

proptest! {
    #[test]
    fn edge_order_does_not_change_distinct_cycles(
        edges in prop::collection::vec((0usize..6, 0usize..6), 0..20),
        seed in any::<u64>(),
    ) {
        let names = ["A", "B", "C", "D", "E", "F"];
        let pairs: Vec<(&str, &str)> = edges.iter().map(|&(f, t)| (names[f], names[t])).collect();
        let forward = dataset(&names, &pairs);

        let mut shuffled = pairs.clone();
        let len = shuffled.len();
        if len > 1 {
            shuffled.rotate_left((seed as usize) % len);
            shuffled.reverse();
        }
        let backward = dataset(&names, &shuffled);

        let cfg = config(2, 6);
        prop_assert_eq!(signatures(&forward, cfg.clone()), signatures(&backward, cfg));
    }

    #[test]
    fn supersteps_never_exceed_bound(
        edges in prop::collection::vec((0usize..5, 0usize..5), 0..25),
        bound in 1u64..8,
    ) {
        let names = ["A", "B", "C", "D", "E"];
        let pairs: Vec<(&str, &str)> = edges.iter().map(|&(f, t)| (names[f], names[t])).collect();
        let d = dataset(&names, &pairs);
        let cfg = config(2, 6).with_max_supersteps(bound);
        let (summary, _) = detect_cycles(&d, cfg, MemorySink::new()).expect("runs");
        prop_assert!(summary.supersteps <= bound);
        prop_assert!(summary.supersteps >= 1);
    }
}
