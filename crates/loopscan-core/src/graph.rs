/// Static directed graph built from a [`Dataset`] using `petgraph`.
///
/// Wraps a `StableDiGraph` whose node weights are [`VertexId`]s and whose
/// edge weights point back at the originating [`EdgeRecord`], and keeps a
/// `HashMap<VertexId, NodeIndex>` for O(1) key lookup.
///
/// # Two-Pass Construction
///
/// [`build_graph`] runs two passes over the dataset:
/// 1. **Vertex pass**: inserts every vertex and records the
///    `VertexId → NodeIndex` mapping. Fails on duplicate keys.
/// 2. **Edge pass**: resolves `from`/`to` keys and inserts edges. Fails if
///    either endpoint is absent, rather than skipping the edge.
///
/// [`EdgeRecord`]: crate::dataset::EdgeRecord
use std::collections::HashMap;

use petgraph::Direction;
use petgraph::stable_graph::{NodeIndex, StableDiGraph};
use petgraph::visit::EdgeRef;

use crate::dataset::{Dataset, VertexId};

// ---------------------------------------------------------------------------
// Weight types
// ---------------------------------------------------------------------------

/// Weight stored on each petgraph edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EdgeWeight {
    /// Position of the edge in `Dataset::edges`; used both to reach the
    /// opaque payload and to keep successor order stable.
    pub data_index: usize,
}

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

/// Errors that can occur while building a [`CycleGraph`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GraphBuildError {
    /// The vertex set lists the same key twice.
    #[error("duplicate vertex id: {0:?}")]
    DuplicateVertex(String),
    /// An edge references a vertex absent from the vertex set.
    #[error("edge #{edge_index} references unknown vertex {vertex:?}")]
    UnknownVertex {
        /// Position of the offending edge in `Dataset::edges`.
        edge_index: usize,
        /// The unresolved key.
        vertex: String,
    },
}

// ---------------------------------------------------------------------------
// CycleGraph
// ---------------------------------------------------------------------------

/// A directed multigraph over [`VertexId`] keys.
///
/// Construct with [`build_graph`]. The graph is never mutated after
/// construction.
#[derive(Debug)]
pub struct CycleGraph {
    graph: StableDiGraph<VertexId, EdgeWeight>,
    id_to_index: HashMap<VertexId, NodeIndex>,
}

impl CycleGraph {
    /// Returns the number of vertices.
    pub fn vertex_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Returns the number of edges, counting parallel edges separately.
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Looks up the [`NodeIndex`] for a vertex key.
    pub fn index_of(&self, id: &str) -> Option<NodeIndex> {
        self.id_to_index.get(id).copied()
    }

    /// Returns the key stored at `idx`.
    pub fn vertex_id(&self, idx: NodeIndex) -> Option<&VertexId> {
        self.graph.node_weight(idx)
    }

    /// Iterates over all vertex indices in insertion order.
    pub fn vertex_indices(&self) -> impl Iterator<Item = NodeIndex> + '_ {
        self.graph.node_indices()
    }

    /// Returns the outgoing neighbours of `idx` in dataset edge order.
    ///
    /// A target appears once per parallel edge.
    pub fn successors(&self, idx: NodeIndex) -> Vec<NodeIndex> {
        let mut out: Vec<(usize, NodeIndex)> = self
            .graph
            .edges_directed(idx, Direction::Outgoing)
            .map(|e| (e.weight().data_index, e.target()))
            .collect();
        out.sort_unstable_by_key(|&(data_index, _)| data_index);
        out.into_iter().map(|(_, target)| target).collect()
    }

    /// Returns `true` if at least one edge `from -> to` exists.
    pub fn has_edge(&self, from: &str, to: &str) -> bool {
        match (self.index_of(from), self.index_of(to)) {
            (Some(a), Some(b)) => self.graph.contains_edge(a, b),
            _ => false,
        }
    }
}

// ---------------------------------------------------------------------------
// Construction
// ---------------------------------------------------------------------------

/// Constructs a [`CycleGraph`] from a [`Dataset`] in O(V + E).
///
/// # Errors
///
/// - [`GraphBuildError::DuplicateVertex`]: two vertices share a key.
/// - [`GraphBuildError::UnknownVertex`]: an edge endpoint is not listed in
///   `dataset.vertices`.
pub fn build_graph(dataset: &Dataset) -> Result<CycleGraph, GraphBuildError> {
    let mut graph: StableDiGraph<VertexId, EdgeWeight> =
        StableDiGraph::with_capacity(dataset.vertices.len(), dataset.edges.len());
    let mut id_to_index: HashMap<VertexId, NodeIndex> =
        HashMap::with_capacity(dataset.vertices.len());

    // Pass 1: vertices.
    for id in &dataset.vertices {
        if id_to_index.contains_key(id) {
            return Err(GraphBuildError::DuplicateVertex(id.to_string()));
        }
        let idx = graph.add_node(id.clone());
        id_to_index.insert(id.clone(), idx);
    }

    // Pass 2: edges.
    for (data_index, edge) in dataset.edges.iter().enumerate() {
        let resolve = |id: &VertexId| {
            id_to_index
                .get(id)
                .copied()
                .ok_or_else(|| GraphBuildError::UnknownVertex {
                    edge_index: data_index,
                    vertex: id.to_string(),
                })
        };
        let from = resolve(&edge.from)?;
        let to = resolve(&edge.to)?;
        graph.add_edge(from, to, EdgeWeight { data_index });
    }

    Ok(CycleGraph { graph, id_to_index })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used)]

    use super::*;

    fn dataset(vertices: &[&str], edges: &[(&str, &str)]) -> Dataset {
        let mut d = Dataset::new()
            .vertices(vertices.iter().copied())
            .expect("valid vertices");
        for (from, to) in edges {
            d = d.edge(from, to).expect("valid edge");
        }
        d
    }

    fn ids(graph: &CycleGraph, indices: &[NodeIndex]) -> Vec<String> {
        indices
            .iter()
            .map(|&i| graph.vertex_id(i).expect("present").to_string())
            .collect()
    }

    #[test]
    fn empty_dataset_builds_empty_graph() {
        let g = build_graph(&Dataset::new()).expect("builds");
        assert_eq!(g.vertex_count(), 0);
        assert_eq!(g.edge_count(), 0);
    }

    #[test]
    fn counts_match_dataset() {
        let g = build_graph(&Dataset::sample()).expect("builds");
        assert_eq!(g.vertex_count(), 7);
        assert_eq!(g.edge_count(), 8);
    }

    #[test]
    fn index_lookup_round_trips() {
        let g = build_graph(&dataset(&["A", "B"], &[("A", "B")])).expect("builds");
        let a = g.index_of("A").expect("A present");
        assert_eq!(g.vertex_id(a).map(VertexId::as_str), Some("A"));
        assert!(g.index_of("Z").is_none());
    }

    #[test]
    fn duplicate_vertex_is_rejected() {
        let err = build_graph(&dataset(&["A", "B", "A"], &[])).expect_err("duplicate");
        assert_eq!(err, GraphBuildError::DuplicateVertex("A".to_owned()));
    }

    #[test]
    fn dangling_edge_target_is_rejected() {
        let err = build_graph(&dataset(&["A"], &[("A", "B")])).expect_err("dangling");
        assert_eq!(
            err,
            GraphBuildError::UnknownVertex {
                edge_index: 0,
                vertex: "B".to_owned(),
            }
        );
    }

    #[test]
    fn dangling_edge_source_is_rejected() {
        let err = build_graph(&dataset(&["A"], &[("A", "A"), ("X", "A")])).expect_err("dangling");
        assert!(
            matches!(err, GraphBuildError::UnknownVertex { edge_index: 1, ref vertex } if vertex == "X")
        );
        assert!(err.to_string().contains("unknown vertex"), "{err}");
    }

    #[test]
    fn successors_follow_dataset_edge_order() {
        let g = build_graph(&dataset(
            &["A", "B", "C", "D"],
            &[("A", "C"), ("A", "B"), ("B", "A"), ("A", "D")],
        ))
        .expect("builds");
        let a = g.index_of("A").expect("A present");
        assert_eq!(ids(&g, &g.successors(a)), ["C", "B", "D"]);
    }

    #[test]
    fn parallel_edges_repeat_successor() {
        let g = build_graph(&dataset(&["A", "B"], &[("A", "B"), ("A", "B")])).expect("builds");
        let a = g.index_of("A").expect("A present");
        assert_eq!(ids(&g, &g.successors(a)), ["B", "B"]);
    }

    #[test]
    fn has_edge_is_directional() {
        let g = build_graph(&dataset(&["A", "B"], &[("A", "B")])).expect("builds");
        assert!(g.has_edge("A", "B"));
        assert!(!g.has_edge("B", "A"));
        assert!(!g.has_edge("A", "missing"));
    }

    #[test]
    fn self_loop_is_its_own_successor() {
        let g = build_graph(&dataset(&["A"], &[("A", "A")])).expect("builds");
        let a = g.index_of("A").expect("A present");
        assert_eq!(g.successors(a), vec![a]);
    }
}
