/// Deduplication and delivery of discovered cycles.
///
/// The [`CycleCollector`] receives every closed [`PathToken`] the vertex
/// program reports, derives a [`CanonicalSignature`] from it, and forwards the
/// first cycle seen for each signature to a [`CycleSink`]. The sink always
/// receives the literal traversal order, never the sorted signature.
///
/// The signature is the sorted vertex set, so two traversals of the same
/// vertices in different orders (`A->B->C->A` and `A->C->B->A`) count as one
/// cycle and only the first to arrive is reported.
use std::collections::HashSet;
use std::fmt;

use serde::Serialize;

use crate::dataset::VertexId;
use crate::token::PathToken;

// ---------------------------------------------------------------------------
// DiscoveredCycle
// ---------------------------------------------------------------------------

/// A distinct cycle as handed to the sink.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiscoveredCycle {
    /// The run's source vertex.
    pub source: VertexId,
    /// Closed traversal order: starts and ends at `source`.
    pub path: Vec<VertexId>,
}

impl DiscoveredCycle {
    /// Builds a cycle from a closed token.
    pub fn from_token(token: PathToken) -> Self {
        Self {
            source: token.origin,
            path: token.path,
        }
    }

    /// The traversal without the closing repeat of the source.
    pub fn vertices(&self) -> &[VertexId] {
        if let Some((last, rest)) = self.path.split_last() {
            if !rest.is_empty() && *last == self.source {
                return rest;
            }
        }
        &self.path
    }

    /// Cycle length in edges.
    pub fn len(&self) -> usize {
        self.vertices().len()
    }

    /// Returns `true` if the cycle has no vertices.
    pub fn is_empty(&self) -> bool {
        self.path.is_empty()
    }

    /// Order-insensitive signature used for deduplication.
    pub fn signature(&self) -> CanonicalSignature {
        CanonicalSignature::of(self.vertices())
    }
}

impl fmt::Display for DiscoveredCycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, v) in self.path.iter().enumerate() {
            if i > 0 {
                f.write_str("->")?;
            }
            f.write_str(v)?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// CanonicalSignature
// ---------------------------------------------------------------------------

/// Sorted vertex keys joined by `,`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CanonicalSignature(String);

impl CanonicalSignature {
    /// Computes the signature of an open vertex sequence.
    pub fn of(vertices: &[VertexId]) -> Self {
        let mut keys: Vec<&str> = vertices.iter().map(VertexId::as_str).collect();
        keys.sort_unstable();
        Self(keys.join(","))
    }

    /// Returns the signature text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CanonicalSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ---------------------------------------------------------------------------
// Sinks
// ---------------------------------------------------------------------------

/// Destination for distinct cycles.
pub trait CycleSink {
    /// Called exactly once per distinct cycle, in discovery order.
    fn report(&mut self, cycle: &DiscoveredCycle);
}

impl<F> CycleSink for F
where
    F: FnMut(&DiscoveredCycle),
{
    fn report(&mut self, cycle: &DiscoveredCycle) {
        self(cycle);
    }
}

/// Keeps every reported cycle in memory.
#[derive(Debug, Default, Clone)]
pub struct MemorySink {
    cycles: Vec<DiscoveredCycle>,
}

impl MemorySink {
    /// Creates an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Cycles received so far, in order.
    pub fn cycles(&self) -> &[DiscoveredCycle] {
        &self.cycles
    }

    /// Consumes the sink and returns its cycles.
    pub fn into_cycles(self) -> Vec<DiscoveredCycle> {
        self.cycles
    }
}

impl CycleSink for MemorySink {
    fn report(&mut self, cycle: &DiscoveredCycle) {
        self.cycles.push(cycle.clone());
    }
}

/// Emits each cycle as an `info` event.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl CycleSink for TracingSink {
    fn report(&mut self, cycle: &DiscoveredCycle) {
        tracing::info!(source = %cycle.source, length = cycle.len(), path = %cycle, "cycle found");
    }
}

// ---------------------------------------------------------------------------
// CycleCollector
// ---------------------------------------------------------------------------

/// Deduplicates closed tokens and forwards distinct cycles to `S`.
#[derive(Debug)]
pub struct CycleCollector<S> {
    sink: S,
    seen: HashSet<CanonicalSignature>,
    reported: usize,
    suppressed: usize,
}

impl<S: CycleSink> CycleCollector<S> {
    /// Wraps `sink` with an empty deduplication set.
    pub fn new(sink: S) -> Self {
        Self {
            sink,
            seen: HashSet::new(),
            reported: 0,
            suppressed: 0,
        }
    }

    /// Accepts one closed token. Returns `true` if it was new and went to
    /// the sink.
    pub fn collect(&mut self, token: PathToken) -> bool {
        let cycle = DiscoveredCycle::from_token(token);
        let signature = cycle.signature();
        if !self.seen.insert(signature) {
            self.suppressed += 1;
            tracing::trace!(path = %cycle, "duplicate cycle suppressed");
            return false;
        }
        self.reported += 1;
        self.sink.report(&cycle);
        true
    }

    /// Number of distinct cycles forwarded.
    pub fn reported(&self) -> usize {
        self.reported
    }

    /// Number of tokens dropped as duplicates.
    pub fn suppressed(&self) -> usize {
        self.suppressed
    }

    /// Borrows the sink.
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Consumes the collector and returns the sink.
    pub fn into_sink(self) -> S {
        self.sink
    }
}
