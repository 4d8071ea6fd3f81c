//! Path tokens and the messages that carry them between supersteps.

use serde::Serialize;

use crate::dataset::VertexId;

/// One in-progress (or completed) path exploration.
///
/// While `is_cycle` is `false`, `path` starts with `origin` and holds no
/// duplicate key. Once closed, the origin is appended again, so a completed
/// token reads `[A, B, C, A]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PathToken {
    /// Vertex the exploration started from.
    pub origin: VertexId,
    /// Vertices visited so far, origin first.
    pub path: Vec<VertexId>,
    /// Whether the token describes a closed cycle.
    pub is_cycle: bool,
}

impl PathToken {
    /// The token the source emits along each of its outgoing edges.
    pub fn seed(origin: &VertexId) -> Self {
        Self {
            origin: origin.clone(),
            path: vec![origin.clone()],
            is_cycle: false,
        }
    }

    /// Number of vertices on the path.
    pub fn len(&self) -> usize {
        self.path.len()
    }

    /// Returns `true` if the path is empty. Never the case for tokens built
    /// by the vertex program.
    pub fn is_empty(&self) -> bool {
        self.path.is_empty()
    }

    /// Returns `true` if `id` already appears on the path.
    pub fn visits(&self, id: &VertexId) -> bool {
        self.path.contains(id)
    }

    /// Returns a new open token whose path is this one's plus `id`.
    ///
    /// The path is copied, so the returned token shares nothing with `self`.
    #[must_use]
    pub fn extended(&self, id: &VertexId) -> Self {
        let mut path = Vec::with_capacity(self.path.len() + 1);
        path.extend_from_slice(&self.path);
        path.push(id.clone());
        Self {
            origin: self.origin.clone(),
            path,
            is_cycle: false,
        }
    }

    /// Consumes the token and returns it closed at `id`.
    #[must_use]
    pub fn closed_at(mut self, id: &VertexId) -> Self {
        self.path.push(id.clone());
        self.is_cycle = true;
        self
    }
}

/// A token addressed to a vertex, valid for exactly one superstep boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    /// Recipient.
    pub target: VertexId,
    /// Carried token.
    pub payload: PathToken,
}
