/// Static vertex and edge sets handed to the detector.
///
/// The core never reads files; callers deserialize a [`Dataset`] from JSON
/// (see [`Dataset::from_json`]) or assemble one in code with the builder
/// methods. Edge payloads are carried through untouched.
///
/// JSON shape:
///
/// ```json
/// {
///   "vertices": ["A", "B"],
///   "edges": [{ "from": "A", "to": "B", "payload": "weight" }]
/// }
/// ```
use std::borrow::Borrow;
use std::fmt;
use std::ops::Deref;

use serde::{Deserialize, Deserializer, Serialize, Serializer, de};

// ---------------------------------------------------------------------------
// VertexId
// ---------------------------------------------------------------------------

/// Error returned when a string is not a usable vertex key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidVertexId {
    /// The rejected input.
    pub got: String,
}

impl fmt::Display for InvalidVertexId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid vertex id: expected a non-empty string without surrounding whitespace, got {:?}",
            self.got
        )
    }
}

impl std::error::Error for InvalidVertexId {}

/// Unique, ordered key of a vertex.
///
/// Must be non-empty and must not start or end with whitespace. Ordering is
/// plain lexicographic byte order, which is also the order used to build
/// canonical cycle signatures.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VertexId(String);

impl TryFrom<&str> for VertexId {
    type Error = InvalidVertexId;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        if s.is_empty() || s.trim() != s {
            return Err(InvalidVertexId { got: s.to_owned() });
        }
        Ok(Self(s.to_owned()))
    }
}

impl TryFrom<String> for VertexId {
    type Error = InvalidVertexId;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        if s.is_empty() || s.trim() != s {
            return Err(InvalidVertexId { got: s });
        }
        Ok(Self(s))
    }
}

impl VertexId {
    /// Returns the key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Deref for VertexId {
    type Target = str;

    fn deref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for VertexId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for VertexId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VertexId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for VertexId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for VertexId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        VertexId::try_from(raw).map_err(de::Error::custom)
    }
}

// ---------------------------------------------------------------------------
// Dataset
// ---------------------------------------------------------------------------

/// A directed edge `from -> to` with an opaque payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeRecord {
    /// Tail vertex.
    pub from: VertexId,
    /// Head vertex.
    pub to: VertexId,
    /// Opaque edge payload; never inspected by the detector.
    #[serde(default)]
    pub payload: serde_json::Value,
}

/// The static graph a detection run operates on.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    /// Vertex identities. Order is preserved but not significant.
    pub vertices: Vec<VertexId>,
    /// Directed edges between entries of `vertices`.
    #[serde(default)]
    pub edges: Vec<EdgeRecord>,
}

/// Errors produced while assembling or parsing a [`Dataset`].
#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    /// The JSON document could not be deserialized.
    #[error("dataset is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    /// A vertex key supplied to a builder method was rejected.
    #[error(transparent)]
    InvalidVertex(#[from] InvalidVertexId),
}

impl Dataset {
    /// Creates an empty dataset.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a dataset from its JSON representation.
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError::Json`] on malformed JSON or invalid vertex keys.
    pub fn from_json(input: &str) -> Result<Self, DatasetError> {
        Ok(serde_json::from_str(input)?)
    }

    /// Appends a vertex.
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError::InvalidVertex`] if `id` is not a valid key.
    pub fn vertex(mut self, id: &str) -> Result<Self, DatasetError> {
        self.vertices.push(VertexId::try_from(id)?);
        Ok(self)
    }

    /// Appends several vertices.
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError::InvalidVertex`] on the first invalid key.
    pub fn vertices<'a>(
        mut self,
        ids: impl IntoIterator<Item = &'a str>,
    ) -> Result<Self, DatasetError> {
        for id in ids {
            self.vertices.push(VertexId::try_from(id)?);
        }
        Ok(self)
    }

    /// Appends an edge with a `null` payload.
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError::InvalidVertex`] if either endpoint is not a
    /// valid key. Endpoints are not checked against the vertex list here;
    /// that happens at graph construction.
    pub fn edge(self, from: &str, to: &str) -> Result<Self, DatasetError> {
        self.edge_with_payload(from, to, serde_json::Value::Null)
    }

    /// Appends an edge carrying `payload`.
    ///
    /// # Errors
    ///
    /// Same as [`Dataset::edge`].
    pub fn edge_with_payload(
        mut self,
        from: &str,
        to: &str,
        payload: serde_json::Value,
    ) -> Result<Self, DatasetError> {
        self.edges.push(EdgeRecord {
            from: VertexId::try_from(from)?,
            to: VertexId::try_from(to)?,
            payload,
        });
        Ok(self)
    }

    /// The demonstration graph: two triangles through `A` (`A,B,C` and
    /// `A,D,E`) plus a disconnected two-cycle `F,G`.
    pub fn sample() -> Self {
        let mut dataset = Self::new();
        for id in ["A", "B", "C", "D", "E", "F", "G"] {
            dataset.vertices.push(VertexId(id.to_owned()));
        }
        for (from, to) in SAMPLE_EDGES {
            dataset.push_weighted(from, to);
        }
        dataset
    }

    /// [`Dataset::sample`] plus the reverse orientation of the `A,B,C`
    /// triangle (`A->C->B->A`), which shares its vertex set with `A->B->C->A`.
    pub fn sample_with_reverse_triangle() -> Self {
        let mut dataset = Self::sample();
        for (from, to) in [("A", "C"), ("C", "B"), ("B", "A")] {
            dataset.push_weighted(from, to);
        }
        dataset
    }

    fn push_weighted(&mut self, from: &str, to: &str) {
        self.edges.push(EdgeRecord {
            from: VertexId(from.to_owned()),
            to: VertexId(to.to_owned()),
            payload: serde_json::Value::String("weight".to_owned()),
        });
    }
}

const SAMPLE_EDGES: [(&str, &str); 8] = [
    ("A", "B"),
    ("B", "C"),
    ("C", "A"),
    ("A", "D"),
    ("D", "E"),
    ("E", "A"),
    ("F", "G"),
    ("G", "F"),
];

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used)]

    use super::*;

    #[test]
    fn vertex_id_rejects_empty_and_padded_keys() {
        assert!(VertexId::try_from("").is_err());
        assert!(VertexId::try_from(" A").is_err());
        assert!(VertexId::try_from("A\n").is_err());
        assert_eq!(VertexId::try_from("A").expect("valid").as_str(), "A");
    }

    #[test]
    fn vertex_ids_order_lexicographically() {
        let mut ids: Vec<VertexId> = ["c", "a", "b"]
            .into_iter()
            .map(|s| VertexId::try_from(s).expect("valid"))
            .collect();
        ids.sort();
        let keys: Vec<&str> = ids.iter().map(VertexId::as_str).collect();
        assert_eq!(keys, ["a", "b", "c"]);
    }

    #[test]
    fn from_json_reads_vertices_edges_and_payloads() {
        let input = r#"{
            "vertices": ["A", "B"],
            "edges": [
                {"from": "A", "to": "B", "payload": {"w": 3}},
                {"from": "B", "to": "A"}
            ]
        }"#;
        let dataset = Dataset::from_json(input).expect("parses");
        assert_eq!(dataset.vertices.len(), 2);
        assert_eq!(dataset.edges.len(), 2);
        assert_eq!(dataset.edges[0].payload["w"], 3);
        assert!(dataset.edges[1].payload.is_null());
    }

    #[test]
    fn from_json_rejects_empty_vertex_key() {
        let err = Dataset::from_json(r#"{"vertices": [""]}"#).expect_err("empty key");
        assert!(err.to_string().contains("invalid vertex id"), "{err}");
    }

    #[test]
    fn builder_accumulates_in_order() {
        let dataset = Dataset::new()
            .vertices(["A", "B"])
            .and_then(|d| d.edge("A", "B"))
            .and_then(|d| d.edge("B", "A"))
            .expect("builds");
        assert_eq!(dataset.vertices[1].as_str(), "B");
        assert_eq!(dataset.edges[1].from.as_str(), "B");
    }

    #[test]
    fn sample_has_seven_vertices_and_eight_edges() {
        let dataset = Dataset::sample();
        assert_eq!(dataset.vertices.len(), 7);
        assert_eq!(dataset.edges.len(), 8);
        assert!(dataset.edges.iter().all(|e| e.payload == "weight"));
        assert_eq!(Dataset::sample_with_reverse_triangle().edges.len(), 11);
    }

    #[test]
    fn dataset_serializes_back_to_same_shape() {
        let dataset = Dataset::sample();
        let json = serde_json::to_string(&dataset).expect("serializes");
        let back = Dataset::from_json(&json).expect("parses");
        assert_eq!(dataset, back);
    }
}
