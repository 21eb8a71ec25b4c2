//! Similarity graph construction from node-link JSON.
//!
//! # Overview
//!
//! The graph is read from a document of the form
//!
//! ```text
//! {"links": [{"source": "A", "target": "B", "value": 0.93}, ...],
//!  "nodes": [{"id": "A"}, ...]}          // optional
//! ```
//!
//! and stored as an undirected [`petgraph`] graph whose node weights are
//! paragraph headers and whose edge weights are similarity scores.
//!
//! ## Ordering
//!
//! Node indices follow first appearance: entries of `nodes` first, then the
//! endpoints of each link (source before target). Edge indices follow link
//! order. Every ranking downstream breaks ties by these indices, so the same
//! input always produces the same output.
//!
//! ## Normalization
//!
//! - Self-loops are skipped with a warning.
//! - A repeated unordered pair updates the existing edge's weight in place,
//!   so the graph holds at most one edge per pair.
//!
//! ## Content hash
//!
//! [`SimilarityGraph::content_hash`] is a BLAKE3 hash of the node and edge
//! lists. Two runs over byte-different but semantically identical input
//! report the same hash.

#![allow(clippy::module_name_repetitions)]

use std::collections::HashMap;

use petgraph::graph::{EdgeIndex, NodeIndex, UnGraph};
use petgraph::visit::EdgeRef;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use crate::error::InputError;

// ---------------------------------------------------------------------------
// Input schema
// ---------------------------------------------------------------------------

/// One weighted link between two paragraphs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Link {
    pub source: String,
    pub target: String,
    pub value: f64,
}

/// Optional explicit node entry (node-link format).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeEntry {
    pub id: String,
}

/// The graph document read from stdin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphInput {
    pub links: Vec<Link>,
    #[serde(default)]
    pub nodes: Vec<NodeEntry>,
}

// ---------------------------------------------------------------------------
// SimilarityGraph
// ---------------------------------------------------------------------------

/// Undirected weighted similarity graph over paragraph headers.
#[derive(Debug, Clone)]
pub struct SimilarityGraph {
    /// Nodes = headers, edges = similarity scores.
    pub graph: UnGraph<String, f64>,
    /// Mapping from header to petgraph `NodeIndex`.
    pub node_map: HashMap<String, NodeIndex>,
    /// BLAKE3 content hash of the node and edge lists.
    pub content_hash: String,
}

impl SimilarityGraph {
    /// Parse a graph document.
    ///
    /// # Errors
    ///
    /// Returns [`InputError::Empty`] for a blank payload and
    /// [`InputError::Malformed`] if the JSON does not match [`GraphInput`].
    pub fn from_json_str(text: &str) -> Result<Self, InputError> {
        if text.trim().is_empty() {
            return Err(InputError::Empty {
                what: "graph input",
            });
        }
        let input: GraphInput =
            serde_json::from_str(text).map_err(|source| InputError::Malformed {
                what: "graph input",
                source,
            })?;
        Ok(Self::from_input(&input))
    }

    /// Build the graph from an already-parsed document.
    #[instrument(skip_all, fields(links = input.links.len(), nodes = input.nodes.len()))]
    #[must_use]
    pub fn from_input(input: &GraphInput) -> Self {
        let mut graph = UnGraph::<String, f64>::with_capacity(input.nodes.len(), input.links.len());
        let mut node_map: HashMap<String, NodeIndex> = HashMap::new();

        let mut intern = |graph: &mut UnGraph<String, f64>, header: &str| -> NodeIndex {
            *node_map
                .entry(header.to_string())
                .or_insert_with(|| graph.add_node(header.to_string()))
        };

        for node in &input.nodes {
            intern(&mut graph, &node.id);
        }

        for link in &input.links {
            if link.source == link.target {
                warn!(header = %link.source, "skipping self-loop");
                continue;
            }
            if link.value < 0.0 {
                warn!(
                    source = %link.source,
                    target = %link.target,
                    value = link.value,
                    "negative similarity weight"
                );
            }
            let a = intern(&mut graph, &link.source);
            let b = intern(&mut graph, &link.target);
            if graph.find_edge(a, b).is_some() {
                debug!(source = %link.source, target = %link.target, "repeated link; updating weight");
            }
            graph.update_edge(a, b, link.value);
        }

        let content_hash = compute_content_hash(&graph);

        Self {
            graph,
            node_map,
            content_hash,
        }
    }

    /// Return the number of nodes (paragraphs) in the graph.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Return the number of edges in the graph.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Look up the `NodeIndex` for a header.
    #[must_use]
    pub fn node_index(&self, header: &str) -> Option<NodeIndex> {
        self.node_map.get(header).copied()
    }

    /// Return the header label for a node.
    #[must_use]
    pub fn header(&self, idx: NodeIndex) -> Option<&str> {
        self.graph.node_weight(idx).map(String::as_str)
    }

    /// Iterate headers in node-index order.
    pub fn headers(&self) -> impl Iterator<Item = &str> {
        self.graph.node_weights().map(String::as_str)
    }

    /// Iterate `(source, target, weight)` in edge-index order.
    pub fn edges(&self) -> impl Iterator<Item = (&str, &str, f64)> {
        self.graph.edge_references().map(|edge| {
            (
                self.graph[edge.source()].as_str(),
                self.graph[edge.target()].as_str(),
                *edge.weight(),
            )
        })
    }

    /// Weight of the edge between two headers, if any.
    #[must_use]
    pub fn weight_between(&self, a: &str, b: &str) -> Option<f64> {
        let ia = self.node_index(a)?;
        let ib = self.node_index(b)?;
        let edge: EdgeIndex = self.graph.find_edge(ia, ib)?;
        self.graph.edge_weight(edge).copied()
    }

    /// Sum of all edge weights.
    #[must_use]
    pub fn total_weight(&self) -> f64 {
        self.graph.edge_weights().sum()
    }
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

/// BLAKE3 over node labels, then `(source, target, weight bits)` per edge.
fn compute_content_hash(graph: &UnGraph<String, f64>) -> String {
    let mut hasher = blake3::Hasher::new();
    for header in graph.node_weights() {
        hasher.update(header.as_bytes());
        hasher.update(b"\x00");
    }
    hasher.update(b"\x01");
    for edge in graph.edge_references() {
        hasher.update(graph[edge.source()].as_bytes());
        hasher.update(b"\x00");
        hasher.update(graph[edge.target()].as_bytes());
        hasher.update(b"\x00");
        hasher.update(&edge.weight().to_bits().to_le_bytes());
    }
    format!("blake3:{}", hasher.finalize())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
