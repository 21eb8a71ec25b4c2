//! Near-duplicate detection by thresholding graph edge weights.
//!
//! Every edge whose similarity is at or above the threshold is reported, in
//! edge insertion order. The graph already holds one edge per unordered pair,
//! so no further deduplication happens here.

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use anchorage_core::SimilarityGraph;

/// A pair of paragraphs whose similarity meets the duplicate threshold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DuplicatePair {
    pub source: String,
    pub target: String,
    pub similarity: f64,
}

/// Report every edge with `weight >= threshold`.
#[instrument(skip(g), fields(edges = g.edge_count()))]
#[must_use]
pub fn find_duplicates(g: &SimilarityGraph, threshold: f64) -> Vec<DuplicatePair> {
    let pairs: Vec<DuplicatePair> = g
        .edges()
        .filter(|&(_, _, weight)| weight >= threshold)
        .map(|(source, target, similarity)| DuplicatePair {
            source: source.to_string(),
            target: target.to_string(),
            similarity,
        })
        .collect();
    debug!(found = pairs.len(), "duplicate scan complete");
    pairs
}
