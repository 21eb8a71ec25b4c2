//! Node strength: weighted degree over the similarity graph.
//!
//! A node's strength is the sum of the weights of its incident edges.
//! Ranking by strength descending yields **anchors** (paragraphs similar to
//! much of the document); ascending yields **outliers**.
//!
//! Both orderings use a stable sort, so nodes with equal strength stay in
//! graph insertion order (first appearance in the input).

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use anchorage_core::SimilarityGraph;

/// Strength of a single paragraph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeStrength {
    pub header: String,
    pub strength: f64,
}

/// Full anchor (descending) and outlier (ascending) orderings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrengthRanking {
    pub anchors: Vec<NodeStrength>,
    pub outliers: Vec<NodeStrength>,
}

impl StrengthRanking {
    /// The `k` strongest nodes, fewer if the graph is smaller.
    #[must_use]
    pub fn top_anchors(&self, k: usize) -> &[NodeStrength] {
        &self.anchors[..k.min(self.anchors.len())]
    }

    /// The `k` weakest nodes, fewer if the graph is smaller.
    #[must_use]
    pub fn top_outliers(&self, k: usize) -> &[NodeStrength] {
        &self.outliers[..k.min(self.outliers.len())]
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.anchors.is_empty()
    }
}

/// Compute the strength of every node, in node-index order.
///
/// Isolated nodes get strength `0.0`.
#[must_use]
pub fn node_strengths(g: &SimilarityGraph) -> Vec<NodeStrength> {
    g.graph
        .node_indices()
        .map(|idx| NodeStrength {
            header: g.graph[idx].clone(),
            strength: g.graph.edges(idx).map(|edge| *edge.weight()).sum(),
        })
        .collect()
}

/// Rank all nodes by strength.
///
/// An empty graph yields empty orderings.
#[instrument(skip_all, fields(nodes = g.node_count(), edges = g.edge_count()))]
#[must_use]
pub fn rank_strengths(g: &SimilarityGraph) -> StrengthRanking {
    let strengths = node_strengths(g);

    let mut anchors = strengths.clone();
    anchors.sort_by(|a, b| b.strength.total_cmp(&a.strength));

    let mut outliers = strengths;
    outliers.sort_by(|a, b| a.strength.total_cmp(&b.strength));

    debug!(
        strongest = anchors.first().map(|n| n.header.as_str()),
        weakest = outliers.first().map(|n| n.header.as_str()),
        "strength ranking computed"
    );

    StrengthRanking { anchors, outliers }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn graph(links: &[(&str, &str, f64)]) -> SimilarityGraph {
        let links: Vec<serde_json::Value> = links
            .iter()
            .map(|(s, t, v)| serde_json::json!({"source": s, "target": t, "value": v}))
            .collect();
        let doc = serde_json::json!({ "links": links }).to_string();
        SimilarityGraph::from_json_str(&doc).expect("graph")
    }

    fn headers(nodes: &[NodeStrength]) -> Vec<&str> {
        nodes.iter().map(|n| n.header.as_str()).collect()
    }

    #[test]
    fn empty_graph_ranks_nothing() {
        let ranking = rank_strengths(&graph(&[]));
        assert!(ranking.is_empty());
        assert!(ranking.top_anchors(5).is_empty());
        assert!(ranking.top_outliers(5).is_empty());
    }

    #[test]
    fn star_center_is_top_anchor() {
        let g = graph(&[("hub", "a", 0.5), ("hub", "b", 0.25), ("hub", "c", 0.25)]);
        let ranking = rank_strengths(&g);
        assert_eq!(ranking.anchors[0].header, "hub");
        assert!((ranking.anchors[0].strength - 1.0).abs() < 1e-12);
        // b and c tie at 0.25; insertion order keeps b first.
        assert_eq!(headers(ranking.top_outliers(2)), vec!["b", "c"]);
    }

    #[test]
    fn ties_keep_insertion_order_in_both_directions() {
        let g = graph(&[("x", "y", 1.0), ("z", "w", 1.0)]);
        let ranking = rank_strengths(&g);
        assert_eq!(headers(&ranking.anchors), vec!["x", "y", "z", "w"]);
        assert_eq!(headers(&ranking.outliers), vec!["x", "y", "z", "w"]);
    }

    #[test]
    fn top_k_truncates_to_available() {
        let g = graph(&[("a", "b", 0.1)]);
        let ranking = rank_strengths(&g);
        assert_eq!(ranking.top_anchors(5).len(), 2);
        assert_eq!(ranking.top_outliers(0).len(), 0);
    }

    #[test]
    fn strengths_in_node_order() {
        let g = graph(&[("a", "b", 0.4), ("b", "c", 0.6)]);
        let s = node_strengths(&g);
        assert_eq!(headers(&s), vec!["a", "b", "c"]);
        assert!((s[0].strength - 0.4).abs() < 1e-12);
        assert!((s[1].strength - 1.0).abs() < 1e-12);
        assert!((s[2].strength - 0.6).abs() < 1e-12);
    }
}
