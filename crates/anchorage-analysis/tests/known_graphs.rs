//! Known-topology regression tests for the graph-based tools.
//!
//! Each test uses a hand-crafted graph whose strengths, duplicates, and
//! bridges can be worked out by hand. Expected values are hardcoded.

use anchorage_analysis::bridge::find_bridges;
use anchorage_analysis::duplicates::find_duplicates;
use anchorage_analysis::strength::rank_strengths;
use anchorage_core::{EmbeddingStore, SimilarityGraph};

fn graph(links: &[(&str, &str, f64)]) -> SimilarityGraph {
    let links: Vec<serde_json::Value> = links
        .iter()
        .map(|(s, t, v)| serde_json::json!({"source": s, "target": t, "value": v}))
        .collect();
    SimilarityGraph::from_json_str(&serde_json::json!({ "links": links }).to_string())
        .expect("graph")
}

fn headers<T>(items: &[T], f: impl Fn(&T) -> &str) -> Vec<&str> {
    items.iter().map(f).collect()
}

// ===========================================================================
// Topology 1: two clusters joined by a weak link
//
//   intro ── method ── results        (0.75 each, plus intro–results 0.5)
//      \
//       0.25
//        \
//      appendix ── credits            (0.125)
//
// Weights are exact binary fractions so tied strengths compare equal.
//
// Strengths:
//   intro    = 0.75 + 0.5 + 0.25 = 1.5
//   method   = 0.75 + 0.75       = 1.5
//   results  = 0.75 + 0.5        = 1.25
//   appendix = 0.25 + 0.125      = 0.375
//   credits  = 0.125
// ===========================================================================

fn two_clusters() -> SimilarityGraph {
    graph(&[
        ("intro", "method", 0.75),
        ("method", "results", 0.75),
        ("intro", "results", 0.5),
        ("intro", "appendix", 0.25),
        ("appendix", "credits", 0.125),
    ])
}

#[test]
fn two_clusters_anchor_order() {
    let ranking = rank_strengths(&two_clusters());
    // intro and method tie at 1.5; intro appeared first.
    assert_eq!(
        headers(&ranking.anchors, |n| n.header.as_str()),
        vec!["intro", "method", "results", "appendix", "credits"]
    );
}

#[test]
fn two_clusters_outlier_order() {
    let ranking = rank_strengths(&two_clusters());
    assert_eq!(
        headers(ranking.top_outliers(3), |n| n.header.as_str()),
        vec!["credits", "appendix", "results"]
    );
    assert!((ranking.outliers[0].strength - 0.125).abs() < 1e-12);
}

#[test]
fn two_clusters_duplicates() {
    let dups = find_duplicates(&two_clusters(), 0.5);
    assert_eq!(
        headers(&dups, |d| d.source.as_str()),
        vec!["intro", "method", "intro"]
    );
    assert!(find_duplicates(&two_clusters(), 0.95).is_empty());
}

#[test]
fn two_clusters_bridges() {
    // One-dimensional embeddings make midpoints easy to read.
    let store: EmbeddingStore = [
        ("intro", vec![0.0]),
        ("method", vec![1.0]),
        ("results", vec![2.0]),
        ("transition", vec![5.0]),
        ("appendix", vec![9.0]),
        ("credits", vec![10.0]),
    ]
    .into_iter()
    .collect();

    let ranking = rank_strengths(&two_clusters());
    let bridges = find_bridges(&store, ranking.top_anchors(3), ranking.top_outliers(3));
    assert_eq!(bridges.len(), 9);

    // intro(0) ↔ credits(10): midpoint 5 → transition.
    assert_eq!(bridges[0].anchor, "intro");
    assert_eq!(bridges[0].outlier, "credits");
    assert_eq!(bridges[0].bridge, "transition");

    // intro(0) ↔ appendix(9): midpoint 4.5 → transition (0.25 away).
    assert_eq!(bridges[1].bridge, "transition");

    // intro(0) ↔ results(2): midpoint 1 → method.
    assert_eq!(bridges[2].bridge, "method");

    // results(2) ↔ results(2): the pair degenerates to a point on itself.
    assert_eq!(bridges[8].anchor, "results");
    assert_eq!(bridges[8].outlier, "results");
    assert_eq!(bridges[8].bridge, "results");
}

#[test]
fn missing_embeddings_drop_pairs_only() {
    let store: EmbeddingStore = [("intro", vec![0.0]), ("credits", vec![10.0])]
        .into_iter()
        .collect();
    let ranking = rank_strengths(&two_clusters());
    let bridges = find_bridges(&store, ranking.top_anchors(3), ranking.top_outliers(3));
    assert_eq!(bridges.len(), 1);
    assert_eq!(bridges[0].anchor, "intro");
    assert_eq!(bridges[0].outlier, "credits");
}

// ===========================================================================
// Topology 2: isolated nodes from an explicit node list
// ===========================================================================

#[test]
fn isolated_nodes_rank_as_weakest() {
    let g = SimilarityGraph::from_json_str(
        r#"{"nodes": [{"id": "orphan"}],
            "links": [{"source": "a", "target": "b", "value": 0.2}]}"#,
    )
    .expect("graph");
    let ranking = rank_strengths(&g);
    assert_eq!(ranking.outliers[0].header, "orphan");
    assert!(ranking.outliers[0].strength.abs() < f64::EPSILON);
    assert_eq!(ranking.anchors.last().map(|n| n.header.as_str()), Some("orphan"));
}
