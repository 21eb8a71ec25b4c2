//! Weighted force-directed layout in three dimensions.
//!
//! This is the position-assignment half of visualization: each node gets an
//! `(x, y, z)` coordinate and each edge carries a line-width hint. Drawing is
//! left to whatever plotting tool consumes the JSON.
//!
//! # Algorithm (Fruchterman–Reingold)
//!
//! - optimal distance `k = 1 / sqrt(n)`
//! - repulsion between every pair: `k² / d`
//! - attraction along edges: `w · d² / k`
//! - each step moves a node by at most the current temperature, which starts
//!   at `0.1` and cools linearly to zero
//!
//! Initial positions come from a seeded RNG, so the same graph and seed give
//! the same layout. The result is centered on the origin and scaled so the
//! largest coordinate magnitude is `1`.

use nalgebra::DMatrix;
use petgraph::visit::EdgeRef;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use anchorage_core::{AnalysisConfig, SimilarityGraph};

const MIN_DISTANCE: f64 = 0.01;
const INITIAL_TEMPERATURE: f64 = 0.1;
const LINE_WIDTH_PER_WEIGHT: f64 = 2.0;

/// Tunables for [`spring_layout_3d`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutParams {
    pub iterations: usize,
    pub seed: u64,
}

impl From<&AnalysisConfig> for LayoutParams {
    fn from(config: &AnalysisConfig) -> Self {
        Self {
            iterations: config.layout_iterations,
            seed: config.layout_seed,
        }
    }
}

impl Default for LayoutParams {
    fn default() -> Self {
        Self::from(&AnalysisConfig::default())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodePosition {
    pub header: String,
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeSegment {
    pub source: String,
    pub target: String,
    pub weight: f64,
    /// Suggested stroke width, proportional to similarity.
    pub line_width: f64,
}

/// Positions for every node plus drawable edges.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layout {
    pub nodes: Vec<NodePosition>,
    pub edges: Vec<EdgeSegment>,
}

/// Compute a 3-D layout for `g`.
#[instrument(skip(g), fields(nodes = g.node_count(), edges = g.edge_count()))]
#[must_use]
pub fn spring_layout_3d(g: &SimilarityGraph, params: LayoutParams) -> Layout {
    let n = g.node_count();
    let positions = match n {
        0 => Vec::new(),
        1 => vec![[0.0; 3]],
        _ => rescale(fruchterman_reingold(g, n, params)),
    };

    let nodes = g
        .headers()
        .zip(positions)
        .map(|(header, [x, y, z])| NodePosition {
            header: header.to_string(),
            x,
            y,
            z,
        })
        .collect();

    let edges = g
        .edges()
        .map(|(source, target, weight)| EdgeSegment {
            source: source.to_string(),
            target: target.to_string(),
            weight,
            line_width: weight * LINE_WIDTH_PER_WEIGHT,
        })
        .collect();

    Layout { nodes, edges }
}

#[allow(clippy::cast_precision_loss)]
fn fruchterman_reingold(g: &SimilarityGraph, n: usize, params: LayoutParams) -> Vec<[f64; 3]> {
    let mut adjacency = DMatrix::<f64>::zeros(n, n);
    for edge in g.graph.edge_references() {
        let (u, v) = (edge.source().index(), edge.target().index());
        adjacency[(u, v)] = *edge.weight();
        adjacency[(v, u)] = *edge.weight();
    }

    let mut rng = StdRng::seed_from_u64(params.seed);
    let mut pos: Vec<[f64; 3]> = (0..n)
        .map(|_| {
            [
                rng.gen_range(0.0..1.0),
                rng.gen_range(0.0..1.0),
                rng.gen_range(0.0..1.0),
            ]
        })
        .collect();

    let k = (1.0 / n as f64).sqrt();
    let mut temperature = INITIAL_TEMPERATURE;
    let cooling = INITIAL_TEMPERATURE / (params.iterations as f64 + 1.0);

    for _ in 0..params.iterations {
        let mut disp = vec![[0.0_f64; 3]; n];

        for i in 0..n {
            for j in 0..n {
                if i == j {
                    continue;
                }
                let delta = [
                    pos[i][0] - pos[j][0],
                    pos[i][1] - pos[j][1],
                    pos[i][2] - pos[j][2],
                ];
                let dist = norm(delta).max(MIN_DISTANCE);
                // Net force along delta: repulsion minus weighted attraction.
                let force = k * k / (dist * dist) - adjacency[(i, j)] * dist / k;
                for axis in 0..3 {
                    disp[i][axis] += delta[axis] * force;
                }
            }
        }

        for i in 0..n {
            let length = norm(disp[i]).max(MIN_DISTANCE);
            for axis in 0..3 {
                pos[i][axis] += disp[i][axis] * temperature / length;
            }
        }
        temperature -= cooling;
    }

    pos
}

#[allow(clippy::cast_precision_loss)]
fn rescale(mut pos: Vec<[f64; 3]>) -> Vec<[f64; 3]> {
    let n = pos.len() as f64;
    let mut mean = [0.0_f64; 3];
    for p in &pos {
        for axis in 0..3 {
            mean[axis] += p[axis] / n;
        }
    }

    let mut lim = 0.0_f64;
    for p in &mut pos {
        for axis in 0..3 {
            p[axis] -= mean[axis];
            lim = lim.max(p[axis].abs());
        }
    }

    if lim > 0.0 {
        for p in &mut pos {
            for axis in 0..3 {
                p[axis] /= lim;
            }
        }
    }
    pos
}

fn norm(v: [f64; 3]) -> f64 {
    (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> SimilarityGraph {
        SimilarityGraph::from_json_str(text).expect("graph")
    }

    fn triangle() -> SimilarityGraph {
        parse(
            r#"{"links": [
                {"source": "A", "target": "B", "value": 0.9},
                {"source": "B", "target": "C", "value": 0.4},
                {"source": "A", "target": "C", "value": 0.2}
            ]}"#,
        )
    }

    #[test]
    fn default_params_follow_config_defaults() {
        let config = AnalysisConfig::default();
        let params = LayoutParams::default();
        assert_eq!(params.iterations, config.layout_iterations);
        assert_eq!(params.seed, config.layout_seed);

        let tuned = AnalysisConfig {
            layout_iterations: 7,
            layout_seed: 3,
            ..config
        };
        assert_eq!(
            LayoutParams::from(&tuned),
            LayoutParams {
                iterations: 7,
                seed: 3
            }
        );
    }

    #[test]
    fn empty_graph_has_empty_layout() {
        let layout = spring_layout_3d(&parse(r#"{"links": []}"#), LayoutParams::default());
        assert!(layout.nodes.is_empty());
        assert!(layout.edges.is_empty());
    }

    #[test]
    fn single_node_sits_at_origin() {
        let layout = spring_layout_3d(
            &parse(r#"{"nodes": [{"id": "solo"}], "links": []}"#),
            LayoutParams::default(),
        );
        assert_eq!(
            layout.nodes,
            vec![NodePosition {
                header: "solo".into(),
                x: 0.0,
                y: 0.0,
                z: 0.0
            }]
        );
    }

    #[test]
    fn every_node_gets_a_bounded_position() {
        let layout = spring_layout_3d(&triangle(), LayoutParams::default());
        let headers: Vec<&str> = layout.nodes.iter().map(|p| p.header.as_str()).collect();
        assert_eq!(headers, vec!["A", "B", "C"]);
        for p in &layout.nodes {
            for c in [p.x, p.y, p.z] {
                assert!(c.is_finite());
                assert!(c.abs() <= 1.0 + 1e-9);
            }
        }
        let max = layout
            .nodes
            .iter()
            .flat_map(|p| [p.x.abs(), p.y.abs(), p.z.abs()])
            .fold(0.0_f64, f64::max);
        assert!((max - 1.0).abs() < 1e-9);
    }

    #[test]
    fn same_seed_same_layout() {
        let params = LayoutParams {
            iterations: 30,
            seed: 7,
        };
        assert_eq!(
            spring_layout_3d(&triangle(), params),
            spring_layout_3d(&triangle(), params)
        );
    }

    #[test]
    fn line_width_scales_with_weight() {
        let layout = spring_layout_3d(&triangle(), LayoutParams::default());
        assert_eq!(layout.edges.len(), 3);
        assert!((layout.edges[0].line_width - 1.8).abs() < 1e-12);
        assert_eq!(layout.edges[0].source, "A");
        assert_eq!(layout.edges[0].target, "B");
    }

    #[test]
    fn strong_edges_pull_closer_than_weak_ones() {
        let g = parse(
            r#"{"links": [
                {"source": "A", "target": "B", "value": 1.0},
                {"source": "B", "target": "C", "value": 0.01}
            ]}"#,
        );
        let layout = spring_layout_3d(
            &g,
            LayoutParams {
                iterations: 200,
                seed: 1,
            },
        );
        let at = |h: &str| {
            let p = layout.nodes.iter().find(|p| p.header == h).expect("node");
            [p.x, p.y, p.z]
        };
        let dist = |a: [f64; 3], b: [f64; 3]| norm([a[0] - b[0], a[1] - b[1], a[2] - b[2]]);
        assert!(dist(at("A"), at("B")) < dist(at("B"), at("C")));
    }
}
