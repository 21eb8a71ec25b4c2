use anchorage_analysis::bridge::{Bridge, find_bridges};
use anchorage_analysis::strength::{NodeStrength, rank_strengths};
use anchorage_core::{AnalysisConfig, EmbeddingStore, SimilarityGraph};
use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;
use std::io::Write;
use std::path::PathBuf;
use tracing::{info, warn};

use crate::input::read_stdin;
use crate::output::{OutputMode, render_mode};

/// Arguments for `anc anchors`.
#[derive(Args, Debug)]
pub struct AnchorsArgs {
    /// JSONL file with one `{"header", "embedding"}` record per line.
    pub embeddings: PathBuf,

    /// Number of anchors and outliers to report (overrides `top_k`).
    #[arg(long, value_name = "K")]
    pub top_k: Option<usize>,

    /// Anchors and outliers fed into the bridge search (overrides `bridge_fanout`).
    #[arg(long, value_name = "N")]
    pub fanout: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct AnchorsReport {
    pub content_hash: String,
    pub node_count: usize,
    pub edge_count: usize,
    pub anchors: Vec<NodeStrength>,
    pub outliers: Vec<NodeStrength>,
    pub bridges: Vec<Bridge>,
}

/// Rank `graph` and search `store` for bridges.
#[must_use]
pub fn build_report(
    graph: &SimilarityGraph,
    store: &EmbeddingStore,
    top_k: usize,
    fanout: usize,
) -> AnchorsReport {
    let ranking = rank_strengths(graph);
    let bridges = find_bridges(
        store,
        ranking.top_anchors(fanout),
        ranking.top_outliers(fanout),
    );

    AnchorsReport {
        content_hash: graph.content_hash.clone(),
        node_count: graph.node_count(),
        edge_count: graph.edge_count(),
        anchors: ranking.top_anchors(top_k).to_vec(),
        outliers: ranking.top_outliers(top_k).to_vec(),
        bridges,
    }
}

/// Execute `anc anchors`.
///
/// # Errors
///
/// Returns an error if the embedding file cannot be read, stdin is empty or
/// not a graph document, or writing output fails.
pub fn run_anchors(args: &AnchorsArgs, config: &AnalysisConfig, output: OutputMode) -> Result<()> {
    let store = EmbeddingStore::from_jsonl_path(&args.embeddings)?;
    if store.is_empty() {
        warn!(path = %args.embeddings.display(), "embedding file has no usable records");
    }

    let text = read_stdin()?;
    let graph = SimilarityGraph::from_json_str(&text).context("invalid graph on stdin")?;

    let top_k = args.top_k.unwrap_or(config.top_k);
    let fanout = args.fanout.unwrap_or(config.bridge_fanout);
    let report = build_report(&graph, &store, top_k, fanout);
    info!(
        nodes = report.node_count,
        bridges = report.bridges.len(),
        "anchor analysis complete"
    );

    render_mode(output, &report, render_text, render_pretty)
}

fn render_text(report: &AnchorsReport, w: &mut dyn Write) -> std::io::Result<()> {
    for n in &report.anchors {
        writeln!(w, "anchor\t{}\t{:.2}", n.header, n.strength)?;
    }
    for n in &report.outliers {
        writeln!(w, "outlier\t{}\t{:.2}", n.header, n.strength)?;
    }
    for b in &report.bridges {
        writeln!(w, "bridge\t{}\t{}\t{}", b.bridge, b.anchor, b.outlier)?;
    }
    Ok(())
}

fn render_pretty(report: &AnchorsReport, w: &mut dyn Write) -> std::io::Result<()> {
    writeln!(w, "📌 Anchor Headlines (Most Connected Nodes):")?;
    writeln!(w)?;
    for n in &report.anchors {
        writeln!(w, "🔹 {} (Total Similarity: {:.2})", n.header, n.strength)?;
    }

    writeln!(w)?;
    writeln!(w, "🚨 Outlier Paragraphs (Most Distant Nodes):")?;
    writeln!(w)?;
    for n in &report.outliers {
        writeln!(w, "⚠️ {} (Total Similarity: {:.2})", n.header, n.strength)?;
    }

    writeln!(w)?;
    writeln!(w, "🛤 Bridging Paragraphs (Between Anchors & Outliers):")?;
    writeln!(w)?;
    if report.bridges.is_empty() {
        writeln!(w, "(none)")?;
    }
    for b in &report.bridges {
        writeln!(w, "🌉 {} (Bridges 🔹 {} ↔ ⚠️ {})", b.bridge, b.anchor, b.outlier)?;
    }
    Ok(())
}
