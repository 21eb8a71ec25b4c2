use anchorage_analysis::duplicates::{DuplicatePair, find_duplicates};
use anchorage_core::{AnalysisConfig, SimilarityGraph};
use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;
use std::io::Write;
use tracing::info;

use crate::input::read_stdin;
use crate::output::{OutputMode, render_mode};

/// Arguments for `anc dups`.
#[derive(Args, Debug)]
pub struct DupsArgs {
    /// Minimum similarity to report (overrides `duplicate_threshold`).
    #[arg(long, value_name = "T")]
    pub threshold: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct DupsReport {
    pub threshold: f64,
    pub pairs: Vec<DuplicatePair>,
}

/// Execute `anc dups`.
///
/// # Errors
///
/// Returns an error if stdin is empty or not a graph document, or writing
/// output fails.
pub fn run_dups(args: &DupsArgs, config: &AnalysisConfig, output: OutputMode) -> Result<()> {
    let text = read_stdin()?;
    let graph = SimilarityGraph::from_json_str(&text).context("invalid graph on stdin")?;

    let threshold = AnalysisConfig {
        duplicate_threshold: args.threshold.unwrap_or(config.duplicate_threshold),
        ..config.clone()
    }
    .normalized()
    .duplicate_threshold;

    let pairs = find_duplicates(&graph, threshold);
    info!(threshold, pairs = pairs.len(), "duplicate scan complete");

    render_mode(
        output,
        &DupsReport { threshold, pairs },
        render_text,
        render_pretty,
    )
}

fn render_text(report: &DupsReport, w: &mut dyn Write) -> std::io::Result<()> {
    for p in &report.pairs {
        writeln!(w, "{}\t{}\t{:.4}", p.source, p.target, p.similarity)?;
    }
    Ok(())
}

fn render_pretty(report: &DupsReport, w: &mut dyn Write) -> std::io::Result<()> {
    writeln!(
        w,
        "Highly similar paragraphs (similarity ≥ {}):",
        report.threshold
    )?;
    writeln!(w)?;
    for p in &report.pairs {
        writeln!(
            w,
            "🔍 {} ↔ {} (Similarity: {:.4})",
            p.source, p.target, p.similarity
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report() -> DupsReport {
        DupsReport {
            threshold: 0.8,
            pairs: vec![DuplicatePair {
                source: "X".to_string(),
                target: "Y".to_string(),
                similarity: 0.85,
            }],
        }
    }

    #[test]
    fn pretty_lists_pairs_under_threshold_heading() {
        let mut buf = Vec::new();
        render_pretty(&report(), &mut buf).expect("render");
        let text = String::from_utf8(buf).expect("utf8");
        assert!(text.starts_with("Highly similar paragraphs (similarity ≥ 0.8):"));
        assert!(text.contains("🔍 X ↔ Y (Similarity: 0.8500)"));
    }

    #[test]
    fn text_is_one_row_per_pair() {
        let mut buf = Vec::new();
        render_text(&report(), &mut buf).expect("render");
        assert_eq!(String::from_utf8(buf).expect("utf8"), "X\tY\t0.8500\n");
    }

    #[test]
    fn json_shape_is_stable() {
        let value = serde_json::to_value(report()).expect("serialize");
        assert_eq!(value["threshold"], 0.8);
        assert_eq!(value["pairs"][0]["source"], "X");
        assert_eq!(value["pairs"][0]["similarity"], 0.85);
    }
}
