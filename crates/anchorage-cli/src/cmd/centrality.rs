use anchorage_analysis::centrality;
use anchorage_core::AnalysisConfig;
use anchorage_core::paragraph::parse_paragraphs;
use anyhow::{Context, Result};
use clap::Args;
use std::io;

use crate::input::read_stdin;
use crate::output::write_json;

/// Arguments for `anc centrality`.
#[derive(Args, Debug)]
pub struct CentralityArgs {
    /// How many anchors and outliers to list (overrides `centrality_k`).
    #[arg(long, value_name = "K")]
    pub top: Option<usize>,
}

/// Execute `anc centrality`.
///
/// Output is always pretty-printed JSON with `anchors` and `outliers`.
///
/// # Errors
///
/// Returns an error if stdin is not a valid paragraph list or the result
/// fails its round-trip self-check.
pub fn run_centrality(args: &CentralityArgs, config: &AnalysisConfig) -> Result<()> {
    let text = read_stdin()?;
    let paragraphs = parse_paragraphs(&text).context("invalid paragraph list on stdin")?;
    let k = args.top.unwrap_or(config.centrality_k);

    let result = centrality::run_centrality(&paragraphs, k)?;
    write_json(&mut io::stdout().lock(), &result)
}
