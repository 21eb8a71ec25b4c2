use anchorage_analysis::layout::{LayoutParams, spring_layout_3d};
use anchorage_core::{AnalysisConfig, SimilarityGraph};
use anyhow::{Context, Result};
use clap::Args;
use std::io;
use tracing::info;

use crate::input::read_stdin;
use crate::output::write_json;

/// Arguments for `anc layout`.
#[derive(Args, Debug)]
pub struct LayoutArgs {
    /// RNG seed for initial positions (overrides `layout_seed`).
    #[arg(long)]
    pub seed: Option<u64>,

    /// Number of relaxation steps (overrides `layout_iterations`).
    #[arg(long, value_name = "N")]
    pub iterations: Option<usize>,
}

impl LayoutArgs {
    fn params(&self, config: &AnalysisConfig) -> LayoutParams {
        let base = LayoutParams::from(config);
        LayoutParams {
            iterations: self.iterations.unwrap_or(base.iterations),
            seed: self.seed.unwrap_or(base.seed),
        }
    }
}

/// Execute `anc layout`. Output is always JSON.
///
/// # Errors
///
/// Returns an error if stdin is empty or not a graph document.
pub fn run_layout(args: &LayoutArgs, config: &AnalysisConfig) -> Result<()> {
    let text = read_stdin()?;
    let graph = SimilarityGraph::from_json_str(&text).context("invalid graph on stdin")?;

    let params = args.params(config);
    let layout = spring_layout_3d(&graph, params);
    info!(
        nodes = layout.nodes.len(),
        iterations = params.iterations,
        seed = params.seed,
        "layout computed"
    );

    write_json(&mut io::stdout().lock(), &layout)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_config() {
        let config = AnalysisConfig::default();
        let args = LayoutArgs {
            seed: Some(9),
            iterations: None,
        };
        assert_eq!(
            args.params(&config),
            LayoutParams {
                iterations: 50,
                seed: 9
            }
        );
    }
}
