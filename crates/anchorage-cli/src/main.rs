#![forbid(unsafe_code)]

mod cmd;
mod input;
mod output;

use anchorage_core::config::{AnalysisConfig, load_config};
use anyhow::Context;
use clap::{CommandFactory, Parser, Subcommand};
use output::{CliError, OutputMode, render_error, resolve_output_mode};
use std::env;
use std::path::PathBuf;
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "anc: paragraph similarity-graph analysis",
    long_about = None
)]
struct Cli {
    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Enable debug logging (same as `debug = true` in anchorage.toml).
    #[arg(long, global = true)]
    debug: bool,

    /// Read configuration from this file instead of ./anchorage.toml.
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Output format. Defaults to pretty on a TTY and text when piped.
    #[arg(long, global = true, value_enum)]
    format: Option<OutputMode>,

    /// Shorthand for `--format json`.
    #[arg(long, global = true, hide = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    fn output_mode(&self) -> OutputMode {
        resolve_output_mode(self.format, self.json)
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(
        next_help_heading = "Graph",
        about = "Rank anchors and outliers, then find bridges",
        long_about = "Read a similarity graph on stdin, rank paragraphs by total edge weight, \
                      and search the embedding file for paragraphs that sit between the \
                      strongest and weakest ones.",
        after_help = "EXAMPLES:\n    # Rank a graph against its embeddings\n    anc anchors embeddings.jsonl < graph.json\n\n    # Show more anchors and widen the bridge search\n    anc anchors embeddings.jsonl --top-k 10 --fanout 5 < graph.json\n\n    # Emit machine-readable output\n    anc anchors embeddings.jsonl --json < graph.json"
    )]
    Anchors(cmd::anchors::AnchorsArgs),

    #[command(
        next_help_heading = "Graph",
        about = "List near-duplicate paragraph pairs",
        long_about = "Read a similarity graph on stdin and list every edge whose weight is \
                      at or above the duplicate threshold.",
        after_help = "EXAMPLES:\n    # Use the configured threshold (0.8 by default)\n    anc dups < graph.json\n\n    # Only near-identical pairs\n    anc dups --threshold 0.95 < graph.json"
    )]
    Dups(cmd::dups::DupsArgs),

    #[command(
        next_help_heading = "Embeddings",
        about = "Rank paragraphs by summed cosine distance",
        long_about = "Read a JSON list of {\"header\", \"embedding\"} records on stdin and \
                      print the most central and most distant paragraphs as JSON.",
        after_help = "EXAMPLES:\n    # Ten most central and ten most distant paragraphs\n    anc centrality < paragraphs.json\n\n    # Only the top three of each\n    anc centrality --top 3 < paragraphs.json"
    )]
    Centrality(cmd::centrality::CentralityArgs),

    #[command(
        next_help_heading = "Graph",
        about = "Compute a 3-D force-directed layout",
        long_about = "Read a similarity graph on stdin and print node positions and \
                      weighted edge segments as JSON for an external renderer.",
        after_help = "EXAMPLES:\n    # Default seed and iteration count\n    anc layout < graph.json > layout.json\n\n    # Another deterministic arrangement\n    anc layout --seed 7 --iterations 200 < graph.json"
    )]
    Layout(cmd::layout::LayoutArgs),

    #[command(
        next_help_heading = "Setup",
        about = "Generate shell completions",
        long_about = "Print a shell completion script for anc to stdout.",
        after_help = "EXAMPLES:\n    # Bash\n    anc completions bash > ~/.local/share/bash-completion/completions/anc\n\n    # Zsh\n    anc completions zsh > ~/.zfunc/_anc"
    )]
    Completions(cmd::completions::CompletionsArgs),
}

fn init_tracing(debug: bool) {
    let filter = EnvFilter::try_from_env("ANCHORAGE_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if debug || env::var("DEBUG").is_ok() {
            "anchorage=debug,info"
        } else {
            "anchorage=info,warn"
        })
    });

    let format = env::var("ANCHORAGE_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

    let registry = tracing_subscriber::registry().with(filter);

    match format.as_str() {
        "json" => {
            registry
                .with(fmt::layer().json().with_ansi(false).with_writer(std::io::stderr))
                .init();
        }
        _ => {
            registry
                .with(fmt::layer().compact().with_writer(std::io::stderr))
                .init();
        }
    }
}

fn run(cli: Cli, config: AnalysisConfig, output: OutputMode) -> anyhow::Result<()> {
    if cli.verbose {
        info!("Verbose mode enabled");
    }
    debug!(?config, ?output, "resolved configuration");

    match cli.command {
        Commands::Anchors(ref args) => cmd::anchors::run_anchors(args, &config, output),
        Commands::Dups(ref args) => cmd::dups::run_dups(args, &config, output),
        Commands::Centrality(ref args) => cmd::centrality::run_centrality(args, &config),
        Commands::Layout(ref args) => cmd::layout::run_layout(args, &config),
        Commands::Completions(ref args) => {
            cmd::completions::run_completions(args.shell, &mut Cli::command())
        }
    }
}

fn main() {
    let cli = Cli::parse();
    let output = cli.output_mode();

    // Config is loaded first so its `debug` flag can shape the log filter.
    let loaded = env::current_dir()
        .context("failed to resolve working directory")
        .and_then(|root| load_config(&root, cli.config.as_deref()).map_err(anyhow::Error::from));
    let debug_enabled = cli.debug || loaded.as_ref().is_ok_and(|c| c.debug);
    init_tracing(debug_enabled);

    let result = loaded.and_then(|mut config| {
        config.debug = debug_enabled;
        run(cli, config, output)
    });

    if let Err(err) = result {
        let error = CliError::from_anyhow(&err);
        if render_error(output, &error).is_err() {
            eprintln!("error: {err:#}");
        }
        std::process::exit(1);
    }
}
