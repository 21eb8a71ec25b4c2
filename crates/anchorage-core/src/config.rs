//! Analysis configuration.
//!
//! Every tunable the analysis components read lives in [`AnalysisConfig`] and
//! is passed in explicitly. Values come from built-in defaults, then an
//! optional `anchorage.toml`, then CLI overrides applied by the binary.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::InputError;

/// File name looked up in the working directory when no `--config` is given.
pub const CONFIG_FILE_NAME: &str = "anchorage.toml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    #[serde(default)]
    pub debug: bool,
    #[serde(default = "default_duplicate_threshold")]
    pub duplicate_threshold: f64,
    #[serde(default = "default_top_k")]
    pub top_k: usize,
    #[serde(default = "default_bridge_fanout")]
    pub bridge_fanout: usize,
    #[serde(default = "default_centrality_k")]
    pub centrality_k: usize,
    #[serde(default = "default_layout_iterations")]
    pub layout_iterations: usize,
    #[serde(default = "default_layout_seed")]
    pub layout_seed: u64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            debug: false,
            duplicate_threshold: default_duplicate_threshold(),
            top_k: default_top_k(),
            bridge_fanout: default_bridge_fanout(),
            centrality_k: default_centrality_k(),
            layout_iterations: default_layout_iterations(),
            layout_seed: default_layout_seed(),
        }
    }
}

impl AnalysisConfig {
    /// Clamp out-of-range values into their valid domain.
    #[must_use]
    pub fn normalized(mut self) -> Self {
        self.duplicate_threshold = if self.duplicate_threshold.is_nan() {
            default_duplicate_threshold()
        } else {
            self.duplicate_threshold.clamp(0.0, 1.0)
        };
        self
    }
}

/// Load configuration.
///
/// With `explicit = Some(path)` the file must exist. Otherwise
/// `<project_root>/anchorage.toml` is used when present and defaults when not.
///
/// # Errors
///
/// Returns [`InputError::Unreadable`] if an explicit file cannot be read and
/// [`InputError::Config`] if the TOML does not parse.
pub fn load_config(
    project_root: &Path,
    explicit: Option<&Path>,
) -> Result<AnalysisConfig, InputError> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => {
            let candidate = project_root.join(CONFIG_FILE_NAME);
            if !candidate.exists() {
                return Ok(AnalysisConfig::default());
            }
            candidate
        }
    };

    let content = std::fs::read_to_string(&path).map_err(|source| InputError::Unreadable {
        path: path.clone(),
        source,
    })?;

    let config = toml::from_str::<AnalysisConfig>(&content)
        .map_err(|source| InputError::Config { path, source })?;

    Ok(config.normalized())
}

const fn default_duplicate_threshold() -> f64 {
    0.8
}

const fn default_top_k() -> usize {
    5
}

const fn default_bridge_fanout() -> usize {
    3
}

const fn default_centrality_k() -> usize {
    10
}

const fn default_layout_iterations() -> usize {
    50
}

const fn default_layout_seed() -> u64 {
    42
}
