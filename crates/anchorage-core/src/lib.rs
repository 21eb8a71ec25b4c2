#![forbid(unsafe_code)]
//! anchorage-core library.
//!
//! Input model for the analysis engine: the embedding store, the similarity
//! graph, the dense paragraph list, configuration, and typed errors.
//!
//! # Conventions
//!
//! - **Errors**: Use [`error::InputError`] for input validation failures and
//!   plain `Result<T, InputError>` elsewhere.
//! - **Logging**: Use `tracing` macros (`info!`, `warn!`, `error!`, `debug!`, `trace!`).

pub mod config;
pub mod embedding;
pub mod error;
pub mod graph;
pub mod paragraph;

pub use config::AnalysisConfig;
pub use embedding::EmbeddingStore;
pub use error::{ErrorCode, InputError};
pub use graph::SimilarityGraph;
pub use paragraph::Paragraph;
