#![forbid(unsafe_code)]
//! anchorage-analysis library.
//!
//! # Pipeline
//!
//! ```text
//! SimilarityGraph ──► strength::rank_strengths ──► StrengthRanking
//!        │                                              │ top anchors × top outliers
//!        │                    EmbeddingStore ──► bridge::find_bridges ──► Vec<Bridge>
//!        ├──────────► duplicates::find_duplicates ──► Vec<DuplicatePair>
//!        └──────────► layout::spring_layout_3d ──► Layout
//!
//! Vec<Paragraph> ──► centrality::run_centrality ──► CentralityResult
//! ```
//!
//! # Conventions
//!
//! - **Errors**: Use `Result` with a local error type or the typed
//!   [`anchorage_core::InputError`] for return types.
//! - **Logging**: Use `tracing` macros (`info!`, `warn!`, `error!`, `debug!`, `trace!`).

pub mod bridge;
pub mod centrality;
pub mod duplicates;
pub mod layout;
pub mod strength;
