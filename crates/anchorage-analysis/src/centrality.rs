//! Dense centrality: rank paragraphs by summed cosine distance.
//!
//! # Overview
//!
//! This pipeline ignores the similarity graph and works directly on the
//! embedding vectors:
//!
//! ```text
//! Vec<Paragraph>
//!        ↓  embedding_matrix()          n × d, input order
//! DMatrix<f64>
//!        ↓  cosine_distance_matrix()    n × n, symmetric, zero diagonal
//! DMatrix<f64>
//!        ↓  row sums, stable sort
//! CentralityResult { anchors, outliers }
//! ```
//!
//! Anchors are the `k` paragraphs with the lowest summed distance, ascending.
//! Outliers are the `k` with the highest, descending. Both use a stable sort,
//! so ties keep input order. With fewer than `k` paragraphs both lists hold
//! every paragraph.
//!
//! A zero-norm vector has no direction; its cosine distance to anything else
//! is defined as `1.0`.

use nalgebra::DMatrix;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use anchorage_core::InputError;
use anchorage_core::paragraph::{Paragraph, validate_paragraphs};

/// Anchor and outlier headers from the dense pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CentralityResult {
    pub anchors: Vec<String>,
    pub outliers: Vec<String>,
}

/// Stack embeddings as rows of an `n × d` matrix.
///
/// Callers must have validated that every embedding has the same length.
#[must_use]
pub fn embedding_matrix(paragraphs: &[Paragraph]) -> DMatrix<f64> {
    let n = paragraphs.len();
    let d = paragraphs.first().map_or(0, |p| p.embedding.len());
    DMatrix::from_fn(n, d, |i, j| paragraphs[i].embedding[j])
}

/// Pairwise cosine distance between the rows of `m`.
#[must_use]
pub fn cosine_distance_matrix(m: &DMatrix<f64>) -> DMatrix<f64> {
    let n = m.nrows();
    let norms: Vec<f64> = m.row_iter().map(|row| row.norm()).collect();
    let gram = m * m.transpose();

    let mut dist = DMatrix::zeros(n, n);
    for i in 0..n {
        for j in (i + 1)..n {
            let d = if norms[i] == 0.0 || norms[j] == 0.0 {
                1.0
            } else {
                (1.0 - gram[(i, j)] / (norms[i] * norms[j])).clamp(0.0, 2.0)
            };
            dist[(i, j)] = d;
            dist[(j, i)] = d;
        }
    }
    dist
}

/// Sum of each row of a distance matrix.
#[must_use]
pub fn distance_sums(dist: &DMatrix<f64>) -> Vec<f64> {
    dist.row_iter().map(|row| row.sum()).collect()
}

/// Pick anchors (lowest sums) and outliers (highest sums).
#[must_use]
pub fn rank_by_distance(headers: &[&str], sums: &[f64], k: usize) -> CentralityResult {
    let mut order: Vec<usize> = (0..sums.len()).collect();

    order.sort_by(|&a, &b| sums[a].total_cmp(&sums[b]));
    let anchors = order
        .iter()
        .take(k)
        .map(|&i| headers[i].to_string())
        .collect();

    order.sort_by(|&a, &b| sums[b].total_cmp(&sums[a]));
    let outliers = order
        .iter()
        .take(k)
        .map(|&i| headers[i].to_string())
        .collect();

    CentralityResult { anchors, outliers }
}

/// Serialize and deserialize `result`, failing if anything changed.
///
/// # Errors
///
/// Returns [`InputError::RoundTrip`] if serialization fails or the decoded
/// value differs from the original.
pub fn verify_round_trip(result: &CentralityResult) -> Result<(), InputError> {
    let encoded = serde_json::to_string(result).map_err(|_| InputError::RoundTrip)?;
    let decoded: CentralityResult =
        serde_json::from_str(&encoded).map_err(|_| InputError::RoundTrip)?;
    if &decoded != result {
        return Err(InputError::RoundTrip);
    }
    Ok(())
}

/// Run the full dense centrality pipeline.
///
/// # Errors
///
/// Returns an [`InputError`] if the paragraph list fails validation or the
/// result fails the round-trip check.
#[instrument(skip(paragraphs), fields(paragraphs = paragraphs.len()))]
pub fn run_centrality(paragraphs: &[Paragraph], k: usize) -> Result<CentralityResult, InputError> {
    validate_paragraphs(paragraphs)?;

    let matrix = embedding_matrix(paragraphs);
    let dist = cosine_distance_matrix(&matrix);
    let sums = distance_sums(&dist);
    debug!(dim = matrix.ncols(), "distance matrix computed");

    let headers: Vec<&str> = paragraphs.iter().map(|p| p.header.as_str()).collect();
    let result = rank_by_distance(&headers, &sums, k);

    verify_round_trip(&result)?;
    Ok(result)
}
