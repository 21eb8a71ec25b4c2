//! Dense paragraph list consumed by the centrality pipeline.

use serde::{Deserialize, Serialize};

use crate::error::InputError;

/// A paragraph header with its embedding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paragraph {
    pub header: String,
    pub embedding: Vec<f64>,
}

/// Parse and validate a JSON list of paragraphs.
///
/// The list must be non-empty and every embedding must be non-empty and share
/// the dimension of the first record.
///
/// # Errors
///
/// - [`InputError::Empty`] for a blank payload or an empty list.
/// - [`InputError::Malformed`] if the JSON is not a list of
///   `{"header", "embedding"}` objects.
/// - [`InputError::InvalidRecord`] for an empty or mismatched embedding.
pub fn parse_paragraphs(text: &str) -> Result<Vec<Paragraph>, InputError> {
    if text.trim().is_empty() {
        return Err(InputError::Empty {
            what: "paragraph input",
        });
    }

    let paragraphs: Vec<Paragraph> =
        serde_json::from_str(text).map_err(|source| InputError::Malformed {
            what: "paragraph input",
            source,
        })?;

    validate_paragraphs(&paragraphs)?;
    Ok(paragraphs)
}

/// Check the invariants [`parse_paragraphs`] enforces on an in-memory list.
///
/// # Errors
///
/// Same as [`parse_paragraphs`], minus the parse failures.
pub fn validate_paragraphs(paragraphs: &[Paragraph]) -> Result<(), InputError> {
    let Some(first) = paragraphs.first() else {
        return Err(InputError::Empty {
            what: "paragraph list",
        });
    };
    let dim = first.embedding.len();

    for (index, p) in paragraphs.iter().enumerate() {
        if p.embedding.is_empty() {
            return Err(InputError::InvalidRecord {
                index,
                header: p.header.clone(),
                reason: "embedding is empty".to_string(),
            });
        }
        if p.embedding.len() != dim {
            return Err(InputError::InvalidRecord {
                index,
                header: p.header.clone(),
                reason: format!(
                    "embedding dimension mismatch: expected {dim}, got {}",
                    p.embedding.len()
                ),
            });
        }
    }
    Ok(())
}
