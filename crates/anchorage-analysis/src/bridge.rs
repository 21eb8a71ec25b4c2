//! Bridge search: the stored paragraph closest to an anchor/outlier midpoint.
//!
//! # Algorithm
//!
//! For an (anchor, outlier) pair:
//!
//! 1. Look up both embeddings. Either missing → no bridge.
//! 2. Either empty, or lengths differ → no bridge.
//! 3. `midpoint[i] = (anchor[i] + outlier[i]) / 2`.
//! 4. Linear scan of the store computing squared Euclidean distance to the
//!    midpoint. Entries whose length differs from the midpoint cannot be
//!    compared and are skipped. The first minimum in store order wins.
//!
//! The anchor or outlier may come back as its own bridge when nothing else
//! lies closer to the midpoint.
//!
//! Cost is `O(P × N × D)` for `P` pairs, `N` stored embeddings, and
//! dimension `D`. No index is built.

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use anchorage_core::EmbeddingStore;

use crate::strength::NodeStrength;

/// A bridge paragraph found for one (anchor, outlier) pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bridge {
    /// Header of the paragraph nearest the midpoint.
    pub bridge: String,
    pub anchor: String,
    pub outlier: String,
    /// Squared Euclidean distance from the bridge to the midpoint.
    pub distance: f64,
}

/// Why a pair produced no bridge. None of these are fatal.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NoBridge {
    #[error("no embedding for '{0}'")]
    MissingEmbedding(String),
    #[error("embedding for '{0}' is empty")]
    EmptyEmbedding(String),
    #[error("dimension mismatch: anchor has {anchor}, outlier has {outlier}")]
    DimensionMismatch { anchor: usize, outlier: usize },
    #[error("no stored embedding has dimension {0}")]
    NothingComparable(usize),
}

/// Elementwise midpoint of two vectors, `None` if lengths differ.
#[must_use]
pub fn midpoint(a: &[f64], b: &[f64]) -> Option<Vec<f64>> {
    if a.len() != b.len() {
        return None;
    }
    Some(a.iter().zip(b).map(|(x, y)| (x + y) / 2.0).collect())
}

/// Squared Euclidean distance, `None` if lengths differ.
#[must_use]
pub fn squared_distance(a: &[f64], b: &[f64]) -> Option<f64> {
    if a.len() != b.len() {
        return None;
    }
    Some(a.iter().zip(b).map(|(x, y)| (x - y) * (x - y)).sum())
}

/// Nearest stored embedding to `query` by squared Euclidean distance.
///
/// Ties go to the entry seen first in store order. Entries whose distance
/// overflows to infinity or NaN are never chosen.
#[must_use]
pub fn nearest<'a>(store: &'a EmbeddingStore, query: &[f64]) -> Option<(&'a str, f64)> {
    let mut best: Option<(&str, f64)> = None;
    for (header, vec) in store.iter() {
        let Some(d) = squared_distance(query, vec) else {
            continue;
        };
        if !d.is_finite() {
            continue;
        }
        match best {
            Some((_, best_d)) if d >= best_d => {}
            _ => best = Some((header, d)),
        }
    }
    best
}

/// Find the bridge for a single (anchor, outlier) pair.
///
/// # Errors
///
/// Returns a [`NoBridge`] reason when the pair cannot be bridged. Callers
/// treat this as "skip the pair", never as a failed run.
pub fn find_bridge(store: &EmbeddingStore, anchor: &str, outlier: &str) -> Result<Bridge, NoBridge> {
    let anchor_vec = store
        .get(anchor)
        .ok_or_else(|| NoBridge::MissingEmbedding(anchor.to_string()))?;
    let outlier_vec = store
        .get(outlier)
        .ok_or_else(|| NoBridge::MissingEmbedding(outlier.to_string()))?;

    if anchor_vec.is_empty() {
        return Err(NoBridge::EmptyEmbedding(anchor.to_string()));
    }
    if outlier_vec.is_empty() {
        return Err(NoBridge::EmptyEmbedding(outlier.to_string()));
    }

    let mid = midpoint(anchor_vec, outlier_vec).ok_or(NoBridge::DimensionMismatch {
        anchor: anchor_vec.len(),
        outlier: outlier_vec.len(),
    })?;

    // The anchor itself is always comparable, so this only fails on a
    // store mutated between lookup and scan.
    let (bridge, distance) = nearest(store, &mid).ok_or(NoBridge::NothingComparable(mid.len()))?;

    Ok(Bridge {
        bridge: bridge.to_string(),
        anchor: anchor.to_string(),
        outlier: outlier.to_string(),
        distance,
    })
}

/// Search bridges over the cross-product `anchors × outliers`.
///
/// Pairs are visited anchor-major, so output order is deterministic.
/// Pairs without a bridge are omitted.
#[instrument(skip_all, fields(anchors = anchors.len(), outliers = outliers.len(), store = store.len()))]
#[must_use]
pub fn find_bridges(
    store: &EmbeddingStore,
    anchors: &[NodeStrength],
    outliers: &[NodeStrength],
) -> Vec<Bridge> {
    let mut bridges = Vec::with_capacity(anchors.len() * outliers.len());
    for anchor in anchors {
        for outlier in outliers {
            match find_bridge(store, &anchor.header, &outlier.header) {
                Ok(bridge) => bridges.push(bridge),
                Err(reason) => debug!(
                    anchor = %anchor.header,
                    outlier = %outlier.header,
                    "no bridge: {reason}"
                ),
            }
        }
    }
    bridges
}
