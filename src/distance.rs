//! Pairwise cosine distance between keyword vectors.

use crate::models::DistanceMatrix;
use crate::vectorize::VectorSpace;
use tracing::{info, instrument};

/// Cosine similarity of two equal-length vectors; 0 when either has zero norm.
pub fn cosine_similarity(a: &[f64], b: &[f64]) -> f64 {
    let dot: f64 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a = a.iter().map(|x| x * x).sum::<f64>().sqrt();
    let norm_b = b.iter().map(|x| x * x).sum::<f64>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

/// `1 - cosine_similarity` for every pair of rows, labelled by `labels`.
///
/// Values are clamped to `[0, 2]`, the diagonal is exactly 0 and the lower
/// triangle mirrors the upper one.
///
/// # Panics
///
/// Panics if `labels` and the vector space have a different number of rows.
#[instrument(level = "info", skip_all, fields(keywords = labels.len()))]
pub fn cosine_distances(space: &VectorSpace, labels: &[String]) -> DistanceMatrix {
    assert_eq!(
        space.rows.len(),
        labels.len(),
        "one label per document row"
    );
    let n = labels.len();
    let mut distances = vec![vec![0.0; n]; n];
    for i in 0..n {
        for j in (i + 1)..n {
            let d = (1.0 - cosine_similarity(&space.rows[i], &space.rows[j])).clamp(0.0, 2.0);
            distances[i][j] = d;
            distances[j][i] = d;
        }
    }
    info!(terms = space.vocabulary.len(), "Calculated semantic distance between keywords");
    DistanceMatrix {
        labels: labels.to_vec(),
        distances,
    }
}
