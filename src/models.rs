//! Data models shared across the collection and distance pipelines.
//!
//! - [`ArticleRecord`]: one normalized article stored against a keyword
//! - [`DistanceMatrix`]: the keyword-by-keyword cosine distance table

use serde::{Deserialize, Serialize};

/// A normalized article stored against the keyword it was found for.
///
/// Records are only created once the normalized text is non-empty and are
/// never changed afterwards. The field names double as the CSV header of the
/// record stores.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ArticleRecord {
    /// The lowercase keyword whose search produced this article.
    pub keyword: String,
    /// Absolute URL of the article.
    pub article_url: String,
    /// Normalized article text (heading followed by body).
    pub article_content: String,
}

/// Symmetric pairwise distance table labelled by keyword on both axes.
///
/// Row and column `i` both belong to `labels[i]`, in the order the keywords
/// were supplied.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DistanceMatrix {
    pub labels: Vec<String>,
    pub distances: Vec<Vec<f64>>,
}

impl DistanceMatrix {
    /// Number of keywords on each axis.
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Distance between the keywords at positions `i` and `j`.
    #[cfg(test)]
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.distances[i][j]
    }

    /// Distance between two keywords looked up by label.
    #[cfg(test)]
    pub fn between(&self, a: &str, b: &str) -> Option<f64> {
        let i = self.labels.iter().position(|l| l == a)?;
        let j = self.labels.iter().position(|l| l == b)?;
        Some(self.get(i, j))
    }
}
