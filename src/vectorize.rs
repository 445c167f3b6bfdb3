//! TF-IDF vector space over the per-keyword documents.
//!
//! ```text
//! tfidf(t, d) = tf(t, d) × idf(t)
//! idf(t)      = ln((1 + n) / (1 + df(t))) + 1
//! ```
//!
//! `tf` is the raw count of `t` in `d`, `n` the number of documents and
//! `df(t)` the number of documents containing `t`. Rows are L2-normalized.
//! The vocabulary is derived from the documents on every run.

use crate::error::{AppError, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::{BTreeMap, HashSet};
use tracing::{debug, info, instrument};

/// Words of two or more word characters.
static TOKEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b\w\w+\b").expect("valid token regex"));

/// Document-term matrix with its vocabulary.
#[derive(Debug, Clone, PartialEq)]
pub struct VectorSpace {
    /// Terms in column order (sorted).
    pub vocabulary: Vec<String>,
    /// One row per document, `vocabulary.len()` columns each.
    pub rows: Vec<Vec<f64>>,
}

/// Smoothed inverse document frequency of a term found in `df` of `n` documents.
fn smoothed_idf(n: usize, df: usize) -> f64 {
    ((1.0 + n as f64) / (1.0 + df as f64)).ln() + 1.0
}

impl VectorSpace {
    /// Column index of `term`, if it is in the vocabulary.
    #[cfg(test)]
    pub fn term_index(&self, term: &str) -> Option<usize> {
        self.vocabulary
            .binary_search_by(|t| t.as_str().cmp(term))
            .ok()
    }
}

#[derive(Debug, Clone, Default)]
pub struct TfidfVectorizer {
    stop_words: HashSet<String>,
}

impl TfidfVectorizer {
    pub fn new(stop_words: HashSet<String>) -> Self {
        Self { stop_words }
    }

    fn tokenize<'a>(&'a self, document: &'a str) -> impl Iterator<Item = String> + 'a {
        TOKEN
            .find_iter(document)
            .map(|m| m.as_str().to_lowercase())
            .filter(|t| !self.stop_words.contains(t))
    }

    /// Build the vocabulary from `documents` and return their TF-IDF rows.
    ///
    /// # Errors
    ///
    /// [`AppError::EmptyVocabulary`] when no document has a single term left
    /// after tokenization and stopword removal.
    #[instrument(level = "info", skip_all, fields(documents = documents.len(), stop_words = self.stop_words.len()))]
    pub fn fit_transform<S: AsRef<str>>(&self, documents: &[S]) -> Result<VectorSpace> {
        let counts: Vec<BTreeMap<String, usize>> = documents
            .iter()
            .map(|doc| {
                let mut tf = BTreeMap::new();
                for token in self.tokenize(doc.as_ref()) {
                    *tf.entry(token).or_insert(0) += 1;
                }
                tf
            })
            .collect();

        let mut doc_freq: BTreeMap<&str, usize> = BTreeMap::new();
        for tf in &counts {
            for term in tf.keys() {
                *doc_freq.entry(term.as_str()).or_insert(0) += 1;
            }
        }
        if doc_freq.is_empty() {
            return Err(AppError::EmptyVocabulary);
        }

        let vocabulary: Vec<String> = doc_freq.keys().map(|t| t.to_string()).collect();
        let idf: Vec<f64> = doc_freq
            .values()
            .map(|&df| smoothed_idf(documents.len(), df))
            .collect();

        let rows = counts
            .iter()
            .map(|tf| {
                let mut row: Vec<f64> = vocabulary
                    .iter()
                    .zip(&idf)
                    .map(|(term, w)| tf.get(term).copied().unwrap_or(0) as f64 * w)
                    .collect();
                let norm = row.iter().map(|x| x * x).sum::<f64>().sqrt();
                if norm > 0.0 {
                    row.iter_mut().for_each(|x| *x /= norm);
                }
                row
            })
            .collect();

        info!(terms = vocabulary.len(), "Built TF-IDF vector space");
        debug!(
            head = ?vocabulary.iter().zip(&idf).take(20).collect::<Vec<_>>(),
            "Vocabulary head with idf"
        );
        Ok(VectorSpace { vocabulary, rows })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stop(words: &[&str]) -> HashSet<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn test_vocabulary_is_sorted_and_shared() {
        let space = TfidfVectorizer::default()
            .fit_transform(&["cat cat mouse", "dog dog mouse"])
            .unwrap();
        assert_eq!(space.vocabulary, vec!["cat", "dog", "mouse"]);
        assert_eq!(space.rows.len(), 2);
        assert!(space.rows.iter().all(|r| r.len() == 3));
        assert_eq!(space.term_index("mouse"), Some(2));
        assert_eq!(space.term_index("bird"), None);
    }

    #[test]
    fn test_smoothed_idf() {
        assert!((smoothed_idf(2, 1) - ((3.0f64 / 2.0).ln() + 1.0)).abs() < 1e-12);
        assert!((smoothed_idf(2, 2) - 1.0).abs() < 1e-12);
        assert!(smoothed_idf(10, 1) > smoothed_idf(10, 5));
    }

    #[test]
    fn test_rows_are_unit_length() {
        let space = TfidfVectorizer::default()
            .fit_transform(&["alpha beta beta", "gamma alpha", ""])
            .unwrap();
        for row in &space.rows[..2] {
            let norm: f64 = row.iter().map(|x| x * x).sum::<f64>().sqrt();
            assert!((norm - 1.0).abs() < 1e-12);
        }
        assert!(space.rows[2].iter().all(|&x| x == 0.0));
    }

    #[test]
    fn test_weights_match_hand_computation() {
        let space = TfidfVectorizer::default()
            .fit_transform(&["cat cat mouse", "dog dog mouse"])
            .unwrap();
        let idf_cat = (1.5f64).ln() + 1.0;
        let raw_cat = 2.0 * idf_cat;
        let raw_mouse = 1.0;
        let norm = (raw_cat * raw_cat + raw_mouse * raw_mouse).sqrt();
        let row = &space.rows[0];
        assert!((row[0] - raw_cat / norm).abs() < 1e-12);
        assert_eq!(row[1], 0.0);
        assert!((row[2] - raw_mouse / norm).abs() < 1e-12);
    }

    #[test]
    fn test_stopwords_and_short_tokens_excluded() {
        let space = TfidfVectorizer::new(stop(&["the", "and"]))
            .fit_transform(&["the cat and a dog", "The mouse"])
            .unwrap();
        assert_eq!(space.vocabulary, vec!["cat", "dog", "mouse"]);
    }

    #[test]
    fn test_empty_vocabulary() {
        let err = TfidfVectorizer::new(stop(&["the"]))
            .fit_transform(&["the the", "a i", ""])
            .unwrap_err();
        assert!(matches!(err, AppError::EmptyVocabulary));
    }

    #[test]
    fn test_deterministic() {
        let docs = ["zebra apple mango apple", "mango kiwi", "apple kiwi zebra"];
        let a = TfidfVectorizer::default().fit_transform(&docs).unwrap();
        let b = TfidfVectorizer::default().fit_transform(&docs).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_identical_documents_identical_rows() {
        let space = TfidfVectorizer::default()
            .fit_transform(&["breach data leak", "phishing email", "breach data leak"])
            .unwrap();
        assert_eq!(space.rows[0], space.rows[2]);
    }
}
