//! Fatal error conditions.
//!
//! Anything in here aborts the run. Per-link and per-page failures never reach
//! this type: they are folded into [`crate::scrapers::FetchOutcome`] or a
//! [`crate::scrapers::search::StopReason`] and logged where they happen.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    /// A required input file (keywords, stopwords) could not be read.
    #[error("could not read {what} from {path}: {source}")]
    MissingInput {
        what: &'static str,
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The keyword file was readable but held no keywords.
    #[error("no keywords found in {path}")]
    NoKeywords { path: String },

    /// The source configuration file could not be parsed.
    #[error("invalid source configuration in {path}: {source}")]
    Config {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },

    /// Reading from or appending to a record store failed.
    #[error("record store {path}: {source}")]
    RecordStore {
        path: String,
        #[source]
        source: csv::Error,
    },

    /// None of the documents contained a usable term.
    #[error("empty vocabulary; every document is empty or contains only stopwords")]
    EmptyVocabulary,

    /// The distance matrix file could not be created or written.
    #[error("could not write distance matrix to {path}: {source}")]
    Output {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Encoding the distance matrix as CSV failed.
    #[error("could not encode distance matrix as CSV for {path}: {source}")]
    MatrixCsv {
        path: String,
        #[source]
        source: csv::Error,
    },

    /// Encoding the distance matrix as JSON failed.
    #[error("could not encode distance matrix as JSON for {path}: {source}")]
    MatrixJson {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

pub type Result<T> = std::result::Result<T, AppError>;
