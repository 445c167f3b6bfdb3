//! Keyword and stopword lists.
//!
//! Both are plain newline-delimited word lists. Keywords keep their file
//! order because that order labels the rows and columns of the distance
//! matrix; stopwords are only ever used as a set.

use crate::error::{AppError, Result};
use itertools::Itertools;
use std::collections::HashSet;
use tracing::{info, instrument};

/// Parse a keyword list: trimmed, lowercased, blank lines skipped, first occurrence wins.
pub fn parse_keywords(text: &str) -> Vec<String> {
    text.lines()
        .map(|line| line.trim().to_lowercase())
        .filter(|line| !line.is_empty())
        .unique()
        .collect()
}

/// Parse a stopword list into a set.
pub fn parse_stopwords(text: &str) -> HashSet<String> {
    text.lines()
        .map(|line| line.trim().to_lowercase())
        .filter(|line| !line.is_empty())
        .collect()
}

#[instrument(level = "info")]
pub fn load_keywords(path: &str) -> Result<Vec<String>> {
    let text = std::fs::read_to_string(path).map_err(|source| AppError::MissingInput {
        what: "keywords",
        path: path.to_string(),
        source,
    })?;
    let keywords = parse_keywords(&text);
    if keywords.is_empty() {
        return Err(AppError::NoKeywords {
            path: path.to_string(),
        });
    }
    info!(count = keywords.len(), keywords = %keywords.join(", "), "Read keywords");
    Ok(keywords)
}

#[instrument(level = "info")]
pub fn load_stopwords(path: &str) -> Result<HashSet<String>> {
    let text = std::fs::read_to_string(path).map_err(|source| AppError::MissingInput {
        what: "stopwords",
        path: path.to_string(),
        source,
    })?;
    let stopwords = parse_stopwords(&text);
    info!(count = stopwords.len(), "Read stopwords");
    Ok(stopwords)
}
