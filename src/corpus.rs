//! Per-keyword documents built from the record stores.
//!
//! Every run rebuilds the documents from the full stores, so articles
//! collected by earlier runs count just as much as new ones.

use crate::error::Result;
use crate::models::ArticleRecord;
use crate::outputs::records::load_records;
use std::collections::HashMap;
use tracing::{info, instrument, warn};

/// Join the content of every record belonging to each keyword.
///
/// Returns one document per keyword, in the order of `keywords`. Record
/// keywords are compared case-insensitively; records for keywords not in the
/// list are ignored, and a keyword without records gets an empty document.
pub fn build_documents(keywords: &[String], records: &[ArticleRecord]) -> Vec<String> {
    let mut grouped: HashMap<String, Vec<&str>> = HashMap::new();
    for record in records {
        grouped
            .entry(record.keyword.to_lowercase())
            .or_default()
            .push(record.article_content.as_str());
    }

    keywords
        .iter()
        .map(|keyword| {
            grouped
                .get(&keyword.to_lowercase())
                .map(|parts| parts.join(" "))
                .unwrap_or_default()
        })
        .collect()
}

/// Append each secondary document onto the matching primary document.
pub fn combine_documents(primary: Vec<String>, secondary: Option<Vec<String>>) -> Vec<String> {
    let Some(secondary) = secondary else {
        return primary;
    };
    primary
        .into_iter()
        .zip(secondary)
        .map(|(mut doc, extra)| {
            if !doc.is_empty() && !extra.is_empty() {
                doc.push(' ');
            }
            doc.push_str(&extra);
            doc
        })
        .collect()
}

/// Load the primary store into per-keyword documents.
///
/// A missing or unreadable primary store is fatal.
#[instrument(level = "info", skip(keywords))]
pub fn load_documents(keywords: &[String], path: &str) -> Result<Vec<String>> {
    let records = load_records(path)?;
    let documents = build_documents(keywords, &records);
    for (keyword, doc) in keywords.iter().zip(&documents) {
        if doc.is_empty() {
            warn!(%keyword, "No stored articles for keyword");
        }
    }
    info!(documents = documents.len(), "Processed stored articles");
    Ok(documents)
}

/// Load the secondary store, or `None` when it cannot be read.
#[instrument(level = "info", skip(keywords))]
pub fn load_secondary_documents(keywords: &[String], path: &str) -> Option<Vec<String>> {
    match load_records(path) {
        Ok(records) => {
            info!("Additional data loaded");
            Some(build_documents(keywords, &records))
        }
        Err(e) => {
            warn!(error = %e, "Could not read additional data; using primary data only");
            None
        }
    }
}
