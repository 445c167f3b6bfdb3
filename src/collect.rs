//! Article collection for a list of keywords.
//!
//! For every keyword, in order: search the source, fetch each link, normalize
//! the heading and body, and append the result to the record store straight
//! away. One failed article never stops the run; only a store write failure
//! does.

use crate::config::SearchSource;
use crate::error::Result;
use crate::models::ArticleRecord;
use crate::normalize::normalize_text;
use crate::outputs::records::RecordWriter;
use crate::scrapers::{FetchOutcome, HttpGet, StopReason, fetch_article, search_articles};
use futures::stream::{self, StreamExt};
use std::collections::HashSet;
use std::io::Write;
use tracing::{debug, info, instrument, warn};

/// What collection produced for one keyword.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordReport {
    pub keyword: String,
    /// Distinct links returned by the search.
    pub links_found: usize,
    /// Search result pages requested.
    pub pages_requested: usize,
    /// Links skipped because the store already had them.
    pub already_stored: usize,
    /// Links whose fetch failed or produced no usable text.
    pub skipped: usize,
    /// Records appended during this run.
    pub records_written: usize,
    pub stop: StopReason,
}

impl KeywordReport {
    /// True when the keyword contributed nothing new and has nothing stored.
    pub fn has_no_usable_articles(&self) -> bool {
        self.records_written == 0 && self.already_stored == 0
    }
}

/// Per-keyword reports in keyword order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollectionReport {
    pub keywords: Vec<KeywordReport>,
}

impl CollectionReport {
    pub fn records_written(&self) -> usize {
        self.keywords.iter().map(|k| k.records_written).sum()
    }
}

/// Turn a fetched article into a record, if it has any usable text.
pub fn to_record(keyword: &str, url: &str, heading: &str, body: &str) -> Option<ArticleRecord> {
    if body.trim().is_empty() {
        return None;
    }
    let content = normalize_text(&format!("{heading} {body}"));
    if content.is_empty() {
        return None;
    }
    Some(ArticleRecord {
        keyword: keyword.to_string(),
        article_url: url.to_string(),
        article_content: content,
    })
}

/// Collect articles for every keyword and append them to `writer`.
///
/// `already_collected` holds `(keyword, url)` pairs present in the store from a
/// previous run; those links are not fetched again.
#[instrument(level = "info", skip_all, fields(source = %source.name, keywords = keywords.len()))]
pub async fn collect_articles<C: HttpGet, W: Write>(
    client: &C,
    source: &SearchSource,
    keywords: &[String],
    max_results: usize,
    already_collected: &HashSet<(String, String)>,
    writer: &mut RecordWriter<W>,
) -> Result<CollectionReport> {
    let mut report = CollectionReport::default();

    for (i, keyword) in keywords.iter().enumerate() {
        info!(
            progress = %format!("{}/{}", i + 1, keywords.len()),
            %keyword,
            "Searching for news articles"
        );
        let search = search_articles(client, source, keyword, max_results).await;
        let mut kw_report = KeywordReport {
            keyword: keyword.clone(),
            links_found: search.links.len(),
            pages_requested: search.pages_requested,
            already_stored: 0,
            skipped: 0,
            records_written: 0,
            stop: search.stop,
        };

        if search.links.is_empty() {
            warn!(%keyword, "No news articles found for keyword");
            report.keywords.push(kw_report);
            continue;
        }
        info!(%keyword, found = search.links.len(), "Downloading found articles");

        let (fresh, stored): (Vec<String>, Vec<String>) = search
            .links
            .into_iter()
            .partition(|link| !already_collected.contains(&(keyword.clone(), link.clone())));
        kw_report.already_stored = stored.len();

        // Fetches run strictly one after another.
        let mut outcomes = std::pin::pin!(stream::iter(fresh).then(|url| async move {
            let outcome = fetch_article(client, source, &url).await;
            (url, outcome)
        }));

        while let Some((url, outcome)) = outcomes.next().await {
            match outcome {
                FetchOutcome::Article { heading, body } => {
                    match to_record(keyword, &url, &heading, &body) {
                        Some(record) => {
                            writer.append(&record)?;
                            kw_report.records_written += 1;
                            debug!(%url, bytes = record.article_content.len(), "Stored article");
                        }
                        None => {
                            kw_report.skipped += 1;
                            debug!(%url, "Article had no usable text");
                        }
                    }
                }
                FetchOutcome::Failed(reason) => {
                    kw_report.skipped += 1;
                    warn!(%url, %reason, "Failed to get article");
                }
            }
        }

        if kw_report.has_no_usable_articles() {
            warn!(%keyword, "No usable articles for keyword");
        } else {
            info!(
                %keyword,
                found = kw_report.links_found,
                pages = kw_report.pages_requested,
                stop = ?kw_report.stop,
                written = kw_report.records_written,
                already_stored = kw_report.already_stored,
                skipped = kw_report.skipped,
                "Finished keyword"
            );
        }
        report.keywords.push(kw_report);
    }

    info!(
        records = writer.written(),
        store = %writer.path(),
        "Collection completed"
    );
    Ok(report)
}
