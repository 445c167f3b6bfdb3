//! Paginated search accumulation.
//!
//! Search listings give no reliable "last page" signal, so the accumulator
//! stops on progress instead: it pages forward until the result cap is
//! reached or a page adds nothing new. Listings that keep serving the same
//! page forever therefore cost exactly one extra request.

use super::HttpGet;
use crate::config::SearchSource;
use crate::utils::truncate_for_log;
use scraper::{ElementRef, Html, Selector};
use std::collections::HashSet;
use thiserror::Error;
use tracing::{debug, info, instrument, warn};
use url::Url;

/// Why the accumulator stopped paging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The result cap was reached.
    CapReached,
    /// A page yielded zero links that had not been seen already.
    NoProgress,
    /// A page contained no elements matching the link filter.
    NoMatches,
    /// A search request failed or returned a non-success status.
    RequestFailed,
}

/// A source whose link filter cannot be applied at all.
#[derive(Debug, Error)]
pub enum LinkExtractError {
    #[error("invalid link selector {selector:?}: {reason}")]
    Selector { selector: String, reason: String },
    #[error("invalid search url {url:?}: {source}")]
    SearchUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
}

/// Links gathered for one keyword.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResult {
    /// Article links in discovery order, without duplicates.
    pub links: Vec<String>,
    /// Number of search requests issued.
    pub pages_requested: usize,
    pub stop: StopReason,
}

/// Build the URL of one results page.
pub fn search_page_url(source: &SearchSource, keyword: &str, page: u32) -> String {
    let sep = if source.search_url.contains('?') { '&' } else { '?' };
    format!(
        "{}{}q={}&page={}",
        source.search_url,
        sep,
        urlencoding::encode(keyword),
        page
    )
}

fn class_matches(element: &ElementRef<'_>, needle: Option<&str>) -> bool {
    match needle {
        None => true,
        Some(needle) => element.value().classes().any(|class| class.contains(needle)),
    }
}

/// Extract every link on a results page that passes the source's promo-link filter.
///
/// Relative hrefs are resolved against the search URL. The returned list may
/// contain duplicates; deduplication happens in the accumulator.
pub fn extract_links(html: &str, source: &SearchSource) -> Result<Vec<String>, LinkExtractError> {
    let selector =
        Selector::parse(&source.link_selector).map_err(|e| LinkExtractError::Selector {
            selector: source.link_selector.clone(),
            reason: e.to_string(),
        })?;
    let base = Url::parse(&source.search_url).map_err(|e| LinkExtractError::SearchUrl {
        url: source.search_url.clone(),
        source: e,
    })?;
    let document = Html::parse_document(html);

    let links = document
        .select(&selector)
        .filter(|element| class_matches(element, source.class_contains.as_deref()))
        .filter_map(|element| element.value().attr("href"))
        .filter(|href| {
            source
                .href_contains
                .as_deref()
                .is_none_or(|needle| href.contains(needle))
        })
        .filter_map(|href| base.join(href).ok())
        .map(|url| url.to_string())
        .collect();
    Ok(links)
}

/// Page through `source`'s search listing for `keyword`, collecting at most
/// `max_results` distinct article links.
///
/// Stops at the first of: cap reached, a page with no new links, a page with
/// no matching link elements, or a failed request. Failures are not errors:
/// whatever was collected before the failure is returned.
#[instrument(level = "info", skip(client, source), fields(source = %source.name))]
pub async fn search_articles<C: HttpGet>(
    client: &C,
    source: &SearchSource,
    keyword: &str,
    max_results: usize,
) -> SearchResult {
    let mut links: Vec<String> = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();
    let mut page = source.first_page;
    let mut pages_requested = 0usize;

    let stop = loop {
        if links.len() >= max_results {
            break StopReason::CapReached;
        }

        let url = search_page_url(source, keyword, page);
        pages_requested += 1;
        let response = match client.get(&url).await {
            Ok(response) if response.is_success() => response,
            Ok(response) => {
                warn!(%url, status = response.status, "Search request failed");
                debug!(body = %truncate_for_log(&response.body, 200), "Failed search response");
                break StopReason::RequestFailed;
            }
            Err(e) => {
                warn!(%url, error = %e, "Search request failed");
                break StopReason::RequestFailed;
            }
        };

        let candidates = match extract_links(&response.body, source) {
            Ok(candidates) => candidates,
            Err(e) => {
                warn!(error = %e, "Could not extract links from search page");
                break StopReason::NoMatches;
            }
        };
        if candidates.is_empty() {
            debug!(page, "No matching links on page");
            break StopReason::NoMatches;
        }

        let before = links.len();
        for link in candidates {
            if links.len() >= max_results {
                break;
            }
            if seen.insert(link.clone()) {
                links.push(link);
            }
        }
        let added = links.len() - before;
        debug!(page, added, total = links.len(), "Processed search page");

        if added == 0 {
            break StopReason::NoProgress;
        }
        page += 1;
    };

    info!(
        count = links.len(),
        pages = pages_requested,
        stop = ?stop,
        "Search finished"
    );
    SearchResult {
        links,
        pages_requested,
        stop,
    }
}
