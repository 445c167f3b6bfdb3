//! Article download and extraction.
//!
//! Given an article URL, returns its heading and body text, or the reason no
//! text could be obtained. Nothing here returns an error to the caller: a
//! failed article is a [`FetchOutcome::Failed`] and the collector skips it.

use super::HttpGet;
use crate::config::SearchSource;
use scraper::{ElementRef, Html, Selector};
use std::fmt;
use tracing::{debug, instrument, warn};

/// Why an article yielded no text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchFailure {
    /// The request never produced a response.
    Transport(String),
    /// The response had a non-success status.
    Status(u16),
    /// The page had no element matching the article selector.
    MissingContainer,
}

impl fmt::Display for FetchFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchFailure::Transport(e) => write!(f, "request failed: {e}"),
            FetchFailure::Status(code) => write!(f, "status {code}"),
            FetchFailure::MissingContainer => write!(f, "no article container on page"),
        }
    }
}

/// Result of fetching one article.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Raw (unnormalized) heading and body text. Either may be empty.
    Article { heading: String, body: String },
    Failed(FetchFailure),
}

/// Text of `element`, text nodes joined by single spaces.
fn element_text(element: ElementRef<'_>, strip_links: bool) -> String {
    element
        .descendants()
        .filter_map(|node| {
            let text = node.value().as_text()?;
            if strip_links
                && node
                    .ancestors()
                    .filter_map(ElementRef::wrap)
                    .any(|el| el.value().name() == "a")
            {
                return None;
            }
            Some(&**text)
        })
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Pull heading and body out of an article page.
pub fn extract_article(html: &str, source: &SearchSource) -> FetchOutcome {
    let document = Html::parse_document(html);

    let Ok(article_selector) = Selector::parse(&source.article_selector) else {
        warn!(selector = %source.article_selector, "Invalid article selector");
        return FetchOutcome::Failed(FetchFailure::MissingContainer);
    };
    let Some(article) = document.select(&article_selector).next() else {
        return FetchOutcome::Failed(FetchFailure::MissingContainer);
    };
    let body = element_text(article, source.strip_links);

    let heading = source
        .heading_selector
        .as_deref()
        .and_then(|sel| Selector::parse(sel).ok())
        .and_then(|sel| document.select(&sel).next())
        .map(|el| element_text(el, false))
        .unwrap_or_default();

    FetchOutcome::Article { heading, body }
}

/// Download `url` and extract its heading and body.
#[instrument(level = "debug", skip(client, source))]
pub async fn fetch_article<C: HttpGet>(client: &C, source: &SearchSource, url: &str) -> FetchOutcome {
    let response = match client.get(url).await {
        Ok(response) => response,
        Err(e) => return FetchOutcome::Failed(FetchFailure::Transport(e.to_string())),
    };
    if !response.is_success() {
        return FetchOutcome::Failed(FetchFailure::Status(response.status));
    }
    let outcome = extract_article(&response.body, source);
    if let FetchOutcome::Article { heading, body } = &outcome {
        debug!(heading_bytes = heading.len(), body_bytes = body.len(), "Parsed article");
    }
    outcome
}
