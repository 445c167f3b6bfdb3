//! Search source configuration.
//!
//! A source describes one search-results listing: where to query it, how to
//! recognise article links on a results page, and where the article text
//! lives on the linked pages. Two sources are used: the primary one (BBC
//! search) and an optional secondary one (hndex) feeding the secondary store.
//!
//! Both have built-in defaults. A YAML file passed with `--config` overrides
//! either of them:
//!
//! ```yaml
//! primary:
//!   name: bbc
//!   search_url: https://www.bbc.co.uk/search
//!   first_page: 1
//!   link_selector: "a[href]"
//!   class_contains: PromoLink
//!   href_contains: /news/
//!   article_selector: article
//!   heading_selector: "#main-heading"
//! ```

use crate::error::{AppError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{info, instrument};

/// One search listing and the layout of the articles it links to.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SearchSource {
    /// Short name used in log lines.
    pub name: String,
    /// Search endpoint; `q` and `page` are appended as query parameters.
    pub search_url: String,
    /// Number of the first results page (BBC counts from 1, hndex from 0).
    #[serde(default = "default_first_page")]
    pub first_page: u32,
    /// CSS selector for candidate link elements on a results page.
    #[serde(default = "default_link_selector")]
    pub link_selector: String,
    /// Keep only links with a class containing this substring.
    #[serde(default)]
    pub class_contains: Option<String>,
    /// Keep only links whose href contains this substring.
    #[serde(default)]
    pub href_contains: Option<String>,
    /// CSS selector for the element holding the article body.
    #[serde(default = "default_article_selector")]
    pub article_selector: String,
    /// CSS selector for the article heading, if the source has one.
    #[serde(default)]
    pub heading_selector: Option<String>,
    /// Leave the text of links inside the article body out of the body text.
    #[serde(default)]
    pub strip_links: bool,
}

fn default_first_page() -> u32 {
    1
}

fn default_link_selector() -> String {
    "a[href]".to_string()
}

fn default_article_selector() -> String {
    "article".to_string()
}

impl SearchSource {
    /// BBC News search listing.
    pub fn bbc() -> Self {
        Self {
            name: "bbc".to_string(),
            search_url: "https://www.bbc.co.uk/search".to_string(),
            first_page: 1,
            link_selector: default_link_selector(),
            class_contains: Some("PromoLink".to_string()),
            href_contains: Some("/news/".to_string()),
            article_selector: default_article_selector(),
            heading_selector: Some("#main-heading".to_string()),
            strip_links: false,
        }
    }

    /// hndex.org listing of cached Hacker News stories.
    pub fn hndex() -> Self {
        Self {
            name: "hndex".to_string(),
            search_url: "https://hndex.org/".to_string(),
            first_page: 0,
            link_selector: "a[href^='/']".to_string(),
            class_contains: None,
            href_contains: Some("/cache/".to_string()),
            article_selector: default_article_selector(),
            heading_selector: None,
            strip_links: true,
        }
    }
}

/// The pair of sources used by a run.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SourcesConfig {
    #[serde(default = "SearchSource::bbc")]
    pub primary: SearchSource,
    #[serde(default = "SearchSource::hndex")]
    pub secondary: SearchSource,
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            primary: SearchSource::bbc(),
            secondary: SearchSource::hndex(),
        }
    }
}

impl SourcesConfig {
    /// Parse a YAML source configuration.
    pub fn from_yaml(yaml: &str, path: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).map_err(|source| AppError::Config {
            path: path.to_string(),
            source,
        })
    }

    /// Load the configuration at `path`, or the built-in defaults when no path is given.
    #[instrument(level = "info")]
    pub fn load(path: Option<&str>) -> Result<Self> {
        let Some(path) = path else {
            info!("Using built-in source configuration");
            return Ok(Self::default());
        };
        let yaml = std::fs::read_to_string(Path::new(path)).map_err(|source| {
            AppError::MissingInput {
                what: "source configuration",
                path: path.to_string(),
                source,
            }
        })?;
        let config = Self::from_yaml(&yaml, path)?;
        info!(
            primary = %config.primary.name,
            secondary = %config.secondary.name,
            "Loaded source configuration"
        );
        Ok(config)
    }
}
