//! Search and article retrieval.
//!
//! Everything that touches the network sits behind the [`HttpGet`] trait so the
//! pipeline can be driven by an in-memory stub in tests. The scrapers follow a
//! two-phase pattern:
//!
//! 1. **Searching**: page through a search listing and collect article links
//!    ([`search`])
//! 2. **Fetching**: download each article and pull out its heading and body
//!    ([`article`])
//!
//! No call is retried. A failed request is a terminal result for that page or
//! that link only.

pub mod article;
pub mod search;

pub use article::{FetchOutcome, fetch_article};
pub use search::{StopReason, search_articles};

use std::error::Error;
use tracing::{debug, instrument};

/// Status code and body of a completed GET request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    /// Only 2xx responses are usable; every other status is treated the same way.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// A blocking-in-order GET capability.
///
/// `Err` means the request never produced a response (DNS, TLS, connection
/// reset...). A response with a failure status is still `Ok`.
pub trait HttpGet {
    async fn get(&self, url: &str) -> Result<HttpResponse, Box<dyn Error>>;
}

/// [`HttpGet`] backed by a shared `reqwest` client.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: reqwest::Client,
}

impl HttpClient {
    pub fn new() -> Result<Self, Box<dyn Error>> {
        let client = reqwest::Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client })
    }
}

impl HttpGet for HttpClient {
    #[instrument(level = "debug", skip(self))]
    async fn get(&self, url: &str) -> Result<HttpResponse, Box<dyn Error>> {
        let resp = self.client.get(url).send().await?;
        let status = resp.status().as_u16();
        let body = if resp.status().is_success() {
            resp.text().await?
        } else {
            String::new()
        };
        debug!(status, bytes = body.len(), "GET completed");
        Ok(HttpResponse { status, body })
    }
}
