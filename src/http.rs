//! HTTP access behind a small trait.
//!
//! Everything that touches the network goes through [`PageClient`], so the
//! fetcher, the batch driver and the search-page URL generator can be
//! exercised against an in-memory client in tests.
//!
//! - [`PageClient`]: Core trait, one GET returning status and body
//! - [`ReqwestClient`]: Production implementation on top of `reqwest`
//! - [`default_headers`]: Browser-like header set used for all requests

use crate::models::PageResponse;
use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, HeaderMap, HeaderValue, USER_AGENT};
use std::error::Error;
use std::time::{Duration, Instant};
use tracing::{debug, instrument, warn};

/// Desktop browser user agent; the encyclopedia blocks obvious bot agents.
pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
    AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";

/// Trait for issuing a single GET request.
///
/// Implementors return the status code and body for any completed exchange,
/// whatever the status. Only transport failures are reported as `Err`.
pub trait PageClient {
    /// Fetch `url` with the given headers.
    ///
    /// # Arguments
    ///
    /// * `url` - Absolute URL to request
    /// * `headers` - Headers attached to the request
    async fn get(&self, url: &str, headers: &HeaderMap) -> Result<PageResponse, Box<dyn Error>>;
}

/// [`PageClient`] backed by a shared `reqwest::Client`.
///
/// No retry is layered on top. When `timeout` is `None` the client keeps
/// reqwest's default of no overall request timeout.
#[derive(Debug, Clone)]
pub struct ReqwestClient {
    inner: reqwest::Client,
}

impl ReqwestClient {
    /// Build a client with an optional per-request timeout.
    pub fn new(timeout: Option<Duration>) -> Result<Self, Box<dyn Error>> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            inner: builder.build()?,
        })
    }
}

impl PageClient for ReqwestClient {
    #[instrument(level = "debug", skip_all, fields(%url))]
    async fn get(&self, url: &str, headers: &HeaderMap) -> Result<PageResponse, Box<dyn Error>> {
        let t0 = Instant::now();
        let resp = match self.inner.get(url).headers(headers.clone()).send().await {
            Ok(resp) => resp,
            Err(e) => {
                warn!(elapsed_ms = t0.elapsed().as_millis(), error = %e, "GET failed");
                return Err(e.into());
            }
        };
        let status = resp.status().as_u16();
        let body = resp.text().await?;
        debug!(
            status,
            bytes = body.len(),
            elapsed_ms = t0.elapsed().as_millis(),
            "GET completed"
        );
        Ok(PageResponse { status, body })
    }
}

/// Header set sent with search and article requests.
pub fn default_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(USER_AGENT, HeaderValue::from_static(BROWSER_USER_AGENT));
    headers.insert(
        ACCEPT,
        HeaderValue::from_static("text/html,application/xhtml+xml;q=0.9,*/*;q=0.8"),
    );
    headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));
    headers
}
