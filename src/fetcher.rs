//! Single-page fetch and extraction.

use crate::extract::extract_page_text;
use crate::http::PageClient;
use crate::models::PageOutcome;
use crate::utils::truncate_for_log;
use reqwest::header::HeaderMap;
use std::error::Error;
use tracing::{debug, instrument, warn};

/// Everything needed to turn a fragment into a page request.
#[derive(Debug, Clone)]
pub struct PageRequest<'a> {
    /// Prefix the fragment is appended to, e.g. `https://britannica.com`.
    pub base_url: &'a str,
    /// Headers returned by the URL generator.
    pub headers: &'a HeaderMap,
    /// Paragraphs containing any of these are dropped.
    pub disclaimers: &'a [String],
}

impl PageRequest<'_> {
    /// Full URL for `fragment`. Plain concatenation, nothing is escaped.
    pub fn url_for(&self, fragment: &str) -> String {
        format!("{}{}", self.base_url, fragment)
    }
}

/// Fetch one fragment and clean its paragraph text.
///
/// # Returns
///
/// [`PageOutcome::Success`] when the server answers exactly 200, otherwise
/// [`PageOutcome::Skipped`] with the status. Transport errors are returned
/// as `Err`. Nothing is written here.
#[instrument(level = "debug", skip(client, request))]
pub async fn fetch_page<C: PageClient>(
    client: &C,
    request: &PageRequest<'_>,
    fragment: &str,
) -> Result<PageOutcome, Box<dyn Error>> {
    let url = request.url_for(fragment);
    let resp = client.get(&url, request.headers).await?;

    if !resp.is_ok() {
        warn!(
            %url,
            status = resp.status,
            body_preview = %truncate_for_log(&resp.body, 200),
            "Non-200 response; skipping page"
        );
        return Ok(PageOutcome::Skipped(resp.status));
    }

    let text = extract_page_text(&resp.body, request.disclaimers);
    debug!(%url, bytes = text.len(), "Extracted page text");
    Ok(PageOutcome::Success(text))
}
