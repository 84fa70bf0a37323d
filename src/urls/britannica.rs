//! Search-page URL generator.
//!
//! Runs each query against the site's search page and collects the article
//! links from the result list:
//!
//! ```text
//! https://www.britannica.com/search?query=plate%20tectonics&page=1
//! ```
//!
//! Result links are root-relative (`/science/plate-tectonics`), which is
//! exactly the fragment form the page fetcher expects.

use crate::http::{PageClient, default_headers};
use crate::models::UrlBatch;
use crate::urls::UrlGenerator;
use crate::utils::truncate_for_log;
use indicatif::ProgressBar;
use once_cell::sync::Lazy;
use reqwest::header::HeaderMap;
use scraper::{Html, Selector};
use std::error::Error;
use tracing::{debug, info, instrument, warn};

/// Upper bound on result pages read per query.
pub const MAX_SEARCH_PAGES: usize = 5;

static RESULT_LINK: Lazy<Selector> =
    Lazy::new(|| Selector::parse(".search-results a[href]").unwrap());

/// [`UrlGenerator`] that scrapes search result pages.
#[derive(Debug)]
pub struct SearchPages<C> {
    client: C,
    search_url: String,
    headers: HeaderMap,
}

impl<C: PageClient> SearchPages<C> {
    /// Create a generator that queries `search_url` through `client`.
    pub fn new(client: C, search_url: impl Into<String>) -> Self {
        Self {
            client,
            search_url: search_url.into(),
            headers: default_headers(),
        }
    }

    /// URL of result page `page` (1-based) for `query`.
    pub fn page_url(&self, query: &str, page: usize) -> String {
        format!(
            "{}?query={}&page={}",
            self.search_url,
            urlencoding::encode(query),
            page
        )
    }

    /// Collect up to `limit` fragments for a single query.
    ///
    /// Stops at the first page that is not a 200, has no results, or once
    /// [`MAX_SEARCH_PAGES`] pages have been read.
    #[instrument(level = "info", skip(self))]
    pub async fn fragments_for_query(
        &self,
        query: &str,
        limit: usize,
    ) -> Result<Vec<String>, Box<dyn Error>> {
        let mut fragments = Vec::new();

        for page in 1..=MAX_SEARCH_PAGES {
            if fragments.len() >= limit {
                break;
            }
            let url = self.page_url(query, page);
            let resp = self.client.get(&url, &self.headers).await?;
            if !resp.is_ok() {
                warn!(
                    %url,
                    status = resp.status,
                    body_preview = %truncate_for_log(&resp.body, 200),
                    "Search page not available"
                );
                break;
            }

            let links = parse_search_results(&resp.body);
            debug!(page, count = links.len(), "Parsed search page");
            if links.is_empty() {
                break;
            }
            let room = limit - fragments.len();
            fragments.extend(links.into_iter().take(room));
        }

        info!(count = fragments.len(), "Collected URL fragments");
        Ok(fragments)
    }
}

impl<C: PageClient> UrlGenerator for SearchPages<C> {
    #[instrument(level = "info", skip_all, fields(queries = queries.len(), limit = limit))]
    async fn generate(
        &self,
        queries: &[String],
        limit: usize,
        progress: &ProgressBar,
    ) -> Result<UrlBatch, Box<dyn Error>> {
        let mut fragments = Vec::new();
        for query in queries {
            let found = self.fragments_for_query(query, limit).await?;
            progress.inc(found.len() as u64);
            fragments.extend(found);
        }
        info!(total = fragments.len(), "Generated URL fragments");
        Ok(UrlBatch {
            fragments,
            headers: self.headers.clone(),
        })
    }
}

/// Root-relative result links on a search page, in page order.
///
/// Absolute and protocol-relative links are ignored.
pub fn parse_search_results(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);
    let mut links = Vec::new();
    for element in document.select(&RESULT_LINK) {
        if let Some(href) = element.value().attr("href") {
            let href = href.trim();
            if href.starts_with('/') && !href.starts_with("//") {
                links.push(href.to_string());
            }
        }
    }
    links
}
