//! Data models passed between the pipeline stages.
//!
//! This module defines the small set of values that flow through a run:
//! - [`UrlBatch`]: Ordered URL fragments plus the headers to request them with
//! - [`PageResponse`]: Status and body returned by the HTTP seam
//! - [`PageOutcome`]: Result of fetching and cleaning a single page
//! - [`RunSummary`]: Counters reported when the batch driver finishes

use reqwest::header::HeaderMap;

/// Output of a URL generator.
///
/// Fragments are root-relative paths (for example `/science/volcano`) kept in
/// the order the generator produced them. `headers` is sent with every page
/// request made for this batch.
#[derive(Debug, Clone, Default)]
pub struct UrlBatch {
    /// Ordered URL path fragments, one per page to fetch.
    pub fragments: Vec<String>,
    /// Header set used for each subsequent page request.
    pub headers: HeaderMap,
}

/// A raw HTTP response as seen by the fetcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageResponse {
    /// The HTTP status code.
    pub status: u16,
    /// The response body decoded as text.
    pub body: String,
}

impl PageResponse {
    pub fn is_ok(&self) -> bool {
        self.status == 200
    }
}

/// What fetching one fragment produced.
///
/// Only [`PageOutcome::Success`] carries text to be appended to the output
/// file. A [`PageOutcome::Skipped`] page contributes nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageOutcome {
    /// Status was exactly 200; the cleaned paragraph text.
    Success(String),
    /// Any other status code.
    Skipped(u16),
}

/// Counters for a finished batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Fragments requested.
    pub attempted: usize,
    /// Pages appended to the output file.
    pub written: usize,
    /// Pages skipped because of a non-200 status.
    pub skipped: usize,
    /// Total bytes appended.
    pub bytes_written: usize,
}
