//! URL generators: turn search queries into article URL fragments.
//!
//! A generator is handed the full query list and a per-query limit and returns
//! a [`UrlBatch`]: the ordered fragments to fetch plus the header set to use
//! for every page request. The batch driver never looks behind this trait.
//!
//! # Generators
//!
//! | Generator | Module | Method |
//! |-----------|--------|--------|
//! | Search pages | [`britannica`] | Scrapes the site's own search result pages |
//! | Fragment file | [`fragment_file`] | Reads pre-generated fragments from JSON |
//!
//! Both preserve order and neither deduplicates.

use crate::models::UrlBatch;
use indicatif::ProgressBar;
use std::error::Error;

pub mod britannica;
pub mod fragment_file;

/// Strategy producing URL fragments for a set of queries.
pub trait UrlGenerator {
    /// Produce at most `limit` fragments per query, in query order.
    ///
    /// # Arguments
    ///
    /// * `queries` - Search terms, in the order they were loaded
    /// * `limit` - Maximum fragments per query
    /// * `progress` - Advanced by the number of fragments produced
    async fn generate(
        &self,
        queries: &[String],
        limit: usize,
        progress: &ProgressBar,
    ) -> Result<UrlBatch, Box<dyn Error>>;
}
