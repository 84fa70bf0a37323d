//! URL generator backed by a pre-generated fragment list.
//!
//! The file holds a JSON array of fragments, usually saved from an earlier
//! search run. The per-query limit still applies to the batch as a whole: at
//! most `limit * queries.len()` fragments are used.

use crate::http::default_headers;
use crate::models::UrlBatch;
use crate::queries::load_string_array;
use crate::urls::UrlGenerator;
use indicatif::ProgressBar;
use std::error::Error;
use std::path::PathBuf;
use tracing::{info, instrument};

/// [`UrlGenerator`] reading fragments from a JSON file.
#[derive(Debug, Clone)]
pub struct FragmentFile {
    path: PathBuf,
}

impl FragmentFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl UrlGenerator for FragmentFile {
    #[instrument(level = "info", skip_all, fields(path = %self.path.display(), limit = limit))]
    async fn generate(
        &self,
        queries: &[String],
        limit: usize,
        progress: &ProgressBar,
    ) -> Result<UrlBatch, Box<dyn Error>> {
        let mut fragments = load_string_array(&self.path).await?;
        let cap = limit.saturating_mul(queries.len());
        let available = fragments.len();
        fragments.truncate(cap);
        progress.inc(fragments.len() as u64);
        info!(available, used = fragments.len(), "Loaded URL fragments");
        Ok(UrlBatch {
            fragments,
            headers: default_headers(),
        })
    }
}
