//! Append-only corpus file.
//!
//! Every page is written with its own open-append-close cycle, so each page
//! is on disk before the next request starts. Nothing separates pages and
//! nothing is ever truncated: rerunning a batch against the same file appends
//! the same text again.

use std::error::Error;
use std::path::Path;
use tokio::io::AsyncWriteExt;
use tracing::{debug, instrument};

/// Append `text` to the file at `path`, creating it if needed.
///
/// # Returns
///
/// The number of bytes written.
#[instrument(level = "debug", skip_all, fields(path = %path.display(), bytes = text.len()))]
pub async fn append_page(path: &Path, text: &str) -> Result<usize, Box<dyn Error>> {
    let mut file = tokio::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .await
        .map_err(|e| format!("failed to open {} for append: {e}", path.display()))?;
    file.write_all(text.as_bytes()).await?;
    file.flush().await?;
    debug!("Appended page text");
    Ok(text.len())
}
