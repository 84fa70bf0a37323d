//! Loading search queries from disk.
//!
//! The query file is a flat JSON array of strings:
//!
//! ```json
//! ["volcano", "plate tectonics", "Roman Empire"]
//! ```
//!
//! Entries are returned unmodified and in file order. Read and parse errors
//! are returned to the caller, which treats them as fatal.

use std::error::Error;
use std::path::Path;
use tokio::fs;
use tracing::{debug, info, instrument};

/// Read a JSON array of strings from `path`.
#[instrument(level = "debug", skip_all, fields(path = %path.display()))]
pub async fn load_string_array(path: &Path) -> Result<Vec<String>, Box<dyn Error>> {
    let raw = fs::read_to_string(path)
        .await
        .map_err(|e| format!("failed to read {}: {e}", path.display()))?;
    let items: Vec<String> = serde_json::from_str(&raw)
        .map_err(|e| format!("{} is not a JSON array of strings: {e}", path.display()))?;
    Ok(items)
}

/// Load the search queries file.
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub async fn load_queries(path: &Path) -> Result<Vec<String>, Box<dyn Error>> {
    let queries = load_string_array(path).await?;
    info!(count = queries.len(), "Loaded search queries");
    debug!(?queries, "Search queries");
    Ok(queries)
}
