//! Run configuration.
//!
//! Settings come from an optional YAML file and are then overridden by
//! command-line flags:
//!
//! ```yaml
//! queries_path: /data/search_queries.json
//! output_path: /data/britannica_output.txt
//! limit: 10
//! base_url: https://britannica.com
//! request_timeout_secs: 30
//! disclaimers:
//!   - "Our editors will review what you’ve submitted and determine whether to revise the article."
//! ```
//!
//! [`ScrapeConfig::validate`] turns the merged settings into a [`RunConfig`]
//! with absolute paths and checked URLs. The process working directory is
//! never changed.

use crate::cli::Cli;
use crate::extract::default_disclaimers;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, instrument};
use url::Url;

pub const DEFAULT_LIMIT: usize = 10;
pub const DEFAULT_BASE_URL: &str = "https://britannica.com";
pub const DEFAULT_SEARCH_URL: &str = "https://www.britannica.com/search";

/// Settings as read from YAML and the command line, before validation.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ScrapeConfig {
    pub queries_path: Option<PathBuf>,
    pub output_path: Option<PathBuf>,
    pub fragments_path: Option<PathBuf>,
    pub limit: usize,
    pub base_url: String,
    pub search_url: String,
    pub disclaimers: Vec<String>,
    pub request_timeout_secs: Option<u64>,
    pub show_progress: bool,
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            queries_path: None,
            output_path: None,
            fragments_path: None,
            limit: DEFAULT_LIMIT,
            base_url: DEFAULT_BASE_URL.to_string(),
            search_url: DEFAULT_SEARCH_URL.to_string(),
            disclaimers: default_disclaimers(),
            request_timeout_secs: None,
            show_progress: true,
        }
    }
}

/// Validated settings used by the run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunConfig {
    pub queries_path: PathBuf,
    pub output_path: PathBuf,
    pub fragments_path: Option<PathBuf>,
    pub limit: usize,
    /// No trailing slash.
    pub base_url: String,
    pub search_url: String,
    pub disclaimers: Vec<String>,
    pub request_timeout: Option<Duration>,
    pub show_progress: bool,
}

impl ScrapeConfig {
    /// Parse a YAML document. Missing keys take their defaults.
    pub fn from_yaml(yaml: &str) -> Result<Self, Box<dyn Error>> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Read and parse a YAML config file.
    #[instrument(level = "info", skip_all, fields(path = %path.display()))]
    pub async fn load(path: &Path) -> Result<Self, Box<dyn Error>> {
        let raw = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| format!("failed to read config {}: {e}", path.display()))?;
        let config = Self::from_yaml(&raw)
            .map_err(|e| format!("invalid config {}: {e}", path.display()))?;
        debug!(?config, "Loaded config file");
        Ok(config)
    }

    /// Overwrite settings with any flags given on the command line.
    pub fn apply_cli(&mut self, cli: &Cli) {
        if let Some(q) = &cli.queries {
            self.queries_path = Some(PathBuf::from(q));
        }
        if let Some(o) = &cli.output {
            self.output_path = Some(PathBuf::from(o));
        }
        if let Some(f) = &cli.fragments {
            self.fragments_path = Some(PathBuf::from(f));
        }
        if let Some(limit) = cli.limit {
            self.limit = limit;
        }
        if let Some(base) = &cli.base_url {
            self.base_url = base.clone();
        }
        if let Some(search) = &cli.search_url {
            self.search_url = search.clone();
        }
        if let Some(secs) = cli.timeout_secs {
            self.request_timeout_secs = Some(secs);
        }
        if cli.no_progress {
            self.show_progress = false;
        }
    }

    /// Check the merged settings and resolve paths to absolute form.
    pub fn validate(self) -> Result<RunConfig, Box<dyn Error>> {
        let queries_path = self
            .queries_path
            .ok_or("no queries file given (use --queries or queries_path)")?;
        let output_path = self
            .output_path
            .ok_or("no output file given (use --output or output_path)")?;
        if self.limit == 0 {
            return Err("limit must be at least 1".into());
        }
        Url::parse(&self.base_url).map_err(|e| format!("invalid base_url {}: {e}", self.base_url))?;
        Url::parse(&self.search_url)
            .map_err(|e| format!("invalid search_url {}: {e}", self.search_url))?;

        Ok(RunConfig {
            queries_path: std::path::absolute(queries_path)?,
            output_path: std::path::absolute(output_path)?,
            fragments_path: self.fragments_path.map(std::path::absolute).transpose()?,
            limit: self.limit,
            base_url: self.base_url.trim_end_matches('/').to_string(),
            search_url: self.search_url,
            disclaimers: self.disclaimers,
            request_timeout: self.request_timeout_secs.map(Duration::from_secs),
            show_progress: self.show_progress,
        })
    }
}
