//! Command-line interface definitions.
//!
//! Every option can also be set in the YAML config file passed with
//! `--config`; flags given on the command line win over the file.

use clap::Parser;

/// Command-line arguments for britannica_text.
///
/// # Examples
///
/// ```sh
/// # Search for each query and scrape up to 10 articles per query
/// britannica_text -q ./search_queries.json -o ./data/britannica_output.txt
///
/// # Reuse fragments saved from an earlier search
/// britannica_text -q ./search_queries.json -o ./out.txt -f ./fragments.json
///
/// # Everything from a config file
/// britannica_text -c ./britannica_text.yaml
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Optional path to a YAML config file
    #[arg(short, long, env = "BRITANNICA_TEXT_CONFIG")]
    pub config: Option<String>,

    /// JSON array of search queries
    #[arg(short, long)]
    pub queries: Option<String>,

    /// Text file the page text is appended to
    #[arg(short, long)]
    pub output: Option<String>,

    /// JSON array of pre-generated URL fragments (skips the search step)
    #[arg(short, long)]
    pub fragments: Option<String>,

    /// Maximum URL fragments per query
    #[arg(short, long)]
    pub limit: Option<usize>,

    /// Prefix prepended to every URL fragment
    #[arg(long)]
    pub base_url: Option<String>,

    /// Search page used to turn queries into URL fragments
    #[arg(long)]
    pub search_url: Option<String>,

    /// Per-request timeout in seconds (no timeout when unset)
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// Hide progress bars
    #[arg(long)]
    pub no_progress: bool,
}
