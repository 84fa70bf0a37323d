//! Batch driver: queries in, corpus text out.
//!
//! The run is strictly sequential. Each fragment is requested, cleaned and
//! (on success) appended to the output file before the next request starts.
//!
//! 1. **Load** the query file
//! 2. **Generate** URL fragments through the injected [`UrlGenerator`]
//! 3. **Fetch** every fragment in order and append the cleaned text
//!
//! Non-200 pages are logged and skipped. Transport and write errors stop the
//! batch; pages already appended stay on disk. There is no checkpoint, so a
//! rerun appends again from the first fragment.

use crate::config::RunConfig;
use crate::fetcher::{PageRequest, fetch_page};
use crate::http::PageClient;
use crate::models::{PageOutcome, RunSummary};
use crate::output::append_page;
use crate::queries::load_queries;
use crate::urls::UrlGenerator;
use crate::utils::{ensure_parent_dir, progress_bar};
use indicatif::ProgressBar;
use std::error::Error;
use std::path::Path;
use tracing::{debug, info, instrument, warn};

/// Fetch every fragment in order and append successful pages to `output`.
///
/// The progress bar advances once per fragment, whatever the outcome. With no
/// fragments no request is made and `output` is left untouched.
#[instrument(level = "info", skip_all, fields(fragments = fragments.len(), output = %output.display()))]
pub async fn run_batch<C: PageClient>(
    client: &C,
    request: &PageRequest<'_>,
    fragments: &[String],
    output: &Path,
    progress: &ProgressBar,
) -> Result<RunSummary, Box<dyn Error>> {
    let mut summary = RunSummary::default();

    for (index, fragment) in fragments.iter().enumerate() {
        summary.attempted += 1;
        match fetch_page(client, request, fragment).await? {
            PageOutcome::Success(text) => {
                summary.bytes_written += append_page(output, &text).await?;
                summary.written += 1;
                debug!(index, %fragment, bytes = text.len(), "Page written");
            }
            PageOutcome::Skipped(status) => {
                summary.skipped += 1;
                warn!(index, %fragment, status, "Page skipped");
            }
        }
        progress.inc(1);
    }

    info!(
        attempted = summary.attempted,
        written = summary.written,
        skipped = summary.skipped,
        bytes = summary.bytes_written,
        "Batch finished"
    );
    Ok(summary)
}

/// Run the whole job described by `config`.
///
/// # Arguments
///
/// * `config` - Validated run settings
/// * `client` - HTTP client used for page requests
/// * `generator` - Strategy turning queries into URL fragments
#[instrument(level = "info", skip_all)]
pub async fn run<C, G>(
    config: &RunConfig,
    client: &C,
    generator: &G,
) -> Result<RunSummary, Box<dyn Error>>
where
    C: PageClient,
    G: UrlGenerator,
{
    let queries = load_queries(&config.queries_path).await?;
    ensure_parent_dir(&config.output_path).await?;

    let expected = queries.len().saturating_mul(config.limit) as u64;
    let pb = progress_bar(expected, "Generating URL fragments", config.show_progress);
    let batch = generator.generate(&queries, config.limit, &pb).await?;
    pb.finish_and_clear();
    info!(total = batch.fragments.len(), "Fetched URL fragments");

    let request = PageRequest {
        base_url: &config.base_url,
        headers: &batch.headers,
        disclaimers: &config.disclaimers,
    };
    let pb = progress_bar(
        batch.fragments.len() as u64,
        "Scraping pages",
        config.show_progress,
    );
    let summary = run_batch(client, &request, &batch.fragments, &config.output_path, &pb).await;
    pb.finish_and_clear();
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::default_disclaimers;
    use crate::http::{default_headers, testing::FakeClient};
    use crate::models::UrlBatch;
    use crate::urls::fragment_file::FragmentFile;
    use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
    use std::path::PathBuf;
    use tempfile::TempDir;

    const BASE: &str = "https://britannica.com";
    const DISCLAIMER_PAGE: &str = "<p>Lava text.</p><p>Our editors will review what you've submitted and determine whether to revise the article.</p>";

    /// Generator returning `/<query>/<n>` for n in 0..limit.
    struct PerQuery {
        headers: HeaderMap,
    }

    impl UrlGenerator for PerQuery {
        async fn generate(
            &self,
            queries: &[String],
            limit: usize,
            progress: &ProgressBar,
        ) -> Result<UrlBatch, Box<dyn Error>> {
            let fragments: Vec<String> = queries
                .iter()
                .flat_map(|q| (0..limit).map(move |n| format!("/{q}/{n}")))
                .collect();
            progress.inc(fragments.len() as u64);
            Ok(UrlBatch {
                fragments,
                headers: self.headers.clone(),
            })
        }
    }

    fn run_config(dir: &TempDir, queries: &str, limit: usize) -> RunConfig {
        let queries_path = dir.path().join("queries.json");
        std::fs::write(&queries_path, queries).unwrap();
        RunConfig {
            queries_path,
            output_path: dir.path().join("data/output.txt"),
            fragments_path: None,
            limit,
            base_url: BASE.to_string(),
            search_url: "https://www.britannica.com/search".to_string(),
            disclaimers: default_disclaimers(),
            request_timeout: None,
            show_progress: false,
        }
    }

    fn request<'a>(headers: &'a HeaderMap, disclaimers: &'a [String]) -> PageRequest<'a> {
        PageRequest {
            base_url: BASE,
            headers,
            disclaimers,
        }
    }

    fn output(dir: &TempDir) -> PathBuf {
        dir.path().join("out.txt")
    }

    #[tokio::test]
    async fn test_volcano_example_end_to_end() {
        let dir = TempDir::new().unwrap();
        let config = run_config(&dir, r#"["volcano"]"#, 1);
        let client = FakeClient::new().route("https://britannica.com/volcano/0", 200, DISCLAIMER_PAGE);
        let generator = PerQuery {
            headers: default_headers(),
        };

        let summary = run(&config, &client, &generator).await.unwrap();

        assert_eq!(client.requested_urls(), vec!["https://britannica.com/volcano/0"]);
        assert_eq!(
            tokio::fs::read_to_string(&config.output_path).await.unwrap(),
            "Lava text."
        );
        assert_eq!(summary.written, 1);
        assert_eq!(summary.bytes_written, "Lava text.".len());
    }

    #[tokio::test]
    async fn test_pages_appended_in_fragment_order_without_delimiters() {
        let dir = TempDir::new().unwrap();
        let client = FakeClient::new()
            .route("https://britannica.com/b", 200, "<p>Bee</p>")
            .route("https://britannica.com/a", 200, "<p>Ay</p><p>Aye</p>");
        let headers = HeaderMap::new();
        let disclaimers = default_disclaimers();
        let fragments = vec!["/b".to_string(), "/a".to_string(), "/b".to_string()];

        let summary = run_batch(
            &client,
            &request(&headers, &disclaimers),
            &fragments,
            &output(&dir),
            &ProgressBar::hidden(),
        )
        .await
        .unwrap();

        assert_eq!(
            tokio::fs::read_to_string(output(&dir)).await.unwrap(),
            "BeeAy\nAyeBee"
        );
        assert_eq!(summary.attempted, 3);
        assert_eq!(summary.written, 3);
    }

    #[tokio::test]
    async fn test_zero_fragments_makes_no_requests_and_no_file() {
        let dir = TempDir::new().unwrap();
        let client = FakeClient::new();
        let headers = HeaderMap::new();
        let progress = ProgressBar::hidden();

        let summary = run_batch(&client, &request(&headers, &[]), &[], &output(&dir), &progress)
            .await
            .unwrap();

        assert!(client.requested_urls().is_empty());
        assert!(!output(&dir).exists());
        assert_eq!(summary, RunSummary::default());
        assert_eq!(progress.position(), 0);
    }

    #[tokio::test]
    async fn test_zero_queries_leaves_existing_output_unchanged() {
        let dir = TempDir::new().unwrap();
        let config = run_config(&dir, "[]", 10);
        tokio::fs::create_dir_all(config.output_path.parent().unwrap())
            .await
            .unwrap();
        tokio::fs::write(&config.output_path, "kept").await.unwrap();
        let client = FakeClient::new();
        let generator = PerQuery {
            headers: HeaderMap::new(),
        };

        let summary = run(&config, &client, &generator).await.unwrap();

        assert_eq!(summary.attempted, 0);
        assert!(client.requested_urls().is_empty());
        assert_eq!(
            tokio::fs::read_to_string(&config.output_path).await.unwrap(),
            "kept"
        );
    }

    #[tokio::test]
    async fn test_non_200_is_skipped_and_nothing_written() {
        let dir = TempDir::new().unwrap();
        let client = FakeClient::new()
            .route("https://britannica.com/ok", 200, "<p>Fine.</p>")
            .route("https://britannica.com/blocked", 403, "<p>Access denied</p>");
        let headers = HeaderMap::new();
        let fragments = vec![
            "/blocked".to_string(),
            "/ok".to_string(),
            "/missing".to_string(),
        ];
        let progress = ProgressBar::hidden();

        let summary = run_batch(&client, &request(&headers, &[]), &fragments, &output(&dir), &progress)
            .await
            .unwrap();

        assert_eq!(tokio::fs::read_to_string(output(&dir)).await.unwrap(), "Fine.");
        assert_eq!(summary.written, 1);
        assert_eq!(summary.skipped, 2);
        assert_eq!(progress.position(), 3);
    }

    #[tokio::test]
    async fn test_only_skipped_pages_creates_no_file() {
        let dir = TempDir::new().unwrap();
        let client = FakeClient::new();
        let headers = HeaderMap::new();
        let fragments = vec!["/missing".to_string()];

        run_batch(&client, &request(&headers, &[]), &fragments, &output(&dir), &ProgressBar::hidden())
            .await
            .unwrap();

        assert!(!output(&dir).exists());
    }

    #[tokio::test]
    async fn test_transport_error_stops_batch_but_keeps_written_pages() {
        let dir = TempDir::new().unwrap();
        let client = FakeClient::new()
            .route("https://britannica.com/first", 200, "<p>First.</p>")
            .fail("https://britannica.com/down")
            .route("https://britannica.com/never", 200, "<p>Never.</p>");
        let headers = HeaderMap::new();
        let fragments = vec![
            "/first".to_string(),
            "/down".to_string(),
            "/never".to_string(),
        ];

        let result = run_batch(&client, &request(&headers, &[]), &fragments, &output(&dir), &ProgressBar::hidden()).await;

        assert!(result.is_err());
        assert_eq!(tokio::fs::read_to_string(output(&dir)).await.unwrap(), "First.");
        assert_eq!(client.requested_urls().len(), 2);
    }

    #[tokio::test]
    async fn test_rerun_appends_duplicate_content() {
        // No checkpoint and no truncation: the second run doubles the file.
        let dir = TempDir::new().unwrap();
        let config = run_config(&dir, r#"["volcano", "glacier"]"#, 2);
        let client = FakeClient::new()
            .route("https://britannica.com/volcano/0", 200, DISCLAIMER_PAGE)
            .route("https://britannica.com/volcano/1", 200, "<p>Ash &amp;amp; cinder.</p>")
            .route("https://britannica.com/glacier/0", 200, "<p>Ice.</p>");
        let generator = PerQuery {
            headers: HeaderMap::new(),
        };

        run(&config, &client, &generator).await.unwrap();
        let first = tokio::fs::read_to_string(&config.output_path).await.unwrap();
        assert_eq!(first, "Lava text.Ash  cinder.Ice.");

        run(&config, &client, &generator).await.unwrap();
        let second = tokio::fs::read_to_string(&config.output_path).await.unwrap();

        assert_eq!(second.len(), first.len() * 2);
        assert_eq!(second, format!("{first}{first}"));
    }

    #[tokio::test]
    async fn test_generator_headers_used_for_page_requests() {
        let dir = TempDir::new().unwrap();
        let config = run_config(&dir, r#"["volcano"]"#, 1);
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static("corpus-test/1.0"));
        let client = FakeClient::new().route("https://britannica.com/volcano/0", 200, "<p>x</p>");

        run(&config, &client, &PerQuery { headers: headers.clone() })
            .await
            .unwrap();

        assert_eq!(client.requested_headers(), vec![headers]);
    }

    #[tokio::test]
    async fn test_run_with_fragment_file() {
        let dir = TempDir::new().unwrap();
        let config = run_config(&dir, r#"["volcano"]"#, 1);
        let fragments_path = dir.path().join("fragments.json");
        tokio::fs::write(&fragments_path, r#"["/science/volcano", "/place/Etna"]"#)
            .await
            .unwrap();
        let client = FakeClient::new().route(
            "https://britannica.com/science/volcano",
            200,
            DISCLAIMER_PAGE,
        );

        let summary = run(&config, &client, &FragmentFile::new(fragments_path))
            .await
            .unwrap();

        assert_eq!(summary.attempted, 1);
        assert_eq!(
            tokio::fs::read_to_string(&config.output_path).await.unwrap(),
            "Lava text."
        );
    }

    #[tokio::test]
    async fn test_missing_query_file_is_fatal() {
        let dir = TempDir::new().unwrap();
        let mut config = run_config(&dir, "[]", 1);
        config.queries_path = dir.path().join("absent.json");
        let client = FakeClient::new();

        let result = run(&config, &client, &PerQuery { headers: HeaderMap::new() }).await;

        assert!(result.is_err());
        assert!(client.requested_urls().is_empty());
    }
}
