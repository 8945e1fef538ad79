//! Concurrent catalog page fetching.
//!
//! Every page URL gets its own task. Results are reassembled in input order
//! once all tasks finish, so page order and card order survive the fan-out.

use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use crate::config::ScraperConfig;
use crate::models::RawRecord;
use crate::network::{FetchError, HttpClient};
use crate::parser::{CardParser, ParseError};

/// Why a page contributed no records
#[derive(Debug, thiserror::Error)]
pub enum PageError {
    #[error("fetch failed: {0}")]
    Transport(#[from] FetchError),

    #[error("parse failed: {0}")]
    Structure(#[from] ParseError),

    #[error("page task aborted: {0}")]
    TaskFailed(String),
}

/// Errors raised while building a crawler
#[derive(Debug, thiserror::Error)]
pub enum CrawlerError {
    #[error(transparent)]
    Client(#[from] FetchError),

    #[error(transparent)]
    Layout(#[from] ParseError),
}

/// Outcome for one requested URL
#[derive(Debug)]
pub struct PageReport {
    pub url: String,
    pub outcome: Result<Vec<RawRecord>, PageError>,
}

impl PageReport {
    pub fn is_ok(&self) -> bool {
        self.outcome.is_ok()
    }

    /// Records from this page; a failed page has none
    pub fn into_records(self) -> Vec<RawRecord> {
        self.outcome.unwrap_or_default()
    }
}

/// Aggregate counts over a set of page reports
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrawlSummary {
    pub pages_ok: usize,
    pub pages_failed: usize,
    pub records: usize,
    pub placeholders: usize,
}

impl CrawlSummary {
    pub fn from_reports(reports: &[PageReport]) -> Self {
        let mut summary = Self::default();
        for report in reports {
            match &report.outcome {
                Ok(records) => {
                    summary.pages_ok += 1;
                    summary.records += records.len();
                    summary.placeholders += records.iter().filter(|r| r.is_placeholder()).count();
                }
                Err(_) => summary.pages_failed += 1,
            }
        }
        summary
    }
}

impl std::fmt::Display for CrawlSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Pages: {} ok, {} failed; records: {} ({} placeholders)",
            self.pages_ok, self.pages_failed, self.records, self.placeholders
        )
    }
}

/// Fetches catalog pages and turns them into raw records
#[derive(Debug, Clone)]
pub struct CatalogCrawler {
    http: HttpClient,
    parser: Arc<CardParser>,
    max_concurrency: Option<usize>,
}

impl CatalogCrawler {
    pub fn new(config: &ScraperConfig) -> Result<Self, CrawlerError> {
        let http = HttpClient::new(config.user_agent.clone(), config.timeout_secs)?;
        let parser = CardParser::new(&config.layout)?;
        Ok(Self::with_parts(http, parser, config.max_concurrency))
    }

    /// Build from already-constructed parts
    pub fn with_parts(http: HttpClient, parser: CardParser, max_concurrency: Option<usize>) -> Self {
        Self {
            http,
            parser: Arc::new(parser),
            max_concurrency: max_concurrency.filter(|n| *n > 0),
        }
    }

    /// Fetch one page and parse its cards
    #[tracing::instrument(skip(self))]
    pub async fn fetch(&self, url: &str) -> Result<Vec<RawRecord>, PageError> {
        tracing::debug!("Fetching page");
        let page = self.http.fetch(url).await.inspect_err(|e| {
            tracing::warn!(error = %e, "Failed to fetch page");
        })?;
        tracing::debug!(
            status = page.status_code,
            content_type = page.content_type.as_deref().unwrap_or("unknown"),
            bytes = page.content.len(),
            "Received page"
        );

        let records = self.parser.parse(&page.content).inspect_err(|e| {
            tracing::warn!(error = %e, "Failed to parse page");
        })?;

        tracing::info!(records = records.len(), "Parsed page");
        Ok(records)
    }

    /// Fetch every URL concurrently and report each outcome in input order
    pub async fn fetch_pages(&self, urls: &[String]) -> Vec<PageReport> {
        let started = Instant::now();
        tracing::info!(
            pages = urls.len(),
            concurrency = ?self.max_concurrency,
            "Starting page fetch"
        );

        let permits = self.max_concurrency.map(|n| Arc::new(Semaphore::new(n)));
        let mut tasks = JoinSet::new();

        for (index, url) in urls.iter().enumerate() {
            let crawler = self.clone();
            let url = url.clone();
            let permits = permits.clone();
            tasks.spawn(async move {
                // Held until the fetch completes; None means no bound
                let _permit = match permits {
                    Some(sem) => match sem.acquire_owned().await {
                        Ok(permit) => Some(permit),
                        Err(e) => return (index, Err(PageError::TaskFailed(e.to_string()))),
                    },
                    None => None,
                };
                (index, crawler.fetch(&url).await)
            });
        }

        // Tasks finish in any order, so slot each outcome by its input index
        let mut outcomes: Vec<Option<Result<Vec<RawRecord>, PageError>>> =
            urls.iter().map(|_| None).collect();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, outcome)) => outcomes[index] = Some(outcome),
                Err(e) => tracing::error!(error = %e, "Page task panicked"),
            }
        }

        let reports: Vec<PageReport> = urls
            .iter()
            .zip(outcomes)
            // An empty slot means the task panicked
            .map(|(url, outcome)| PageReport {
                url: url.clone(),
                outcome: outcome
                    .unwrap_or_else(|| Err(PageError::TaskFailed("task did not complete".to_string()))),
            })
            .collect();

        let summary = CrawlSummary::from_reports(&reports);
        tracing::info!(elapsed_ms = started.elapsed().as_millis() as u64, "{}", summary);
        reports
    }

    /// Fetch every URL and flatten the records; failed pages contribute nothing
    pub async fn fetch_all(&self, urls: &[String]) -> Vec<RawRecord> {
        self.fetch_pages(urls)
            .await
            .into_iter()
            .flat_map(PageReport::into_records)
            .collect()
    }
}
