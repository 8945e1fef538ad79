//! Fetch → parse → normalize, wired together.

use crate::crawler::{CatalogCrawler, CrawlSummary, PageReport};
use crate::models::CleanRecord;
use crate::normalizer::{NormalizeError, Normalizer};

/// Output of one pipeline run
#[derive(Debug)]
pub struct PipelineOutput {
    pub records: Vec<CleanRecord>,
    pub summary: CrawlSummary,
    /// URLs whose page failed, with the reason
    pub failures: Vec<(String, String)>,
}

pub struct Pipeline {
    crawler: CatalogCrawler,
    normalizer: Normalizer,
}

impl Pipeline {
    pub fn new(crawler: CatalogCrawler, normalizer: Normalizer) -> Self {
        Self { crawler, normalizer }
    }

    /// Scrape every URL and normalize the combined records.
    ///
    /// Page failures are collected into the output; only a normalization
    /// failure is returned as an error.
    #[tracing::instrument(skip_all, fields(pages = urls.len()))]
    pub async fn run(&self, urls: &[String]) -> Result<PipelineOutput, NormalizeError> {
        let reports = self.crawler.fetch_pages(urls).await;
        let summary = CrawlSummary::from_reports(&reports);

        let mut failures = Vec::new();
        let mut raw = Vec::with_capacity(summary.records);
        for PageReport { url, outcome } in reports {
            match outcome {
                Ok(records) => raw.extend(records),
                Err(e) => failures.push((url, e.to_string())),
            }
        }

        let records = self.normalizer.clean(raw)?;
        Ok(PipelineOutput {
            records,
            summary,
            failures,
        })
    }
}
