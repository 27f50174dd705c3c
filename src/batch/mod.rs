//! Batch orchestration
//!
//! Runs one site crawl per input row, with at most `max_concurrency` crawls
//! in flight. The semaphore is the only state shared between rows; every
//! crawl owns its frontier, visited set and addresses. Results come back in
//! input order no matter which crawl finishes first, and a failing row never
//! affects its siblings.

mod row;

pub use row::{InputRow, RowResult};

use crate::config::Config;
use crate::crawler::{CrawlOptions, Crawler, PageFetcher};
use crate::extract::EmailExtractor;
use crate::{CrawlError, FinderError};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;

/// Runs crawls for many rows with bounded parallelism
#[derive(Debug, Clone)]
pub struct BatchOrchestrator {
    crawler: Crawler,
    semaphore: Arc<Semaphore>,
}

impl BatchOrchestrator {
    pub fn new(crawler: Crawler, max_concurrency: usize) -> Self {
        Self {
            crawler,
            semaphore: Arc::new(Semaphore::new(max_concurrency.max(1))),
        }
    }

    pub fn from_config(config: &Config) -> Result<Self, FinderError> {
        Ok(Self::new(
            Crawler::from_config(config)?,
            config.crawler.max_concurrency as usize,
        ))
    }

    /// Processes every row and returns one result per row, in input order
    pub async fn process(&self, rows: Vec<InputRow>) -> Vec<RowResult> {
        tracing::info!(
            "Processing {} rows with up to {} concurrent crawls",
            rows.len(),
            self.semaphore.available_permits()
        );

        let handles: Vec<_> = rows
            .iter()
            .cloned()
            .map(|row| {
                let orchestrator = self.clone();
                tokio::spawn(async move {
                    let _permit = match orchestrator.semaphore.clone().acquire_owned().await {
                        Ok(permit) => permit,
                        Err(_) => {
                            return RowResult::failed(
                                &row,
                                CrawlError::RowFatal("worker pool closed".to_string()),
                            )
                        }
                    };
                    orchestrator.process_one(&row).await
                })
            })
            .collect();

        let mut results = Vec::with_capacity(rows.len());
        for (row, handle) in rows.iter().zip(handles) {
            let result = match handle.await {
                Ok(result) => result,
                Err(e) => {
                    tracing::error!("Crawl task for {} aborted: {}", row.url, e);
                    RowResult::failed(row, CrawlError::RowFatal(e.to_string()))
                }
            };
            results.push(result);
        }

        tracing::info!("Batch finished: {} rows", results.len());
        results
    }

    /// Crawls a single row
    pub async fn process_one(&self, row: &InputRow) -> RowResult {
        if row.url.trim().is_empty() {
            tracing::warn!("Row {:?} has no URL", row.name);
            return RowResult::failed(row, CrawlError::InvalidInput("empty URL".to_string()));
        }

        let outcome = self.crawler.crawl_seed(&row.url).await;
        RowResult::from_outcome(row, outcome)
    }
}

/// Processes `rows` with default crawl settings apart from the given budget,
/// request timeout and concurrency
///
/// # Errors
///
/// Only fails when the HTTP client cannot be built; row failures are
/// reported inside the returned results.
pub async fn process(
    rows: Vec<InputRow>,
    max_pages: u32,
    request_timeout: Duration,
    max_concurrency: usize,
) -> Result<Vec<RowResult>, FinderError> {
    let config = Config::default();
    let options = CrawlOptions {
        max_pages,
        request_timeout,
        ..CrawlOptions::from_config(&config)
    };
    let crawler = Crawler::new(
        PageFetcher::from_config(&config.user_agent)?,
        EmailExtractor::new(&config.extractor),
        options,
    );

    Ok(BatchOrchestrator::new(crawler, max_concurrency)
        .process(rows)
        .await)
}
