//! Crawler module for web page fetching and processing
//!
//! This module contains the per-site crawling logic, including:
//! - HTTP fetching with per-request timeouts
//! - HTML parsing and link extraction
//! - The frontier queue with its page budget
//! - The site crawl state machine

mod fetcher;
mod frontier;
mod parser;
mod site;

pub use fetcher::{build_http_client, FetchFailure, PageFetcher, PageResult};
pub use frontier::{Frontier, FrontierEntry, Offer, PriorityPolicy};
pub use parser::{parse_page, ParsedPage};
pub use site::{
    CrawlOptions, CrawlOutcome, CrawlStats, CrawlTarget, Crawler, EmailCandidate, SiteCrawler,
};

use crate::config::Config;
use crate::FinderError;

/// Crawls a single seed with the given configuration
///
/// This is the single-URL pass-through: it builds one target, crawls it and
/// returns the outcome. An invalid seed yields a `Fatal` outcome rather than
/// an error; only a failure to build the HTTP client is an `Err`.
pub async fn crawl_one(config: &Config, seed: &str) -> Result<CrawlOutcome, FinderError> {
    let crawler = Crawler::from_config(config)?;
    Ok(crawler.crawl_seed(seed).await)
}
