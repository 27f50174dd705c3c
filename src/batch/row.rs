use crate::crawler::{CrawlOutcome, CrawlStats};
use crate::state::{CrawlPhase, RowStatus};
use crate::CrawlError;

/// One input record handed to the orchestrator
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct InputRow {
    pub url: String,
    pub name: String,
}

impl InputRow {
    pub fn new(url: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            name: name.into(),
        }
    }
}

/// Finalized outcome of one input row
#[derive(Debug, Clone)]
pub struct RowResult {
    pub url: String,
    pub name: String,
    /// Deduplicated addresses, same-site ones first
    pub emails: Vec<String>,
    pub status: RowStatus,
    pub error: Option<CrawlError>,
    pub phase: CrawlPhase,
    pub stats: CrawlStats,
}

impl RowResult {
    /// Builds the row result from a finished crawl
    pub fn from_outcome(row: &InputRow, outcome: CrawlOutcome) -> Self {
        Self {
            url: row.url.clone(),
            name: row.name.clone(),
            emails: outcome.addresses(),
            status: outcome.status(),
            error: outcome.error,
            phase: outcome.phase,
            stats: outcome.stats,
        }
    }

    /// A row that failed before or outside its crawl
    pub fn failed(row: &InputRow, error: CrawlError) -> Self {
        Self {
            url: row.url.clone(),
            name: row.name.clone(),
            emails: Vec::new(),
            status: RowStatus::Failed,
            error: Some(error),
            phase: CrawlPhase::Fatal,
            stats: CrawlStats::default(),
        }
    }

    /// Addresses joined for a table cell; empty when none were found
    pub fn joined(&self, separator: &str) -> String {
        self.emails.join(separator)
    }

    /// Error kind and message for a table cell; empty on success
    pub fn error_message(&self) -> String {
        self.error
            .as_ref()
            .map(|e| format!("{}: {}", e.kind(), e))
            .unwrap_or_default()
    }
}
