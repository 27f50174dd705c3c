//! Batch statistics
//!
//! This module summarizes a finished batch for the operator: how many rows
//! succeeded, how many addresses were found and which error kinds occurred.

use crate::batch::RowResult;
use crate::state::RowStatus;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

/// Summary of one batch run
#[derive(Debug, Clone)]
pub struct BatchSummary {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,

    /// Total number of input rows
    pub total_rows: usize,

    pub rows_ok: usize,
    pub rows_partial: usize,
    pub rows_failed: usize,

    /// Rows with at least one address
    pub rows_with_emails: usize,

    /// Addresses found across all rows
    pub total_emails: usize,

    /// Pages fetched across all rows
    pub pages_fetched: u64,

    /// Failed rows grouped by error kind
    pub errors_by_kind: BTreeMap<&'static str, usize>,
}

impl BatchSummary {
    pub fn duration_seconds(&self) -> i64 {
        (self.finished_at - self.started_at).num_seconds()
    }
}

/// Builds the summary for a batch that ran between the two timestamps
pub fn summarize(
    results: &[RowResult],
    started_at: DateTime<Utc>,
    finished_at: DateTime<Utc>,
) -> BatchSummary {
    let count = |status: RowStatus| results.iter().filter(|r| r.status == status).count();

    let mut errors_by_kind = BTreeMap::new();
    for error in results.iter().filter_map(|r| r.error.as_ref()) {
        *errors_by_kind.entry(error.kind()).or_insert(0) += 1;
    }

    BatchSummary {
        started_at,
        finished_at,
        total_rows: results.len(),
        rows_ok: count(RowStatus::Ok),
        rows_partial: count(RowStatus::Partial),
        rows_failed: count(RowStatus::Failed),
        rows_with_emails: results.iter().filter(|r| !r.emails.is_empty()).count(),
        total_emails: results.iter().map(|r| r.emails.len()).sum(),
        pages_fetched: results
            .iter()
            .map(|r| u64::from(r.stats.pages_fetched))
            .sum(),
        errors_by_kind,
    }
}

/// Prints the summary to stdout in a formatted manner
pub fn print_summary(summary: &BatchSummary) {
    println!("=== Email-Finder Summary ===\n");

    println!("Run:");
    println!("  Started:  {}", summary.started_at.to_rfc3339());
    println!("  Finished: {}", summary.finished_at.to_rfc3339());
    println!("  Duration: {}s", summary.duration_seconds());
    println!();

    println!("Rows:");
    println!("  Total:   {}", summary.total_rows);
    println!("  Ok:      {}", summary.rows_ok);
    println!("  Partial: {}", summary.rows_partial);
    println!("  Failed:  {}", summary.rows_failed);
    println!();

    let hit_rate = if summary.total_rows > 0 {
        (summary.rows_with_emails as f64 / summary.total_rows as f64) * 100.0
    } else {
        0.0
    };
    println!(
        "Emails: {} found on {} rows ({:.1}%), {} pages fetched",
        summary.total_emails, summary.rows_with_emails, hit_rate, summary.pages_fetched
    );

    if !summary.errors_by_kind.is_empty() {
        println!();
        println!("Errors:");
        for (kind, count) in &summary.errors_by_kind {
            println!("  {}: {}", kind, count);
        }
    }
}
