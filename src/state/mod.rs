//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `CrawlPhase`: the life cycle of one site crawl (idle, running, and the
//!   terminal phases it can end in)
//! - `RowStatus`: the user-facing verdict recorded on each output row

mod crawl_phase;
mod row_status;

// Re-export main types
pub use crawl_phase::CrawlPhase;
pub use row_status::RowStatus;
