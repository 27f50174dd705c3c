//! Output module for tabular results and batch summaries
//!
//! This module handles:
//! - Reading the input table and writing it back with the email column
//! - Summarizing a finished batch

pub mod stats;
pub mod table;

pub use stats::{print_summary, summarize, BatchSummary};
pub use table::{read_table, read_table_from, write_table, write_table_to, Table};
