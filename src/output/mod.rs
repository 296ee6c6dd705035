//! Output module for scraped products and run reports
//!
//! This module handles:
//! - Appending product rows to the CSV file
//! - Summarising a run's outcomes

mod csv;
pub mod stats;

pub use csv::CsvSink;
pub use stats::{print_summary, RunSummary};
