//! End-of-run statistics
//!
//! Collects the per-page and per-visit outcomes of a run into a `RunSummary` and
//! renders it for the log and the terminal.

use crate::crawler::{PageOutcome, VisitOutcome};
use crate::pipeline::PipelineReport;
use chrono::{DateTime, Utc};

/// Aggregated counts for one scrape run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// When the run started
    pub started_at: Option<DateTime<Utc>>,

    /// When the pipeline finished draining
    pub finished_at: Option<DateTime<Utc>>,

    /// Listing pages that loaded
    pub pages_walked: u64,

    /// Listing pages abandoned after retries
    pub pages_failed: u64,

    /// Detail visits launched
    pub visits_dispatched: u64,

    /// Detail visits that handed a product to the pipeline
    pub visits_emitted: u64,

    /// Detail pages without a product
    pub visits_skipped: u64,

    /// Detail visits abandoned after retries
    pub visits_failed: u64,

    /// Products that passed the notability filter
    pub products_kept: u64,

    /// Rows appended to the CSV file
    pub rows_written: u64,
}

impl RunSummary {
    /// Starts a summary stamped with the current time
    pub fn started() -> Self {
        Self {
            started_at: Some(Utc::now()),
            ..Self::default()
        }
    }

    /// Counts one listing page
    pub fn record_page(&mut self, outcome: &PageOutcome) {
        match outcome {
            PageOutcome::Walked { .. } => self.pages_walked += 1,
            PageOutcome::Failed { .. } => self.pages_failed += 1,
        }
    }

    /// Counts one finished detail visit
    pub fn record_visit(&mut self, outcome: &VisitOutcome) {
        match outcome {
            VisitOutcome::Emitted => self.visits_emitted += 1,
            VisitOutcome::Skipped { .. } => self.visits_skipped += 1,
            VisitOutcome::Failed(_) | VisitOutcome::Undelivered { .. } => self.visits_failed += 1,
        }
    }

    /// Takes the pipeline's counts and stamps the finish time
    pub fn finish(&mut self, report: &PipelineReport) {
        self.products_kept = report.kept;
        self.rows_written = report.written;
        self.finished_at = Some(Utc::now());
    }

    /// Wall-clock duration in seconds, once finished
    pub fn duration_seconds(&self) -> Option<i64> {
        match (self.started_at, self.finished_at) {
            (Some(started), Some(finished)) => Some((finished - started).num_seconds()),
            _ => None,
        }
    }

    /// Share of dispatched visits that produced a product, as a percentage
    pub fn emit_rate(&self) -> f64 {
        if self.visits_dispatched == 0 {
            return 0.0;
        }
        (self.visits_emitted as f64 / self.visits_dispatched as f64) * 100.0
    }
}

/// Prints the summary to stdout in a formatted manner
pub fn print_summary(summary: &RunSummary) {
    println!("=== Scrape Summary ===\n");

    if let Some(started) = summary.started_at {
        println!("  Started: {}", started.to_rfc3339());
    }
    if let Some(duration) = summary.duration_seconds() {
        println!(
            "  Duration: {} seconds ({:.2} minutes)",
            duration,
            duration as f64 / 60.0
        );
    }
    println!();

    println!("Listing Pages:");
    println!("  Walked: {}", summary.pages_walked);
    println!("  Failed: {}", summary.pages_failed);
    println!();

    println!("Detail Visits:");
    println!("  Dispatched: {}", summary.visits_dispatched);
    println!(
        "  Emitted: {} ({:.1}%)",
        summary.visits_emitted,
        summary.emit_rate()
    );
    println!("  Skipped: {}", summary.visits_skipped);
    println!("  Failed: {}", summary.visits_failed);
    println!();

    println!("Output:");
    println!("  Notable products: {}", summary.products_kept);
    println!("  Rows written: {}", summary.rows_written);
}
