//! Run summary counters and the discrepancy log
//!
//! The discrepancy log is an explicit collector threaded through the run by
//! mutable reference. Entries are final display strings with the severity
//! glyph baked in at creation time; the report deduplicates and sorts them.

use colored::*;

const BANNER_WIDTH: usize = 80;

/// Append-only list of human-readable anomalies found during a run.
#[derive(Debug, Default)]
pub struct DiscrepancyLog {
    entries: Vec<String>,
}

impl DiscrepancyLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a recoverable anomaly (empty name, skipped row, failed insert).
    pub fn warn(&mut self, message: impl Into<String>) {
        self.entries.push(format!("⚠️  {}", message.into()));
    }

    /// Record a mapping error (unknown or unmapped master-data name).
    pub fn error(&mut self, message: impl Into<String>) {
        self.entries.push(format!("❌ {}", message.into()));
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// All entries, deduplicated by exact string equality and sorted
    /// lexicographically for the final report.
    pub fn into_sorted_unique(self) -> Vec<String> {
        let mut unique = self.entries;
        unique.sort();
        unique.dedup();
        unique
    }

    #[cfg(test)]
    pub fn entries(&self) -> &[String] {
        &self.entries
    }
}

/// Counters for the final summary.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub projects_created: u32,
    pub projects_updated: u32,
    pub operations_upserted: u32,
    pub rows_skipped: u32,
}

fn banner(title: &str) {
    println!("{}", "=".repeat(BANNER_WIDTH));
    println!("{}", title);
    println!("{}", "=".repeat(BANNER_WIDTH));
}

/// Print the end-of-run report: counters, then the sorted discrepancy list.
pub fn print_report(summary: &RunSummary, log: DiscrepancyLog) {
    println!();
    banner("SUMMARY");
    println!(
        "{} Projects Created: {}",
        "✅".green(),
        summary.projects_created
    );
    println!(
        "{} Projects Updated: {}",
        "✅".green(),
        summary.projects_updated
    );
    println!(
        "{} Operations Records Inserted: {}",
        "✅".green(),
        summary.operations_upserted
    );
    println!("{} Rows Skipped: {}", "⚠️ ".yellow(), summary.rows_skipped);

    if log.is_empty() {
        println!();
        println!("{} No discrepancies found!", "✅".green());
    } else {
        println!();
        banner("DISCREPANCIES FOUND");
        for entry in log.into_sorted_unique() {
            println!("{}", entry);
        }
    }

    println!();
    banner("Load completed successfully");
}
