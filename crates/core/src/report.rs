//! Summary of a catalog load.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Metadata describing the dataset snapshot currently held in memory.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LoadReport {
    /// Where the CSV text came from (URL or file path).
    pub source: String,
    /// When the text was retrieved.
    pub fetched_at: DateTime<Utc>,
    /// Zero-based index of the header row in the parsed table.
    pub header_index: usize,
    /// Data rows considered after the header.
    pub rows_scanned: usize,
    /// Rows skipped because they had no title.
    pub rows_rejected: usize,
    /// Records kept.
    pub records: usize,
}

impl LoadReport {
    /// One-line summary for status bars and logs.
    pub fn summary(&self) -> String {
        format!(
            "{} games from {} ({} rows skipped) at {}",
            self.records,
            self.source,
            self.rows_rejected,
            self.fetched_at.format("%Y-%m-%d %H:%M UTC")
        )
    }
}
