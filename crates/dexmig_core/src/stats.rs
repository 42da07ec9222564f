//! Run statistics.
//!
//! Counters are plain integers: the pipeline is single-threaded and every
//! counter belongs to exactly one table of one run.

use crate::resolver::Rejection;
use crate::status::group_thousands;
use std::time::Duration;

/// Per-table integrity counters.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TableCounters {
    /// Records whose `id` was null after decoding.
    pub skipped_null_id: u64,
    /// Records whose `id` was already claimed earlier in the batch.
    pub skipped_duplicate: u64,
    /// Records with a dangling reference that could not be repaired.
    pub skipped_fk_violation: u64,
    /// Records with a null required field and no backfill.
    pub skipped_unsatisfiable_default: u64,
    /// Records that failed instance validation.
    pub skipped_validation: u64,
    /// Records rejected by the store in row-by-row fallback.
    pub skipped_commit: u64,
    /// References rewritten to a placeholder.
    pub placeholder_substitutions: u64,
    /// Required fields filled by a backfill value.
    pub defaults_backfilled: u64,
    /// Fields replaced by their repair value.
    pub repairs: u64,
}

impl TableCounters {
    /// Counts a rejected record.
    pub fn reject(&mut self, rejection: &Rejection) {
        let counter = match rejection {
            Rejection::NullId => &mut self.skipped_null_id,
            Rejection::Duplicate => &mut self.skipped_duplicate,
            Rejection::ForeignKey { .. } => &mut self.skipped_fk_violation,
            Rejection::Unsatisfiable { .. } => &mut self.skipped_unsatisfiable_default,
            Rejection::Validation { .. } => &mut self.skipped_validation,
            Rejection::Commit { .. } => &mut self.skipped_commit,
        };
        *counter += 1;
    }

    /// Total records skipped for any reason.
    #[must_use]
    pub const fn skipped(&self) -> u64 {
        self.skipped_null_id
            + self.skipped_duplicate
            + self.skipped_fk_violation
            + self.skipped_unsatisfiable_default
            + self.skipped_validation
            + self.skipped_commit
    }

    /// Non-zero skip categories, for the status line.
    #[must_use]
    pub fn skip_details(&self) -> Vec<String> {
        [
            (self.skipped_fk_violation, "FK violations"),
            (self.skipped_unsatisfiable_default, "null fields"),
            (self.skipped_duplicate, "duplicates"),
            (self.skipped_validation, "validation errors"),
            (self.skipped_null_id, "null ids"),
            (self.skipped_commit, "commit errors"),
        ]
        .into_iter()
        .filter(|(n, _)| *n > 0)
        .map(|(n, what)| format!("{n} {what}"))
        .collect()
    }
}

/// Outcome of one target table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableReport {
    /// Target table.
    pub table: &'static str,
    /// Entity label.
    pub label: &'static str,
    /// Rows committed.
    pub added: u64,
    /// Integrity counters.
    pub counters: TableCounters,
}

impl TableReport {
    /// The status line for this table.
    #[must_use]
    pub fn summary_line(&self) -> String {
        let mut line = format!("Added {} {} objects.", group_thousands(self.added), self.label);
        let details = self.counters.skip_details();
        if !details.is_empty() {
            line.push_str(&format!(" (skipped: {})", details.join(", ")));
        }
        line
    }
}

/// Outcome of an import run.
#[derive(Debug, Clone, Default)]
pub struct RunReport {
    /// Data lines read from the file.
    pub lines_read: u64,
    /// Lines rejected while decoding.
    pub lines_skipped: u64,
    /// Placeholder rows created during the run.
    pub placeholders_created: u64,
    /// Per-table outcomes in processing order.
    pub tables: Vec<TableReport>,
    /// Wall time.
    pub elapsed: Duration,
}

impl RunReport {
    /// Looks up a table's outcome.
    #[must_use]
    pub fn table(&self, name: &str) -> Option<&TableReport> {
        self.tables.iter().find(|t| t.table == name)
    }

    /// Rows committed across all tables.
    #[must_use]
    pub fn total_added(&self) -> u64 {
        self.tables.iter().map(|t| t.added).sum()
    }

    /// Records skipped across all tables.
    #[must_use]
    pub fn total_skipped(&self) -> u64 {
        self.tables.iter().map(|t| t.counters.skipped()).sum()
    }
}

/// Outcome of one exported section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionReport {
    /// Section tag.
    pub tag: &'static str,
    /// Entity label.
    pub label: &'static str,
    /// Records written.
    pub written: u64,
    /// Records excluded because their `id` was empty.
    pub excluded: u64,
}

/// Outcome of an export run.
#[derive(Debug, Clone, Default)]
pub struct ExportReport {
    /// Per-section outcomes in file order.
    pub sections: Vec<SectionReport>,
    /// Size of the committed file in bytes.
    pub bytes: u64,
    /// Wall time.
    pub elapsed: Duration,
}

impl ExportReport {
    /// Records written across all sections.
    #[must_use]
    pub fn total_written(&self) -> u64 {
        self.sections.iter().map(|s| s.written).sum()
    }
}
