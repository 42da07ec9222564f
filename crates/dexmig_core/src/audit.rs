//! Durable audit trail of an import run.
//!
//! Two plain-text logs are kept apart from `tracing` output:
//! - the skipped-records log, one line per rejected record or line
//! - the placeholder-assignments log, one line per synthesized row,
//!   rewritten reference, backfilled default or repaired field

use crate::catalog::{PlaceholderPolicy, TableSpec};
use crate::resolver::Rejection;
use chrono::Utc;
use dexmig_codec::{FieldMap, RecordId};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// File name of the skipped-records log.
pub const SKIPPED_LOG: &str = "skipped_records.log";

/// File name of the placeholder-assignments log.
pub const PLACEHOLDER_LOG: &str = "placeholder_assignments.log";

const END_OF_LOG: &str = "\n=== END OF LOG ===\n";

/// Writers for both audit logs.
#[derive(Debug)]
pub struct AuditTrail<W: Write> {
    skipped: W,
    placeholders: W,
}

impl AuditTrail<BufWriter<File>> {
    /// Creates both logs inside `dir`, truncating earlier runs.
    ///
    /// # Errors
    ///
    /// Returns an error if a log cannot be created.
    pub fn create(dir: &Path) -> io::Result<Self> {
        std::fs::create_dir_all(dir)?;
        let skipped = BufWriter::new(File::create(dir.join(SKIPPED_LOG))?);
        let placeholders = BufWriter::new(File::create(dir.join(PLACEHOLDER_LOG))?);
        Self::new(skipped, placeholders)
    }
}

impl<W: Write> AuditTrail<W> {
    /// Wraps two writers and writes the log headers.
    ///
    /// # Errors
    ///
    /// Returns an error if a header cannot be written.
    pub fn new(mut skipped: W, mut placeholders: W) -> io::Result<Self> {
        let generated = Utc::now().format("%Y-%m-%d %H:%M:%S%.6f UTC");
        write!(
            skipped,
            "=== MIGRATION SKIPPED RECORDS LOG ===\nGenerated: {generated}\n\n"
        )?;
        write!(
            placeholders,
            "=== PLACEHOLDER ASSIGNMENTS LOG ===\nGenerated: {generated}\n\
             Records assigned to placeholder entities:\n\n"
        )?;
        Ok(Self {
            skipped,
            placeholders,
        })
    }

    /// Logs a line the decoder rejected.
    pub fn skipped_line(&mut self, line: usize, table: &TableSpec, reason: &str) -> io::Result<()> {
        writeln!(self.skipped, "Line {line} - {}: SKIPPED - {reason}", table.label)
    }

    /// Logs a record the resolver or commit driver rejected.
    pub fn skipped_record(
        &mut self,
        table: &TableSpec,
        id: Option<RecordId>,
        rejection: &Rejection,
    ) -> io::Result<()> {
        let id = id.map_or_else(|| "None".to_string(), |id| id.to_string());
        writeln!(
            self.skipped,
            "{} - ID: {id} - SKIPPED: {rejection}",
            table.label
        )
    }

    /// Logs a failed batch with its leading rows.
    pub fn bulk_failure(&mut self, table: &TableSpec, message: &str, sample: &[String]) -> io::Result<()> {
        writeln!(self.skipped, "\n{} BULK CREATE FAILED: {message}", table.label)?;
        writeln!(self.skipped, "First {} items:", sample.len())?;
        for (i, row) in sample.iter().enumerate() {
            writeln!(self.skipped, "  Item {i}: {row}")?;
        }
        Ok(())
    }

    /// Logs the per-table summary.
    pub fn table_summary(&mut self, table: &TableSpec, added: u64, skipped: u64) -> io::Result<()> {
        write!(
            self.skipped,
            "\n{} SUMMARY: Added {added}, Skipped {skipped}\n\n",
            table.label
        )
    }

    /// Logs a newly created placeholder row.
    pub fn placeholder_created(
        &mut self,
        target: &TableSpec,
        policy: &PlaceholderPolicy,
        sentinel: i64,
        id: RecordId,
        missing: RecordId,
    ) -> io::Result<()> {
        writeln!(
            self.placeholders,
            "Created placeholder {label} ({key}={sentinel}, DB ID={id}) for missing {label} ID {missing}",
            label = target.label,
            key = policy.key_field,
        )
    }

    /// Logs a reference rewritten to a placeholder.
    pub fn reassigned(
        &mut self,
        table: &TableSpec,
        id: RecordId,
        field: &str,
        target: &TableSpec,
        missing: RecordId,
        placeholder: RecordId,
    ) -> io::Result<()> {
        writeln!(
            self.placeholders,
            "{} ID {id}: Reassigned {field} from missing {} ID {missing} to placeholder DB ID {placeholder}",
            table.label, target.label
        )
    }

    /// Logs backfilled required fields.
    pub fn defaults_set(&mut self, table: &TableSpec, id: RecordId, assignments: &[String]) -> io::Result<()> {
        writeln!(
            self.placeholders,
            "{} ID {id}: Set defaults: {}",
            table.label,
            assignments.join(", ")
        )
    }

    /// Logs a field replaced by its repair value.
    pub fn repaired(
        &mut self,
        table: &TableSpec,
        id: RecordId,
        field: &str,
        was: &str,
        problem: &str,
    ) -> io::Result<()> {
        writeln!(
            self.placeholders,
            "{} ID {id}: Fixed invalid {field} (was {was}, {problem})",
            table.label
        )
    }

    /// Writes the footers and returns both writers.
    ///
    /// For every table with a placeholder policy the placeholder log ends
    /// with a query that finds the synthesized rows and the formula that
    /// recovers the original ids.
    ///
    /// # Errors
    ///
    /// Returns an error if a footer cannot be written or flushed.
    pub fn finish(mut self, tables: &[TableSpec]) -> io::Result<(W, W)> {
        self.skipped.write_all(END_OF_LOG.as_bytes())?;
        self.placeholders.write_all(END_OF_LOG.as_bytes())?;

        for table in tables {
            let Some(policy) = &table.placeholder else {
                continue;
            };
            writeln!(
                self.placeholders,
                "\nTo find all placeholder {label}s: SELECT * FROM {table} WHERE {key} < {offset};",
                label = table.label.to_lowercase(),
                table = table.name,
                key = policy.key_field,
                offset = policy.offset,
            )?;
            writeln!(
                self.placeholders,
                "To recover original {label} ID: original_id = abs({key} + {base})",
                label = table.label.to_lowercase(),
                key = policy.key_field,
                base = policy.offset.unsigned_abs(),
            )?;
        }

        self.skipped.flush()?;
        self.placeholders.flush()?;
        Ok((self.skipped, self.placeholders))
    }
}

/// Renders a record for a log line.
#[must_use]
pub fn render_record(record: &FieldMap) -> String {
    let fields: Vec<String> = record
        .iter()
        .map(|(name, value)| format!("'{name}': {value}"))
        .collect();
    format!("{{{}}}", fields.join(", "))
}
