//! Transfer reader.
//!
//! Streams an interchange file and groups decoded records by target table.

use crate::audit::AuditTrail;
use crate::catalog::{Catalog, SectionSpec, TableSpec};
use crate::config::Config;
use crate::error::{MigrateError, MigrateResult};
use crate::progress::{ProgressSink, ProgressStatus};
use crate::status::{group_thousands, StatusBoard};
use dexmig_codec::{glyph, DecodeLayout, Decoded, FieldMap};
use std::collections::HashMap;
use std::io::{BufRead, Write};

/// Records read from a file, grouped by target table.
#[derive(Debug, Default)]
pub struct ReadOutcome {
    batches: HashMap<&'static str, Vec<FieldMap>>,
    /// Records decoded.
    pub records: u64,
    /// Lines rejected by the decoder.
    pub lines_skipped: u64,
}

impl ReadOutcome {
    /// Removes and returns the records for `table`, in file order.
    pub fn take(&mut self, table: &str) -> Vec<FieldMap> {
        self.batches.remove(table).unwrap_or_default()
    }

    /// Number of records waiting for `table`.
    #[must_use]
    pub fn pending(&self, table: &str) -> usize {
        self.batches.get(table).map_or(0, Vec::len)
    }

    /// Number of tables with at least one record.
    #[must_use]
    pub fn table_count(&self) -> usize {
        self.batches.len()
    }
}

struct SectionReader {
    table: &'static TableSpec,
    layout: DecodeLayout,
}

/// Reads every line of `input`.
///
/// Trailing whitespace is stripped from every line. Comment (`//`) and blank
/// lines are ignored, as are data lines before the first section header. Several sections may feed the same table; their
/// records are appended in file order.
///
/// # Errors
///
/// Returns [`MigrateError::UnknownSection`] for an undeclared tag,
/// [`MigrateError::Format`] for a malformed line, and I/O errors from the
/// input or the audit log.
pub fn read_interchange<I, W>(
    input: I,
    catalog: &Catalog,
    config: &Config,
    audit: &mut AuditTrail<W>,
    board: &mut StatusBoard,
    progress: &mut dyn ProgressSink,
) -> MigrateResult<ReadOutcome>
where
    I: BufRead,
    W: Write,
{
    let readers = section_readers(catalog)?;
    let interval = config.read_progress_interval.max(1);
    let mut outcome = ReadOutcome::default();
    let mut current: Option<(&SectionSpec, &SectionReader)> = None;

    board.push("Reading migration file...");
    board.publish(progress, ProgressStatus::Running);

    for (index, line) in input.lines().enumerate() {
        let number = index + 1;
        let line = line?;
        let line = line.trim_end();

        if number % interval == 0 {
            board.replace_last(format!(
                "Reading migration file... (line {})",
                group_thousands(number as u64)
            ));
            board.publish(progress, ProgressStatus::Running);
        }

        if line.is_empty() || line.starts_with(glyph::COMMENT_MARKER) {
            continue;
        }

        if let Some(tag) = line.strip_prefix(glyph::SECTION_MARKER) {
            let (section, reader) = readers.get(tag).ok_or_else(|| MigrateError::UnknownSection {
                tag: tag.to_string(),
                line: number,
            })?;
            tracing::debug!(tag, table = section.table, line = number, "section started");
            current = Some((*section, reader));
            continue;
        }

        let Some((section, reader)) = current else {
            continue;
        };

        let decoded = reader.layout.decode(line).map_err(|e| {
            MigrateError::format(number, format!("{e} in {} section {}", reader.table.label, section.tag))
        })?;
        match decoded {
            Decoded::Record(record) => {
                outcome
                    .batches
                    .entry(reader.table.name)
                    .or_default()
                    .push(record);
                outcome.records += 1;
            }
            Decoded::Skipped(reason) => {
                tracing::warn!(line = number, table = reader.table.name, reason = reason.describe(), "line skipped");
                audit.skipped_line(number, reader.table, reason.describe())?;
                outcome.lines_skipped += 1;
            }
        }
    }

    board.push(format!(
        "Finished reading migration file. Processing {} model types...",
        outcome.table_count()
    ));
    board.publish(progress, ProgressStatus::Running);
    tracing::info!(
        records = outcome.records,
        skipped = outcome.lines_skipped,
        "migration file read"
    );
    Ok(outcome)
}

fn section_readers(
    catalog: &Catalog,
) -> MigrateResult<HashMap<&'static str, (&'static SectionSpec, SectionReader)>> {
    catalog
        .sections
        .iter()
        .map(|section| {
            let table = catalog.table(section.table).ok_or_else(|| {
                MigrateError::invalid_catalog(format!("unknown table {}", section.table))
            })?;
            let layout = catalog.decode_layout(section)?;
            Ok((section.tag, (section, SectionReader { table, layout })))
        })
        .collect()
}
