//! Import driver.
//!
//! Reads an interchange file into the target store. Tables are processed in
//! catalog order so that every referenced table is committed before the
//! tables that reference it.

use crate::audit::AuditTrail;
use crate::catalog::Catalog;
use crate::commit::commit_table;
use crate::config::Config;
use crate::error::MigrateResult;
use crate::progress::{ProgressSink, ProgressStatus};
use crate::reader::read_interchange;
use crate::resolver::Resolver;
use crate::stats::{RunReport, TableReport};
use crate::status::StatusBoard;
use dexmig_storage::Repository;
use std::io::{BufRead, Write};
use std::path::Path;
use std::time::Instant;

/// Runs imports against a validated catalog and configuration.
#[derive(Debug, Clone, Copy)]
pub struct Importer<'c> {
    catalog: &'c Catalog,
    config: &'c Config,
}

impl<'c> Importer<'c> {
    /// Validates `catalog` and `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if either is inconsistent.
    pub fn new(catalog: &'c Catalog, config: &'c Config) -> MigrateResult<Self> {
        catalog.validate()?;
        config.validate()?;
        Ok(Self { catalog, config })
    }

    /// The catalog in use.
    #[must_use]
    pub const fn catalog(&self) -> &'c Catalog {
        self.catalog
    }

    /// The configuration in use.
    #[must_use]
    pub const fn config(&self) -> &'c Config {
        self.config
    }

    /// Imports the file at `path`, writing both audit logs into `log_dir`.
    ///
    /// The logs are finished even when the run fails. Rows committed before
    /// a failure stay in the store.
    ///
    /// # Errors
    ///
    /// Returns the error that aborted the run.
    pub fn run<R>(
        &self,
        repo: &mut R,
        path: &Path,
        log_dir: &Path,
        progress: &mut dyn ProgressSink,
    ) -> MigrateResult<RunReport>
    where
        R: Repository + ?Sized,
    {
        let mut audit = AuditTrail::create(log_dir)?;
        let outcome = match dexmig_storage::open(path) {
            Ok(input) => self.run_with(repo, input, &mut audit, progress),
            Err(error) => {
                let mut board = StatusBoard::new();
                Err(cancel(&mut board, progress, error.into()))
            }
        };
        let finished = audit.finish(self.catalog.tables);
        let report = outcome?;
        finished?;
        Ok(report)
    }

    /// Imports from an open reader, logging into `audit`.
    ///
    /// The last update is FINISHED on success and CANCELED on failure.
    ///
    /// # Errors
    ///
    /// Returns the error that aborted the run.
    pub fn run_with<R, I, W>(
        &self,
        repo: &mut R,
        input: I,
        audit: &mut AuditTrail<W>,
        progress: &mut dyn ProgressSink,
    ) -> MigrateResult<RunReport>
    where
        R: Repository + ?Sized,
        I: BufRead,
        W: Write,
    {
        let mut board = StatusBoard::new();
        match self.execute(repo, input, audit, &mut board, progress) {
            Ok(report) => {
                tracing::info!(
                    added = report.total_added(),
                    skipped = report.total_skipped(),
                    placeholders = report.placeholders_created,
                    "migration complete"
                );
                board.push("Migration complete! Logs saved.");
                board.publish(progress, ProgressStatus::Finished);
                Ok(report)
            }
            Err(error) => Err(cancel(&mut board, progress, error)),
        }
    }

    fn execute<R, I, W>(
        &self,
        repo: &mut R,
        input: I,
        audit: &mut AuditTrail<W>,
        board: &mut StatusBoard,
        progress: &mut dyn ProgressSink,
    ) -> MigrateResult<RunReport>
    where
        R: Repository + ?Sized,
        I: BufRead,
        W: Write,
    {
        let started = Instant::now();
        let mut outcome = read_interchange(input, self.catalog, self.config, audit, board, progress)?;
        let mut report = RunReport {
            lines_read: outcome.records + outcome.lines_skipped,
            lines_skipped: outcome.lines_skipped,
            ..RunReport::default()
        };
        let mut resolver = Resolver::new(self.catalog, self.config);

        for table in self.catalog.tables {
            let records = outcome.take(table.name);
            if records.is_empty() {
                repo.resync_sequence(table.name)?;
                continue;
            }

            let mut resolved = resolver.resolve_table(repo, table, records, audit, board, progress)?;
            let ids = commit_table(
                repo,
                table,
                resolved.candidates,
                self.config,
                &mut resolved.counters,
                audit,
                board,
                progress,
            )?;
            resolver.record_committed(table.name, &ids);
            repo.resync_sequence(table.name)?;

            let table_report = TableReport {
                table: table.name,
                label: table.label,
                added: ids.len() as u64,
                counters: resolved.counters,
            };
            audit.table_summary(table, table_report.added, table_report.counters.skipped())?;
            board.replace_last(table_report.summary_line());
            board.publish(progress, ProgressStatus::Running);
            tracing::info!(
                table = table.name,
                added = table_report.added,
                skipped = table_report.counters.skipped(),
                placeholders = table_report.counters.placeholder_substitutions,
                "table imported"
            );
            report.tables.push(table_report);
        }

        board.push("Updating database sequences...");
        board.publish(progress, ProgressStatus::Running);
        for table in self.catalog.tables {
            repo.resync_sequence(table.name)?;
        }

        report.placeholders_created = resolver.placeholders_created();
        report.elapsed = started.elapsed();
        Ok(report)
    }
}

/// Empties every catalog table, referencing tables first, and resets their
/// sequences.
///
/// # Errors
///
/// Returns the first store error.
pub fn clear_target<R>(repo: &mut R, catalog: &Catalog) -> MigrateResult<()>
where
    R: Repository + ?Sized,
{
    for table in catalog.tables.iter().rev() {
        repo.delete_all(table.name)?;
        tracing::debug!(table = table.name, "table cleared");
    }
    for table in catalog.tables {
        repo.resync_sequence(table.name)?;
    }
    Ok(())
}

fn cancel(
    board: &mut StatusBoard,
    progress: &mut dyn ProgressSink,
    error: crate::MigrateError,
) -> crate::MigrateError {
    tracing::error!(%error, "migration failed");
    board.push(format!("An error occurred: {error}"));
    board.publish(progress, ProgressStatus::Canceled);
    error
}
