//! Cross-crate integration test helpers.
//!
//! [`TransferHarness`] runs a real export into a temporary file and a real
//! import from it, keeping both stores and the audit logs for inspection.

use dexmig_core::{
    export_to_path, Config, ExportReport, Importer, MigrateResult, ProgressSink, ProgressStatus,
    ProgressUpdate, RunReport, CATALOG, PLACEHOLDER_LOG, SKIPPED_LOG,
};
use dexmig_storage::{Compression, InMemoryRepository};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// One recorded progress update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedUpdate {
    /// Run state.
    pub status: ProgressStatus,
    /// Status lines at the time of the update.
    pub lines: Vec<String>,
    /// Produced file size, if reported.
    pub file_size: Option<u64>,
}

/// Progress sink that keeps every update.
#[derive(Debug, Default)]
pub struct RecordingProgress {
    /// Updates in arrival order.
    pub updates: Vec<RecordedUpdate>,
}

impl RecordingProgress {
    /// The final update.
    pub fn last(&self) -> Option<&RecordedUpdate> {
        self.updates.last()
    }

    /// Whether any update carried `line` as a status line.
    pub fn saw_line(&self, line: &str) -> bool {
        self.updates
            .iter()
            .any(|u| u.lines.iter().any(|l| l == line))
    }
}

impl ProgressSink for RecordingProgress {
    fn report(&mut self, update: &ProgressUpdate<'_>) {
        self.updates.push(RecordedUpdate {
            status: update.status,
            lines: update.lines.to_vec(),
            file_size: update.file.map(|(_, bytes)| bytes),
        });
    }
}

/// Source store, target store and a scratch directory for one transfer.
pub struct TransferHarness {
    /// Legacy-schema store.
    pub source: InMemoryRepository,
    /// New-schema store.
    pub target: InMemoryRepository,
    /// Import configuration.
    pub config: Config,
    dir: TempDir,
}

impl TransferHarness {
    /// Creates a harness around `source` and an empty target.
    pub fn new(source: InMemoryRepository) -> Self {
        Self {
            source,
            target: crate::fixtures::empty_target(),
            config: Config::default(),
            dir: TempDir::new().expect("Failed to create temp directory"),
        }
    }

    /// Path of the interchange file for `compression`.
    pub fn file_path(&self, compression: Compression) -> PathBuf {
        match compression {
            Compression::Gzip => self.dir.path().join("migration.txt.gz"),
            Compression::None => self.dir.path().join("migration.txt"),
        }
    }

    /// Directory holding the audit logs.
    pub fn log_dir(&self) -> PathBuf {
        self.dir.path().join("logs")
    }

    /// Exports the source store.
    pub fn export(
        &self,
        compression: Compression,
        progress: &mut dyn ProgressSink,
    ) -> MigrateResult<ExportReport> {
        export_to_path(
            &self.source,
            &CATALOG,
            &self.file_path(compression),
            compression,
            progress,
        )
    }

    /// Imports `file` into the target store.
    pub fn import_file(
        &mut self,
        file: &Path,
        progress: &mut dyn ProgressSink,
    ) -> MigrateResult<RunReport> {
        let importer = Importer::new(&CATALOG, &self.config)?;
        let log_dir = self.log_dir();
        importer.run(&mut self.target, file, &log_dir, progress)
    }

    /// Exports then imports, discarding progress.
    pub fn transfer(&mut self, compression: Compression) -> MigrateResult<RunReport> {
        self.export(compression, &mut dexmig_core::NullProgress)?;
        let file = self.file_path(compression);
        self.import_file(&file, &mut dexmig_core::NullProgress)
    }

    /// Contents of the interchange file.
    pub fn file_text(&self, compression: Compression) -> String {
        dexmig_storage::read_all(&self.file_path(compression)).expect("Failed to read file")
    }

    /// Contents of the skipped-records log.
    pub fn skipped_log(&self) -> String {
        std::fs::read_to_string(self.log_dir().join(SKIPPED_LOG)).expect("Failed to read log")
    }

    /// Contents of the placeholder-assignments log.
    pub fn placeholder_log(&self) -> String {
        std::fs::read_to_string(self.log_dir().join(PLACEHOLDER_LOG)).expect("Failed to read log")
    }
}

impl Default for TransferHarness {
    fn default() -> Self {
        Self::new(crate::fixtures::legacy_source())
    }
}
