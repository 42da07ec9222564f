//! Transfer writer.
//!
//! Serializes every exported source table into one interchange file:
//!
//! ```text
//! // Generated with 'dexmig' v1.1.0
//! // Please do not modify this file unless you know what you're doing.
//!
//! :R
//! 1╵sedan.png╵Sedan
//! :P
//! 5╵123456789╵╵
//! ```

use crate::catalog::Catalog;
use crate::error::MigrateResult;
use crate::progress::{ProgressSink, ProgressStatus};
use crate::stats::{ExportReport, SectionReport};
use crate::status::{format_size, group_thousands, StatusBoard};
use dexmig_codec::glyph;
use dexmig_storage::{Compression, InterchangeWriter, Repository};
use std::io::Write;
use std::path::Path;
use std::time::Instant;

/// Name written into the file header.
pub const TOOL_NAME: &str = "dexmig";

/// Version written into the file header.
pub const TOOL_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Writes every section of `catalog` to `out`.
///
/// Sections follow catalog order and records follow primary key order. A
/// section with no records gets no header. Records whose `id` would be empty
/// are excluded and counted.
///
/// # Errors
///
/// Returns an error on the first store, encode or write failure.
pub fn export<R, W>(
    repo: &R,
    catalog: &Catalog,
    out: &mut W,
    board: &mut StatusBoard,
    progress: &mut dyn ProgressSink,
) -> MigrateResult<Vec<SectionReport>>
where
    R: Repository + ?Sized,
    W: Write,
{
    writeln!(out, "// Generated with '{TOOL_NAME}' v{TOOL_VERSION}")?;
    writeln!(
        out,
        "// Please do not modify this file unless you know what you're doing."
    )?;
    writeln!(out)?;

    let mut reports = Vec::with_capacity(catalog.exports.len());
    for export in catalog.exports {
        let layout = export.layout();
        let mut report = SectionReport {
            tag: export.tag,
            label: export.label,
            written: 0,
            excluded: 0,
        };

        for row in repo.query_all(export.source_table)? {
            let row = row?;
            let Some(line) = layout.encode(&row)? else {
                report.excluded += 1;
                continue;
            };
            if report.written == 0 {
                writeln!(out, "{}{}", glyph::SECTION_MARKER, export.tag)?;
            }
            writeln!(out, "{line}")?;
            report.written += 1;
        }

        if report.excluded > 0 {
            tracing::warn!(
                tag = export.tag,
                excluded = report.excluded,
                "records without id excluded"
            );
        }
        tracing::info!(tag = export.tag, written = report.written, "section exported");
        board.push(format!(
            "Migrated {} {} objects.",
            group_thousands(report.written),
            export.label
        ));
        board.publish(progress, ProgressStatus::Running);
        reports.push(report);
    }
    Ok(reports)
}

/// Exports to `path`, which only appears once every section succeeded.
///
/// The final update reports FINISHED with the file and its size, or
/// CANCELED when the export failed.
///
/// # Errors
///
/// Returns the first error; nothing is left at `path` in that case.
pub fn export_to_path<R>(
    repo: &R,
    catalog: &Catalog,
    path: &Path,
    compression: Compression,
    progress: &mut dyn ProgressSink,
) -> MigrateResult<ExportReport>
where
    R: Repository + ?Sized,
{
    let started = Instant::now();
    let mut board = StatusBoard::new();

    match write_file(repo, catalog, path, compression, &mut board, progress) {
        Ok((sections, bytes)) => {
            board.set_file(path, bytes);
            board.push(format!(
                "Saved to `{}` ({})",
                path.display(),
                format_size(bytes)
            ));
            board.publish(progress, ProgressStatus::Finished);
            Ok(ExportReport {
                sections,
                bytes,
                elapsed: started.elapsed(),
            })
        }
        Err(error) => {
            tracing::error!(%error, "export failed");
            board.push(format!("An error occurred: {error}"));
            board.publish(progress, ProgressStatus::Canceled);
            Err(error)
        }
    }
}

fn write_file<R>(
    repo: &R,
    catalog: &Catalog,
    path: &Path,
    compression: Compression,
    board: &mut StatusBoard,
    progress: &mut dyn ProgressSink,
) -> MigrateResult<(Vec<SectionReport>, u64)>
where
    R: Repository + ?Sized,
{
    let mut writer = InterchangeWriter::create(path, compression)?;
    let sections = export(repo, catalog, &mut writer, board, progress)?;
    let target = writer.commit()?;
    let bytes = std::fs::metadata(target)?.len();
    Ok((sections, bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CATALOG;
    use crate::progress::NullProgress;
    use dexmig_codec::{FieldMap, RecordId, Value};
    use dexmig_storage::{InMemoryRepository, RecordStream, StorageResult};

    /// Store whose scans also yield rows without a primary key.
    struct IdlessRows {
        inner: InMemoryRepository,
        extra: Vec<(&'static str, FieldMap)>,
    }

    impl Repository for IdlessRows {
        fn query_all(&self, table: &str) -> StorageResult<RecordStream<'_>> {
            let extra: Vec<_> = self
                .extra
                .iter()
                .filter(|(name, _)| *name == table)
                .map(|(_, row)| Ok(row.clone()))
                .collect();
            Ok(Box::new(extra.into_iter().chain(self.inner.query_all(table)?)))
        }

        fn exists(&self, table: &str, id: RecordId) -> StorageResult<bool> {
            self.inner.exists(table, id)
        }

        fn find_id_by(
            &self,
            table: &str,
            field: &str,
            value: &Value,
        ) -> StorageResult<Option<RecordId>> {
            self.inner.find_id_by(table, field, value)
        }

        fn create(&mut self, table: &str, fields: FieldMap) -> StorageResult<RecordId> {
            self.inner.create(table, fields)
        }

        fn bulk_insert(&mut self, table: &str, rows: Vec<FieldMap>) -> StorageResult<Vec<RecordId>> {
            self.inner.bulk_insert(table, rows)
        }

        fn count(&self, table: &str) -> StorageResult<u64> {
            self.inner.count(table)
        }

        fn delete_all(&mut self, table: &str) -> StorageResult<()> {
            self.inner.delete_all(table)
        }

        fn resync_sequence(&mut self, table: &str) -> StorageResult<()> {
            self.inner.resync_sequence(table)
        }

        fn next_id(&self, table: &str) -> StorageResult<RecordId> {
            self.inner.next_id(table)
        }
    }

    fn cartype(id: i64, name: &str, image: &str) -> FieldMap {
        let mut row = FieldMap::new();
        row.insert("id".into(), Value::Integer(id));
        row.insert("name".into(), Value::Text(name.into()));
        row.insert("image".into(), Value::Text(image.into()));
        row
    }

    fn source() -> InMemoryRepository {
        let mut repo = InMemoryRepository::new();
        repo.bulk_insert(
            "cartype",
            vec![
                cartype(2, "SUV", "/static/uploads/suv.png"),
                cartype(1, "Sedan", "sedan.png"),
            ],
        )
        .unwrap();
        let mut player = FieldMap::new();
        player.insert("id".into(), Value::Integer(5));
        player.insert("discord_id".into(), Value::Integer(123_456_789));
        player.insert("donationPolicy".into(), Value::Integer(1));
        player.insert("privacyPolicy".into(), Value::Integer(2));
        repo.bulk_insert("player", vec![player]).unwrap();
        repo
    }

    fn render(repo: &InMemoryRepository) -> (String, Vec<SectionReport>, StatusBoard) {
        let mut out = Vec::new();
        let mut board = StatusBoard::new();
        let reports = export(repo, &CATALOG, &mut out, &mut board, &mut NullProgress).unwrap();
        (String::from_utf8(out).unwrap(), reports, board)
    }

    #[test]
    fn sections_are_written_in_catalog_order_by_id() {
        let (text, reports, board) = render(&source());
        let expected = format!(
            "// Generated with 'dexmig' v{TOOL_VERSION}\n\
             // Please do not modify this file unless you know what you're doing.\n\
             \n\
             :R\n\
             1╵sedan.png╵Sedan\n\
             2╵suv.png╵SUV\n\
             :P\n\
             5╵123456789╵╵2\n"
        );
        assert_eq!(text, expected);
        assert_eq!(reports.len(), CATALOG.exports.len());
        assert_eq!(board.lines()[0], "Migrated 2 CarType objects.");
        assert_eq!(board.lines()[1], "Migrated 0 Country objects.");
    }

    #[test]
    fn empty_sections_get_no_header() {
        let (text, reports, _) = render(&InMemoryRepository::new());
        assert!(!text.contains(':'));
        assert_eq!(reports.iter().map(|r| r.written).sum::<u64>(), 0);
    }

    #[test]
    fn rows_without_id_are_excluded_and_counted() {
        let mut idless = cartype(0, "Ghost", "ghost.png");
        idless.insert("id".into(), Value::Null);
        let mut flag = cartype(0, "Nowhere", "flag.png");
        flag.remove("id");
        let repo = IdlessRows {
            inner: source(),
            extra: vec![("cartype", idless), ("country", flag)],
        };

        let mut out = Vec::new();
        let mut board = StatusBoard::new();
        let reports = export(&repo, &CATALOG, &mut out, &mut board, &mut NullProgress).unwrap();
        let text = String::from_utf8(out).unwrap();

        let cartypes = &reports[0];
        assert_eq!((cartypes.tag, cartypes.written, cartypes.excluded), ("R", 2, 1));
        let countries = &reports[1];
        assert_eq!((countries.tag, countries.written, countries.excluded), ("E", 0, 1));

        assert!(!text.contains("Ghost"));
        assert!(!text.contains("Nowhere"));
        assert!(!text.contains(":E\n"));
        assert!(text.contains(":R\n1╵sedan.png╵Sedan\n2╵suv.png╵SUV\n:P\n"));
        assert_eq!(board.lines()[1], "Migrated 0 Country objects.");
    }

    #[test]
    fn export_to_path_reports_finished_with_size() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("migration.txt.gz");
        let report = export_to_path(
            &source(),
            &CATALOG,
            &path,
            Compression::Gzip,
            &mut NullProgress,
        )
        .unwrap();

        assert_eq!(report.total_written(), 3);
        assert_eq!(report.bytes, std::fs::metadata(&path).unwrap().len());
        let text = dexmig_storage::read_all(&path).unwrap();
        assert!(text.contains(":R\n1╵sedan.png╵Sedan\n"));
    }

    #[test]
    fn failed_export_leaves_no_file() {
        let mut repo = source();
        repo.bulk_insert(
            "country",
            vec![cartype(1, "bad\u{2575}name", "flag.png")],
        )
        .unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("migration.txt");

        let err = export_to_path(&repo, &CATALOG, &path, Compression::None, &mut NullProgress)
            .unwrap_err();
        assert!(matches!(err, crate::MigrateError::Codec(_)));
        assert!(!path.exists());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}
