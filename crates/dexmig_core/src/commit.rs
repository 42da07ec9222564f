//! Commit driver.
//!
//! Each table's candidates go to the store in a single bulk insert. A
//! failed batch halts the run with the store's message and a sample of the
//! batch, unless row-by-row fallback is enabled.

use crate::audit::{render_record, AuditTrail};
use crate::catalog::TableSpec;
use crate::config::Config;
use crate::error::{MigrateError, MigrateResult};
use crate::progress::{ProgressSink, ProgressStatus};
use crate::resolver::{record_id, reject, validate_instance, Rejection};
use crate::stats::TableCounters;
use crate::status::{group_thousands, StatusBoard};
use dexmig_codec::{FieldMap, RecordId};
use dexmig_storage::Repository;
use std::io::Write;

/// Inserts the candidates of one table and returns the committed ids.
///
/// # Errors
///
/// Returns [`MigrateError::Commit`] if the batch fails and fallback is
/// disabled, or any store or audit error raised during fallback.
#[allow(clippy::too_many_arguments)]
pub fn commit_table<R, W>(
    repo: &mut R,
    table: &TableSpec,
    candidates: Vec<FieldMap>,
    config: &Config,
    counters: &mut TableCounters,
    audit: &mut AuditTrail<W>,
    board: &mut StatusBoard,
    progress: &mut dyn ProgressSink,
) -> MigrateResult<Vec<RecordId>>
where
    R: Repository + ?Sized,
    W: Write,
{
    if candidates.is_empty() {
        return Ok(Vec::new());
    }

    board.replace_last(format!(
        "Saving {} to database... ({} objects)",
        table.label,
        group_thousands(candidates.len() as u64)
    ));
    board.publish(progress, ProgressStatus::Running);

    let sample: Vec<String> = candidates
        .iter()
        .take(config.sample_size)
        .map(render_record)
        .collect();
    let retry = config.row_fallback.then(|| candidates.clone());

    let error = match repo.bulk_insert(table.name, candidates) {
        Ok(ids) => {
            tracing::info!(table = table.name, rows = ids.len(), "batch committed");
            return Ok(ids);
        }
        Err(error) => error,
    };

    let message = format!("ERROR: {error}");
    audit.bulk_failure(table, &message, &sample)?;
    tracing::error!(table = table.name, %error, "bulk create failed");

    match retry {
        Some(rows) => commit_rows(repo, table, rows, counters, audit),
        None => {
            board.push(format!(
                "CRITICAL ERROR: Bulk create failed for {}: {message}",
                table.label
            ));
            board.push("Check skipped_records.log for details.");
            Err(MigrateError::Commit {
                table: table.name.to_string(),
                message: error.to_string(),
                sample,
            })
        }
    }
}

/// Degraded mode: revalidates and inserts one row at a time, skipping the
/// rows the store rejects.
fn commit_rows<R, W>(
    repo: &mut R,
    table: &TableSpec,
    rows: Vec<FieldMap>,
    counters: &mut TableCounters,
    audit: &mut AuditTrail<W>,
) -> MigrateResult<Vec<RecordId>>
where
    R: Repository + ?Sized,
    W: Write,
{
    tracing::warn!(table = table.name, rows = rows.len(), "retrying row by row");
    let mut committed = Vec::with_capacity(rows.len());

    for mut row in rows {
        let Some(id) = record_id(&row) else {
            reject(table, None, &Rejection::NullId, counters, audit)?;
            continue;
        };
        if let Err(rejection) = validate_instance(table, id, &mut row, counters, audit)? {
            reject(table, Some(id), &rejection, counters, audit)?;
            continue;
        }
        match repo.bulk_insert(table.name, vec![row]) {
            Ok(ids) => committed.extend(ids),
            Err(error) => {
                let rejection = Rejection::Commit {
                    message: error.to_string(),
                };
                reject(table, Some(id), &rejection, counters, audit)?;
            }
        }
    }
    Ok(committed)
}
