//! # dexmig core
//!
//! Migration pipeline between a source and a target collectible-game store.
//!
//! This crate provides:
//! - the static [`Catalog`] of exported sections and target tables
//! - the transfer writer ([`export`], [`export_to_path`])
//! - the transfer reader ([`read_interchange`])
//! - the integrity resolver: dedup, foreign keys, placeholders, backfill
//!   and validation
//! - the commit driver with optional row-by-row fallback
//! - the audit trail and progress reporting
//!
//! ## Example
//!
//! ```
//! use dexmig_core::{Config, Importer, NullProgress, AuditTrail, CATALOG};
//! use dexmig_storage::{InMemoryRepository, Repository};
//! use std::io::Cursor;
//!
//! let config = Config::default();
//! let importer = Importer::new(&CATALOG, &config)?;
//! let mut target = InMemoryRepository::new();
//! let mut audit = AuditTrail::new(Vec::<u8>::new(), Vec::new())?;
//!
//! let file = ":R\n1╵sedan.png╵Sedan\n";
//! let report = importer.run_with(&mut target, Cursor::new(file), &mut audit, &mut NullProgress)?;
//!
//! assert_eq!(report.total_added(), 1);
//! assert_eq!(target.count("regime")?, 1);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod audit;
mod catalog;
mod commit;
mod config;
mod error;
mod import;
mod progress;
mod reader;
mod resolver;
mod stats;
mod status;
mod writer;

pub use audit::{render_record, AuditTrail, PLACEHOLDER_LOG, SKIPPED_LOG};
pub use catalog::{
    Catalog, ExportSpec, FieldCheck, FieldSpec, PlaceholderPolicy, SectionSpec, TableSpec,
    CATALOG, EMOJI_ID_REPAIR, PLAYER_PLACEHOLDER_OFFSET,
};
pub use commit::commit_table;
pub use config::{Config, MIN_PROGRESS_INTERVAL};
pub use error::{MigrateError, MigrateResult};
pub use import::{clear_target, Importer};
pub use progress::{NullProgress, ProgressSink, ProgressStatus, ProgressUpdate, TracingProgress};
pub use reader::{read_interchange, ReadOutcome};
pub use resolver::{validate_instance, InsertedIds, Rejection, Resolved, Resolver};
pub use stats::{ExportReport, RunReport, SectionReport, TableCounters, TableReport};
pub use status::{format_size, group_thousands, StatusBoard};
pub use writer::{export, export_to_path, TOOL_NAME, TOOL_VERSION};
