//! # dexmig Storage
//!
//! Repository interface, reference store and interchange file I/O.
//!
//! The migration pipeline reads from a source store and writes to a target
//! store through the [`Repository`] trait. Stores are generic entity stores
//! keyed by table name and integer primary key; the pipeline never issues DDL.
//!
//! ## Available Stores
//!
//! - [`InMemoryRepository`] - For tests and JSON snapshot files
//!
//! ## Interchange Files
//!
//! - [`InterchangeWriter`] - Atomic, optionally gzip-compressed writer
//! - [`open`] / [`read_all`] - Readers that detect gzip by content
//!
//! ## Example
//!
//! ```rust
//! use dexmig_codec::{FieldMap, Value};
//! use dexmig_storage::{InMemoryRepository, Repository};
//!
//! let mut repo = InMemoryRepository::new();
//! let mut row = FieldMap::new();
//! row.insert("id".into(), Value::Integer(3));
//! repo.bulk_insert("regime", vec![row]).unwrap();
//! repo.resync_sequence("regime").unwrap();
//! assert_eq!(repo.next_id("regime").unwrap(), 4);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod error;
mod file;
mod memory;
mod repository;

pub use error::{StorageError, StorageResult};
pub use file::{open, read_all, Compression, InterchangeWriter};
pub use memory::InMemoryRepository;
pub use repository::{RecordStream, Repository};
