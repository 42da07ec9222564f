//! Error types for storage operations.

use dexmig_codec::RecordId;
use std::io;
use thiserror::Error;

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Errors that can occur in a repository or while moving interchange files.
#[derive(Debug, Error)]
pub enum StorageError {
    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A snapshot could not be parsed or written.
    #[error("snapshot error: {0}")]
    Json(#[from] serde_json::Error),

    /// A row with this primary key already exists.
    #[error("duplicate key value violates primary key of {table}: id={id}")]
    DuplicateKey {
        /// Table that rejected the row.
        table: String,
        /// The colliding primary key.
        id: RecordId,
    },

    /// A unique constraint was violated.
    #[error("duplicate key value violates unique constraint {table}.{field}: {value}")]
    UniqueViolation {
        /// Table that rejected the row.
        table: String,
        /// Constrained field.
        field: String,
        /// Rendered colliding value.
        value: String,
    },

    /// A row handed to a bulk insert has no integer `id`.
    #[error("row for {table} has no integer id")]
    MissingId {
        /// Table that rejected the row.
        table: String,
    },

    /// Stored data is corrupted.
    #[error("storage corrupted: {0}")]
    Corrupted(String),
}

impl StorageError {
    /// Creates a duplicate key error.
    pub fn duplicate_key(table: impl Into<String>, id: RecordId) -> Self {
        Self::DuplicateKey {
            table: table.into(),
            id,
        }
    }

    /// Creates a unique violation error.
    pub fn unique_violation(
        table: impl Into<String>,
        field: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self::UniqueViolation {
            table: table.into(),
            field: field.into(),
            value: value.into(),
        }
    }
}
