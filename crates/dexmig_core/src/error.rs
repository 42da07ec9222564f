//! Error types for the migration pipeline.

use std::io;
use thiserror::Error;

/// Result type for migration operations.
pub type MigrateResult<T> = Result<T, MigrateError>;

/// Errors that abort an export or import run.
///
/// Per-record integrity problems never surface here; they are counted,
/// written to the audit trail and the record is skipped.
#[derive(Debug, Error)]
pub enum MigrateError {
    /// Repository error.
    #[error("storage error: {0}")]
    Storage(#[from] dexmig_storage::StorageError),

    /// Codec error outside of a specific line (layout or contract).
    #[error("codec error: {0}")]
    Codec(#[from] dexmig_codec::CodecError),

    /// I/O error on the interchange file or an audit log.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A line of the interchange file is malformed.
    #[error("format error on line {line}: {message}")]
    Format {
        /// 1-based line number.
        line: usize,
        /// Description of the problem.
        message: String,
    },

    /// A section header names a tag the catalog does not declare.
    #[error("invalid section '{tag}' detected on line {line}")]
    UnknownSection {
        /// The unknown tag.
        tag: String,
        /// 1-based line number.
        line: usize,
    },

    /// A bulk insert failed and the run was halted.
    #[error("bulk create failed for {table}: {message}")]
    Commit {
        /// Target table.
        table: String,
        /// Store error message.
        message: String,
        /// Rendered leading rows of the failed batch.
        sample: Vec<String>,
    },

    /// The static catalog is inconsistent.
    #[error("invalid catalog: {message}")]
    InvalidCatalog {
        /// Description of the inconsistency.
        message: String,
    },

    /// The configuration is out of range.
    #[error("invalid configuration: {message}")]
    InvalidConfig {
        /// Description of the problem.
        message: String,
    },
}

impl MigrateError {
    /// Creates a format error.
    pub fn format(line: usize, message: impl Into<String>) -> Self {
        Self::Format {
            line,
            message: message.into(),
        }
    }

    /// Creates an invalid catalog error.
    pub fn invalid_catalog(message: impl Into<String>) -> Self {
        Self::InvalidCatalog {
            message: message.into(),
        }
    }

    /// Creates an invalid configuration error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Returns whether this error means the file itself is malformed.
    #[must_use]
    pub const fn is_format_error(&self) -> bool {
        matches!(
            self,
            Self::Format { .. } | Self::UnknownSection { .. } | Self::Codec(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_section_names_the_line() {
        let err = MigrateError::UnknownSection {
            tag: "ZZ".into(),
            line: 3,
        };
        assert_eq!(err.to_string(), "invalid section 'ZZ' detected on line 3");
        assert!(err.is_format_error());
    }

    #[test]
    fn codec_errors_convert() {
        let err: MigrateError = dexmig_codec::CodecError::unknown_field("colour", 2).into();
        assert!(err.is_format_error());
        assert!(err.to_string().contains("colour"));
    }

    #[test]
    fn commit_is_not_a_format_error() {
        let err = MigrateError::Commit {
            table: "ball".into(),
            message: "duplicate".into(),
            sample: Vec::new(),
        };
        assert!(!err.is_format_error());
    }
}
