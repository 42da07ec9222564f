//! Error types for the codec crate.

use thiserror::Error;

/// Result type for codec operations.
pub type CodecResult<T> = Result<T, CodecError>;

/// Errors that can occur while encoding or decoding interchange records.
///
/// Every variant is a format error: it signals that the writer and reader
/// disagree about the layout of a section, and must never be recovered from
/// silently.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// A column names a field that the target schema does not declare.
    #[error("unknown field '{field}' at attribute {position}")]
    UnknownField {
        /// The offending column name.
        field: String,
        /// 1-based attribute position in the record line.
        position: usize,
    },

    /// A record line carries more tokens than its section has columns.
    #[error("record has {actual} fields but the section declares {expected}")]
    TooManyFields {
        /// Number of columns declared for the section.
        expected: usize,
        /// Number of tokens found on the line.
        actual: usize,
    },

    /// A text value contains one of the reserved glyphs.
    #[error("field '{field}' contains reserved glyph U+{glyph:04X}")]
    ReservedGlyph {
        /// Field whose value collided with the glyph contract.
        field: String,
        /// The colliding code point.
        glyph: u32,
    },

    /// The glyph contract itself is inconsistent.
    #[error("invalid glyph contract: {message}")]
    InvalidContract {
        /// Description of the inconsistency.
        message: String,
    },

    /// A layout was declared inconsistently.
    #[error("invalid layout: {message}")]
    InvalidLayout {
        /// Description of the layout problem.
        message: String,
    },
}

impl CodecError {
    /// Create an unknown field error.
    pub fn unknown_field(field: impl Into<String>, position: usize) -> Self {
        Self::UnknownField {
            field: field.into(),
            position,
        }
    }

    /// Create a reserved glyph error.
    pub fn reserved_glyph(field: impl Into<String>, glyph: char) -> Self {
        Self::ReservedGlyph {
            field: field.into(),
            glyph: u32::from(glyph),
        }
    }

    /// Create an invalid layout error.
    pub fn invalid_layout(message: impl Into<String>) -> Self {
        Self::InvalidLayout {
            message: message.into(),
        }
    }

    /// Create an invalid contract error.
    pub fn invalid_contract(message: impl Into<String>) -> Self {
        Self::InvalidContract {
            message: message.into(),
        }
    }
}
