//! Typed field values.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Primary key type shared by every table.
pub type RecordId = i64;

/// A record as a mapping from field name to typed value.
///
/// `BTreeMap` keeps iteration deterministic, which the writer relies on for
/// reproducible output and the audit logs rely on for stable diffs.
pub type FieldMap = BTreeMap<String, Value>;

/// Declared runtime type of a field.
///
/// Coercion of interchange tokens is a typed switch over this enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    /// Signed 64-bit integer (also used for snowflake ids and foreign keys).
    Integer,
    /// Double precision float.
    Float,
    /// UTF-8 text.
    Text,
    /// Boolean.
    Boolean,
    /// Calendar date.
    Date,
    /// Timestamp without timezone, normalized to UTC.
    Timestamp,
}

impl FieldKind {
    /// Short lowercase name used in diagnostics.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Integer => "integer",
            Self::Float => "float",
            Self::Text => "text",
            Self::Boolean => "boolean",
            Self::Date => "date",
            Self::Timestamp => "timestamp",
        }
    }
}

/// A typed field value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Value {
    /// Absent / SQL NULL.
    Null,
    /// Boolean value.
    Bool(bool),
    /// Signed integer.
    Integer(i64),
    /// Floating point value.
    Float(f64),
    /// UTF-8 text.
    Text(String),
    /// Calendar date.
    Date(NaiveDate),
    /// Timestamp (UTC, no offset).
    Timestamp(NaiveDateTime),
}

impl Value {
    /// Returns true for [`Value::Null`].
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns the integer payload, if any.
    #[must_use]
    pub const fn as_integer(&self) -> Option<i64> {
        match self {
            Self::Integer(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns the text payload, if any.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Returns whether this value is acceptable for a field of `kind`.
    ///
    /// Null conforms to every kind; nullability is checked separately.
    /// Integers are accepted by float fields.
    #[must_use]
    pub const fn conforms_to(&self, kind: FieldKind) -> bool {
        matches!(
            (self, kind),
            (Self::Null, _)
                | (Self::Bool(_), FieldKind::Boolean)
                | (Self::Integer(_), FieldKind::Integer | FieldKind::Float)
                | (Self::Float(_), FieldKind::Float)
                | (Self::Text(_), FieldKind::Text)
                | (Self::Date(_), FieldKind::Date)
                | (Self::Timestamp(_), FieldKind::Timestamp)
        )
    }

    /// Name of the runtime type, used in diagnostics.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "boolean",
            Self::Integer(_) => "integer",
            Self::Float(_) => "float",
            Self::Text(_) => "text",
            Self::Date(_) => "date",
            Self::Timestamp(_) => "timestamp",
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("None"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Integer(n) => write!(f, "{n}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::Text(s) => f.write_str(s),
            Self::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            Self::Timestamp(ts) => write!(f, "{}", ts.format("%Y-%m-%d %H:%M:%S%.f")),
        }
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Self::Integer(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Self::Float(x)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<NaiveDate> for Value {
    fn from(d: NaiveDate) -> Self {
        Self::Date(d)
    }
}

impl From<NaiveDateTime> for Value {
    fn from(ts: NaiveDateTime) -> Self {
        Self::Timestamp(ts)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Null, Into::into)
    }
}

/// A constant value usable in static schema tables.
///
/// [`Value`] owns heap data and cannot appear in `const` items, so schema
/// defaults, backfills and repairs are declared as literals and converted
/// on use.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Literal {
    /// Null.
    Null,
    /// Boolean.
    Bool(bool),
    /// Integer.
    Int(i64),
    /// Float.
    Float(f64),
    /// Text.
    Text(&'static str),
}

impl Literal {
    /// Converts this literal into an owned value.
    #[must_use]
    pub fn to_value(self) -> Value {
        match self {
            Self::Null => Value::Null,
            Self::Bool(b) => Value::Bool(b),
            Self::Int(n) => Value::Integer(n),
            Self::Float(x) => Value::Float(x),
            Self::Text(s) => Value::Text(s.to_string()),
        }
    }

    /// Returns whether `value` equals this literal.
    #[must_use]
    pub fn matches(self, value: &Value) -> bool {
        match (self, value) {
            (Self::Null, Value::Null) => true,
            (Self::Bool(a), Value::Bool(b)) => a == *b,
            (Self::Int(a), Value::Integer(b)) => a == *b,
            (Self::Float(a), Value::Float(b)) => a == *b,
            (Self::Text(a), Value::Text(b)) => a == b,
            _ => false,
        }
    }
}

impl From<Literal> for Value {
    fn from(lit: Literal) -> Self {
        lit.to_value()
    }
}
