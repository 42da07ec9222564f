//! Record decoder.

use crate::coerce;
use crate::encoder::ID_FIELD;
use crate::error::{CodecError, CodecResult};
use crate::glyph;
use crate::value::{FieldKind, FieldMap, Value};

/// Column name that carries a token in the file but drops it on decode.
pub const DISCARD_COLUMN: &str = "-";

/// Lookup of target-side field declarations.
///
/// Implemented by the target schema so that the decoder never inspects
/// entity types at runtime.
pub trait FieldSchema {
    /// Declared kind of `field`, or `None` if the target does not have it.
    fn kind_of(&self, field: &str) -> Option<FieldKind>;

    /// A complete map of every target field set to its declared default
    /// (or null). Decoded tokens are written over this template.
    fn template(&self) -> FieldMap;
}

/// One positional column of a decode layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeColumn {
    /// Token is ignored.
    Discard,
    /// Token is coerced into `name` as `kind`.
    Field {
        /// Target field name.
        name: String,
        /// Declared kind used for coercion.
        kind: FieldKind,
    },
}

/// Positional column list of one section, resolved against a target schema.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodeLayout {
    columns: Vec<DecodeColumn>,
    template: FieldMap,
}

/// Outcome of decoding one line.
#[derive(Debug, Clone, PartialEq)]
pub enum Decoded {
    /// A complete field map for the target table.
    Record(FieldMap),
    /// The line was rejected and must be excluded.
    Skipped(SkipReason),
}

/// Why a line was rejected by the decoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The `id` token was empty.
    EmptyId,
}

impl SkipReason {
    /// Human-readable reason for audit logs.
    #[must_use]
    pub const fn describe(self) -> &'static str {
        match self {
            Self::EmptyId => "Empty ID field",
        }
    }
}

impl DecodeLayout {
    /// Resolves `columns` against `schema`.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::UnknownField`] for a column the schema does not
    /// declare, and [`CodecError::InvalidLayout`] if the first column is not
    /// `id`.
    pub fn resolve<S: FieldSchema + ?Sized>(columns: &[&str], schema: &S) -> CodecResult<Self> {
        if columns.first() != Some(&ID_FIELD) {
            return Err(CodecError::invalid_layout("first column must be 'id'"));
        }

        let columns = columns
            .iter()
            .enumerate()
            .map(|(i, name)| {
                if *name == DISCARD_COLUMN {
                    return Ok(DecodeColumn::Discard);
                }
                schema
                    .kind_of(name)
                    .map(|kind| DecodeColumn::Field {
                        name: (*name).to_string(),
                        kind,
                    })
                    .ok_or_else(|| CodecError::unknown_field(*name, i + 1))
            })
            .collect::<CodecResult<Vec<_>>>()?;

        Ok(Self {
            columns,
            template: schema.template(),
        })
    }

    /// Number of columns.
    #[must_use]
    pub fn width(&self) -> usize {
        self.columns.len()
    }

    /// The resolved columns.
    #[must_use]
    pub fn columns(&self) -> &[DecodeColumn] {
        &self.columns
    }

    /// Decodes one record line.
    ///
    /// Empty tokens keep the template value (the declared default, or null).
    /// Missing trailing tokens are treated as empty.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::TooManyFields`] if the line has more tokens than
    /// columns.
    pub fn decode(&self, line: &str) -> CodecResult<Decoded> {
        let tokens: Vec<&str> = line.split(glyph::FIELD_SEPARATOR).collect();
        if tokens.len() > self.columns.len() {
            return Err(CodecError::TooManyFields {
                expected: self.columns.len(),
                actual: tokens.len(),
            });
        }

        let mut record = self.template.clone();

        for (i, column) in self.columns.iter().enumerate() {
            let token = tokens.get(i).copied().unwrap_or("");
            let DecodeColumn::Field { name, kind } = column else {
                continue;
            };

            if token.is_empty() {
                if name == ID_FIELD {
                    return Ok(Decoded::Skipped(SkipReason::EmptyId));
                }
                continue;
            }

            record.insert(name.clone(), decode_token(token, *kind));
        }

        Ok(Decoded::Record(record))
    }
}

fn decode_token(token: &str, kind: FieldKind) -> Value {
    if token == glyph::LEGACY_NULL {
        return Value::Null;
    }
    match glyph::parse_bool_glyph(token) {
        Some(b) => coerce::conform_bool(b, kind),
        None => coerce::coerce(token, kind),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    struct Schema(BTreeMap<&'static str, (FieldKind, Value)>);

    impl Schema {
        fn vehicles() -> Self {
            let mut fields = BTreeMap::new();
            fields.insert("id", (FieldKind::Integer, Value::Null));
            fields.insert("name", (FieldKind::Text, Value::Null));
            fields.insert("enabled", (FieldKind::Boolean, Value::Bool(true)));
            fields.insert("weight", (FieldKind::Float, Value::Null));
            fields.insert("tier", (FieldKind::Integer, Value::Integer(1)));
            Self(fields)
        }
    }

    impl FieldSchema for Schema {
        fn kind_of(&self, field: &str) -> Option<FieldKind> {
            self.0.get(field).map(|(kind, _)| *kind)
        }

        fn template(&self) -> FieldMap {
            self.0
                .iter()
                .map(|(name, (_, default))| ((*name).to_string(), default.clone()))
                .collect()
        }
    }

    fn layout(columns: &[&str]) -> DecodeLayout {
        DecodeLayout::resolve(columns, &Schema::vehicles()).unwrap()
    }

    fn record(decoded: Decoded) -> FieldMap {
        match decoded {
            Decoded::Record(map) => map,
            Decoded::Skipped(reason) => panic!("unexpected skip: {reason:?}"),
        }
    }

    #[test]
    fn empty_token_applies_declared_default() {
        let map = record(layout(&["id", "enabled", "name"]).decode("7╵╵Sedan").unwrap());
        assert_eq!(map["id"], Value::Integer(7));
        assert_eq!(map["enabled"], Value::Bool(true));
        assert_eq!(map["name"], Value::Text("Sedan".into()));
    }

    #[test]
    fn false_glyph_decodes_to_false() {
        let map = record(
            layout(&["id", "enabled", "name"])
                .decode("7╵\u{1FB01}╵Sedan")
                .unwrap(),
        );
        assert_eq!(map["enabled"], Value::Bool(false));
    }

    #[test]
    fn fields_not_carried_get_template_values() {
        let map = record(layout(&["id", "name"]).decode("1╵x").unwrap());
        assert_eq!(map["tier"], Value::Integer(1));
        assert_eq!(map["weight"], Value::Null);
        assert_eq!(map.len(), 5);
    }

    #[test]
    fn empty_id_is_skipped_not_fatal() {
        let decoded = layout(&["id", "name"]).decode("╵Sedan").unwrap();
        assert_eq!(decoded, Decoded::Skipped(SkipReason::EmptyId));
    }

    #[test]
    fn unknown_column_is_a_format_error() {
        let err = DecodeLayout::resolve(&["id", "colour"], &Schema::vehicles()).unwrap_err();
        assert_eq!(err, CodecError::unknown_field("colour", 2));
    }

    #[test]
    fn first_column_must_be_id() {
        let err = DecodeLayout::resolve(&["name", "id"], &Schema::vehicles()).unwrap_err();
        assert!(matches!(err, CodecError::InvalidLayout { .. }));
    }

    #[test]
    fn too_many_tokens_is_a_format_error() {
        let err = layout(&["id", "name"]).decode("1╵a╵b").unwrap_err();
        assert_eq!(
            err,
            CodecError::TooManyFields {
                expected: 2,
                actual: 3
            }
        );
    }

    #[test]
    fn missing_trailing_tokens_are_empty() {
        let map = record(layout(&["id", "name", "tier"]).decode("4").unwrap());
        assert_eq!(map["name"], Value::Null);
        assert_eq!(map["tier"], Value::Integer(1));
    }

    #[test]
    fn discard_column_drops_token() {
        let map = record(layout(&["id", "-", "name"]).decode("4╵junk╵kept").unwrap());
        assert_eq!(map["name"], Value::Text("kept".into()));
        assert!(!map.contains_key("-"));
    }

    #[test]
    fn legacy_none_token_is_null() {
        let map = record(layout(&["id", "tier"]).decode("4╵None").unwrap());
        assert_eq!(map["tier"], Value::Null);
    }

    #[test]
    fn malformed_numeric_token_becomes_null() {
        let map = record(layout(&["id", "weight"]).decode("4╵heavy").unwrap());
        assert_eq!(map["weight"], Value::Null);
    }

    #[test]
    fn non_numeric_id_becomes_null_for_the_resolver() {
        let map = record(layout(&["id", "name"]).decode("abc╵x").unwrap());
        assert_eq!(map["id"], Value::Null);
    }
}
