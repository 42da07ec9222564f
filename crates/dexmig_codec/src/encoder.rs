//! Record encoder.

use crate::error::{CodecError, CodecResult};
use crate::glyph;
use crate::value::{FieldMap, Literal, Value};

/// Name of the primary key field; always the first field of a layout.
pub const ID_FIELD: &str = "id";

/// The ordered field list of one exported entity type.
///
/// Fields are `{id} ∪ fields ∪ defaults`, deduplicated and sorted bytewise,
/// with `id` forced to the front. The order is part of the file format: the
/// reader zips tokens against its own column list positionally.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordLayout {
    fields: Vec<String>,
    defaults: Vec<(String, Literal)>,
}

impl RecordLayout {
    /// Builds a layout from transferred fields and a default map.
    #[must_use]
    pub fn new(fields: &[&str], defaults: &[(&str, Literal)]) -> Self {
        let mut names: Vec<String> = fields
            .iter()
            .copied()
            .chain(defaults.iter().map(|(name, _)| *name))
            .filter(|name| *name != ID_FIELD)
            .map(str::to_string)
            .collect();
        names.sort();
        names.dedup();
        names.insert(0, ID_FIELD.to_string());

        Self {
            fields: names,
            defaults: defaults
                .iter()
                .map(|(name, lit)| ((*name).to_string(), *lit))
                .collect(),
        }
    }

    /// The ordered field names, `id` first.
    #[must_use]
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    /// Number of tokens per record line.
    #[must_use]
    pub fn width(&self) -> usize {
        self.fields.len()
    }

    /// The configured default for `field`, if any.
    #[must_use]
    pub fn default_for(&self, field: &str) -> Option<Literal> {
        self.defaults
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, lit)| *lit)
    }

    /// Encodes one record into a line (without trailing newline).
    ///
    /// Returns `Ok(None)` when the record's `id` would be empty; such records
    /// are never written.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::ReservedGlyph`] if a text value contains a
    /// reserved glyph.
    pub fn encode(&self, record: &FieldMap) -> CodecResult<Option<String>> {
        let mut tokens = Vec::with_capacity(self.fields.len());

        for field in &self.fields {
            let value = record.get(field).unwrap_or(&Value::Null);
            let token = self.encode_field(field, value)?;
            if field == ID_FIELD && token.is_empty() {
                return Ok(None);
            }
            tokens.push(token);
        }

        Ok(Some(tokens.join(&glyph::FIELD_SEPARATOR.to_string())))
    }

    fn encode_field(&self, field: &str, value: &Value) -> CodecResult<String> {
        if field != ID_FIELD {
            if let Some(default) = self.default_for(field) {
                if default.matches(value) {
                    return Ok(String::new());
                }
            }
        }

        Ok(match value {
            Value::Null => String::new(),
            Value::Bool(b) => glyph::bool_glyph(*b).to_string(),
            Value::Text(text) => {
                if let Some(reserved) = glyph::find_reserved(text) {
                    return Err(CodecError::reserved_glyph(field, reserved));
                }
                glyph::escape_newlines(glyph::strip_media_prefix(text))
            }
            other => other.to_string(),
        })
    }
}
