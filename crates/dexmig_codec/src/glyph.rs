//! Reserved glyph contract of the interchange format.
//!
//! Records are single lines of text. Structure is carried by a handful of
//! code points taken from the Unicode "Symbols for Legacy Computing" and
//! "Box Drawing" blocks, which do not occur in the bot data being moved:
//!
//! | glyph | code point | meaning |
//! |-------|------------|---------|
//! | `╵`   | U+2575     | field separator |
//! | `🬀`   | U+1FB00    | boolean true |
//! | `🬁`   | U+1FB01    | boolean false |
//! | `🮈`   | U+1FB88    | embedded newline |
//!
//! An empty token means "value omitted" (equal to the default, or null).

use crate::error::{CodecError, CodecResult};

/// Separates fields within a record line.
pub const FIELD_SEPARATOR: char = '\u{2575}';

/// Stands for boolean `true`.
pub const TRUE_GLYPH: char = '\u{1FB00}';

/// Stands for boolean `false`.
pub const FALSE_GLYPH: char = '\u{1FB01}';

/// Replaces `\n` inside text values.
pub const NEWLINE_MARKER: char = '\u{1FB88}';

/// Every reserved code point.
pub const RESERVED: [char; 4] = [FIELD_SEPARATOR, TRUE_GLYPH, FALSE_GLYPH, NEWLINE_MARKER];

/// Prefix of a section header line (`:<TAG>`).
pub const SECTION_MARKER: char = ':';

/// Prefix of a comment line.
pub const COMMENT_MARKER: &str = "//";

/// Null rendering used by older exporters; decoded as null.
pub const LEGACY_NULL: &str = "None";

/// Static media prefixes stripped from path-like text values.
///
/// Both are legacy locations; the first match wins.
pub const MEDIA_PREFIXES: [&str; 2] = ["/static/uploads/", "/carfigures/core/image_generator/src/"];

/// Returns the glyph for a boolean.
#[must_use]
pub const fn bool_glyph(value: bool) -> char {
    if value {
        TRUE_GLYPH
    } else {
        FALSE_GLYPH
    }
}

/// Resolves a token consisting of exactly one boolean glyph.
#[must_use]
pub fn parse_bool_glyph(token: &str) -> Option<bool> {
    let mut chars = token.chars();
    match (chars.next(), chars.next()) {
        (Some(TRUE_GLYPH), None) => Some(true),
        (Some(FALSE_GLYPH), None) => Some(false),
        _ => None,
    }
}

/// Returns the first reserved glyph found in `text`, if any.
#[must_use]
pub fn find_reserved(text: &str) -> Option<char> {
    text.chars().find(|c| RESERVED.contains(c))
}

/// Replaces embedded newlines with [`NEWLINE_MARKER`].
#[must_use]
pub fn escape_newlines(text: &str) -> String {
    text.replace('\n', &NEWLINE_MARKER.to_string())
}

/// Reverses [`escape_newlines`].
#[must_use]
pub fn unescape_newlines(text: &str) -> String {
    text.replace(NEWLINE_MARKER, "\n")
}

/// Strips the first matching media prefix from `text`.
#[must_use]
pub fn strip_media_prefix(text: &str) -> &str {
    MEDIA_PREFIXES
        .iter()
        .find_map(|prefix| text.strip_prefix(*prefix))
        .unwrap_or(text)
}

/// Checks the contract: glyphs are pairwise distinct, non-ASCII and never
/// whitespace, so they cannot be produced by ordinary text or by line
/// splitting.
///
/// # Errors
///
/// Returns [`CodecError::InvalidContract`] describing the first violation.
pub fn validate_contract() -> CodecResult<()> {
    for (i, glyph) in RESERVED.iter().enumerate() {
        if glyph.is_ascii() || glyph.is_whitespace() {
            return Err(CodecError::invalid_contract(format!(
                "glyph U+{:04X} is ASCII or whitespace",
                u32::from(*glyph)
            )));
        }
        if RESERVED[i + 1..].contains(glyph) {
            return Err(CodecError::invalid_contract(format!(
                "glyph U+{:04X} is reserved twice",
                u32::from(*glyph)
            )));
        }
    }
    for prefix in MEDIA_PREFIXES {
        if find_reserved(prefix).is_some() {
            return Err(CodecError::invalid_contract(format!(
                "media prefix {prefix} contains a reserved glyph"
            )));
        }
    }
    Ok(())
}
