//! Token coercion into typed values.
//!
//! Every function here is total: malformed input yields `None` (which the
//! decoder turns into [`Value::Null`]) and never an error. Source exports are
//! inconsistent about dates, sometimes writing epoch floats and sometimes
//! preformatted text, so timestamps and dates try both.

use crate::glyph;
use crate::value::{FieldKind, Value};
use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Largest epoch value accepted as a timestamp (2100-01-01T00:00:00Z).
pub const EPOCH_UPPER_BOUND: f64 = 4_102_444_800.0;

/// A numeric date token must exceed this to be read as an epoch timestamp.
///
/// Small integers are never dates.
pub const DATE_EPOCH_THRESHOLD: f64 = 10_000_000_000.0;

const OFFSET_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S%.f%:z", "%Y-%m-%dT%H:%M:%S%.f%:z"];

const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

/// Parses a decimal integer.
#[must_use]
pub fn coerce_int(token: &str) -> Option<i64> {
    token.trim().parse().ok()
}

/// Parses a finite decimal float.
#[must_use]
pub fn coerce_float(token: &str) -> Option<f64> {
    token
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}

/// Parses a textual boolean (`true`/`false`/`1`/`0`, any case).
#[must_use]
pub fn coerce_bool(token: &str) -> Option<bool> {
    match token.trim().to_ascii_lowercase().as_str() {
        "true" | "t" | "1" | "yes" => Some(true),
        "false" | "f" | "0" | "no" => Some(false),
        _ => None,
    }
}

/// Parses a timestamp.
///
/// A numeric token within `[0, EPOCH_UPPER_BOUND]` is epoch seconds in UTC.
/// Anything else, including out-of-range numbers, is tried as ISO-8601;
/// offsets are normalized to UTC.
#[must_use]
pub fn coerce_timestamp(token: &str) -> Option<NaiveDateTime> {
    let token = token.trim();
    if token.is_empty() {
        return None;
    }
    if let Ok(secs) = token.parse::<f64>() {
        if (0.0..=EPOCH_UPPER_BOUND).contains(&secs) {
            return from_epoch(secs);
        }
    }
    parse_iso_timestamp(token)
}

/// Parses a calendar date.
///
/// Numeric tokens are accepted only above [`DATE_EPOCH_THRESHOLD`]; smaller
/// numbers are rejected outright rather than tried as ISO text.
#[must_use]
pub fn coerce_date(token: &str) -> Option<NaiveDate> {
    let token = token.trim();
    if token.is_empty() {
        return None;
    }
    if let Ok(number) = token.parse::<f64>() {
        if number > DATE_EPOCH_THRESHOLD {
            return from_epoch(number).map(|ts| ts.date());
        }
        return None;
    }
    NaiveDate::parse_from_str(token, "%Y-%m-%d").ok()
}

/// Coerces `token` according to the declared `kind`.
///
/// Text keeps the token verbatim apart from reversing the newline marker.
#[must_use]
pub fn coerce(token: &str, kind: FieldKind) -> Value {
    match kind {
        FieldKind::Integer => coerce_int(token).into(),
        FieldKind::Float => coerce_float(token).into(),
        FieldKind::Boolean => coerce_bool(token).into(),
        FieldKind::Date => coerce_date(token).into(),
        FieldKind::Timestamp => coerce_timestamp(token).into(),
        FieldKind::Text => Value::Text(glyph::unescape_newlines(token)),
    }
}

/// Conforms an already-typed boolean to the declared kind.
///
/// Boolean glyphs are resolved before the field kind is consulted, so a glyph
/// can land in a numeric or text column.
#[must_use]
pub fn conform_bool(value: bool, kind: FieldKind) -> Value {
    match kind {
        FieldKind::Integer => Value::Integer(i64::from(value)),
        FieldKind::Float => Value::Float(if value { 1.0 } else { 0.0 }),
        FieldKind::Text => Value::Text(if value { "True" } else { "False" }.to_string()),
        FieldKind::Boolean => Value::Bool(value),
        FieldKind::Date | FieldKind::Timestamp => Value::Null,
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn from_epoch(secs: f64) -> Option<NaiveDateTime> {
    let whole = secs.trunc();
    let nanos = ((secs - whole) * 1e9).round().clamp(0.0, 999_999_999.0) as u32;
    DateTime::from_timestamp(whole as i64, nanos).map(|dt| dt.naive_utc())
}

fn parse_iso_timestamp(token: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(token) {
        return Some(dt.naive_utc());
    }
    for format in OFFSET_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(token, format) {
            return Some(dt.naive_utc());
        }
    }
    for format in NAIVE_FORMATS {
        if let Ok(ts) = NaiveDateTime::parse_from_str(token, format) {
            return Some(ts);
        }
    }
    NaiveDate::parse_from_str(token, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    fn ts(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, s)
            .unwrap()
    }

    #[test]
    fn int_is_total() {
        assert_eq!(coerce_int("42"), Some(42));
        assert_eq!(coerce_int(" -7 "), Some(-7));
        assert_eq!(coerce_int(""), None);
        assert_eq!(coerce_int("4.5"), None);
        assert_eq!(coerce_int("abc"), None);
        assert_eq!(coerce_int("99999999999999999999"), None);
    }

    #[test]
    fn float_rejects_non_finite() {
        assert_eq!(coerce_float("1.25"), Some(1.25));
        assert_eq!(coerce_float("3"), Some(3.0));
        assert_eq!(coerce_float("nan"), None);
        assert_eq!(coerce_float("inf"), None);
        assert_eq!(coerce_float("x"), None);
    }

    #[test]
    fn timestamp_accepts_epoch_in_range() {
        assert_eq!(coerce_timestamp("0"), Some(ts(1970, 1, 1, 0, 0, 0)));
        assert_eq!(
            coerce_timestamp("1700000000"),
            Some(ts(2023, 11, 14, 22, 13, 20))
        );
        let fractional = coerce_timestamp("1700000000.5").unwrap();
        assert_eq!(fractional.nanosecond(), 500_000_000);
        assert_eq!(
            coerce_timestamp("4102444800"),
            Some(ts(2100, 1, 1, 0, 0, 0))
        );
    }

    #[test]
    fn timestamp_out_of_range_epoch_falls_through_to_iso() {
        // Not epoch, and not ISO either.
        assert_eq!(coerce_timestamp("4102444801"), None);
        assert_eq!(coerce_timestamp("-1"), None);
    }

    #[test]
    fn timestamp_parses_iso_variants() {
        let expected = ts(2024, 5, 6, 7, 8, 9);
        assert_eq!(coerce_timestamp("2024-05-06 07:08:09"), Some(expected));
        assert_eq!(coerce_timestamp("2024-05-06T07:08:09"), Some(expected));
        assert_eq!(coerce_timestamp("2024-05-06T07:08:09Z"), Some(expected));
        assert_eq!(coerce_timestamp("2024-05-06 07:08:09+00:00"), Some(expected));
        assert_eq!(coerce_timestamp("2024-05-06 09:08:09+02:00"), Some(expected));
        assert_eq!(
            coerce_timestamp("2024-05-06"),
            Some(ts(2024, 5, 6, 0, 0, 0))
        );
        assert_eq!(coerce_timestamp("yesterday"), None);
        assert_eq!(coerce_timestamp(""), None);
    }

    #[test]
    fn timestamp_keeps_fractional_iso_seconds() {
        let parsed = coerce_timestamp("2024-05-06 07:08:09.250000").unwrap();
        assert_eq!(parsed.nanosecond(), 250_000_000);
    }

    #[test]
    fn date_requires_large_epoch() {
        assert_eq!(coerce_date("20240101"), None);
        assert_eq!(coerce_date("1700000000"), None);
        assert_eq!(
            coerce_date("10000000001"),
            NaiveDate::from_ymd_opt(2286, 11, 20)
        );
    }

    #[test]
    fn date_parses_iso() {
        assert_eq!(coerce_date("2023-02-28"), NaiveDate::from_ymd_opt(2023, 2, 28));
        assert_eq!(coerce_date("2023-02-30"), None);
        assert_eq!(coerce_date("soon"), None);
    }

    #[test]
    fn bool_accepts_common_spellings() {
        assert_eq!(coerce_bool("True"), Some(true));
        assert_eq!(coerce_bool("0"), Some(false));
        assert_eq!(coerce_bool("maybe"), None);
    }

    #[test]
    fn coerce_dispatches_by_kind() {
        assert_eq!(coerce("12", FieldKind::Integer), Value::Integer(12));
        assert_eq!(coerce("12", FieldKind::Text), Value::Text("12".into()));
        assert_eq!(coerce("x", FieldKind::Integer), Value::Null);
        assert_eq!(
            coerce("a\u{1FB88}b", FieldKind::Text),
            Value::Text("a\nb".into())
        );
    }

    #[test]
    fn glyph_booleans_conform_to_numeric_columns() {
        assert_eq!(conform_bool(true, FieldKind::Integer), Value::Integer(1));
        assert_eq!(conform_bool(false, FieldKind::Boolean), Value::Bool(false));
        assert_eq!(conform_bool(true, FieldKind::Date), Value::Null);
    }
}
