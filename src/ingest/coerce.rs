//! Dynamic typing of raw CSV fields into cell values.

use chrono::{DateTime, NaiveDateTime};

use super::regexes::{FLOAT_PATTERN, ISO_DATETIME_PATTERN};
use crate::dataset::CellValue;

/// Largest integer magnitude an f64 represents exactly (2^53 - 1).
/// Numbers beyond it stay text so identifiers keep every digit.
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

/// Turn a raw field into a typed cell.
///
/// Checks run in order: empty, boolean (`true`/`TRUE`/`false`/`FALSE`
/// only), number, ISO date-time, then text. Text is kept verbatim.
pub fn coerce_field(raw: &str) -> CellValue {
    match raw {
        "" => return CellValue::Empty,
        "true" | "TRUE" => return CellValue::Bool(true),
        "false" | "FALSE" => return CellValue::Bool(false),
        _ => {}
    }

    if let Some(n) = parse_number(raw) {
        return CellValue::Number(n);
    }

    if let Some(d) = parse_iso_datetime(raw) {
        return CellValue::Date(d);
    }

    CellValue::Text(raw.to_string())
}

/// Parse a field matching the float syntax within safe-integer range.
#[inline]
fn parse_number(raw: &str) -> Option<f64> {
    if !FLOAT_PATTERN.is_match(raw) {
        return None;
    }
    let n: f64 = raw.trim().parse().ok()?;
    (n.abs() <= MAX_SAFE_INTEGER).then_some(n)
}

/// Parse an ISO 8601 date-time with offset into a UTC timestamp.
fn parse_iso_datetime(raw: &str) -> Option<NaiveDateTime> {
    let caps = ISO_DATETIME_PATTERN.captures(raw)?;

    let sec = caps.name("sec").map_or("00", |m| m.as_str());
    let frac = caps.name("frac").map_or("", |m| m.as_str());
    let tz = match &caps["tz"] {
        "Z" => "+00:00",
        other => other,
    };
    let normalized = format!("{}T{}:{sec}{frac}{tz}", &caps["date"], &caps["hm"]);

    DateTime::parse_from_rfc3339(&normalized)
        .ok()
        .map(|dt| dt.naive_utc())
}
