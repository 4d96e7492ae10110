//! Display formatting shared by the table view, search and the report.

use chrono::NaiveDateTime;

use crate::dataset::CellValue;

/// Marker appended to truncated labels.
pub const ELLIPSIS: &str = "...";

/// Most fraction digits shown by [`format_number`].
const MAX_FRACTION_DIGITS: usize = 3;

/// Below this magnitude every integer is exactly representable (2^53).
const EXACT_INTEGER_LIMIT: f64 = 9_007_199_254_740_992.0;

/// Format a cell for display and search.
///
/// Search matches against exactly this string, so what a user sees in the
/// table is what the query is compared with.
pub fn format_cell(value: &CellValue) -> String {
    match value {
        CellValue::Empty => String::new(),
        CellValue::Date(d) => format_datetime(d),
        CellValue::Number(n) => format_number(*n),
        CellValue::Bool(b) => b.to_string(),
        CellValue::Text(s) => s.clone(),
    }
}

/// en-US style number: grouped integer digits, at most three fraction
/// digits, trailing zeros dropped.
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        return "NaN".to_string();
    }
    if n.is_infinite() {
        return if n > 0.0 { "∞" } else { "-∞" }.to_string();
    }

    let fixed = to_fixed(n.abs(), MAX_FRACTION_DIGITS);
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));
    let frac_part = frac_part.trim_end_matches('0');

    let mut out = String::with_capacity(fixed.len() + fixed.len() / 3 + 1);
    let is_zero = int_part.bytes().all(|b| b == b'0') && frac_part.is_empty();
    if n.is_sign_negative() && !is_zero {
        out.push('-');
    }
    out.push_str(&group_digits(int_part));
    if !frac_part.is_empty() {
        out.push('.');
        out.push_str(frac_part);
    }
    out
}

/// Format a count with thousands separators.
pub fn format_count(n: usize) -> String {
    group_digits(&n.to_string())
}

/// Insert a comma every three digits from the right.
fn group_digits(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// en-US style date and time, e.g. `1/15/2023, 2:05:09 PM`.
pub fn format_datetime(d: &NaiveDateTime) -> String {
    d.format("%-m/%-d/%Y, %-I:%M:%S %p").to_string()
}

/// Human-readable file size, e.g. `1.5 KB`.
pub fn format_file_size(bytes: u64) -> String {
    const UNITS: [&str; 5] = ["Bytes", "KB", "MB", "GB", "TB"];

    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    let mut unit = 0;
    let mut size = bytes as f64;
    while size >= 1024.0 && unit < UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }

    let rounded = to_fixed(size, 2);
    let rounded = rounded.trim_end_matches('0').trim_end_matches('.');
    format!("{rounded} {}", UNITS[unit])
}

/// `value` with exactly `digits` fraction digits.
///
/// Exact halfway cases round away from zero (`0.125` -> `0.13`); all
/// other values round to the nearest representation, as `{:.N}` does.
pub fn to_fixed(value: f64, digits: usize) -> String {
    // A halfway case has exactly `digits + 1` fraction digits, the last
    // being 5, so it is an odd multiple of 2^-(digits + 1).
    let twice = value * 2f64.powi(digits as i32 + 1);
    let is_tie = value.is_finite()
        && twice.fract() == 0.0
        && twice.abs() < EXACT_INTEGER_LIMIT
        && twice % 2.0 != 0.0;
    if !is_tie {
        return format!("{value:.digits$}");
    }

    // |value| * 10^digits = twice * 5^digits / 2, rounded up
    let scaled = (twice.abs() as u128 * 5u128.pow(digits as u32)).div_ceil(2);
    let padded = format!("{scaled:0>width$}", width = digits + 1);
    let (int_part, frac_part) = padded.split_at(padded.len() - digits);

    let mut out = String::with_capacity(padded.len() + 2);
    if value < 0.0 {
        out.push('-');
    }
    out.push_str(int_part);
    if digits > 0 {
        out.push('.');
        out.push_str(frac_part);
    }
    out
}

/// Cut `s` to `max_chars` characters, appending [`ELLIPSIS`] when cut.
pub fn truncate_label(s: &str, max_chars: usize) -> String {
    match s.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => format!("{}{ELLIPSIS}", &s[..byte_idx]),
        None => s.to_string(),
    }
}

/// `part / whole * 100`, or 0 when `whole` is 0.
#[inline]
pub fn percentage(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64 * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(0.0), "0");
        assert_eq!(format_number(-0.0), "0");
        assert_eq!(format_number(1234567.0), "1,234,567");
        assert_eq!(format_number(-1234.5), "-1,234.5");
        assert_eq!(format_number(3.14159), "3.142");
        assert_eq!(format_number(999.9996), "1,000");
        assert_eq!(format_number(0.25), "0.25");
        assert_eq!(format_number(-0.0001), "0");
        assert_eq!(format_number(f64::NAN), "NaN");
        assert_eq!(format_number(0.0625), "0.063");
        assert_eq!(format_number(-2.0625), "-2.063");
    }

    #[test]
    fn test_to_fixed_rounds_halfway_away_from_zero() {
        assert_eq!(to_fixed(0.125, 2), "0.13");
        assert_eq!(to_fixed(3.125, 2), "3.13");
        assert_eq!(to_fixed(0.0625, 3), "0.063");
        assert_eq!(to_fixed(-3.125, 2), "-3.13");
        assert_eq!(to_fixed(2.5, 0), "3");
        assert_eq!(to_fixed(12.25, 1), "12.3");
    }

    #[test]
    fn test_to_fixed_matches_plain_formatting_off_ties() {
        assert_eq!(to_fixed(1.005, 2), "1.00");
        assert_eq!(to_fixed(3.14159, 2), "3.14");
        assert_eq!(to_fixed(2.0, 2), "2.00");
        assert_eq!(to_fixed(75.0, 2), "75.00");
        assert_eq!(to_fixed(0.0, 1), "0.0");
    }

    #[test]
    fn test_format_count() {
        assert_eq!(format_count(0), "0");
        assert_eq!(format_count(999), "999");
        assert_eq!(format_count(1000), "1,000");
        assert_eq!(format_count(10_000_000), "10,000,000");
    }

    #[test]
    fn test_format_datetime() {
        let d = NaiveDate::from_ymd_opt(2023, 1, 15)
            .unwrap()
            .and_hms_opt(14, 5, 9)
            .unwrap();
        assert_eq!(format_datetime(&d), "1/15/2023, 2:05:09 PM");

        let midnight = NaiveDate::from_ymd_opt(2024, 12, 3)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        assert_eq!(format_datetime(&midnight), "12/3/2024, 12:00:00 AM");
    }

    #[test]
    fn test_format_cell() {
        assert_eq!(format_cell(&CellValue::Empty), "");
        assert_eq!(format_cell(&CellValue::Number(12345.678)), "12,345.678");
        assert_eq!(format_cell(&CellValue::Bool(true)), "true");
        assert_eq!(format_cell(&CellValue::from("Hello")), "Hello");
    }

    #[test]
    fn test_format_file_size() {
        assert_eq!(format_file_size(0), "0 Bytes");
        assert_eq!(format_file_size(512), "512 Bytes");
        assert_eq!(format_file_size(1536), "1.5 KB");
        assert_eq!(format_file_size(1024 * 1024), "1 MB");
    }

    #[test]
    fn test_truncate_label() {
        assert_eq!(truncate_label("short", 15), "short");
        assert_eq!(truncate_label("exactly fifteen", 15), "exactly fifteen");
        assert_eq!(truncate_label("a much longer label", 15), "a much longer l...");
        assert_eq!(truncate_label("ééééé", 3), "ééé...");
    }

    #[test]
    fn test_percentage_of_zero() {
        assert_eq!(percentage(3, 0), 0.0);
        assert_eq!(percentage(1, 4), 25.0);
    }
}
