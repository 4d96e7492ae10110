//! Compiled regex patterns for dynamic typing of CSV fields.

use regex::Regex;

/// Decimal or exponent number, optionally negative, surrounding
/// whitespace allowed. A leading `+` is not a number.
pub static FLOAT_PATTERN: std::sync::LazyLock<Regex> = std::sync::LazyLock::new(|| {
    Regex::new(r"^\s*-?(?:\d+\.?|\.\d+|\d+\.\d+)(?:[eE][-+]?\d+)?\s*$")
        .expect("Invalid float pattern")
});

/// ISO 8601 date-time with a `T` separator and an explicit offset.
///
/// Seconds and fractional seconds are optional; captures are
/// `date`, `hm`, `sec`, `frac` and `tz`.
pub static ISO_DATETIME_PATTERN: std::sync::LazyLock<Regex> = std::sync::LazyLock::new(|| {
    Regex::new(concat!(
        r"^(?P<date>\d{4}-[01]\d-[0-3]\d)",
        r"T(?P<hm>[0-2]\d:[0-5]\d)(?::(?P<sec>[0-5]\d)(?P<frac>\.\d+)?)?",
        r"(?P<tz>[+-][0-2]\d:[0-5]\d|Z)$",
    ))
    .expect("Invalid ISO datetime pattern")
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_float_pattern() {
        for ok in ["1", "-1", "1.", ".5", "3.14", "1e10", "-2.5E-3", "  42  "] {
            assert!(FLOAT_PATTERN.is_match(ok), "{ok}");
        }
        for bad in ["", "+1", "1,000", "1.2.3", "abc", "0x10", "-"] {
            assert!(!FLOAT_PATTERN.is_match(bad), "{bad}");
        }
    }

    #[test]
    fn test_iso_datetime_pattern() {
        assert!(ISO_DATETIME_PATTERN.is_match("2023-01-15T10:30:00Z"));
        assert!(ISO_DATETIME_PATTERN.is_match("2023-01-15T10:30:00.123+02:00"));
        assert!(ISO_DATETIME_PATTERN.is_match("2023-01-15T10:30Z"));
        assert!(!ISO_DATETIME_PATTERN.is_match("2023-01-15"));
        assert!(!ISO_DATETIME_PATTERN.is_match("2023-01-15T10:30:00"));
        assert!(!ISO_DATETIME_PATTERN.is_match("2023-01-15 10:30:00Z"));
    }
}
