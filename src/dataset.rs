//! In-memory dataset model: typed cells, positional rows and column names.

use chrono::NaiveDateTime;
use serde::{Serialize, Serializer};

/// Largest integer magnitude an `f64` holds exactly (2^53 - 1).
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

/// A single typed cell, produced once at ingestion.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CellValue {
    /// Null, undefined or empty field.
    #[default]
    Empty,
    /// Numeric value.
    Number(f64),
    /// Boolean value.
    Bool(bool),
    /// Date/time value.
    Date(NaiveDateTime),
    /// Any other text.
    Text(String),
}

static EMPTY_CELL: CellValue = CellValue::Empty;

impl CellValue {
    /// Returns true for `Empty` and for an empty string.
    #[inline]
    pub fn is_empty(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => s.is_empty(),
            _ => false,
        }
    }

    /// Returns the numeric payload, if any.
    #[inline]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns the text payload, if any.
    #[inline]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            CellValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Plain string conversion, used for categorical keys and pie labels.
    ///
    /// Unlike [`crate::format_cell`], numbers are not digit-grouped.
    pub fn to_plain_string(&self) -> String {
        match self {
            CellValue::Empty => String::new(),
            CellValue::Number(n) => plain_number(*n),
            CellValue::Bool(b) => b.to_string(),
            CellValue::Date(d) => d.format("%Y-%m-%d %H:%M:%S").to_string(),
            CellValue::Text(s) => s.clone(),
        }
    }
}

/// Shortest round-trip rendering of a number without grouping.
pub(crate) fn plain_number(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n.is_infinite() {
        let s = if n > 0.0 { "Infinity" } else { "-Infinity" };
        s.to_string()
    } else if n == 0.0 {
        "0".to_string()
    } else {
        format!("{n}")
    }
}

/// ISO 8601 form used for dates in exports.
pub(crate) fn iso_datetime(d: &NaiveDateTime) -> String {
    d.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string()
}

impl Serialize for CellValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            CellValue::Empty => serializer.serialize_none(),
            CellValue::Number(n) if n.fract() == 0.0 && n.abs() <= MAX_SAFE_INTEGER => {
                serializer.serialize_i64(*n as i64)
            }
            CellValue::Number(n) if n.is_finite() => serializer.serialize_f64(*n),
            CellValue::Number(_) => serializer.serialize_none(),
            CellValue::Bool(b) => serializer.serialize_bool(*b),
            CellValue::Date(d) => serializer.serialize_str(&iso_datetime(d)),
            CellValue::Text(s) => serializer.serialize_str(s),
        }
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Number(n)
    }
}

impl From<i64> for CellValue {
    fn from(n: i64) -> Self {
        CellValue::Number(n as f64)
    }
}

impl From<bool> for CellValue {
    fn from(b: bool) -> Self {
        CellValue::Bool(b)
    }
}

impl From<NaiveDateTime> for CellValue {
    fn from(d: NaiveDateTime) -> Self {
        CellValue::Date(d)
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::Text(s)
    }
}

/// One data row, positionally aligned with [`Dataset::columns`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Row {
    cells: Vec<CellValue>,
}

impl Row {
    /// Create a row from its cells.
    pub const fn new(cells: Vec<CellValue>) -> Self {
        Self { cells }
    }

    /// Cell at `index`; positions past the end read as `Empty`.
    #[inline]
    pub fn get(&self, index: usize) -> &CellValue {
        self.cells.get(index).unwrap_or(&EMPTY_CELL)
    }

    /// The stored cells (may be shorter than the column list).
    #[inline]
    pub fn cells(&self) -> &[CellValue] {
        &self.cells
    }
}

impl From<Vec<CellValue>> for Row {
    fn from(cells: Vec<CellValue>) -> Self {
        Self::new(cells)
    }
}

/// Where a dataset was loaded from.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SourceInfo {
    /// File name or URL.
    pub name: String,
    /// Size of the raw input in bytes, if known.
    pub size_bytes: Option<u64>,
}

/// Ordered column names plus ordered rows.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Dataset {
    columns: Vec<String>,
    rows: Vec<Row>,
    source: Option<SourceInfo>,
}

impl Dataset {
    /// Create a dataset from column names and positional rows.
    pub const fn new(columns: Vec<String>, rows: Vec<Row>) -> Self {
        Self {
            columns,
            rows,
            source: None,
        }
    }

    /// Build a dataset from key/value records.
    ///
    /// The first record fixes the column set and order. Keys missing from a
    /// later record become empty cells; keys the first record lacks are
    /// dropped.
    pub fn from_records<I, R, K>(records: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: IntoIterator<Item = (K, CellValue)>,
        K: Into<String>,
    {
        let mut columns: Option<Vec<String>> = None;
        let mut rows = Vec::new();

        for record in records {
            let pairs: Vec<(String, CellValue)> =
                record.into_iter().map(|(k, v)| (k.into(), v)).collect();

            let cols = columns.get_or_insert_with(|| {
                let mut seen = Vec::with_capacity(pairs.len());
                for (key, _) in &pairs {
                    if !seen.contains(key) {
                        seen.push(key.clone());
                    }
                }
                seen
            });

            let mut cells = vec![CellValue::Empty; cols.len()];
            for (key, value) in pairs {
                if let Some(idx) = cols.iter().position(|c| *c == key) {
                    cells[idx] = value;
                }
            }
            rows.push(Row::new(cells));
        }

        Self::new(columns.unwrap_or_default(), rows)
    }

    /// Attach source information (file name and size).
    pub fn with_source(mut self, name: impl Into<String>, size_bytes: Option<u64>) -> Self {
        self.source = Some(SourceInfo {
            name: name.into(),
            size_bytes,
        });
        self
    }

    /// Column names in first-seen order.
    #[inline]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// All rows in input order.
    #[inline]
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Source information, when loaded from a file or URL.
    #[inline]
    pub fn source(&self) -> Option<&SourceInfo> {
        self.source.as_ref()
    }

    /// Returns the number of rows.
    #[inline]
    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    /// Returns the number of columns.
    #[inline]
    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    /// Returns true if the dataset has no rows.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of the named column.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Values of the named column, one per row, or `None` if the column
    /// does not exist.
    pub fn column_values(&self, name: &str) -> Option<Vec<&CellValue>> {
        self.column_index(name)
            .map(|idx| self.column_values_at(idx).collect())
    }

    /// Values of the column at `index`, one per row.
    pub fn column_values_at(&self, index: usize) -> impl Iterator<Item = &CellValue> + Clone + '_ {
        self.rows.iter().map(move |row| row.get(index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_rows_read_as_empty() {
        let ds = Dataset::new(
            vec!["a".into(), "b".into()],
            vec![Row::new(vec![CellValue::Number(1.0)])],
        );
        assert_eq!(ds.rows()[0].get(1), &CellValue::Empty);
        assert_eq!(ds.rows()[0].get(7), &CellValue::Empty);
    }

    #[test]
    fn test_from_records_uses_first_record_columns() {
        let ds = Dataset::from_records(vec![
            vec![("id", CellValue::from(1.0)), ("name", "a".into())],
            vec![("name", "b".into()), ("extra", true.into())],
        ]);

        assert_eq!(ds.columns(), &["id".to_string(), "name".to_string()]);
        assert_eq!(ds.rows()[1].get(0), &CellValue::Empty);
        assert_eq!(ds.rows()[1].get(1), &CellValue::Text("b".into()));
    }

    #[test]
    fn test_column_values_unknown_column() {
        let ds = Dataset::from_records(vec![vec![("x", CellValue::from(1.0))]]);
        assert!(ds.column_values("missing").is_none());
        assert_eq!(ds.column_values("x").unwrap().len(), 1);
    }

    #[test]
    fn test_empty_text_is_empty() {
        assert!(CellValue::Text(String::new()).is_empty());
        assert!(CellValue::Empty.is_empty());
        assert!(!CellValue::Number(0.0).is_empty());
    }

    #[test]
    fn test_plain_string() {
        assert_eq!(CellValue::Number(3.0).to_plain_string(), "3");
        assert_eq!(CellValue::Number(-0.0).to_plain_string(), "0");
        assert_eq!(CellValue::Number(1.25).to_plain_string(), "1.25");
        assert_eq!(CellValue::Bool(false).to_plain_string(), "false");
    }

    #[test]
    fn test_serialize_cells() {
        let cells = vec![
            CellValue::Empty,
            CellValue::Number(3.0),
            CellValue::Number(-0.0),
            CellValue::Number(2.5),
            CellValue::Number(f64::NAN),
            CellValue::Bool(true),
        ];
        let json = serde_json::to_string(&cells).unwrap();
        assert_eq!(json, "[null,3,0,2.5,null,true]");

        let huge = serde_json::to_value(CellValue::Number(1e300)).unwrap();
        assert!(huge.is_f64());
    }
}
