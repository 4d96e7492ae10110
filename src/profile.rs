//! Dataset profiling: per-column type, missingness and uniqueness, plus
//! dataset-wide density and completeness.

use std::fmt;

use chrono::NaiveDateTime;
use foldhash::{HashSet, HashSetExt};
use serde::Serialize;

use crate::dataset::{CellValue, Dataset};
use crate::field_type::{CellType, TypeCounts};
use crate::format::percentage;
use crate::histogram::{Bin, BinCapacity, compute_histogram};
use crate::stats::{NumericStats, TextStats, compute_numeric_stats, compute_text_stats};

/// Missing percentage above which a column is flagged in recommendations.
pub const HIGH_MISSING_PERCENT: f64 = 20.0;
/// Unique percentage above which a column is a candidate key.
pub const CANDIDATE_KEY_PERCENT: f64 = 95.0;

/// Qualitative label for a missing-value percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Moderate,
    High,
    Severe,
}

impl Severity {
    /// `> 50` severe, `> 20` high, `> 5` moderate, otherwise low.
    pub fn from_missing_percent(percent: f64) -> Self {
        if percent > 50.0 {
            Severity::Severe
        } else if percent > 20.0 {
            Severity::High
        } else if percent > 5.0 {
            Severity::Moderate
        } else {
            Severity::Low
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Low => write!(f, "low"),
            Severity::Moderate => write!(f, "moderate"),
            Severity::High => write!(f, "high"),
            Severity::Severe => write!(f, "severe"),
        }
    }
}

/// Identity of a non-empty cell for distinct counting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum CellKey<'a> {
    Number(u64),
    Bool(bool),
    Date(NaiveDateTime),
    Text(&'a str),
}

impl<'a> CellKey<'a> {
    fn of(value: &'a CellValue) -> Option<Self> {
        match value {
            _ if value.is_empty() => None,
            CellValue::Number(n) => {
                // -0 and 0 are the same value; all NaNs collapse together
                let canonical = if *n == 0.0 {
                    0.0
                } else if n.is_nan() {
                    f64::NAN
                } else {
                    *n
                };
                Some(CellKey::Number(canonical.to_bits()))
            }
            CellValue::Bool(b) => Some(CellKey::Bool(*b)),
            CellValue::Date(d) => Some(CellKey::Date(*d)),
            CellValue::Text(s) => Some(CellKey::Text(s)),
            CellValue::Empty => None,
        }
    }
}

/// Number of distinct non-empty values.
pub fn count_unique<'a, I>(values: I) -> usize
where
    I: IntoIterator<Item = &'a CellValue>,
{
    let mut seen = HashSet::new();
    for value in values {
        if let Some(key) = CellKey::of(value) {
            seen.insert(key);
        }
    }
    seen.len()
}

/// Profile of a single column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnProfile {
    pub name: String,
    /// Number of rows.
    pub total: usize,
    pub non_empty: usize,
    pub type_counts: TypeCounts,
    pub dominant_type: CellType,
    /// Distinct non-empty values.
    pub unique_count: usize,
    pub missing: usize,
    /// `missing / total * 100`.
    pub missing_percent: f64,
    pub severity: Severity,
    /// `unique_count / non_empty * 100`.
    pub unique_percent: f64,
    pub is_candidate_key: bool,
}

impl ColumnProfile {
    /// Profile one column from its values.
    pub fn from_values<'a, I>(name: &str, values: I) -> Self
    where
        I: IntoIterator<Item = &'a CellValue>,
        I::IntoIter: Clone,
    {
        let values = values.into_iter();
        let type_counts = TypeCounts::from_values(values.clone());
        let unique_count = count_unique(values);

        let total = type_counts.total();
        let non_empty = type_counts.non_empty();
        let missing = total - non_empty;
        let missing_percent = percentage(missing, total);
        let unique_percent = percentage(unique_count, non_empty);

        Self {
            name: name.to_string(),
            total,
            non_empty,
            type_counts,
            dominant_type: type_counts.dominant(),
            unique_count,
            missing,
            missing_percent,
            severity: Severity::from_missing_percent(missing_percent),
            unique_percent,
            is_candidate_key: non_empty > 0 && unique_percent > CANDIDATE_KEY_PERCENT,
        }
    }

    /// `non_empty / total * 100`.
    pub fn non_empty_percent(&self) -> f64 {
        percentage(self.non_empty, self.total)
    }
}

/// Missing-value count for one column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MissingEntry {
    pub column: String,
    pub missing: usize,
    pub percent: f64,
    pub severity: Severity,
}

/// Dataset-wide profile.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetProfile {
    pub num_rows: usize,
    pub num_columns: usize,
    /// `num_rows * num_columns`.
    pub total_cells: usize,
    pub non_empty_cells: usize,
    pub numeric_cells: usize,
    pub text_cells: usize,
    /// Non-empty cells that are neither numbers nor text.
    pub other_cells: usize,
    /// Per-column profiles in column order.
    pub columns: Vec<ColumnProfile>,
    /// Columns ordered by missing count, highest first.
    pub missing: Vec<MissingEntry>,
    pub total_missing: usize,
    /// Share of non-empty cells in percent, in [0, 100].
    pub completeness: f64,
}

impl DatasetProfile {
    /// Rounded share of non-empty cells, 0 without cells.
    pub fn density_percent(&self) -> f64 {
        percentage(self.non_empty_cells, self.total_cells).round()
    }

    /// Rounded share of numeric cells among non-empty cells.
    pub fn numeric_share(&self) -> f64 {
        percentage(self.numeric_cells, self.non_empty_cells).round()
    }

    /// Rounded share of text cells among non-empty cells.
    pub fn text_share(&self) -> f64 {
        percentage(self.text_cells, self.non_empty_cells).round()
    }

    /// Profile of the named column.
    pub fn column(&self, name: &str) -> Option<&ColumnProfile> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Columns missing more than [`HIGH_MISSING_PERCENT`], highest first.
    pub fn high_missing(&self) -> impl Iterator<Item = &MissingEntry> {
        self.missing
            .iter()
            .filter(|m| m.percent > HIGH_MISSING_PERCENT)
    }

    /// Candidate-key columns in column order.
    pub fn candidate_keys(&self) -> impl Iterator<Item = &ColumnProfile> {
        self.columns.iter().filter(|c| c.is_candidate_key)
    }
}

/// Profile every column and aggregate dataset-level counts.
pub fn profile_dataset(dataset: &Dataset) -> DatasetProfile {
    let num_rows = dataset.num_rows();
    let num_columns = dataset.num_columns();

    let columns: Vec<ColumnProfile> = dataset
        .columns()
        .iter()
        .enumerate()
        .map(|(idx, name)| ColumnProfile::from_values(name, dataset.column_values_at(idx)))
        .collect();

    let mut non_empty_cells = 0;
    let mut numeric_cells = 0;
    let mut text_cells = 0;
    for col in &columns {
        non_empty_cells += col.non_empty;
        numeric_cells += col.type_counts.get(CellType::Number);
        text_cells += col.type_counts.get(CellType::String);
    }

    let total_cells = num_rows * num_columns;
    let total_missing = total_cells - non_empty_cells;

    let mut missing: Vec<MissingEntry> = columns
        .iter()
        .map(|c| MissingEntry {
            column: c.name.clone(),
            missing: c.missing,
            percent: c.missing_percent,
            severity: c.severity,
        })
        .collect();
    missing.sort_by(|a, b| b.missing.cmp(&a.missing));

    let completeness = if total_cells == 0 {
        100.0
    } else {
        (total_cells - total_missing) as f64 / total_cells as f64 * 100.0
    };

    tracing::debug!(
        rows = num_rows,
        columns = num_columns,
        total_missing,
        "profiled dataset"
    );

    DatasetProfile {
        num_rows,
        num_columns,
        total_cells,
        non_empty_cells,
        numeric_cells,
        text_cells,
        other_cells: non_empty_cells - numeric_cells - text_cells,
        columns,
        missing,
        total_missing,
        completeness,
    }
}

/// Result of analysing a single column.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ColumnAnalysis {
    /// The dataset has no rows or the column does not exist.
    NoData,
    Analysis {
        profile: ColumnProfile,
        /// Present when the dominant type is number.
        numeric: Option<NumericStats>,
        /// Mini histogram for numeric columns.
        histogram: Vec<Bin>,
        /// Present when the dominant type is string.
        text: Option<TextStats>,
    },
}

/// Profile plus type-specific statistics for one column.
pub fn analyze_column(dataset: &Dataset, column: &str) -> ColumnAnalysis {
    if dataset.is_empty() {
        return ColumnAnalysis::NoData;
    }
    let Some(idx) = dataset.column_index(column) else {
        tracing::debug!(column, "analysis requested for unknown column");
        return ColumnAnalysis::NoData;
    };

    let profile = ColumnProfile::from_values(column, dataset.column_values_at(idx));
    let mut numeric = None;
    let mut histogram = Vec::new();
    let mut text = None;

    match profile.dominant_type {
        CellType::Number => {
            numeric = compute_numeric_stats(dataset.column_values_at(idx));
            if numeric.is_some() {
                histogram = compute_histogram(dataset.column_values_at(idx), BinCapacity::Mini);
            }
        }
        CellType::String => {
            text = compute_text_stats(dataset.column_values_at(idx));
        }
        _ => {}
    }

    ColumnAnalysis::Analysis {
        profile,
        numeric,
        histogram,
        text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn column(values: Vec<CellValue>) -> Dataset {
        Dataset::from_records(values.into_iter().map(|v| vec![("c", v)]))
    }

    #[test]
    fn test_severity_boundaries() {
        assert_eq!(Severity::from_missing_percent(0.0), Severity::Low);
        assert_eq!(Severity::from_missing_percent(5.0), Severity::Low);
        assert_eq!(Severity::from_missing_percent(5.01), Severity::Moderate);
        assert_eq!(Severity::from_missing_percent(20.0), Severity::Moderate);
        assert_eq!(Severity::from_missing_percent(20.5), Severity::High);
        assert_eq!(Severity::from_missing_percent(50.0), Severity::High);
        assert_eq!(Severity::from_missing_percent(50.1), Severity::Severe);
    }

    #[test]
    fn test_candidate_key_detection() {
        let unique = column(vec!["a".into(), "b".into(), "c".into(), "d".into()]);
        let profile = profile_dataset(&unique);
        assert_eq!(profile.columns[0].unique_percent, 100.0);
        assert!(profile.columns[0].is_candidate_key);

        let repeated = column(vec!["a".into(), "a".into(), "b".into(), "c".into()]);
        let profile = profile_dataset(&repeated);
        assert_eq!(profile.columns[0].unique_percent, 75.0);
        assert!(!profile.columns[0].is_candidate_key);
    }

    #[test]
    fn test_empty_column_is_not_a_key() {
        let ds = column(vec![CellValue::Empty, CellValue::Empty]);
        let profile = profile_dataset(&ds);
        assert!(!profile.columns[0].is_candidate_key);
        assert_eq!(profile.columns[0].unique_percent, 0.0);
        assert_eq!(profile.columns[0].severity, Severity::Severe);
    }

    #[test]
    fn test_unique_counting_by_value() {
        let values = vec![
            CellValue::Number(0.0),
            CellValue::Number(-0.0),
            CellValue::from("0"),
            CellValue::Bool(false),
            CellValue::Empty,
        ];
        assert_eq!(count_unique(&values), 3);
    }

    #[test]
    fn test_scenario_column() {
        let ds = column(vec![1.0.into(), 2.0.into(), 3.0.into(), "".into()]);
        let profile = profile_dataset(&ds);
        let col = &profile.columns[0];

        assert_eq!(col.non_empty, 3);
        assert_eq!(col.dominant_type, CellType::Number);
        assert_eq!(col.missing_percent, 25.0);
        assert_eq!(col.severity, Severity::High);
        assert_eq!(profile.completeness, 75.0);
    }

    #[test]
    fn test_dataset_counts() {
        let ds = Dataset::from_records(vec![
            vec![("n", CellValue::from(1.0)), ("s", "x".into()), ("b", true.into())],
            vec![("n", CellValue::Empty), ("s", "y".into()), ("b", CellValue::Empty)],
        ]);
        let profile = profile_dataset(&ds);

        assert_eq!(profile.total_cells, 6);
        assert_eq!(profile.non_empty_cells, 4);
        assert_eq!(profile.numeric_cells, 1);
        assert_eq!(profile.text_cells, 2);
        assert_eq!(profile.other_cells, 1);
        assert_eq!(profile.total_missing, 2);
        assert_eq!(profile.density_percent(), 67.0);
        assert_eq!(profile.numeric_share(), 25.0);
        assert_eq!(profile.text_share(), 50.0);
    }

    #[test]
    fn test_missing_sorted_descending_stable() {
        let ds = Dataset::from_records(vec![
            vec![("a", CellValue::from(1.0)), ("b", CellValue::Empty), ("c", CellValue::Empty)],
            vec![("a", CellValue::from(2.0)), ("b", CellValue::Empty), ("c", CellValue::Empty)],
        ]);
        let profile = profile_dataset(&ds);
        let order: Vec<&str> = profile.missing.iter().map(|m| m.column.as_str()).collect();
        assert_eq!(order, vec!["b", "c", "a"]);
        assert_eq!(profile.high_missing().count(), 2);
    }

    #[test]
    fn test_empty_dataset_profile() {
        let profile = profile_dataset(&Dataset::default());
        assert_eq!(profile.total_cells, 0);
        assert_eq!(profile.completeness, 100.0);
        assert_eq!(profile.density_percent(), 0.0);
        assert!(profile.columns.is_empty());

        let no_rows = Dataset::new(vec!["a".into()], Vec::new());
        let profile = profile_dataset(&no_rows);
        assert_eq!(profile.columns[0].missing_percent, 0.0);
        assert_eq!(profile.completeness, 100.0);
    }

    #[test]
    fn test_analyze_column_numeric() {
        let ds = column(vec![1.0.into(), 2.0.into(), 3.0.into(), "".into()]);
        match analyze_column(&ds, "c") {
            ColumnAnalysis::Analysis {
                profile,
                numeric,
                histogram,
                text,
            } => {
                assert_eq!(profile.unique_count, 3);
                let stats = numeric.unwrap();
                assert_eq!(stats.median, 2.0);
                assert_eq!(histogram.iter().map(|b| b.count).sum::<usize>(), 3);
                assert!(text.is_none());
            }
            ColumnAnalysis::NoData => panic!("expected analysis"),
        }
    }

    #[test]
    fn test_analyze_column_text_and_missing() {
        let ds = column(vec!["x".into(), "y".into(), "x".into()]);
        match analyze_column(&ds, "c") {
            ColumnAnalysis::Analysis { numeric, text, .. } => {
                assert!(numeric.is_none());
                assert_eq!(text.unwrap().frequencies[0].count, 2);
            }
            ColumnAnalysis::NoData => panic!("expected analysis"),
        }

        assert_eq!(analyze_column(&ds, "missing"), ColumnAnalysis::NoData);
        assert_eq!(analyze_column(&Dataset::default(), "c"), ColumnAnalysis::NoData);
    }
}
