//! Descriptive statistics for numeric and text columns.

use foldhash::{HashMap, HashMapExt};
use serde::Serialize;

use crate::dataset::{CellValue, Dataset};
use crate::field_type::{CellType, classify, dominant_type};
use crate::format::truncate_label;

/// Most common values shown in the column analysis panel.
pub const INLINE_TOP_VALUES: usize = 5;
/// Most common values listed per column in the text report.
pub const REPORT_TOP_VALUES: usize = 3;
/// Longest value shown before truncation in top-value lists.
pub const VALUE_DISPLAY_CHARS: usize = 30;
/// Longest most-common value shown in the statistics summary table.
pub const SUMMARY_DISPLAY_CHARS: usize = 20;

/// Summary statistics of a numeric column.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NumericStats {
    /// Number of numeric values.
    pub count: usize,
    pub min: f64,
    pub max: f64,
    pub sum: f64,
    pub mean: f64,
    pub median: f64,
    /// Population standard deviation (divided by N).
    pub std_dev: f64,
}

impl NumericStats {
    /// Compute statistics over raw numbers. Returns `None` for an empty
    /// slice.
    pub fn from_slice(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }

        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        let mut sum = 0.0;
        for &v in values {
            min = min.min(v);
            max = max.max(v);
            sum += v;
        }

        let count = values.len();
        let mean = sum / count as f64;

        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);
        let mid = count / 2;
        let median = if count % 2 == 0 {
            (sorted[mid - 1] + sorted[mid]) / 2.0
        } else {
            sorted[mid]
        };

        let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / count as f64;

        Some(Self {
            count,
            min,
            max,
            sum,
            mean,
            median,
            std_dev: variance.sqrt(),
        })
    }

    /// `max - min`.
    #[inline]
    pub fn range(&self) -> f64 {
        self.max - self.min
    }
}

/// Numeric statistics over the `Number` cells among `values`.
///
/// Non-numeric cells are ignored; `None` when no numeric cell remains.
pub fn compute_numeric_stats<'a, I>(values: I) -> Option<NumericStats>
where
    I: IntoIterator<Item = &'a CellValue>,
{
    let numbers: Vec<f64> = values.into_iter().filter_map(CellValue::as_number).collect();
    NumericStats::from_slice(&numbers)
}

/// One distinct value and how often it occurs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FrequencyEntry {
    pub value: String,
    pub count: usize,
}

impl FrequencyEntry {
    /// The value cut to `max_chars` characters for display.
    pub fn display_value(&self, max_chars: usize) -> String {
        truncate_label(&self.value, max_chars)
    }

    /// Share of `total` in percent, 0 when `total` is 0.
    pub fn share(&self, total: usize) -> f64 {
        crate::format::percentage(self.count, total)
    }
}

/// Exact-match frequency table ranked by count, descending.
///
/// Values with equal counts keep the order in which they were first seen.
pub fn frequency_table<I, S>(values: I) -> Vec<FrequencyEntry>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut entries: Vec<FrequencyEntry> = Vec::new();

    for value in values {
        let value = value.as_ref();
        if let Some(&idx) = index.get(value) {
            entries[idx].count += 1;
        } else {
            index.insert(value.to_string(), entries.len());
            entries.push(FrequencyEntry {
                value: value.to_string(),
                count: 1,
            });
        }
    }

    // stable sort keeps first-seen order for ties
    entries.sort_by(|a, b| b.count.cmp(&a.count));
    entries
}

/// Summary statistics of a text column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextStats {
    /// Number of text values.
    pub count: usize,
    /// Number of distinct text values.
    pub unique_count: usize,
    /// Mean length in characters.
    pub avg_length: f64,
    /// Every distinct value, most frequent first.
    pub frequencies: Vec<FrequencyEntry>,
}

impl TextStats {
    /// Compute statistics over raw strings. Returns `None` for no input.
    pub fn from_strs<'a, I>(values: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let values: Vec<&str> = values.into_iter().collect();
        if values.is_empty() {
            return None;
        }

        let length_sum: usize = values.iter().map(|s| s.chars().count()).sum();
        let frequencies = frequency_table(values.iter());

        Some(Self {
            count: values.len(),
            unique_count: frequencies.len(),
            avg_length: length_sum as f64 / values.len() as f64,
            frequencies,
        })
    }

    /// The `n` most frequent values.
    pub fn top(&self, n: usize) -> &[FrequencyEntry] {
        &self.frequencies[..n.min(self.frequencies.len())]
    }

    /// The single most frequent value.
    pub fn most_common(&self) -> Option<&FrequencyEntry> {
        self.frequencies.first()
    }
}

/// Text statistics over the non-empty `Text` cells among `values`.
pub fn compute_text_stats<'a, I>(values: I) -> Option<TextStats>
where
    I: IntoIterator<Item = &'a CellValue>,
{
    TextStats::from_strs(
        values
            .into_iter()
            .filter(|v| classify(v) == CellType::String)
            .filter_map(CellValue::as_text),
    )
}

/// Statistics row for one numeric column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NumericSummaryRow {
    pub column: String,
    pub stats: NumericStats,
}

/// Statistics row for one text column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextSummaryRow {
    pub column: String,
    pub stats: TextStats,
}

impl TextSummaryRow {
    /// `value (count)` for the most common value, or `N/A (0)`.
    pub fn most_common_label(&self) -> String {
        match self.stats.most_common() {
            Some(entry) => format!(
                "{} ({})",
                entry.display_value(SUMMARY_DISPLAY_CHARS),
                entry.count
            ),
            None => "N/A (0)".to_string(),
        }
    }
}

/// Dataset-wide statistics: one row per numeric and per text column.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct StatisticsSummary {
    pub numeric: Vec<NumericSummaryRow>,
    pub text: Vec<TextSummaryRow>,
}

/// Statistics for every column whose dominant type is number or string.
///
/// Columns of other dominant types, and columns whose typed subset is
/// empty, are left out.
pub fn summarize_statistics(dataset: &Dataset) -> StatisticsSummary {
    let mut summary = StatisticsSummary::default();

    for (idx, column) in dataset.columns().iter().enumerate() {
        match dominant_type(dataset.column_values_at(idx)) {
            CellType::Number => {
                if let Some(stats) = compute_numeric_stats(dataset.column_values_at(idx)) {
                    summary.numeric.push(NumericSummaryRow {
                        column: column.clone(),
                        stats,
                    });
                }
            }
            CellType::String => {
                if let Some(stats) = compute_text_stats(dataset.column_values_at(idx)) {
                    summary.text.push(TextSummaryRow {
                        column: column.clone(),
                        stats,
                    });
                }
            }
            _ => {}
        }
    }

    tracing::debug!(
        numeric = summary.numeric.len(),
        text = summary.text.len(),
        "summarized column statistics"
    );

    summary
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbers(values: &[f64]) -> Vec<CellValue> {
        values.iter().map(|&v| CellValue::Number(v)).collect()
    }

    #[test]
    fn test_median_even_and_odd() {
        let even = compute_numeric_stats(&numbers(&[4.0, 1.0, 3.0, 2.0])).unwrap();
        assert_eq!(even.median, 2.5);

        let odd = compute_numeric_stats(&numbers(&[3.0, 1.0, 2.0])).unwrap();
        assert_eq!(odd.median, 2.0);
    }

    #[test]
    fn test_median_sorts_numerically() {
        // lexicographic order would put 10 before 9
        let stats = compute_numeric_stats(&numbers(&[10.0, 9.0, 100.0])).unwrap();
        assert_eq!(stats.median, 10.0);
    }

    #[test]
    fn test_std_dev_is_population() {
        let flat = compute_numeric_stats(&numbers(&[2.0, 2.0, 2.0, 2.0])).unwrap();
        assert_eq!(flat.std_dev, 0.0);

        let values = numbers(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]);
        let stats = compute_numeric_stats(&values).unwrap();
        assert!((stats.std_dev - 2.0).abs() < 1e-12);
        assert_eq!(stats.mean, 5.0);
        assert_eq!(stats.sum, 40.0);
        assert_eq!(stats.range(), 7.0);
    }

    #[test]
    fn test_numeric_ignores_other_cells() {
        let values = vec![
            CellValue::Number(1.0),
            CellValue::from("x"),
            CellValue::Empty,
            CellValue::Number(3.0),
        ];
        let stats = compute_numeric_stats(&values).unwrap();
        assert_eq!(stats.count, 2);
        assert_eq!(stats.min, 1.0);
        assert_eq!(stats.max, 3.0);
    }

    #[test]
    fn test_numeric_none_without_numbers() {
        let values = vec![CellValue::from("a"), CellValue::Empty];
        assert!(compute_numeric_stats(&values).is_none());
        assert!(NumericStats::from_slice(&[]).is_none());
    }

    #[test]
    fn test_frequency_table_ties_keep_first_seen() {
        let table = frequency_table(["b", "a", "c", "a", "b", "d"]);
        let order: Vec<&str> = table.iter().map(|e| e.value.as_str()).collect();
        assert_eq!(order, vec!["b", "a", "c", "d"]);
        assert_eq!(table[0].count, 2);
    }

    #[test]
    fn test_frequency_table_is_exact_match() {
        let table = frequency_table(["Apple", "apple", " apple"]);
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn test_text_stats() {
        let values = vec![
            CellValue::from("red"),
            CellValue::from("green"),
            CellValue::from("red"),
            CellValue::Number(1.0),
            CellValue::Empty,
        ];
        let stats = compute_text_stats(&values).unwrap();
        assert_eq!(stats.count, 3);
        assert_eq!(stats.unique_count, 2);
        assert!((stats.avg_length - 11.0 / 3.0).abs() < 1e-12);
        assert_eq!(stats.most_common().unwrap().value, "red");
        assert_eq!(stats.top(5).len(), 2);
    }

    #[test]
    fn test_text_stats_none_without_text() {
        assert!(compute_text_stats(&numbers(&[1.0])).is_none());
    }

    #[test]
    fn test_display_value_truncates() {
        let entry = FrequencyEntry {
            value: "x".repeat(35),
            count: 1,
        };
        let shown = entry.display_value(VALUE_DISPLAY_CHARS);
        assert_eq!(shown, format!("{}...", "x".repeat(30)));
    }

    #[test]
    fn test_summarize_statistics() {
        let ds = Dataset::from_records(vec![
            vec![("n", CellValue::from(1.0)), ("s", "a".into()), ("b", true.into())],
            vec![("n", CellValue::from(3.0)), ("s", "a".into()), ("b", false.into())],
        ]);
        let summary = summarize_statistics(&ds);

        assert_eq!(summary.numeric.len(), 1);
        assert_eq!(summary.numeric[0].column, "n");
        assert_eq!(summary.numeric[0].stats.mean, 2.0);
        assert_eq!(summary.text.len(), 1);
        assert_eq!(summary.text[0].most_common_label(), "a (2)");
    }
}
