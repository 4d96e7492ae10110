//! Equal-width numeric binning and categorical frequency distributions.

use serde::Serialize;

use crate::dataset::{CellValue, Dataset};
use crate::format::{to_fixed, truncate_label};
use crate::stats::{FrequencyEntry, frequency_table};

/// Most categories kept in a categorical distribution.
pub const CATEGORICAL_TOP_VALUES: usize = 20;
/// Longest category label before truncation.
pub const CATEGORY_LABEL_CHARS: usize = 15;

/// Histogram flavour: caps the bin count and fixes label precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BinCapacity {
    /// Standalone distribution view: up to 20 bins, 2-decimal labels.
    #[default]
    Standalone,
    /// Inline per-column mini view: up to 15 bins, 1-decimal labels.
    Mini,
}

impl BinCapacity {
    /// Maximum number of bins.
    pub const fn cap(&self) -> usize {
        match self {
            BinCapacity::Standalone => 20,
            BinCapacity::Mini => 15,
        }
    }

    /// Decimal places used in range labels.
    pub const fn label_precision(&self) -> usize {
        match self {
            BinCapacity::Standalone => 2,
            BinCapacity::Mini => 1,
        }
    }

    /// `max(1, min(cap, ceil(sqrt(n))))`.
    pub fn bin_count(&self, n: usize) -> usize {
        let root = (n as f64).sqrt().ceil() as usize;
        root.min(self.cap()).max(1)
    }
}

/// One histogram bin covering `[lower, upper)`; the last bin also holds
/// the maximum.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bin {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
    /// `"{lower} - {upper}"` at the capacity's precision.
    pub label: String,
}

impl Bin {
    fn new(lower: f64, upper: f64, precision: usize) -> Self {
        Self {
            lower,
            upper,
            count: 0,
            label: format!(
                "{} - {}",
                to_fixed(lower, precision),
                to_fixed(upper, precision)
            ),
        }
    }
}

/// Equal-width histogram over raw numbers.
///
/// Empty input gives no bins. When every value is equal, one bin
/// `[min, max]` holds all of them.
pub fn histogram(values: &[f64], capacity: BinCapacity) -> Vec<Bin> {
    if values.is_empty() {
        return Vec::new();
    }

    let (min, max) = values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });
    let precision = capacity.label_precision();

    if max == min {
        let mut bin = Bin::new(min, max, precision);
        bin.count = values.len();
        return vec![bin];
    }

    let bin_count = capacity.bin_count(values.len());
    let width = (max - min) / bin_count as f64;

    let mut bins: Vec<Bin> = (0..bin_count)
        .map(|i| {
            let lower = min + i as f64 * width;
            Bin::new(lower, lower + width, precision)
        })
        .collect();

    let last = bin_count - 1;
    for &v in values {
        let idx = if v == max {
            last
        } else {
            (((v - min) / width).floor() as usize).min(last)
        };
        bins[idx].count += 1;
    }

    bins
}

/// Histogram over the `Number` cells among `values`.
pub fn compute_histogram<'a, I>(values: I, capacity: BinCapacity) -> Vec<Bin>
where
    I: IntoIterator<Item = &'a CellValue>,
{
    let numbers: Vec<f64> = values.into_iter().filter_map(CellValue::as_number).collect();
    histogram(&numbers, capacity)
}

/// One bar of a categorical distribution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryBar {
    /// Display label, truncated to [`CATEGORY_LABEL_CHARS`].
    pub label: String,
    #[serde(flatten)]
    pub entry: FrequencyEntry,
}

/// Top [`CATEGORICAL_TOP_VALUES`] values by frequency, keyed by their
/// plain string form. Empty cells are skipped.
pub fn categorical_distribution<'a, I>(values: I) -> Vec<CategoryBar>
where
    I: IntoIterator<Item = &'a CellValue>,
{
    frequency_table(
        values
            .into_iter()
            .filter(|v| !v.is_empty())
            .map(CellValue::to_plain_string),
    )
    .into_iter()
    .take(CATEGORICAL_TOP_VALUES)
    .map(|entry| CategoryBar {
        label: truncate_label(&entry.value, CATEGORY_LABEL_CHARS),
        entry,
    })
    .collect()
}

/// Distribution view of one column.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "data", rename_all = "lowercase")]
pub enum Distribution {
    /// Every non-empty value is a number.
    Numeric(Vec<Bin>),
    /// At least one non-empty value is not a number.
    Categorical {
        bars: Vec<CategoryBar>,
        /// Non-empty values in the column, the base for bar shares.
        total: usize,
    },
    /// Unknown column, or no non-empty values.
    NoData,
}

/// Histogram (cap 20) for all-numeric columns, top-20 frequencies
/// otherwise.
pub fn compute_distribution(dataset: &Dataset, column: &str) -> Distribution {
    let Some(values) = dataset.column_values(column) else {
        tracing::debug!(column, "distribution requested for unknown column");
        return Distribution::NoData;
    };

    let non_empty: Vec<&CellValue> = values.into_iter().filter(|v| !v.is_empty()).collect();
    if non_empty.is_empty() {
        return Distribution::NoData;
    }

    if non_empty.iter().all(|v| matches!(v, CellValue::Number(_))) {
        Distribution::Numeric(compute_histogram(non_empty, BinCapacity::Standalone))
    } else {
        Distribution::Categorical {
            total: non_empty.len(),
            bars: categorical_distribution(non_empty),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bin_count() {
        assert_eq!(BinCapacity::Standalone.bin_count(100), 10);
        assert_eq!(BinCapacity::Standalone.bin_count(1000), 20);
        assert_eq!(BinCapacity::Mini.bin_count(1000), 15);
        assert_eq!(BinCapacity::Mini.bin_count(10), 4);
        assert_eq!(BinCapacity::Standalone.bin_count(0), 1);
        assert_eq!(BinCapacity::Standalone.bin_count(1), 1);
    }

    #[test]
    fn test_one_to_hundred() {
        let values: Vec<f64> = (1..=100).map(f64::from).collect();
        let bins = histogram(&values, BinCapacity::Standalone);

        assert_eq!(bins.len(), 10);
        assert_eq!(bins.iter().map(|b| b.count).sum::<usize>(), 100);
        assert!(bins.last().unwrap().count > 0);
        assert_eq!(bins[0].label, "1.00 - 10.90");
        assert!((bins[9].upper - 100.0).abs() < 1e-9);

        // every value lies within its bin's bounds
        for &v in &values {
            let last = bins.len() - 1;
            let hits = bins
                .iter()
                .enumerate()
                .filter(|(i, b)| v >= b.lower && (v < b.upper || (*i == last && v <= b.upper)))
                .count();
            assert!(hits >= 1, "value {v} not covered");
        }
    }

    #[test]
    fn test_max_goes_to_last_bin() {
        let bins = histogram(&[0.0, 1.0, 2.0, 3.0], BinCapacity::Standalone);
        assert_eq!(bins.len(), 2);
        assert_eq!(bins[0].count, 2);
        assert_eq!(bins[1].count, 2);
    }

    #[test]
    fn test_degenerate_single_value() {
        let bins = histogram(&[5.0, 5.0, 5.0], BinCapacity::Mini);
        assert_eq!(bins.len(), 1);
        assert_eq!(bins[0].count, 3);
        assert_eq!(bins[0].label, "5.0 - 5.0");
    }

    #[test]
    fn test_labels_round_halfway_up() {
        let bins = histogram(&[0.125, 0.125], BinCapacity::Standalone);
        assert_eq!(bins[0].label, "0.13 - 0.13");
        assert_eq!(Bin::new(3.125, 6.25, 1).label, "3.1 - 6.3");
    }

    #[test]
    fn test_empty_histogram() {
        assert!(histogram(&[], BinCapacity::Standalone).is_empty());
    }

    #[test]
    fn test_histogram_is_deterministic() {
        let values: Vec<f64> = (0..57).map(|i| (i as f64 * 0.37).sin() * 10.0).collect();
        let a = histogram(&values, BinCapacity::Standalone);
        let b = histogram(&values, BinCapacity::Standalone);
        assert_eq!(a, b);
    }

    #[test]
    fn test_categorical_top_twenty() {
        let values: Vec<CellValue> = (0..30)
            .flat_map(|i| std::iter::repeat_n(CellValue::from(format!("v{i}")), 30 - i))
            .collect();
        let bars = categorical_distribution(&values);

        assert_eq!(bars.len(), CATEGORICAL_TOP_VALUES);
        assert_eq!(bars[0].entry.value, "v0");
        assert_eq!(bars[0].entry.count, 30);
    }

    #[test]
    fn test_categorical_label_truncation() {
        let values = vec![CellValue::from("a very long category name")];
        let bars = categorical_distribution(&values);
        assert_eq!(bars[0].label, "a very long cat...");
        assert_eq!(bars[0].entry.value, "a very long category name");
    }

    #[test]
    fn test_compute_distribution_kinds() {
        let ds = Dataset::from_records(vec![
            vec![
                ("n", CellValue::from(1.0)),
                ("mixed", CellValue::from(1.0)),
                ("e", CellValue::Empty),
            ],
            vec![("n", CellValue::from(2.0)), ("mixed", "x".into()), ("e", CellValue::Empty)],
            vec![("n", CellValue::Empty), ("mixed", "x".into()), ("e", CellValue::Empty)],
        ]);

        assert!(matches!(compute_distribution(&ds, "n"), Distribution::Numeric(b) if b.len() == 2));
        match compute_distribution(&ds, "mixed") {
            Distribution::Categorical { bars, total } => {
                assert_eq!(total, 3);
                assert_eq!(bars[0].entry.value, "x");
                assert_eq!(bars[1].entry.value, "1");
            }
            other => panic!("expected categorical, got {other:?}"),
        }
        assert_eq!(compute_distribution(&ds, "e"), Distribution::NoData);
        assert_eq!(compute_distribution(&ds, "nope"), Distribution::NoData);
    }
}
