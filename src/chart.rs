//! Chart-ready series. Rendering is left to whatever charting adapter
//! consumes these records.

use std::str::FromStr;

use foldhash::{HashMap, HashMapExt};
use serde::Serialize;

use crate::dataset::{CellValue, Dataset};
use crate::profile::{DatasetProfile, MissingEntry};

/// Columns shown in the missing-values chart.
pub const MISSING_CHART_COLUMNS: usize = 10;

/// Chart type for a two-column visualization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    #[default]
    Bar,
    Line,
    Scatter,
    Pie,
}

impl FromStr for ChartKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "bar" => Ok(ChartKind::Bar),
            "line" => Ok(ChartKind::Line),
            "scatter" => Ok(ChartKind::Scatter),
            "pie" => Ok(ChartKind::Pie),
            other => Err(format!("unknown chart type: {other}")),
        }
    }
}

/// One x/y pair.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Point {
    pub x: CellValue,
    pub y: CellValue,
}

/// One pie slice: summed y for a distinct x.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Slice {
    pub label: String,
    pub value: f64,
}

impl Slice {
    /// Rounded share of `total` in percent.
    pub fn share(&self, total: f64) -> f64 {
        if total == 0.0 {
            0.0
        } else {
            (self.value / total * 100.0).round()
        }
    }
}

/// Data behind a two-column chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSeries {
    pub kind: ChartKind,
    pub x_column: String,
    pub y_column: String,
    pub title: String,
    /// Points for bar, line and scatter charts.
    pub points: Vec<Point>,
    /// Slices for pie charts.
    pub slices: Vec<Slice>,
}

/// Build the series for a chart of `y` against `x`.
///
/// Rows where either cell is empty are skipped. Pie charts sum the
/// numeric `y` values per distinct `x` label, in first-seen order. An
/// unknown column yields an empty series.
pub fn build_chart(dataset: &Dataset, x: &str, y: &str, kind: ChartKind) -> ChartSeries {
    let title = match kind {
        ChartKind::Scatter => format!("{y} vs {x} Scatter Plot"),
        ChartKind::Pie => format!("{y} Distribution by {x}"),
        ChartKind::Bar | ChartKind::Line => format!("{y} by {x}"),
    };

    let mut series = ChartSeries {
        kind,
        x_column: x.to_string(),
        y_column: y.to_string(),
        title,
        points: Vec::new(),
        slices: Vec::new(),
    };

    let (Some(xi), Some(yi)) = (dataset.column_index(x), dataset.column_index(y)) else {
        tracing::debug!(x, y, "chart requested for unknown column");
        return series;
    };

    let pairs = dataset
        .rows()
        .iter()
        .map(|row| (row.get(xi), row.get(yi)))
        .filter(|(xv, yv)| !xv.is_empty() && !yv.is_empty());

    if kind == ChartKind::Pie {
        let mut index: HashMap<String, usize> = HashMap::new();
        for (xv, yv) in pairs {
            let Some(amount) = yv.as_number() else {
                continue;
            };
            let label = xv.to_plain_string();
            match index.get(&label) {
                Some(&idx) => series.slices[idx].value += amount,
                None => {
                    index.insert(label.clone(), series.slices.len());
                    series.slices.push(Slice {
                        label,
                        value: amount,
                    });
                }
            }
        }
    } else {
        series.points = pairs
            .map(|(xv, yv)| Point {
                x: xv.clone(),
                y: yv.clone(),
            })
            .collect();
    }

    series
}

/// The columns with the most missing values, for a bar chart.
pub fn missing_chart(profile: &DatasetProfile) -> &[MissingEntry] {
    &profile.missing[..profile.missing.len().min(MISSING_CHART_COLUMNS)]
}
