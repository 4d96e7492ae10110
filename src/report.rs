//! Plain-text analysis report.

use std::fmt::Write;

use chrono::{Local, NaiveDateTime};

use crate::dataset::Dataset;
use crate::field_type::CellType;
use crate::format::{format_count, format_datetime, format_number, to_fixed};
use crate::profile::{CANDIDATE_KEY_PERCENT, DatasetProfile, HIGH_MISSING_PERCENT};
use crate::stats::{
    REPORT_TOP_VALUES, VALUE_DISPLAY_CHARS, compute_numeric_stats, compute_text_stats,
};

const RULE: &str = "=============================================================";

const NEXT_STEPS: [&str; 4] = [
    "Data Cleaning: Address missing values through imputation or removal.",
    "Data Transformation: Consider normalizing or standardizing numeric columns.",
    "Feature Engineering: Create new columns based on existing data to enhance analysis.",
    "Exploratory Analysis: Investigate relationships between columns for insights.",
];

/// Report builder.
///
/// # Example
///
/// ```
/// use csv_lens::{CellValue, Dataset, Report, profile_dataset};
///
/// let dataset = Dataset::from_records(vec![vec![("n", CellValue::from(1.0))]]);
/// let profile = profile_dataset(&dataset);
///
/// let text = Report::new(&dataset, &profile).file_name("data.csv").render();
/// assert!(text.contains("File Name: data.csv"));
/// ```
#[derive(Debug, Clone)]
pub struct Report<'a> {
    dataset: &'a Dataset,
    profile: &'a DatasetProfile,
    file_name: Option<String>,
    generated_at: Option<NaiveDateTime>,
}

impl<'a> Report<'a> {
    /// Create a report over a dataset and its profile.
    pub fn new(dataset: &'a Dataset, profile: &'a DatasetProfile) -> Self {
        Self {
            dataset,
            profile,
            file_name: None,
            generated_at: None,
        }
    }

    /// Set the file name shown in the general section.
    ///
    /// Defaults to the dataset's source name, or `(unnamed)`.
    pub fn file_name(&mut self, name: impl Into<String>) -> &mut Self {
        self.file_name = Some(name.into());
        self
    }

    /// Pin the generation timestamp. Defaults to the current local time.
    pub fn generated_at(&mut self, at: NaiveDateTime) -> &mut Self {
        self.generated_at = Some(at);
        self
    }

    /// Render the report.
    ///
    /// Output depends only on the inputs and the generation timestamp.
    pub fn render(&self) -> String {
        let mut out = String::new();
        // writing into a String cannot fail
        let _ = self.write_to(&mut out);
        out
    }

    fn write_to(&self, out: &mut String) -> std::fmt::Result {
        self.write_general(out)?;
        self.write_overall(out)?;
        self.write_columns(out)?;
        self.write_quality(out)?;
        self.write_recommendations(out)?;

        let generated_at = self
            .generated_at
            .unwrap_or_else(|| Local::now().naive_local());
        writeln!(out, "{RULE}")?;
        writeln!(out, "                     END OF REPORT                           ")?;
        writeln!(out, "{RULE}")?;
        writeln!(out)?;
        writeln!(out, "Report generated on: {}", format_datetime(&generated_at))
    }

    fn write_general(&self, out: &mut String) -> std::fmt::Result {
        let file_name = self
            .file_name
            .as_deref()
            .or_else(|| self.dataset.source().map(|s| s.name.as_str()))
            .unwrap_or("(unnamed)");

        writeln!(out, "{RULE}")?;
        writeln!(out, "                   CSV FILE ANALYSIS REPORT                  ")?;
        writeln!(out, "{RULE}")?;
        writeln!(out)?;
        writeln!(out, "GENERAL INFORMATION")?;
        writeln!(out, "-------------------")?;
        writeln!(out, "File Name: {file_name}")?;
        writeln!(out, "Number of Columns: {}", self.profile.num_columns)?;
        writeln!(out, "Number of Rows: {}", self.profile.num_rows)?;
        writeln!(out, "Column Headers: {}", self.dataset.columns().join(", "))?;
        writeln!(out)
    }

    fn write_overall(&self, out: &mut String) -> std::fmt::Result {
        let p = self.profile;
        writeln!(out, "OVERALL STATISTICS")?;
        writeln!(out, "------------------")?;
        writeln!(out, "Total Rows: {}", format_count(p.num_rows))?;
        writeln!(out, "Total Columns: {}", p.num_columns)?;
        writeln!(out, "Total Cells: {}", format_count(p.total_cells))?;
        writeln!(
            out,
            "Data Density: {}% ({} non-empty cells)",
            p.density_percent(),
            format_count(p.non_empty_cells)
        )?;
        writeln!(
            out,
            "Numeric Values: {} ({}% of non-empty cells)",
            format_count(p.numeric_cells),
            p.numeric_share()
        )?;
        writeln!(
            out,
            "Text Values: {} ({}% of non-empty cells)",
            format_count(p.text_cells),
            p.text_share()
        )?;
        writeln!(out)
    }

    fn write_columns(&self, out: &mut String) -> std::fmt::Result {
        writeln!(out, "{RULE}")?;
        writeln!(out, "                   COLUMN-BY-COLUMN ANALYSIS                 ")?;
        writeln!(out, "{RULE}")?;
        writeln!(out)?;

        for (idx, col) in self.profile.columns.iter().enumerate() {
            let underline = "-".repeat(col.name.chars().count() + 10);
            writeln!(out, "COLUMN {}: {}", idx + 1, col.name)?;
            writeln!(out, "{underline}")?;
            writeln!(out, "Data Type: {}", col.dominant_type)?;
            writeln!(out, "Values: {}", col.total)?;
            writeln!(
                out,
                "Non-Empty: {} ({}%)",
                col.non_empty,
                col.non_empty_percent().round()
            )?;
            writeln!(out, "Unique Values: {}", col.unique_count)?;

            let values = || self.dataset.column_values_at(idx);
            match col.dominant_type {
                CellType::Number => {
                    if let Some(s) = compute_numeric_stats(values()) {
                        writeln!(out, "Minimum: {}", format_number(s.min))?;
                        writeln!(out, "Maximum: {}", format_number(s.max))?;
                        writeln!(out, "Range: {}", format_number(s.range()))?;
                        writeln!(out, "Sum: {}", format_number(s.sum))?;
                        writeln!(out, "Mean: {}", format_number(s.mean))?;
                        writeln!(out, "Median: {}", format_number(s.median))?;
                        writeln!(out, "Standard Deviation: {}", to_fixed(s.std_dev, 2))?;
                    }
                }
                CellType::String => {
                    if let Some(s) = compute_text_stats(values()) {
                        let avg = to_fixed(s.avg_length, 2);
                        writeln!(out, "Average Length: {avg} characters")?;
                        writeln!(out, "Most Common Values (top {REPORT_TOP_VALUES}):")?;
                        for entry in s.top(REPORT_TOP_VALUES) {
                            writeln!(
                                out,
                                "  \"{}\": {} occurrences ({}%)",
                                entry.display_value(VALUE_DISPLAY_CHARS),
                                entry.count,
                                to_fixed(entry.share(s.count), 2)
                            )?;
                        }
                    }
                }
                _ => {}
            }

            writeln!(out)?;
        }

        Ok(())
    }

    fn write_quality(&self, out: &mut String) -> std::fmt::Result {
        let p = self.profile;
        writeln!(out, "DATA QUALITY ANALYSIS")?;
        writeln!(out, "---------------------")?;
        writeln!(out, "Overall Data Completeness: {}%", to_fixed(p.completeness, 2))?;
        writeln!(
            out,
            "Total Missing Values: {} out of {} cells",
            format_count(p.total_missing),
            format_count(p.total_cells)
        )?;
        writeln!(out)?;
        writeln!(out, "Missing Values by Column:")?;
        for m in &p.missing {
            writeln!(
                out,
                "  {}: {} ({}%)",
                m.column,
                format_count(m.missing),
                to_fixed(m.percent, 2)
            )?;
        }
        writeln!(out)
    }

    fn write_recommendations(&self, out: &mut String) -> std::fmt::Result {
        writeln!(out, "RECOMMENDATIONS")?;
        writeln!(out, "---------------")?;

        let high: Vec<_> = self.profile.high_missing().collect();
        if high.is_empty() {
            writeln!(
                out,
                "No columns have a high rate of missing values (>{HIGH_MISSING_PERCENT}%)."
            )?;
            writeln!(out)?;
        } else {
            writeln!(
                out,
                "Columns with high missing value rates (>{HIGH_MISSING_PERCENT}%):"
            )?;
            for m in high {
                writeln!(out, "  {}: {}% missing", m.column, to_fixed(m.percent, 2))?;
            }
            writeln!(
                out,
                "  Consider addressing missing values or excluding these columns from analysis."
            )?;
            writeln!(out)?;
        }

        let keys: Vec<_> = self.profile.candidate_keys().collect();
        if !keys.is_empty() {
            writeln!(
                out,
                "Potential ID/Key columns (>{CANDIDATE_KEY_PERCENT}% unique values):"
            )?;
            for col in keys {
                let unique = to_fixed(col.unique_percent, 2);
                writeln!(out, "  {}: {unique}% unique", col.name)?;
            }
            writeln!(out)?;
        }

        writeln!(out, "Potential Next Steps:")?;
        for (i, step) in NEXT_STEPS.iter().enumerate() {
            writeln!(out, "  {}. {step}", i + 1)?;
        }
        writeln!(out)
    }
}

/// Render a report with default settings and the current time.
pub fn render_report(dataset: &Dataset, profile: &DatasetProfile) -> String {
    Report::new(dataset, profile).render()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::CellValue;
    use crate::profile::profile_dataset;
    use chrono::NaiveDate;

    fn fixed_time() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 9)
            .unwrap()
            .and_hms_opt(16, 30, 0)
            .unwrap()
    }

    fn sample() -> Dataset {
        Dataset::from_records(vec![
            vec![
                ("id", CellValue::from(1.0)),
                ("city", "Paris".into()),
                ("note", CellValue::Empty),
            ],
            vec![("id", CellValue::from(2.0)), ("city", "Rome".into()), ("note", CellValue::Empty)],
            vec![("id", CellValue::from(3.0)), ("city", "Paris".into()), ("note", "ok".into())],
            vec![("id", CellValue::from(4.0)), ("city", "Oslo".into()), ("note", CellValue::Empty)],
        ])
        .with_source("cities.csv", Some(128))
    }

    fn render(ds: &Dataset) -> String {
        let profile = profile_dataset(ds);
        Report::new(ds, &profile).generated_at(fixed_time()).render()
    }

    #[test]
    fn test_report_sections_in_order() {
        let text = render(&sample());
        let sections = [
            "CSV FILE ANALYSIS REPORT",
            "GENERAL INFORMATION",
            "OVERALL STATISTICS",
            "COLUMN-BY-COLUMN ANALYSIS",
            "DATA QUALITY ANALYSIS",
            "RECOMMENDATIONS",
            "END OF REPORT",
            "Report generated on: 3/9/2024, 4:30:00 PM",
        ];
        let mut last = 0;
        for section in sections {
            let pos = text[last..]
                .find(section)
                .unwrap_or_else(|| panic!("missing or out of order: {section}"));
            last += pos;
        }
    }

    #[test]
    fn test_report_content() {
        let text = render(&sample());

        assert!(text.contains("File Name: cities.csv\n"));
        assert!(text.contains("Column Headers: id, city, note\n"));
        assert!(text.contains("Data Density: 75% (9 non-empty cells)\n"));
        assert!(text.contains("COLUMN 1: id\n------------\nData Type: number\n"));
        assert!(text.contains("Median: 2.5\n"));
        assert!(text.contains("Standard Deviation: 1.12\n"));
        assert!(
            text.contains("Most Common Values (top 3):\n  \"Paris\": 2 occurrences (50.00%)\n")
        );
        assert!(text.contains("Overall Data Completeness: 75.00%\n"));
        assert!(text.contains("Missing Values by Column:\n  note: 3 (75.00%)\n  id: 0 (0.00%)\n"));
        assert!(
            text.contains("Columns with high missing value rates (>20%):\n  note: 75.00% missing\n")
        );
        assert!(
            text.contains("Potential ID/Key columns (>95% unique values):\n  id: 100.00% unique\n")
        );
    }

    #[test]
    fn test_report_is_deterministic() {
        let ds = sample();
        assert_eq!(render(&ds), render(&ds));
    }

    #[test]
    fn test_file_name_override() {
        let ds = sample();
        let profile = profile_dataset(&ds);
        let text = Report::new(&ds, &profile)
            .file_name("other.csv")
            .generated_at(fixed_time())
            .render();
        assert!(text.contains("File Name: other.csv\n"));
    }

    #[test]
    fn test_empty_dataset_report_has_no_nan() {
        let text = render(&Dataset::default());
        assert!(!text.contains("NaN"));
        assert!(text.contains("File Name: (unnamed)\n"));
        assert!(text.contains("No columns have a high rate of missing values (>20%).\n"));
    }
}
