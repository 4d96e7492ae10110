//! csv-lens: explore CSV data with type inference, descriptive
//! statistics, histograms and data-quality profiling.
//!
//! Loading is the only fallible step. Everything downstream works on a
//! borrowed [`Dataset`] and always produces a result, using `Option`,
//! empty vectors or a `NoData` variant when there is nothing to report.
//!
//! # Quick Start
//!
//! ```no_run
//! use csv_lens::{Loader, Report, profile_dataset, to_fixed};
//!
//! let dataset = Loader::new().load_path("data.csv").unwrap();
//! let profile = profile_dataset(&dataset);
//!
//! println!("Rows: {}", profile.num_rows);
//! println!("Completeness: {}%", to_fixed(profile.completeness, 1));
//! for key in profile.candidate_keys() {
//!     println!("Candidate key: {}", key.name);
//! }
//!
//! print!("{}", Report::new(&dataset, &profile).render());
//! ```
//!
//! # Configuring the loader
//!
//! ```no_run
//! use csv_lens::{Loader, Quote};
//!
//! let mut loader = Loader::new();
//! loader
//!     .delimiter(b';')
//!     .quote(Quote::Some(b'\''))
//!     .max_rows(10_000);
//! let dataset = loader.load_path("export.csv").unwrap();
//! ```
//!
//! # Typing rules
//!
//! Each field is typed as it is read: empty fields are missing,
//! `true`/`TRUE`/`false`/`FALSE` are booleans, decimal or exponent
//! numbers within 2^53 are numbers, ISO 8601 date-times with an offset
//! are dates, and everything else is text. A column's dominant type is
//! the most frequent non-empty type, with ties going to text.

mod chart;
mod dataset;
mod encoding;
mod error;
mod explore;
mod export;
mod field_type;
mod format;
mod histogram;
#[cfg(feature = "http")]
mod http;
mod ingest;
mod loader;
mod profile;
mod report;
mod stats;

pub use chart::{
    ChartKind, ChartSeries, MISSING_CHART_COLUMNS, Point, Slice, build_chart, missing_chart,
};
pub use dataset::{CellValue, Dataset, Row, SourceInfo};
pub use encoding::{DecodedText, decode_text, is_utf8};
pub use error::{LensError, Result};
pub use explore::{DEFAULT_PAGE_SIZE, Page, filter_row_refs, filter_rows, paginate, total_pages};
pub use export::{RowRecord, export_csv, export_json, row_records};
pub use field_type::{CellType, TypeCounts, classify, dominant_type};
pub use format::{
    ELLIPSIS, format_cell, format_count, format_datetime, format_file_size, format_number,
    percentage, to_fixed, truncate_label,
};
pub use histogram::{
    Bin, BinCapacity, CATEGORICAL_TOP_VALUES, CATEGORY_LABEL_CHARS, CategoryBar, Distribution,
    categorical_distribution, compute_distribution, compute_histogram, histogram,
};
#[cfg(feature = "http")]
pub use http::HttpError;
pub use ingest::coerce::coerce_field;
pub use ingest::delimiter::{CANDIDATE_DELIMITERS, guess_delimiter};
pub use loader::{Loader, Quote};
pub use profile::{
    CANDIDATE_KEY_PERCENT, ColumnAnalysis, ColumnProfile, DatasetProfile, HIGH_MISSING_PERCENT,
    MissingEntry, Severity, analyze_column, count_unique, profile_dataset,
};
pub use report::{Report, render_report};
pub use stats::{
    FrequencyEntry, INLINE_TOP_VALUES, NumericStats, NumericSummaryRow, REPORT_TOP_VALUES,
    SUMMARY_DISPLAY_CHARS, StatisticsSummary, TextStats, TextSummaryRow, VALUE_DISPLAY_CHARS,
    compute_numeric_stats, compute_text_stats, frequency_table, summarize_statistics,
};
