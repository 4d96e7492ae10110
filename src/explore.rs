//! Table exploration: substring search and pagination.

use serde::Serialize;

use crate::dataset::{Dataset, Row};
use crate::format::format_cell;

/// Default number of rows per page.
pub const DEFAULT_PAGE_SIZE: usize = 25;

/// Returns true if any of the first `num_columns` cells of `row`, as
/// displayed, contains `needle`. `needle` must already be lower-cased.
fn row_matches(row: &Row, num_columns: usize, needle: &str) -> bool {
    (0..num_columns).any(|idx| {
        let cell = row.get(idx);
        !cell.is_empty() && format_cell(cell).to_lowercase().contains(needle)
    })
}

/// Rows whose formatted cells contain `query`, ignoring case.
///
/// An empty query matches every row. Input order is preserved.
pub fn filter_rows<'a>(dataset: &'a Dataset, query: &str) -> Vec<&'a Row> {
    filter_row_refs(dataset.num_columns(), dataset.rows(), query)
}

/// [`filter_rows`] over an arbitrary row sequence, so results can be
/// filtered again.
pub fn filter_row_refs<'a, I>(num_columns: usize, rows: I, query: &str) -> Vec<&'a Row>
where
    I: IntoIterator<Item = &'a Row>,
{
    if query.is_empty() {
        return rows.into_iter().collect();
    }

    let needle = query.to_lowercase();
    rows.into_iter()
        .filter(|row| row_matches(row, num_columns, &needle))
        .collect()
}

/// One page of a row sequence.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<'a, T> {
    /// The rows on this page.
    pub items: &'a [T],
    /// 1-based page number after clamping.
    pub page_number: usize,
    /// Number of pages, at least 1.
    pub total_pages: usize,
    /// Number of rows across all pages.
    pub total_rows: usize,
    /// Index of the first row on this page within the full sequence.
    pub start: usize,
}

impl<T> Page<'_, T> {
    /// Returns true if a later page exists.
    pub fn has_next(&self) -> bool {
        self.page_number < self.total_pages
    }

    /// Returns true if an earlier page exists.
    pub fn has_prev(&self) -> bool {
        self.page_number > 1
    }
}

/// Number of pages needed for `total` rows, never less than 1.
pub fn total_pages(total: usize, page_size: usize) -> usize {
    total.div_ceil(page_size.max(1)).max(1)
}

/// Slice out page `page_number` (1-based) of `rows`.
///
/// A page size of 0 is treated as 1 and the page number is clamped into
/// `[1, total_pages]`, so the slice is always in bounds.
pub fn paginate<T>(rows: &[T], page_size: usize, page_number: usize) -> Page<'_, T> {
    let page_size = page_size.max(1);
    let total_rows = rows.len();
    let total_pages = total_pages(total_rows, page_size);
    let page_number = page_number.clamp(1, total_pages);

    let start = ((page_number - 1) * page_size).min(total_rows);
    let end = (start + page_size).min(total_rows);

    Page {
        items: &rows[start..end],
        page_number,
        total_pages,
        total_rows,
        start,
    }
}
