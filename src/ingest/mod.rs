//! Turning decoded CSV text into a typed [`Dataset`].
//!
//! Tokenizing is done by the `csv` crate; this module adds what the
//! exploration tool expects on top: a header row, blank-line skipping,
//! duplicate-header renaming, delimiter guessing and dynamic typing.

pub mod coerce;
pub mod delimiter;
pub mod regexes;

use std::io::Cursor;

use foldhash::{HashSet, HashSetExt};

use crate::dataset::{CellValue, Dataset, Row};
use crate::error::{LensError, Result};
use crate::loader::Quote;
use coerce::coerce_field;

/// Build a csv reader for `text` with the given dialect.
pub(crate) fn reader_for<'a>(
    text: &'a str,
    delimiter: u8,
    quote: Quote,
) -> csv::Reader<Cursor<&'a [u8]>> {
    let mut builder = csv::ReaderBuilder::new();
    builder
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true);

    match quote {
        Quote::None => {
            builder.quoting(false);
        }
        Quote::Some(q) => {
            builder.quoting(true);
            builder.quote(q);
        }
    }

    builder.from_reader(Cursor::new(text.as_bytes()))
}

/// Returns true for records that came from a blank line.
///
/// `raw` is the source text the record was read from. A lone quoted
/// empty field (`""`) is a real row, not a blank line.
#[inline]
fn is_blank(record: &csv::StringRecord, raw: &[u8]) -> bool {
    let empty = record.len() == 0 || (record.len() == 1 && record[0].is_empty());
    empty && raw.iter().all(|&b| b == b'\r' || b == b'\n')
}

/// Make header names unique by suffixing repeats with `_1`, `_2`, ...
pub(crate) fn dedupe_headers(names: Vec<String>) -> Vec<String> {
    let mut used: HashSet<String> = HashSet::with_capacity(names.len());
    let mut out = Vec::with_capacity(names.len());

    for name in names {
        let mut candidate = name.clone();
        let mut suffix = 1;
        while used.contains(&candidate) {
            candidate = format!("{name}_{suffix}");
            suffix += 1;
        }
        used.insert(candidate.clone());
        out.push(candidate);
    }

    out
}

/// Parse `text` into a dataset. The first non-blank record is the header.
///
/// `max_rows` limits the number of data rows read (0 = unlimited).
pub(crate) fn parse_dataset(
    text: &str,
    delimiter: u8,
    quote: Quote,
    max_rows: usize,
) -> Result<Dataset> {
    let mut reader = reader_for(text, delimiter, quote);
    let mut record = csv::StringRecord::new();
    let limit = if max_rows == 0 { usize::MAX } else { max_rows };

    let mut columns: Option<Vec<String>> = None;
    let mut rows: Vec<Row> = Vec::new();
    let mut ragged = 0usize;

    while rows.len() < limit {
        let start = reader.position().byte() as usize;
        match reader.read_record(&mut record) {
            Ok(true) => {
                let end = reader.position().byte() as usize;
                let raw = text.as_bytes().get(start..end).unwrap_or_default();
                if is_blank(&record, raw) {
                    continue;
                }
                let Some(cols) = columns.as_ref() else {
                    columns = Some(dedupe_headers(record.iter().map(str::to_string).collect()));
                    continue;
                };

                if record.len() != cols.len() {
                    ragged += 1;
                }
                let cells: Vec<CellValue> = record
                    .iter()
                    .take(cols.len())
                    .map(coerce_field)
                    .collect();
                rows.push(Row::new(cells));
            }
            Ok(false) => break,
            Err(e) => {
                tracing::warn!(error = %e, rows = rows.len(), "stopping at CSV parse error");
                break;
            }
        }
    }

    let columns = columns.ok_or(LensError::EmptyData)?;
    if rows.is_empty() {
        return Err(LensError::EmptyData);
    }
    if ragged > 0 {
        tracing::warn!(ragged, "rows with a field count different from the header");
    }
    tracing::debug!(
        rows = rows.len(),
        columns = columns.len(),
        delimiter = %(delimiter as char).escape_default(),
        "parsed dataset"
    );

    Ok(Dataset::new(columns, rows))
}
