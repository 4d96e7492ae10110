//! Serialize a dataset back to CSV or JSON text.

use serde::Serialize;
use serde::ser::SerializeMap;

use crate::dataset::{CellValue, Dataset, Row, iso_datetime, plain_number};
use crate::error::Result;

/// A row paired with the column names, serialized as an object whose
/// keys follow column order.
#[derive(Debug, Clone, Copy)]
pub struct RowRecord<'a> {
    pub columns: &'a [String],
    pub row: &'a Row,
}

impl Serialize for RowRecord<'_> {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.columns.len()))?;
        for (idx, column) in self.columns.iter().enumerate() {
            map.serialize_entry(column, self.row.get(idx))?;
        }
        map.end()
    }
}

/// Pair every row of `rows` with the dataset's columns.
pub fn row_records<'a, I>(dataset: &'a Dataset, rows: I) -> Vec<RowRecord<'a>>
where
    I: IntoIterator<Item = &'a Row>,
{
    rows.into_iter()
        .map(|row| RowRecord {
            columns: dataset.columns(),
            row,
        })
        .collect()
}

/// CSV field text for a cell.
fn csv_field(value: &CellValue) -> String {
    match value {
        CellValue::Empty => String::new(),
        CellValue::Number(n) => plain_number(*n),
        CellValue::Bool(b) => b.to_string(),
        CellValue::Date(d) => iso_datetime(d),
        CellValue::Text(s) => s.clone(),
    }
}

/// Header row plus one record per row, comma-delimited, quoting as needed.
pub fn export_csv(dataset: &Dataset) -> Result<String> {
    let mut writer = csv::WriterBuilder::new().from_writer(Vec::new());

    writer.write_record(dataset.columns())?;
    for row in dataset.rows() {
        writer.write_record((0..dataset.num_columns()).map(|idx| csv_field(row.get(idx))))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| std::io::Error::other(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| std::io::Error::other(e.to_string()).into())
}

/// Pretty-printed JSON array of row objects (two-space indentation).
pub fn export_json(dataset: &Dataset) -> Result<String> {
    let records = row_records(dataset, dataset.rows());
    Ok(serde_json::to_string_pretty(&records)?)
}
