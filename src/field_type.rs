use std::fmt;

use serde::Serialize;

use crate::dataset::CellValue;

/// Semantic type of a single cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CellType {
    /// Null or empty value.
    Empty,
    /// Numeric value.
    Number,
    /// Boolean value.
    Boolean,
    /// Date/time value.
    Date,
    /// Text value (fallback type).
    #[default]
    String,
}

impl fmt::Display for CellType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl CellType {
    /// Number of variants in the CellType enum.
    pub const COUNT: usize = 5;

    /// Order in which non-empty categories compete for dominance.
    /// String comes first and wins every tie.
    pub const DOMINANCE_ORDER: [CellType; 4] = [
        CellType::String,
        CellType::Number,
        CellType::Boolean,
        CellType::Date,
    ];

    /// Returns the index for this type (0-4), suitable for array indexing.
    #[inline]
    pub const fn as_index(&self) -> usize {
        match self {
            CellType::Empty => 0,
            CellType::Number => 1,
            CellType::Boolean => 2,
            CellType::Date => 3,
            CellType::String => 4,
        }
    }

    /// Lower-case name, as printed in reports.
    pub const fn as_str(&self) -> &'static str {
        match self {
            CellType::Empty => "empty",
            CellType::Number => "number",
            CellType::Boolean => "boolean",
            CellType::Date => "date",
            CellType::String => "string",
        }
    }

    /// Label used by the column overview table.
    pub const fn overview_label(&self) -> &'static str {
        match self {
            CellType::Number => "numeric",
            CellType::String => "text",
            other => other.as_str(),
        }
    }
}

/// Classify a single value.
#[inline]
pub fn classify(value: &CellValue) -> CellType {
    if value.is_empty() {
        return CellType::Empty;
    }
    match value {
        CellValue::Number(_) => CellType::Number,
        CellValue::Bool(_) => CellType::Boolean,
        CellValue::Date(_) => CellType::Date,
        CellValue::Empty | CellValue::Text(_) => CellType::String,
    }
}

/// Per-type cell counts for one column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct TypeCounts {
    counts: [usize; CellType::COUNT],
}

impl TypeCounts {
    /// Count the classification of every value.
    pub fn from_values<'a, I>(values: I) -> Self
    where
        I: IntoIterator<Item = &'a CellValue>,
    {
        let mut counts = Self::default();
        for value in values {
            counts.add(classify(value));
        }
        counts
    }

    /// Record one cell of type `ty`.
    #[inline]
    pub fn add(&mut self, ty: CellType) {
        self.counts[ty.as_index()] += 1;
    }

    /// Number of cells of type `ty`.
    #[inline]
    pub fn get(&self, ty: CellType) -> usize {
        self.counts[ty.as_index()]
    }

    /// Total number of cells counted, including empties.
    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }

    /// Number of non-empty cells counted.
    pub fn non_empty(&self) -> usize {
        self.total() - self.get(CellType::Empty)
    }

    /// Majority vote among non-empty categories.
    ///
    /// String is seeded as the winner with its own count; number, boolean
    /// and date then replace it only with a strictly greater count. A
    /// column with no non-empty cells is a string column.
    pub fn dominant(&self) -> CellType {
        let mut dominant = CellType::String;
        let mut max_count = self.get(CellType::String);

        for ty in &CellType::DOMINANCE_ORDER[1..] {
            let count = self.get(*ty);
            if count > max_count {
                dominant = *ty;
                max_count = count;
            }
        }

        dominant
    }
}

/// Dominant type of a column's values.
pub fn dominant_type<'a, I>(values: I) -> CellType
where
    I: IntoIterator<Item = &'a CellValue>,
{
    TypeCounts::from_values(values).dominant()
}
