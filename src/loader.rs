//! Loader builder: read CSV input into a typed [`Dataset`].

use std::fmt;
use std::fs;
use std::io::Read;
use std::path::Path;

use crate::dataset::Dataset;
use crate::encoding::decode_text;
use crate::error::{LensError, Result};
use crate::ingest::delimiter::guess_delimiter;
use crate::ingest::parse_dataset;

/// Quote character configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Quote {
    /// No quoting.
    None,
    /// Quote with the specified character.
    Some(u8),
}

impl Default for Quote {
    fn default() -> Self {
        Quote::Some(b'"')
    }
}

impl fmt::Display for Quote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Quote::None => write!(f, "none"),
            Quote::Some(c) => write!(f, "{}", *c as char),
        }
    }
}

/// Loads delimited text into a [`Dataset`].
///
/// The first record is the header. Every other field is typed on the way
/// in: empty fields become empty cells, `true`/`false` become booleans,
/// numeric fields become numbers and ISO date-times become dates.
///
/// # Example
///
/// ```
/// use csv_lens::Loader;
///
/// let dataset = Loader::new().load_bytes(b"name,age\nAlice,30\nBob,25\n").unwrap();
/// assert_eq!(dataset.num_rows(), 2);
/// assert_eq!(dataset.columns(), &["name", "age"]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Loader {
    /// Forced delimiter; guessed when `None`.
    delimiter: Option<u8>,
    /// Quote character.
    quote: Quote,
    /// Maximum data rows to read (0 = all).
    max_rows: usize,
}

impl Loader {
    /// Create a loader that guesses the delimiter and reads every row.
    pub fn new() -> Self {
        Self::default()
    }

    /// Force a specific delimiter (skip delimiter guessing).
    pub fn delimiter(&mut self, delimiter: u8) -> &mut Self {
        self.delimiter = Some(delimiter);
        self
    }

    /// Set the quote character.
    pub fn quote(&mut self, quote: Quote) -> &mut Self {
        self.quote = quote;
        self
    }

    /// Read at most `max_rows` data rows (0 = all).
    pub fn max_rows(&mut self, max_rows: usize) -> &mut Self {
        self.max_rows = max_rows;
        self
    }

    /// Load a CSV file. The dataset's source records the file name and size.
    pub fn load_path<P: AsRef<Path>>(&self, path: P) -> Result<Dataset> {
        let path = path.as_ref();
        let data = fs::read(path)?;
        let name = path
            .file_name()
            .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned());

        tracing::info!(file = %path.display(), bytes = data.len(), "loading CSV file");
        Ok(self.load_bytes(&data)?.with_source(name, Some(data.len() as u64)))
    }

    /// Load CSV data from a reader.
    pub fn load_reader<R: Read>(&self, mut reader: R) -> Result<Dataset> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        self.load_bytes(&data)
    }

    /// Load CSV data from a remote URL.
    #[cfg(feature = "http")]
    pub fn load_url(&self, url: &str) -> Result<Dataset> {
        let data = crate::http::fetch_csv(url)?;
        tracing::info!(url, bytes = data.len(), "fetched remote CSV");
        let size = data.len() as u64;
        Ok(self.load_bytes(&data)?.with_source(url, Some(size)))
    }

    /// Load CSV data from bytes.
    pub fn load_bytes(&self, data: &[u8]) -> Result<Dataset> {
        if data.is_empty() {
            return Err(LensError::EmptyData);
        }

        let decoded = decode_text(data);
        tracing::debug!(
            encoding = decoded.encoding,
            bom = decoded.had_bom,
            transcoded = decoded.transcoded,
            "decoded input"
        );

        let delimiter = match self.delimiter {
            Some(d) => d,
            None => guess_delimiter(&decoded.text, self.quote),
        };

        parse_dataset(&decoded.text, delimiter, self.quote, self.max_rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::CellValue;

    #[test]
    fn test_loader_builder() {
        let mut loader = Loader::new();
        loader.delimiter(b';').quote(Quote::None).max_rows(5);

        assert_eq!(loader.delimiter, Some(b';'));
        assert_eq!(loader.quote, Quote::None);
        assert_eq!(loader.max_rows, 5);
    }

    #[test]
    fn test_load_bytes_guesses_delimiter() {
        let ds = Loader::new()
            .load_bytes(b"name\tscore\nAlice\t9.5\nBob\t7\n")
            .unwrap();
        assert_eq!(ds.columns(), &["name", "score"]);
        assert_eq!(ds.rows()[0].get(1), &CellValue::Number(9.5));
    }

    #[test]
    fn test_forced_delimiter() {
        let mut loader = Loader::new();
        loader.delimiter(b';');
        let ds = loader.load_bytes(b"a;b\n1;2\n").unwrap();
        assert_eq!(ds.num_columns(), 2);
    }

    #[test]
    fn test_utf8_bom_is_stripped() {
        let mut data = vec![0xEF, 0xBB, 0xBF];
        data.extend_from_slice(b"id,name\n1,x\n");
        let ds = Loader::new().load_bytes(&data).unwrap();
        assert_eq!(ds.columns()[0], "id");
    }

    #[test]
    fn test_empty_input() {
        assert!(matches!(Loader::new().load_bytes(b""), Err(LensError::EmptyData)));
    }

    #[test]
    fn test_quote_display() {
        assert_eq!(Quote::default().to_string(), "\"");
        assert_eq!(Quote::None.to_string(), "none");
    }
}
