//! Delimiter guessing by field-count uniformity over the first records.

use crate::loader::Quote;

use super::reader_for;

/// Delimiters tried when none is forced, in preference order.
pub const CANDIDATE_DELIMITERS: [u8; 6] = [b',', b'\t', b'|', b';', 0x1E, 0x1F];

/// Records inspected per candidate.
const PREVIEW_RECORDS: usize = 10;

/// A candidate must average more than this many fields per record.
const MIN_AVG_FIELDS: f64 = 1.99;

/// Field-count profile of one candidate delimiter.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Uniformity {
    /// Sum of absolute field-count changes between consecutive records.
    delta: usize,
    /// Mean fields per record.
    avg_fields: f64,
}

fn measure(text: &str, delimiter: u8, quote: Quote) -> Option<Uniformity> {
    let mut reader = reader_for(text, delimiter, quote);
    let mut record = csv::StringRecord::new();

    let mut delta = 0;
    let mut total_fields = 0;
    let mut records = 0;
    let mut prev: Option<usize> = None;

    while records < PREVIEW_RECORDS {
        match reader.read_record(&mut record) {
            Ok(true) => {
                let fields = record.len();
                if fields == 1 && record[0].is_empty() {
                    continue;
                }
                if let Some(p) = prev {
                    delta += fields.abs_diff(p);
                }
                prev = Some(fields);
                total_fields += fields;
                records += 1;
            }
            Ok(false) | Err(_) => break,
        }
    }

    (records > 0).then(|| Uniformity {
        delta,
        avg_fields: total_fields as f64 / records as f64,
    })
}

/// Pick the delimiter whose first records have the steadiest field count.
///
/// A later candidate wins when its delta is no worse and it splits
/// records into more fields on average. Falls back to a comma.
pub fn guess_delimiter(text: &str, quote: Quote) -> u8 {
    let mut best: Option<(u8, Uniformity)> = None;

    for &delim in &CANDIDATE_DELIMITERS {
        let Some(u) = measure(text, delim, quote) else {
            continue;
        };
        if u.avg_fields <= MIN_AVG_FIELDS {
            continue;
        }
        let better = match best {
            None => true,
            Some((_, b)) => u.delta <= b.delta && u.avg_fields > b.avg_fields,
        };
        if better {
            best = Some((delim, u));
        }
    }

    let chosen = best.map_or(b',', |(d, _)| d);
    tracing::debug!(delimiter = %(chosen as char).escape_default(), "guessed delimiter");
    chosen
}
