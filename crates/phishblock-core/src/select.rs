//! Candidate selection for row-structured (CSV) feeds.
//!
//! The first row is always treated as a header and skipped by position. Each
//! later row yields its URL column, provided the row is wide enough and, when a
//! verification column is configured, that column reads `yes`.

use csv::StringRecord;
use serde::{Deserialize, Serialize};

/// Which CSV columns hold the phishing URL and (optionally) the verification flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CsvColumns {
    /// Zero-based index of the URL column.
    pub url_column: usize,
    /// Zero-based index of a column that must equal `yes` (case-insensitive).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verified_column: Option<usize>,
}

impl CsvColumns {
    /// Returns the URL field of `row` if the row qualifies.
    pub fn candidate<'r>(&self, row: &'r StringRecord) -> Option<&'r str> {
        let url = row.get(self.url_column)?;
        if let Some(col) = self.verified_column {
            let verified = row.get(col)?;
            if !verified.eq_ignore_ascii_case("yes") {
                return None;
            }
        }
        Some(url)
    }
}

/// Lazily yields candidate URL strings from `rows`, skipping the header row.
pub fn select<I>(rows: I, columns: CsvColumns) -> impl Iterator<Item = String>
where
    I: IntoIterator<Item = StringRecord>,
{
    rows.into_iter()
        .skip(1)
        .filter_map(move |row| columns.candidate(&row).map(str::to_owned))
}

/// Splits a CSV body into rows. Rows may differ in width.
///
/// A row the reader cannot decode comes back empty rather than being dropped,
/// so header skipping stays positional and the row itself is skipped as too narrow.
pub fn read_rows(body: &str) -> impl Iterator<Item = StringRecord> + '_ {
    csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(body.as_bytes())
        .into_records()
        .map(|row| {
            row.unwrap_or_else(|e| {
                tracing::trace!("undecodable CSV row skipped: {}", e);
                StringRecord::new()
            })
        })
}
