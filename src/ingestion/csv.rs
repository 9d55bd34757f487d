//! CSV reading.

use std::fs::File;
use std::path::Path;

use crate::error::{AnalyzerError, AnalyzerResult};

use super::{normalize_cell, open_error, RawTable};

/// Read a CSV file into a [`RawTable`].
///
/// Rules:
///
/// - The first record is the header row; header names are trimmed.
/// - Rows may be shorter or longer than the header; they are padded/truncated.
/// - Cells are kept as text; blank cells become `None`.
pub fn read_csv_from_path(path: impl AsRef<Path>) -> AnalyzerResult<RawTable> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| open_error(path, e))?;
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(file);
    read_csv_from_reader(&mut rdr).map_err(|e| match e {
        AnalyzerError::Csv(err) => AnalyzerError::Corrupt {
            path: path.to_path_buf(),
            message: err.to_string(),
        },
        other => other,
    })
}

/// Read CSV data from an existing CSV reader.
pub fn read_csv_from_reader<R: std::io::Read>(
    rdr: &mut csv::Reader<R>,
) -> AnalyzerResult<RawTable> {
    let headers: Vec<String> = rdr.headers()?.iter().map(|h| h.trim().to_string()).collect();

    let mut rows: Vec<Vec<Option<String>>> = Vec::new();
    for result in rdr.records() {
        let record = result?;
        rows.push(record.iter().map(normalize_cell).collect());
    }

    Ok(RawTable::new(headers, rows))
}
