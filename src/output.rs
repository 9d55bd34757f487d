//! Tab-separated output for the `get` command.

use std::io::Write;

use crate::error::AnalyzerResult;
use crate::types::DataSet;

/// Write a header row and one line per record, tab-delimited, UTF-8.
///
/// Nulls become empty fields. Fields containing tabs, quotes or newlines are quoted.
pub fn write_tsv<W: Write>(dataset: &DataSet, writer: W) -> AnalyzerResult<()> {
    let mut out = csv::WriterBuilder::new()
        .delimiter(b'\t')
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(writer);

    out.write_record(dataset.schema.field_names())?;
    for row in &dataset.rows {
        out.write_record(row.iter().map(|v| v.to_string()))?;
    }
    out.flush()?;
    Ok(())
}
