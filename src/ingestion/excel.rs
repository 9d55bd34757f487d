#![cfg(feature = "excel")]

use std::path::Path;

use calamine::{open_workbook_auto, Data, Range, Reader};

use crate::error::{AnalyzerError, AnalyzerResult};

use super::{normalize_cell, RawTable};

/// Read one sheet of a workbook (`.xlsx`, `.xls`, `.ods`, etc.) into a [`RawTable`].
///
/// Behavior:
/// - Picks `sheet_name` if provided; otherwise uses the first sheet in the workbook
/// - Detects the first non-empty row as the header row
/// - Renders every cell below it as text (see [`cell_to_string`])
pub fn read_excel_from_path(
    path: impl AsRef<Path>,
    sheet_name: Option<&str>,
) -> AnalyzerResult<RawTable> {
    let path = path.as_ref();
    match sheet_name {
        Some(name) => read_excel_workbook_from_path(path, Some(&[name][..])),
        None => {
            let mut workbook = open_workbook_auto(path).map_err(|e| corrupt(path, e))?;
            let first = workbook
                .sheet_names()
                .first()
                .cloned()
                .ok_or_else(|| AnalyzerError::EmptyInput {
                    message: format!("workbook {} has no sheets", path.display()),
                })?;
            let range = workbook
                .worksheet_range(&first)
                .map_err(|e| corrupt(path, e))?;
            read_sheet_range(&first, &range)
        }
    }
}

/// Read several sheets of a workbook and concatenate their rows into one [`RawTable`].
///
/// - If `sheet_names` is `None`, reads **all sheets** in workbook order.
/// - If `sheet_names` is `Some(&[...])`, reads only those sheets (in the provided order).
///
/// The first sheet's header defines the columns. Later sheets are aligned to it by header
/// name; their extra columns are dropped and missing ones are filled with `None`.
pub fn read_excel_workbook_from_path(
    path: impl AsRef<Path>,
    sheet_names: Option<&[&str]>,
) -> AnalyzerResult<RawTable> {
    let path = path.as_ref();
    let mut workbook = open_workbook_auto(path).map_err(|e| corrupt(path, e))?;

    let available = workbook.sheet_names();
    let sheets: Vec<String> = match sheet_names {
        Some(names) => {
            if let Some(missing) = names.iter().find(|n| !available.iter().any(|a| a == *n)) {
                return Err(AnalyzerError::SheetNotFound {
                    sheet: missing.to_string(),
                    available: available.join(", "),
                });
            }
            names.iter().map(|s| s.to_string()).collect()
        }
        None => available,
    };
    if sheets.is_empty() {
        return Err(AnalyzerError::EmptyInput {
            message: format!("workbook {} has no sheets", path.display()),
        });
    }

    let mut combined: Option<RawTable> = None;
    for sheet in sheets {
        let range = workbook
            .worksheet_range(&sheet)
            .map_err(|e| corrupt(path, e))?;
        let table = read_sheet_range(&sheet, &range)?;
        combined = Some(match combined {
            None => table,
            Some(mut acc) => {
                append_aligned(&mut acc, table);
                acc
            }
        });
    }

    Ok(combined.unwrap_or_default())
}

fn corrupt(path: &Path, err: calamine::Error) -> AnalyzerError {
    match err {
        calamine::Error::Io(io) => super::open_error(path, io),
        other => AnalyzerError::Corrupt {
            path: path.to_path_buf(),
            message: other.to_string(),
        },
    }
}

fn append_aligned(acc: &mut RawTable, next: RawTable) {
    let mapping: Vec<Option<usize>> = acc
        .headers
        .iter()
        .map(|h| next.column_index(h))
        .collect();
    for row in next.rows {
        acc.rows.push(
            mapping
                .iter()
                .map(|idx| idx.and_then(|i| row.get(i).cloned().flatten()))
                .collect(),
        );
    }
}

fn read_sheet_range(sheet: &str, range: &Range<Data>) -> AnalyzerResult<RawTable> {
    let header_row_idx = range
        .rows()
        .position(|row| row.iter().any(|c| !matches!(c, Data::Empty)))
        .ok_or_else(|| AnalyzerError::EmptyInput {
            message: format!("sheet '{sheet}' has no non-empty rows (no header row found)"),
        })?;

    let mut headers: Vec<String> = Vec::new();
    let mut rows: Vec<Vec<Option<String>>> = Vec::new();
    for (idx0, row) in range.rows().enumerate() {
        if idx0 < header_row_idx {
            continue;
        }
        if idx0 == header_row_idx {
            headers = row.iter().map(|c| cell_to_string(c).trim().to_string()).collect();
            continue;
        }
        // Fully blank rows carry no entry.
        if row.iter().all(|c| matches!(c, Data::Empty)) {
            continue;
        }
        rows.push(
            row.iter()
                .map(|c| match c {
                    Data::Empty | Data::Error(_) => None,
                    other => normalize_cell(&cell_to_string(other)),
                })
                .collect(),
        );
    }

    Ok(RawTable::new(headers, rows))
}

/// Render a workbook cell as the text a spreadsheet user would see.
///
/// Integral floats lose their `.0` so numeric account codes stay `1002`. Date cells render as
/// `YYYY-MM-DD`, or `YYYY-MM-DD HH:MM:SS` when they carry a time of day.
pub fn cell_to_string(c: &Data) -> String {
    match c {
        Data::String(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => {
            if f.fract() == 0.0 && f.abs() < 1e15 {
                (*f as i64).to_string()
            } else {
                f.to_string()
            }
        }
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(ndt) if ndt.time() == chrono::NaiveTime::MIN => {
                ndt.format("%Y-%m-%d").to_string()
            }
            Some(ndt) => ndt.format("%Y-%m-%d %H:%M:%S").to_string(),
            None => dt.to_string(),
        },
        Data::DateTimeIso(s) => s.clone(),
        Data::DurationIso(s) => s.clone(),
        Data::Error(e) => format!("{e:?}"),
        Data::Empty => String::new(),
    }
}
