//! Unified read entrypoint.
//!
//! Most callers should use [`read_table`], which reads a file into a [`RawTable`].
//!
//! - If [`ReadOptions::format`] is `None`, the format is inferred from the file extension.
//! - If a [`super::observability::ReadObserver`] is provided, success/failure/alerts are
//!   reported to it.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::{AnalyzerError, AnalyzerResult};

use super::observability::{ReadContext, ReadObserver, ReadSeverity, ReadStats};
use super::{csv, open_error, RawTable};

/// Supported input formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadFormat {
    /// Comma-separated values.
    Csv,
    /// Spreadsheet/workbook formats (feature-gated behind `excel`).
    Excel,
}

impl ReadFormat {
    /// Parse a format from a file extension (case-insensitive).
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "csv" => Some(Self::Csv),
            "xlsx" | "xls" | "xlsm" | "xlsb" | "ods" => Some(Self::Excel),
            _ => None,
        }
    }
}

/// How to choose sheet(s) when reading a workbook.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SheetSelection {
    /// Read the first sheet (default).
    #[default]
    First,
    /// Read a single named sheet.
    Sheet(String),
    /// Read all sheets and concatenate rows.
    AllSheets,
}

/// Options controlling [`read_table`].
///
/// Use [`Default`] for common cases.
#[derive(Clone)]
pub struct ReadOptions {
    /// If `None`, auto-detect format from file extension.
    pub format: Option<ReadFormat>,
    /// Workbook-specific options.
    pub sheet_selection: SheetSelection,
    /// Optional observer for logging/alerts.
    pub observer: Option<Arc<dyn ReadObserver>>,
    /// Severity threshold at which `on_alert` is invoked.
    pub alert_at_or_above: ReadSeverity,
}

impl fmt::Debug for ReadOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReadOptions")
            .field("format", &self.format)
            .field("sheet_selection", &self.sheet_selection)
            .field("observer_set", &self.observer.is_some())
            .field("alert_at_or_above", &self.alert_at_or_above)
            .finish()
    }
}

impl Default for ReadOptions {
    fn default() -> Self {
        Self {
            format: None,
            sheet_selection: SheetSelection::default(),
            observer: None,
            alert_at_or_above: ReadSeverity::Critical,
        }
    }
}

/// Read a journal file into a string-typed [`RawTable`].
///
/// Every failure is fatal and carries a distinct condition:
///
/// - missing file → [`AnalyzerError::NotFound`]
/// - unreadable file → [`AnalyzerError::PermissionDenied`]
/// - unknown extension, or a workbook without the `excel` feature →
///   [`AnalyzerError::UnsupportedFormat`]
/// - no header row → [`AnalyzerError::EmptyInput`]
/// - a requested sheet the workbook lacks → [`AnalyzerError::SheetNotFound`]
/// - undecodable content → [`AnalyzerError::Corrupt`]
///
/// When an observer is configured, this function reports `on_success` with row/column
/// counts, or `on_failure` (plus `on_alert` at or above `options.alert_at_or_above`).
///
/// ```no_run
/// use journal_entry_analyzer::ingestion::{read_table, ReadOptions};
///
/// # fn main() -> Result<(), journal_entry_analyzer::AnalyzerError> {
/// let table = read_table("journal.xlsx", &ReadOptions::default())?;
/// println!("rows={}", table.row_count());
/// # Ok(())
/// # }
/// ```
pub fn read_table(path: impl AsRef<Path>, options: &ReadOptions) -> AnalyzerResult<RawTable> {
    let path = path.as_ref();
    let fmt = match options.format {
        Some(f) => f,
        None => infer_format_from_path(path)?,
    };

    let ctx = ReadContext {
        path: path.to_path_buf(),
        format: fmt,
    };

    let result = fs::metadata(path)
        .map_err(|e| open_error(path, e))
        .and_then(|_| match fmt {
            ReadFormat::Csv => csv::read_csv_from_path(path),
            ReadFormat::Excel => read_excel_dispatch(path, &options.sheet_selection),
        })
        .and_then(|table| {
            if table.headers.iter().all(|h| h.is_empty()) {
                Err(AnalyzerError::EmptyInput {
                    message: format!("{} has no header row", path.display()),
                })
            } else {
                Ok(table)
            }
        });

    if let Some(obs) = options.observer.as_ref() {
        match &result {
            Ok(t) => obs.on_success(
                &ctx,
                ReadStats {
                    rows: t.row_count(),
                    columns: t.headers.len(),
                },
            ),
            Err(e) => {
                let sev = ReadSeverity::for_error(e);
                obs.on_failure(&ctx, sev, e);
                if sev >= options.alert_at_or_above {
                    obs.on_alert(&ctx, sev, e);
                }
            }
        }
    }

    result
}

fn infer_format_from_path(path: &Path) -> AnalyzerResult<ReadFormat> {
    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .ok_or_else(|| AnalyzerError::UnsupportedFormat {
            message: format!("path has no extension ({})", path.display()),
        })?;

    ReadFormat::from_extension(ext).ok_or_else(|| AnalyzerError::UnsupportedFormat {
        message: format!(
            "extension '{ext}' is not one of .xlsx/.xls/.xlsm/.xlsb/.ods/.csv ({})",
            path.display()
        ),
    })
}

fn read_excel_dispatch(path: &Path, sel: &SheetSelection) -> AnalyzerResult<RawTable> {
    // Avoid unused warnings when the feature is off.
    let _ = (path, sel);

    #[cfg(feature = "excel")]
    {
        use super::excel;

        match sel {
            SheetSelection::First => excel::read_excel_from_path(path, None),
            SheetSelection::Sheet(name) => excel::read_excel_from_path(path, Some(name.as_str())),
            SheetSelection::AllSheets => excel::read_excel_workbook_from_path(path, None),
        }
    }

    #[cfg(not(feature = "excel"))]
    {
        Err(AnalyzerError::UnsupportedFormat {
            message: "workbook reading not enabled (enable cargo feature 'excel')".to_string(),
        })
    }
}

/// An owned read request, handy when the path and options are decided up front.
#[derive(Debug, Clone)]
pub struct ReadRequest {
    /// Path to the input file.
    pub path: PathBuf,
    /// Options controlling the read.
    pub options: ReadOptions,
}

impl ReadRequest {
    /// Execute the request by calling [`read_table`].
    pub fn run(&self) -> AnalyzerResult<RawTable> {
        read_table(&self.path, &self.options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_extension_is_case_insensitive() {
        assert_eq!(ReadFormat::from_extension("XLSX"), Some(ReadFormat::Excel));
        assert_eq!(ReadFormat::from_extension("csv"), Some(ReadFormat::Csv));
        assert_eq!(ReadFormat::from_extension("parquet"), None);
    }

    #[test]
    fn unknown_extension_is_unsupported_format() {
        let err = read_table("journal.txt", &ReadOptions::default()).unwrap_err();
        assert_eq!(err.code(), "unsupported-format");
    }

    #[test]
    fn missing_file_is_not_found() {
        let err = read_table("definitely/not/here.csv", &ReadOptions::default()).unwrap_err();
        assert!(matches!(err, AnalyzerError::NotFound { .. }));
    }
}
