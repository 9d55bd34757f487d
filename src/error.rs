use std::path::PathBuf;

use thiserror::Error;

/// Convenience result type for analyzer operations.
pub type AnalyzerResult<T> = Result<T, AnalyzerError>;

/// Fatal error returned by reading, loading, filtering and configuration.
///
/// Every variant aborts the run. Non-fatal conditions are reported as
/// [`crate::advisory::Advisory`] values instead.
#[derive(Debug, Error)]
pub enum AnalyzerError {
    /// The input file does not exist.
    #[error("file not found: {}", .path.display())]
    NotFound { path: PathBuf },

    /// The input file exists but cannot be read.
    #[error("permission denied reading {}", .path.display())]
    PermissionDenied { path: PathBuf },

    /// The file extension is not one the reader understands.
    #[error("unsupported file format: {message}")]
    UnsupportedFormat { message: String },

    /// The input has a header but no data rows (or no header at all).
    #[error("input is empty: {message}")]
    EmptyInput { message: String },

    /// The file could be opened but not decoded.
    #[error("cannot decode {}: {message}", .path.display())]
    Corrupt { path: PathBuf, message: String },

    /// A worksheet requested by name is not in the workbook.
    #[error("sheet '{sheet}' not found. available: {available}")]
    SheetNotFound { sheet: String, available: String },

    /// Underlying I/O error not covered by a more specific variant.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV write error.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// One or more columns the operation depends on are absent.
    #[error("missing required column(s): {missing}. available: {available}")]
    MissingColumn { missing: String, available: String },

    /// A filter argument is empty or malformed.
    #[error("invalid filter criteria: {message}")]
    InvalidCriteria { message: String },

    /// The start date is after the end date.
    #[error("start date {start} is after end date {end}")]
    InvalidDateRange { start: String, end: String },

    /// The optional boolean query expression could not be parsed or evaluated.
    #[error("query syntax error: {message}")]
    QuerySyntax { message: String },

    /// A configuration file could not be read or parsed.
    #[error("invalid configuration: {message}")]
    Config { message: String },
}

impl AnalyzerError {
    /// Stable condition code, one per variant.
    pub fn code(&self) -> &'static str {
        match self {
            AnalyzerError::NotFound { .. } => "not-found",
            AnalyzerError::PermissionDenied { .. } => "permission-denied",
            AnalyzerError::UnsupportedFormat { .. } => "unsupported-format",
            AnalyzerError::EmptyInput { .. } => "empty-input",
            AnalyzerError::Corrupt { .. } => "corrupt",
            AnalyzerError::SheetNotFound { .. } => "sheet-not-found",
            AnalyzerError::Io(_) => "io",
            AnalyzerError::Csv(_) => "csv",
            AnalyzerError::MissingColumn { .. } => "missing-column",
            AnalyzerError::InvalidCriteria { .. } => "invalid-criteria",
            AnalyzerError::InvalidDateRange { .. } => "invalid-date-range",
            AnalyzerError::QuerySyntax { .. } => "query-syntax",
            AnalyzerError::Config { .. } => "config",
        }
    }

    pub(crate) fn missing_columns<S: AsRef<str>>(
        missing: &[S],
        available: impl Iterator<Item = impl AsRef<str>>,
    ) -> Self {
        AnalyzerError::MissingColumn {
            missing: join(missing.iter()),
            available: join(available),
        }
    }

    pub(crate) fn invalid_criteria(message: impl Into<String>) -> Self {
        AnalyzerError::InvalidCriteria {
            message: message.into(),
        }
    }
}

fn join(items: impl Iterator<Item = impl AsRef<str>>) -> String {
    items
        .map(|s| s.as_ref().to_owned())
        .collect::<Vec<_>>()
        .join(", ")
}
