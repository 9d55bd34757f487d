//! File reading.
//!
//! Most callers should use [`read_table`] (from [`unified`]) which:
//!
//! - auto-detects format by file extension (or you can override via [`ReadOptions`])
//! - reads every cell as an optional string into a [`RawTable`]
//! - optionally reports success/failure/alerts to a [`ReadObserver`]
//!
//! Typing happens later, in [`crate::loader`].
//!
//! Format-specific functions are also available under:
//! - [`csv`]
//! - `excel` (Cargo feature `excel`)

use std::collections::HashSet;
use std::io;
use std::path::Path;

use crate::error::AnalyzerError;

pub mod csv;
#[cfg(feature = "excel")]
pub mod excel;
pub mod observability;
pub mod unified;

pub use observability::{
    ReadContext, ReadObserver, ReadSeverity, ReadStats, StdErrObserver, TracingObserver,
};
pub use unified::{read_table, ReadFormat, ReadOptions, ReadRequest, SheetSelection};

/// A table of untyped cells exactly as read from the source file.
///
/// Blank and whitespace-only cells are `None`. Every row has `headers.len()` cells, and
/// header names are unique (see [`RawTable::new`]).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawTable {
    /// Column headers, trimmed.
    pub headers: Vec<String>,
    /// Row-major cells.
    pub rows: Vec<Vec<Option<String>>>,
}

impl RawTable {
    /// Build a table, padding or truncating rows to the header width.
    ///
    /// A blank header at position `i` becomes `Unnamed: i`; a repeated header gets a `.1`,
    /// `.2`, ... suffix, so `["借方金额", "", "借方金额"]` reads as
    /// `["借方金额", "Unnamed: 1", "借方金额.1"]`.
    pub fn new(headers: Vec<String>, rows: Vec<Vec<Option<String>>>) -> Self {
        let headers = unique_headers(headers);
        let width = headers.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, None);
                row
            })
            .collect();
        Self { headers, rows }
    }

    /// Convenience constructor from string literals; `""` becomes `None`.
    pub fn from_strs(headers: &[&str], rows: &[&[&str]]) -> Self {
        Self::new(
            headers.iter().map(|h| h.trim().to_string()).collect(),
            rows.iter()
                .map(|row| row.iter().map(|c| normalize_cell(c)).collect())
                .collect(),
        )
    }

    /// Number of data rows (the header is not counted).
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Position of a header, if present.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }
}

fn unique_headers(headers: Vec<String>) -> Vec<String> {
    let named: Vec<String> = headers
        .into_iter()
        .enumerate()
        .map(|(idx, h)| {
            if h.trim().is_empty() {
                format!("Unnamed: {idx}")
            } else {
                h
            }
        })
        .collect();

    let mut taken: HashSet<String> = named.iter().cloned().collect();
    let mut first_seen: HashSet<&str> = HashSet::new();
    let mut out = Vec::with_capacity(named.len());
    for h in &named {
        if first_seen.insert(h.as_str()) {
            out.push(h.clone());
            continue;
        }
        let mut suffix = 1usize;
        let renamed = loop {
            let candidate = format!("{h}.{suffix}");
            if !taken.contains(&candidate) {
                break candidate;
            }
            suffix += 1;
        };
        tracing::debug!(header = %h, renamed = %renamed, "duplicate header renamed");
        taken.insert(renamed.clone());
        out.push(renamed);
    }
    out
}

/// Map an error from opening `path` to the matching fatal condition.
pub(crate) fn open_error(path: &Path, err: io::Error) -> AnalyzerError {
    match err.kind() {
        io::ErrorKind::NotFound => AnalyzerError::NotFound {
            path: path.to_path_buf(),
        },
        io::ErrorKind::PermissionDenied => AnalyzerError::PermissionDenied {
            path: path.to_path_buf(),
        },
        _ => AnalyzerError::Io(err),
    }
}

/// Blank and whitespace-only cells are treated as missing.
pub(crate) fn normalize_cell(raw: &str) -> Option<String> {
    if raw.trim().is_empty() {
        None
    } else {
        Some(raw.to_string())
    }
}
