//! Non-fatal diagnostics.
//!
//! Stages that can continue past a questionable input return their primary result together
//! with a `Vec<Advisory>`. Callers decide where to render them; the binary writes them to
//! stderr, never into the data payload.

use std::fmt;

/// A non-fatal condition observed while processing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Advisory {
    /// Cells in `column` could not be coerced and were replaced by nulls.
    CoercionFailures { column: String, count: usize },
    /// Ledger books named in the selector do not occur in the data.
    UnknownBooks {
        missing: Vec<String>,
        available: Vec<String>,
    },
    /// Columns requested for projection do not exist.
    MissingColumns { columns: Vec<String> },
    /// The filtered table has no rows.
    NoMatchingRecords,
    /// Free-text analysis used the built-in character-class tokenizer.
    SimpleTokenizer,
}

impl fmt::Display for Advisory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Advisory::CoercionFailures { column, count } => write!(
                f,
                "{} invalid values in column '{column}' (treated as empty)",
                group_thousands(*count)
            ),
            Advisory::UnknownBooks { missing, available } => write!(
                f,
                "ledger book(s) not present in data: {}. available: {}",
                missing.join(", "),
                available.join(", ")
            ),
            Advisory::MissingColumns { columns } => {
                write!(f, "column(s) not present in data: {}", columns.join(", "))
            }
            Advisory::NoMatchingRecords => f.write_str("no records match the given criteria"),
            Advisory::SimpleTokenizer => {
                f.write_str("word frequency uses the simple character-class tokenizer")
            }
        }
    }
}

/// Format an unsigned count with `,` thousands separators.
pub(crate) fn group_thousands(n: usize) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
