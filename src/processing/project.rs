//! Output column selection.

use crate::advisory::Advisory;
use crate::config::ColumnNames;
use crate::types::DataSet;

/// Which columns to output.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Projection {
    /// Every input column, in input order.
    All,
    /// The fixed twelve-column journal layout, minus empty counterparty columns.
    #[default]
    Default,
    /// Caller-chosen columns, in the caller's order.
    Columns(Vec<String>),
}

impl Projection {
    /// Parse `all`, `default`, or a comma-separated column list.
    ///
    /// List entries are trimmed; blank entries and repeats are dropped.
    pub fn parse(raw: &str) -> Self {
        match raw.trim() {
            "all" => Projection::All,
            "default" | "" => Projection::Default,
            list => {
                let mut columns: Vec<String> = Vec::new();
                for name in list.split(',').map(str::trim).filter(|s| !s.is_empty()) {
                    if !columns.iter().any(|c| c == name) {
                        columns.push(name.to_string());
                    }
                }
                Projection::Columns(columns)
            }
        }
    }
}

/// Result of [`project`].
#[derive(Debug, Clone, PartialEq)]
pub struct Projected {
    pub dataset: DataSet,
    pub advisories: Vec<Advisory>,
}

/// Select and order output columns.
///
/// - [`Projection::All`] returns the input as is.
/// - [`Projection::Default`] keeps the fixed list's columns that exist (in list order) and
///   drops customer, supplier and project when every row is null there.
/// - [`Projection::Columns`] keeps the requested columns that exist, in requested order, and
///   reports the missing ones. If none exist the input is returned unchanged.
pub fn project(dataset: &DataSet, projection: &Projection, names: &ColumnNames) -> Projected {
    match projection {
        Projection::All => Projected {
            dataset: dataset.clone(),
            advisories: Vec::new(),
        },
        Projection::Default => {
            let optional = names.optional_counterparty();
            let keep: Vec<&str> = names
                .default_projection()
                .into_iter()
                .filter(|c| dataset.schema.contains(c))
                .filter(|c| !(optional.contains(c) && dataset.column_all_null(c)))
                .collect();
            Projected {
                dataset: dataset.select_columns(&keep),
                advisories: Vec::new(),
            }
        }
        Projection::Columns(requested) => {
            let (present, missing): (Vec<&String>, Vec<&String>) = requested
                .iter()
                .partition(|c| dataset.schema.contains(c.as_str()));
            let advisories = if missing.is_empty() {
                Vec::new()
            } else {
                vec![Advisory::MissingColumns {
                    columns: missing.into_iter().cloned().collect(),
                }]
            };
            let dataset = if present.is_empty() {
                dataset.clone()
            } else {
                dataset.select_columns(&present)
            };
            Projected {
                dataset,
                advisories,
            }
        }
    }
}
