//! Account-code, date-range and ledger-book filtering.
//!
//! [`FilterCriteria`] is validated once at construction; [`apply_filters`] then runs the three
//! predicates in a fixed order, each over the previous stage's output. Row order is never
//! changed.

use std::collections::BTreeSet;

use chrono::NaiveDate;

use crate::advisory::Advisory;
use crate::config::ColumnNames;
use crate::error::{AnalyzerError, AnalyzerResult};
use crate::loader::parse_date;
use crate::types::{DataSet, Value};

/// How the account code criterion is compared.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MatchMode {
    /// Code must equal the criterion.
    Exact,
    /// Code must start with the criterion (literal prefix, no wildcards).
    #[default]
    Prefix,
}

/// Which ledger books to keep.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookSelector {
    /// Every book.
    All,
    /// A single named book.
    One(String),
    /// Any of several named books.
    Many(Vec<String>),
}

impl BookSelector {
    /// Parse a selector: `all` (any case), a comma-separated list, or a single name.
    ///
    /// Names are trimmed; empty list entries are ignored.
    pub fn parse(raw: &str) -> AnalyzerResult<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(AnalyzerError::invalid_criteria("ledger book selector is empty"));
        }
        if trimmed.eq_ignore_ascii_case("all") {
            return Ok(BookSelector::All);
        }
        if trimmed.contains(',') {
            let names: Vec<String> = trimmed
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect();
            if names.is_empty() {
                return Err(AnalyzerError::invalid_criteria(format!(
                    "ledger book selector '{raw}' names no books"
                )));
            }
            return Ok(BookSelector::Many(names));
        }
        Ok(BookSelector::One(trimmed.to_string()))
    }

    fn names(&self) -> &[String] {
        match self {
            BookSelector::All => &[],
            BookSelector::One(name) => std::slice::from_ref(name),
            BookSelector::Many(names) => names,
        }
    }
}

/// Immutable, validated filter arguments for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterCriteria {
    account_code: String,
    match_mode: MatchMode,
    start: NaiveDate,
    end: NaiveDate,
    books: BookSelector,
}

impl FilterCriteria {
    /// Validate raw arguments.
    ///
    /// - [`AnalyzerError::InvalidCriteria`]: blank account code, blank or unparseable date,
    ///   blank book selector.
    /// - [`AnalyzerError::InvalidDateRange`]: start after end.
    pub fn new(
        account_code: &str,
        match_mode: MatchMode,
        start: &str,
        end: &str,
        books: &str,
    ) -> AnalyzerResult<Self> {
        let account_code = account_code.trim();
        if account_code.is_empty() {
            return Err(AnalyzerError::invalid_criteria("account code is empty"));
        }
        let start_date = parse_bound("start", start)?;
        let end_date = parse_bound("end", end)?;
        if start_date > end_date {
            return Err(AnalyzerError::InvalidDateRange {
                start: start_date.to_string(),
                end: end_date.to_string(),
            });
        }
        let books = BookSelector::parse(books)?;

        Ok(Self {
            account_code: account_code.to_string(),
            match_mode,
            start: start_date,
            end: end_date,
            books,
        })
    }

    pub fn account_code(&self) -> &str {
        &self.account_code
    }

    pub fn match_mode(&self) -> MatchMode {
        self.match_mode
    }

    /// Inclusive date bounds.
    pub fn date_range(&self) -> (NaiveDate, NaiveDate) {
        (self.start, self.end)
    }

    pub fn books(&self) -> &BookSelector {
        &self.books
    }

    /// Whether an account code satisfies the code criterion.
    pub fn code_matches(&self, code: &str) -> bool {
        match self.match_mode {
            MatchMode::Exact => code == self.account_code,
            MatchMode::Prefix => code.starts_with(&self.account_code),
        }
    }

    /// Whether a date lies inside the inclusive range.
    pub fn date_matches(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

fn parse_bound(which: &str, raw: &str) -> AnalyzerResult<NaiveDate> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(AnalyzerError::invalid_criteria(format!("{which} date is empty")));
    }
    parse_date(trimmed).ok_or_else(|| {
        AnalyzerError::invalid_criteria(format!(
            "{which} date '{raw}' is not a valid date (expected YYYY-MM-DD)"
        ))
    })
}

/// Result of [`apply_filters`]: the surviving rows plus any advisories.
#[derive(Debug, Clone, PartialEq)]
pub struct Filtered {
    pub dataset: DataSet,
    pub advisories: Vec<Advisory>,
}

/// Run the account-code, date and ledger-book predicates in that order.
///
/// Each stage fails with [`AnalyzerError::MissingColumn`] if its column is absent. Null
/// codes, dates and book names never match a named criterion.
pub fn apply_filters(
    dataset: &DataSet,
    criteria: &FilterCriteria,
    names: &ColumnNames,
) -> AnalyzerResult<Filtered> {
    let mut advisories = Vec::new();

    let code_idx = require_column(dataset, &names.account_code)?;
    let by_code = dataset.filter_rows(|row| {
        matches!(row.get(code_idx), Some(Value::Utf8(code)) if criteria.code_matches(code))
    });
    tracing::debug!(rows = by_code.row_count(), "account code filter applied");

    let date_idx = require_column(&by_code, &names.date)?;
    let by_date = by_code.filter_rows(|row| {
        row.get(date_idx)
            .and_then(Value::as_date)
            .is_some_and(|d| criteria.date_matches(d))
    });
    tracing::debug!(rows = by_date.row_count(), "date filter applied");

    let book_idx = require_column(&by_date, &names.ledger_book)?;
    let by_book = match criteria.books() {
        BookSelector::All => by_date,
        selector => {
            let wanted = selector.names();
            let present: BTreeSet<&str> = by_date
                .rows
                .iter()
                .filter_map(|row| row.get(book_idx).and_then(Value::as_str))
                .collect();
            let missing: Vec<String> = wanted
                .iter()
                .filter(|b| !present.contains(b.as_str()))
                .cloned()
                .collect();
            if !missing.is_empty() {
                advisories.push(Advisory::UnknownBooks {
                    missing,
                    available: present.iter().map(|s| s.to_string()).collect(),
                });
            }
            by_date.filter_rows(|row| {
                row.get(book_idx)
                    .and_then(Value::as_str)
                    .is_some_and(|b| wanted.iter().any(|w| w == b))
            })
        }
    };
    tracing::debug!(rows = by_book.row_count(), "ledger book filter applied");

    Ok(Filtered {
        dataset: by_book,
        advisories,
    })
}

fn require_column(dataset: &DataSet, column: &str) -> AnalyzerResult<usize> {
    dataset
        .schema
        .index_of(column)
        .ok_or_else(|| AnalyzerError::missing_columns(&[column], dataset.schema.field_names()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{DataType, Field, Schema};

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn names() -> ColumnNames {
        ColumnNames {
            account_code: "code".into(),
            date: "date".into(),
            ledger_book: "book".into(),
            debit: "debit".into(),
            credit: "credit".into(),
            ..ColumnNames::default()
        }
    }

    fn journal() -> DataSet {
        let schema = Schema::new(vec![
            Field::new("code", DataType::Utf8),
            Field::new("date", DataType::Date),
            Field::new("book", DataType::Utf8),
            Field::new("debit", DataType::Float64),
            Field::new("credit", DataType::Float64),
        ]);
        let row = |code: &str, date: NaiveDate, book: &str, dr: f64, cr: f64| {
            vec![
                Value::Utf8(code.into()),
                Value::Date(date),
                Value::Utf8(book.into()),
                Value::Float64(dr),
                Value::Float64(cr),
            ]
        };
        DataSet::new(
            schema,
            vec![
                row("1001", ymd(2024, 3, 1), "A", 100.0, 0.0),
                row("1002", ymd(2024, 3, 15), "A", 0.0, 50.0),
                row("1001", ymd(2024, 6, 1), "B", 200.0, 0.0),
            ],
        )
    }

    #[test]
    fn prefix_date_and_single_book_keep_first_row_only() {
        let ds = journal();
        let c = FilterCriteria::new("100", MatchMode::Prefix, "2024-01-01", "2024-12-31", "A")
            .unwrap();
        let out = apply_filters(&ds, &c, &names()).unwrap();
        // "1002" also starts with "100" and sits in book A.
        assert_eq!(out.dataset.row_count(), 2);

        let c = FilterCriteria::new("1001", MatchMode::Prefix, "2024-01-01", "2024-12-31", "A")
            .unwrap();
        let out = apply_filters(&ds, &c, &names()).unwrap();
        assert_eq!(out.dataset.rows, vec![ds.rows[0].clone()]);
        assert!(out.advisories.is_empty());
    }

    #[test]
    fn exact_match_requires_equality() {
        let ds = journal();
        let c = FilterCriteria::new("100", MatchMode::Exact, "2024-01-01", "2024-12-31", "all")
            .unwrap();
        assert!(apply_filters(&ds, &c, &names()).unwrap().dataset.is_empty());

        let c = FilterCriteria::new("1001", MatchMode::Exact, "2024-01-01", "2024-12-31", "ALL")
            .unwrap();
        let out = apply_filters(&ds, &c, &names()).unwrap();
        assert_eq!(out.dataset.rows, vec![ds.rows[0].clone(), ds.rows[2].clone()]);
    }

    #[test]
    fn date_bounds_are_inclusive_and_nulls_drop() {
        let mut ds = journal();
        ds.rows[1][1] = Value::Null;
        let c = FilterCriteria::new("1", MatchMode::Prefix, "2024-03-01", "2024-06-01", "all")
            .unwrap();
        let out = apply_filters(&ds, &c, &names()).unwrap();
        assert_eq!(out.dataset.rows, vec![ds.rows[0].clone(), ds.rows[2].clone()]);
    }

    #[test]
    fn book_list_keeps_members_and_warns_on_unknown() {
        let ds = journal();
        let c = FilterCriteria::new("1", MatchMode::Prefix, "2024-01-01", "2024-12-31", "B, Z ,")
            .unwrap();
        let out = apply_filters(&ds, &c, &names()).unwrap();
        assert_eq!(out.dataset.rows, vec![ds.rows[2].clone()]);
        assert_eq!(
            out.advisories,
            vec![Advisory::UnknownBooks {
                missing: vec!["Z".into()],
                available: vec!["A".into(), "B".into()],
            }]
        );
    }

    #[test]
    fn unknown_single_book_yields_empty_table_and_advisory() {
        let ds = journal();
        let c = FilterCriteria::new("1", MatchMode::Prefix, "2024-01-01", "2024-12-31", "Q")
            .unwrap();
        let out = apply_filters(&ds, &c, &names()).unwrap();
        assert!(out.dataset.is_empty());
        assert_eq!(out.advisories.len(), 1);
    }

    #[test]
    fn every_surviving_row_satisfies_all_predicates_in_input_order() {
        let ds = journal();
        let c = FilterCriteria::new("100", MatchMode::Prefix, "2024-02-01", "2024-12-31", "A,B")
            .unwrap();
        let out = apply_filters(&ds, &c, &names()).unwrap();
        let mut last_pos = None;
        for row in &out.dataset.rows {
            assert!(c.code_matches(row[0].as_str().unwrap()));
            assert!(c.date_matches(row[1].as_date().unwrap()));
            assert!(["A", "B"].contains(&row[2].as_str().unwrap()));
            let pos = ds.rows.iter().position(|r| r == row).unwrap();
            assert!(last_pos.is_none_or(|p| p < pos));
            last_pos = Some(pos);
        }
        assert_eq!(out.dataset.row_count(), 3);
    }

    #[test]
    fn criteria_validation_errors() {
        let err = FilterCriteria::new("  ", MatchMode::Prefix, "2024-01-01", "2024-12-31", "A")
            .unwrap_err();
        assert_eq!(err.code(), "invalid-criteria");

        let err = FilterCriteria::new("1", MatchMode::Prefix, "", "2024-12-31", "A").unwrap_err();
        assert_eq!(err.code(), "invalid-criteria");

        let err =
            FilterCriteria::new("1", MatchMode::Prefix, "2024-13-01", "2024-12-31", "A").unwrap_err();
        assert_eq!(err.code(), "invalid-criteria");

        let err =
            FilterCriteria::new("1", MatchMode::Prefix, "2024-01-01", "2024-12-31", " ").unwrap_err();
        assert_eq!(err.code(), "invalid-criteria");

        let err =
            FilterCriteria::new("1", MatchMode::Prefix, "2024-12-31", "2024-01-01", "A").unwrap_err();
        assert_eq!(err.code(), "invalid-date-range");
    }

    #[test]
    fn missing_governing_column_is_fatal() {
        let ds = journal().select_columns(&["code", "date"]);
        let c = FilterCriteria::new("1", MatchMode::Prefix, "2024-01-01", "2024-12-31", "all")
            .unwrap();
        let err = apply_filters(&ds, &c, &names()).unwrap_err();
        assert_eq!(err.code(), "missing-column");
        assert!(err.to_string().contains("book"));
    }
}
