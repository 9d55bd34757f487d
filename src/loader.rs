//! Loader/validator: turns a string-typed [`RawTable`] into a typed [`DataSet`].
//!
//! Coercion never aborts a row. Each cell goes through a pure function that returns the typed
//! value (or [`Value::Null`]) plus a success flag; the flags are tallied per column into a
//! [`CoercionReport`] that callers surface as advisories.

use chrono::{NaiveDate, NaiveTime};

use crate::advisory::Advisory;
use crate::config::ColumnNames;
use crate::error::{AnalyzerError, AnalyzerResult};
use crate::ingestion::RawTable;
use crate::types::{DataSet, DataType, Field, Schema, Value};

/// Outcome of coercing one cell.
#[derive(Debug, Clone, PartialEq)]
pub struct Coerced {
    /// Typed value; `Null` for blank or uncoercible input.
    pub value: Value,
    /// `false` only when a non-blank cell failed to parse.
    pub ok: bool,
}

impl Coerced {
    fn blank() -> Self {
        Self {
            value: Value::Null,
            ok: true,
        }
    }

    fn from_option(parsed: Option<Value>) -> Self {
        match parsed {
            Some(value) => Self { value, ok: true },
            None => Self {
                value: Value::Null,
                ok: false,
            },
        }
    }
}

/// Coerce a cell to a [`Value::Date`].
pub fn coerce_date(raw: Option<&str>) -> Coerced {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Coerced::blank(),
        Some(s) => Coerced::from_option(parse_date(s).map(Value::Date)),
    }
}

/// Coerce a cell to a [`Value::Float64`].
pub fn coerce_amount(raw: Option<&str>) -> Coerced {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Coerced::blank(),
        Some(s) => Coerced::from_option(parse_amount(s).map(Value::Float64)),
    }
}

/// Parse a date in the one accepted convention.
///
/// Accepted: `YYYY-MM-DD`, `YYYY/MM/DD`, `YYYYMMDD`, each optionally followed by a time of
/// day (`HH:MM`, `HH:MM:SS`, fractional seconds allowed) separated by a space or `T`. The
/// time is validated and then discarded.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    let (date_part, time_part) = match s.find([' ', 'T']) {
        Some(pos) => (&s[..pos], Some(s[pos + 1..].trim())),
        None => (s, None),
    };

    if let Some(t) = time_part {
        let valid = NaiveTime::parse_from_str(t, "%H:%M:%S%.f").is_ok()
            || NaiveTime::parse_from_str(t, "%H:%M").is_ok();
        if !valid {
            return None;
        }
    }

    if date_part.len() == 8 && date_part.bytes().all(|b| b.is_ascii_digit()) {
        let year = date_part[..4].parse().ok()?;
        let month = date_part[4..6].parse().ok()?;
        let day = date_part[6..].parse().ok()?;
        return NaiveDate::from_ymd_opt(year, month, day);
    }

    NaiveDate::parse_from_str(date_part, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(date_part, "%Y/%m/%d"))
        .ok()
}

/// Parse a plain decimal literal; non-finite results are rejected.
pub fn parse_amount(s: &str) -> Option<f64> {
    s.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Per-column count of cells that failed coercion.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CoercionReport {
    /// `(column, failures)` for every coerced column, in coercion order.
    pub columns: Vec<(String, usize)>,
}

impl CoercionReport {
    /// Failures for a single column (0 if the column was not coerced).
    pub fn failures(&self, column: &str) -> usize {
        self.columns
            .iter()
            .find(|(c, _)| c == column)
            .map_or(0, |(_, n)| *n)
    }

    /// Total failures across all columns.
    pub fn total(&self) -> usize {
        self.columns.iter().map(|(_, n)| n).sum()
    }

    /// One advisory per column with at least one failure.
    pub fn advisories(&self) -> Vec<Advisory> {
        self.columns
            .iter()
            .filter(|(_, n)| *n > 0)
            .map(|(column, count)| Advisory::CoercionFailures {
                column: column.clone(),
                count: *count,
            })
            .collect()
    }
}

/// A typed table plus its coercion side channel.
#[derive(Debug, Clone, PartialEq)]
pub struct Loaded {
    /// The typed record table, in source order.
    pub dataset: DataSet,
    /// Coercion failures per column.
    pub coercion: CoercionReport,
}

impl Loaded {
    /// Advisories derived from the coercion report.
    pub fn advisories(&self) -> Vec<Advisory> {
        self.coercion.advisories()
    }
}

/// Validate and type a raw table.
///
/// - Fails with [`AnalyzerError::MissingColumn`] if any of account code, date or ledger book
///   is absent (all missing names are listed together).
/// - Fails with [`AnalyzerError::EmptyInput`] if there are no data rows.
/// - Coerces the date column to [`DataType::Date`] and the debit, credit and sign-indicator
///   columns to [`DataType::Float64`] when present. Everything else stays [`DataType::Utf8`].
pub fn load_records(raw: RawTable, names: &ColumnNames) -> AnalyzerResult<Loaded> {
    let missing: Vec<&str> = names
        .required()
        .into_iter()
        .filter(|c| raw.column_index(c).is_none())
        .collect();
    if !missing.is_empty() {
        return Err(AnalyzerError::missing_columns(&missing, raw.headers.iter()));
    }

    if raw.row_count() == 0 {
        return Err(AnalyzerError::EmptyInput {
            message: "table has a header but no data rows".to_string(),
        });
    }

    let kinds: Vec<DataType> = raw
        .headers
        .iter()
        .map(|h| column_kind(h, names))
        .collect();

    let mut failures = vec![0usize; raw.headers.len()];
    let rows: Vec<Vec<Value>> = raw
        .rows
        .into_iter()
        .map(|row| {
            row.into_iter()
                .zip(kinds.iter())
                .zip(failures.iter_mut())
                .map(|((cell, kind), failed)| {
                    let coerced = match kind {
                        DataType::Date => coerce_date(cell.as_deref()),
                        DataType::Float64 => coerce_amount(cell.as_deref()),
                        DataType::Utf8 => {
                            return cell.map_or(Value::Null, Value::Utf8);
                        }
                    };
                    if !coerced.ok {
                        *failed += 1;
                    }
                    coerced.value
                })
                .collect()
        })
        .collect();

    let coerced_order = [
        names.date.as_str(),
        names.debit.as_str(),
        names.credit.as_str(),
        names.sign_indicator.as_str(),
    ];
    let coercion = CoercionReport {
        columns: coerced_order
            .iter()
            .filter_map(|c| {
                raw.headers
                    .iter()
                    .position(|h| h == c)
                    .map(|i| (c.to_string(), failures[i]))
            })
            .collect(),
    };

    let schema = Schema::new(
        raw.headers
            .into_iter()
            .zip(kinds)
            .map(|(name, kind)| Field::new(name, kind))
            .collect(),
    );

    let dataset = DataSet::new(schema, rows);
    tracing::debug!(
        rows = dataset.row_count(),
        columns = dataset.schema.fields.len(),
        coercion_failures = coercion.total(),
        "records loaded"
    );
    Ok(Loaded { dataset, coercion })
}

fn column_kind(header: &str, names: &ColumnNames) -> DataType {
    if header == names.date {
        DataType::Date
    } else if header == names.debit || header == names.credit || header == names.sign_indicator {
        DataType::Float64
    } else {
        DataType::Utf8
    }
}
