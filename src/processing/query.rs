//! Optional boolean filter over arbitrary columns.
//!
//! The expression is a SQL `WHERE` clause evaluated by `polars-sql` against the current
//! table, registered as `entries`. Column names that are not plain identifiers (for example
//! the default Chinese headers) must be double-quoted:
//!
//! ```text
//! "借方金额" > 10000 AND "摘要" LIKE '%差旅%'
//! ```
//!
//! Date columns are exposed as `YYYY-MM-DD` strings, so they compare correctly against string
//! literals. Any parse, planning or evaluation failure is a fatal
//! [`AnalyzerError::QuerySyntax`].

use crate::error::{AnalyzerError, AnalyzerResult};
use crate::types::DataSet;

/// Keep the rows for which `expression` is true, in their original order.
///
/// A blank expression keeps every row.
pub fn apply_query(dataset: &DataSet, expression: &str) -> AnalyzerResult<DataSet> {
    if expression.trim().is_empty() {
        return Ok(dataset.clone());
    }
    let mut indices = matching_rows(dataset, expression)?;
    indices.sort_unstable();
    indices.dedup();
    tracing::debug!(rows = indices.len(), "query filter applied");
    Ok(dataset.take_rows(&indices))
}

#[cfg(feature = "sql")]
fn matching_rows(dataset: &DataSet, expression: &str) -> AnalyzerResult<Vec<usize>> {
    use std::collections::HashSet;

    use polars::prelude::{Column, DataFrame, IntoLazy};
    use polars_sql::SQLContext;

    use crate::types::{DataType, Value};

    const ROW_ID: &str = "__row_id";

    let mut seen = HashSet::new();
    for name in dataset.schema.field_names() {
        if name == ROW_ID || !seen.insert(name) {
            return Err(query_error(format!("duplicate or reserved column name '{name}'")));
        }
    }

    let n = dataset.row_count();
    let mut columns: Vec<Column> = Vec::with_capacity(dataset.schema.fields.len() + 1);
    columns.push(Column::new(ROW_ID.into(), (0..n as i64).collect::<Vec<i64>>()));
    for (idx, field) in dataset.schema.fields.iter().enumerate() {
        let cells = dataset.rows.iter().map(|row| row.get(idx).unwrap_or(&Value::Null));
        let column = match field.data_type {
            DataType::Float64 => Column::new(
                field.name.as_str().into(),
                cells.map(Value::as_f64).collect::<Vec<Option<f64>>>(),
            ),
            DataType::Date => Column::new(
                field.name.as_str().into(),
                cells
                    .map(|v| (!v.is_null()).then(|| v.to_string()))
                    .collect::<Vec<Option<String>>>(),
            ),
            DataType::Utf8 => Column::new(
                field.name.as_str().into(),
                cells.map(Value::as_str).collect::<Vec<Option<&str>>>(),
            ),
        };
        columns.push(column);
    }
    let df = DataFrame::new(n, columns).map_err(|e| query_error(e.to_string()))?;

    let mut ctx = SQLContext::new();
    ctx.register("entries", df.lazy());
    let sql = format!("SELECT \"{ROW_ID}\" FROM entries WHERE {expression}");
    let out = ctx
        .execute(&sql)
        .and_then(|lf| lf.collect())
        .map_err(|e| query_error(e.to_string()))?;

    let ids = out
        .column(ROW_ID)
        .and_then(|c| c.i64())
        .map_err(|e| query_error(e.to_string()))?;
    Ok(ids
        .into_iter()
        .flatten()
        .filter_map(|id| usize::try_from(id).ok())
        .collect())
}

#[cfg(not(feature = "sql"))]
fn matching_rows(_dataset: &DataSet, _expression: &str) -> AnalyzerResult<Vec<usize>> {
    Err(query_error(
        "query filtering not enabled (enable cargo feature 'sql')".to_string(),
    ))
}

fn query_error(message: String) -> AnalyzerError {
    AnalyzerError::QuerySyntax { message }
}

#[cfg(all(test, feature = "sql"))]
mod tests {
    use super::*;
    use crate::types::{DataType, Field, Schema, Value};
    use chrono::NaiveDate;

    fn journal() -> DataSet {
        let d = |m, day| Value::Date(NaiveDate::from_ymd_opt(2024, m, day).unwrap());
        DataSet::new(
            Schema::new(vec![
                Field::new("科目编码", DataType::Utf8),
                Field::new("日期", DataType::Date),
                Field::new("借方金额", DataType::Float64),
            ]),
            vec![
                vec![Value::Utf8("1001".into()), d(3, 1), Value::Float64(100.0)],
                vec![Value::Utf8("1002".into()), d(3, 15), Value::Float64(20000.0)],
                vec![Value::Utf8("1001".into()), d(6, 1), Value::Null],
                vec![Value::Utf8("1003".into()), d(7, 1), Value::Float64(15000.0)],
            ],
        )
    }

    #[test]
    fn numeric_comparison_keeps_matching_rows_in_order() {
        let ds = journal();
        let out = apply_query(&ds, r#""借方金额" > 10000"#).unwrap();
        assert_eq!(out.rows, vec![ds.rows[1].clone(), ds.rows[3].clone()]);
    }

    #[test]
    fn string_and_date_predicates_combine() {
        let ds = journal();
        let out = apply_query(&ds, r#""科目编码" = '1001' AND "日期" >= '2024-05-01'"#).unwrap();
        assert_eq!(out.rows, vec![ds.rows[2].clone()]);
    }

    #[test]
    fn malformed_expression_is_query_syntax_error() {
        let err = apply_query(&journal(), "借方金额 >>> ").unwrap_err();
        assert_eq!(err.code(), "query-syntax");
    }

    #[test]
    fn unknown_column_is_query_syntax_error() {
        let err = apply_query(&journal(), r#""nope" = 1"#).unwrap_err();
        assert!(matches!(err, AnalyzerError::QuerySyntax { .. }));
    }

    #[test]
    fn blank_expression_keeps_everything() {
        let ds = journal();
        assert_eq!(apply_query(&ds, "  ").unwrap(), ds);
    }
}
