//! In-memory pipeline stages over a loaded [`crate::types::DataSet`].
//!
//! Every stage takes `&DataSet` and returns a new table; none mutate their input.
//!
//! - [`apply_filters()`]: account code, inclusive date range and ledger book, in that order
//! - [`apply_query()`]: optional SQL `WHERE` expression (feature `sql`)
//! - [`rank_top_n()`]: stable descending top-N by debit, credit or the larger of the two
//! - [`project()`]: `all`, `default` or an explicit column list
//! - [`summarize()`]: count/mean/mode of the amount columns
//! - [`word_frequency()`]: most frequent tokens of a text column
//!
//! ## Example: filter → rank → project
//!
//! ```rust
//! use journal_entry_analyzer::config::ColumnNames;
//! use journal_entry_analyzer::processing::{
//!     apply_filters, project, rank_top_n, FilterCriteria, MatchMode, Projection, RankKey, RankSpec,
//! };
//! use journal_entry_analyzer::types::{DataSet, DataType, Field, Schema, Value};
//! use chrono::NaiveDate;
//!
//! let names = ColumnNames::default();
//! let date = |d| Value::Date(NaiveDate::from_ymd_opt(2024, 3, d).unwrap());
//! let ds = DataSet::new(
//!     Schema::new(vec![
//!         Field::new("科目编码", DataType::Utf8),
//!         Field::new("日期", DataType::Date),
//!         Field::new("账套名称", DataType::Utf8),
//!         Field::new("借方金额", DataType::Float64),
//!     ]),
//!     vec![
//!         vec![Value::Utf8("6601".into()), date(1), Value::Utf8("主账套".into()), Value::Float64(10.0)],
//!         vec![Value::Utf8("6602".into()), date(2), Value::Utf8("主账套".into()), Value::Float64(90.0)],
//!         vec![Value::Utf8("1002".into()), date(3), Value::Utf8("主账套".into()), Value::Float64(50.0)],
//!     ],
//! );
//!
//! let criteria =
//!     FilterCriteria::new("660", MatchMode::Prefix, "2024-01-01", "2024-12-31", "all").unwrap();
//! let filtered = apply_filters(&ds, &criteria, &names).unwrap();
//! let top = rank_top_n(&filtered.dataset, &RankSpec::new(RankKey::Debit, Some(1)), &names);
//! let out = project(&top, &Projection::parse("科目编码,借方金额"), &names);
//!
//! assert_eq!(out.dataset.rows, vec![vec![Value::Utf8("6602".into()), Value::Float64(90.0)]]);
//! ```

pub mod filter;
pub mod project;
pub mod query;
pub mod rank;
pub mod stats;
pub mod text;

pub use filter::{apply_filters, BookSelector, FilterCriteria, Filtered, MatchMode};
pub use project::{project, Projected, Projection};
pub use query::apply_query;
pub use rank::{rank_top_n, RankKey, RankSpec};
pub use stats::{summarize, summarize_column, DistributionSummary, OverviewStats};
pub use text::{tokenize, word_frequency};
