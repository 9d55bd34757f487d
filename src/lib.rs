//! `journal-entry-analyzer` filters accounting journal entries (凭证分录) exported from an
//! ERP system and either prints the matching rows or summarizes them.
//!
//! A run goes through fixed stages:
//!
//! 1. [`ingestion::read_table`] reads a workbook (`.xlsx`, `.xls`, `.xlsm`, `.xlsb`, `.ods`;
//!    Cargo feature `excel`) or a `.csv` file into a string-typed [`ingestion::RawTable`].
//! 2. [`loader::load_records`] checks the required columns and types the date and amount
//!    columns into a [`types::DataSet`]. Cells that fail to parse become nulls and are
//!    counted, not rejected.
//! 3. [`processing::apply_filters`] keeps rows by account code (exact or prefix), inclusive
//!    date range and ledger book; [`processing::apply_query`] optionally applies a SQL
//!    `WHERE` expression (Cargo feature `sql`).
//! 4. Either [`processing::rank_top_n`] + [`processing::project`] + [`output::write_tsv`],
//!    or [`processing::summarize`] + [`processing::word_frequency`] +
//!    [`report::format_overview_report`].
//!
//! [`pipeline::AnalysisRequest`] runs the whole thing. Fatal problems are
//! [`AnalyzerError`]s; everything else is reported as an [`advisory::Advisory`] next to the
//! result.
//!
//! Column names default to the usual Chinese export headers (`科目编码`, `日期`, `账套名称`,
//! ...) and can be overridden through [`config::AnalyzerConfig`].
//!
//! ## Example
//!
//! ```no_run
//! use journal_entry_analyzer::config::AnalyzerConfig;
//! use journal_entry_analyzer::ingestion::{ReadOptions, ReadRequest};
//! use journal_entry_analyzer::pipeline::AnalysisRequest;
//! use journal_entry_analyzer::processing::{FilterCriteria, MatchMode, Projection, RankKey, RankSpec};
//!
//! # fn main() -> Result<(), journal_entry_analyzer::AnalyzerError> {
//! let request = AnalysisRequest {
//!     source: ReadRequest {
//!         path: "journal.xlsx".into(),
//!         options: ReadOptions::default(),
//!     },
//!     config: AnalyzerConfig::default(),
//!     criteria: FilterCriteria::new("6601", MatchMode::Prefix, "2024-01-01", "2024-12-31", "主账套")?,
//!     query: None,
//! };
//! let out = request.run_rows(&RankSpec::new(RankKey::Both, Some(10)), &Projection::Default)?;
//! journal_entry_analyzer::output::write_tsv(&out.dataset, std::io::stdout())?;
//! for advisory in &out.advisories {
//!     eprintln!("warning: {advisory}");
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`ingestion`]: file readers and the read observer hooks
//! - [`loader`]: required-column check and type coercion
//! - [`processing`]: filter, query, rank, project, statistics, word frequency
//! - [`report`] / [`output`]: overview text and TSV rows
//! - [`pipeline`]: end-to-end runs
//! - [`config`]: column names and stop words
//! - [`types`], [`error`], [`advisory`]: shared types

pub mod advisory;
pub mod config;
pub mod error;
pub mod ingestion;
pub mod loader;
pub mod output;
pub mod pipeline;
pub mod processing;
pub mod report;
pub mod types;

pub use advisory::Advisory;
pub use error::{AnalyzerError, AnalyzerResult};
