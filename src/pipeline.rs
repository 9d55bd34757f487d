//! One analysis run, from file to result.
//!
//! Reader → loader → filters (→ query) and then either rank → project (`get`) or
//! statistics + word frequency (`overview`). Advisories from every stage are collected in
//! order next to the result.

use crate::advisory::Advisory;
use crate::config::AnalyzerConfig;
use crate::error::AnalyzerResult;
use crate::ingestion::{RawTable, ReadRequest};
use crate::loader::load_records;
use crate::processing::{
    apply_filters, apply_query, project, rank_top_n, summarize, word_frequency, FilterCriteria,
    OverviewStats, Projection, RankSpec,
};
use crate::types::DataSet;

/// Number of words in the overview when the caller does not choose.
pub const DEFAULT_TOP_WORDS: usize = 10;

/// Filtered records plus the advisories collected on the way.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    pub dataset: DataSet,
    pub advisories: Vec<Advisory>,
}

/// Output of the `get` path.
#[derive(Debug, Clone, PartialEq)]
pub struct RowsOutput {
    pub dataset: DataSet,
    pub advisories: Vec<Advisory>,
}

/// Output of the `overview` path.
#[derive(Debug, Clone, PartialEq)]
pub struct OverviewOutput {
    pub stats: OverviewStats,
    pub words: Vec<(String, usize)>,
    pub advisories: Vec<Advisory>,
}

impl OverviewOutput {
    /// `true` when no record survived filtering; there is nothing to report.
    pub fn is_empty(&self) -> bool {
        self.stats.total_records == 0
    }
}

/// Everything needed to run the shared front half of the pipeline.
#[derive(Debug, Clone)]
pub struct AnalysisRequest {
    pub source: ReadRequest,
    pub config: AnalyzerConfig,
    pub criteria: FilterCriteria,
    /// Optional SQL `WHERE` expression applied after the fixed filters.
    pub query: Option<String>,
}

impl AnalysisRequest {
    /// Read the source and run the loader and filters.
    pub fn select(&self) -> AnalyzerResult<Selection> {
        let raw = self.source.run()?;
        select_records(raw, &self.config, &self.criteria, self.query.as_deref())
    }

    /// Filter, rank and project.
    pub fn run_rows(&self, rank: &RankSpec, projection: &Projection) -> AnalyzerResult<RowsOutput> {
        Ok(rows(self.select()?, &self.config, rank, projection))
    }

    /// Filter and summarize.
    pub fn run_overview(&self, top_words: usize) -> AnalyzerResult<OverviewOutput> {
        Ok(overview(self.select()?, &self.config, top_words))
    }
}

/// Load and filter an already-read table.
pub fn select_records(
    raw: RawTable,
    config: &AnalyzerConfig,
    criteria: &FilterCriteria,
    query: Option<&str>,
) -> AnalyzerResult<Selection> {
    let loaded = load_records(raw, &config.columns)?;
    let mut advisories = loaded.advisories();

    let filtered = apply_filters(&loaded.dataset, criteria, &config.columns)?;
    advisories.extend(filtered.advisories);

    let dataset = match query {
        Some(expr) => apply_query(&filtered.dataset, expr)?,
        None => filtered.dataset,
    };
    tracing::debug!(selected = dataset.row_count(), "selection complete");
    Ok(Selection {
        dataset,
        advisories,
    })
}

/// Rank and project a selection.
///
/// An empty result adds [`Advisory::NoMatchingRecords`].
pub fn rows(
    selection: Selection,
    config: &AnalyzerConfig,
    rank: &RankSpec,
    projection: &Projection,
) -> RowsOutput {
    let Selection {
        dataset,
        mut advisories,
    } = selection;
    let ranked = rank_top_n(&dataset, rank, &config.columns);
    let projected = project(&ranked, projection, &config.columns);
    advisories.extend(projected.advisories);
    if projected.dataset.is_empty() {
        advisories.push(Advisory::NoMatchingRecords);
    }
    RowsOutput {
        dataset: projected.dataset,
        advisories,
    }
}

/// Statistics and word frequency for a selection.
///
/// An empty selection yields zeroed stats and [`Advisory::NoMatchingRecords`]. Otherwise, if
/// the summary column exists, [`Advisory::SimpleTokenizer`] notes how words were split.
pub fn overview(selection: Selection, config: &AnalyzerConfig, top_words: usize) -> OverviewOutput {
    let Selection {
        dataset,
        mut advisories,
    } = selection;
    let stats = summarize(&dataset, &config.columns);
    if dataset.is_empty() {
        advisories.push(Advisory::NoMatchingRecords);
        return OverviewOutput {
            stats,
            words: Vec::new(),
            advisories,
        };
    }

    let summary_column = config.columns.summary.as_str();
    if dataset.schema.contains(summary_column) {
        advisories.push(Advisory::SimpleTokenizer);
    }
    let words = word_frequency(&dataset, summary_column, &config.stop_words, top_words);
    OverviewOutput {
        stats,
        words,
        advisories,
    }
}
