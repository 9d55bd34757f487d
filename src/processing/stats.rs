//! Distribution summaries for the amount columns.

use std::collections::HashMap;

use crate::config::ColumnNames;
use crate::types::DataSet;

/// Count, mean and mode of one numeric column's non-null values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DistributionSummary {
    pub count: usize,
    pub mean: f64,
    /// Most frequent value. On a tie, the value seen first in row order wins.
    pub mode: f64,
    pub mode_frequency: usize,
}

/// Everything the overview report needs besides the word list.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverviewStats {
    pub total_records: usize,
    /// `None` when the debit column is absent or entirely null.
    pub debit: Option<DistributionSummary>,
    /// `None` when the credit column is absent or entirely null.
    pub credit: Option<DistributionSummary>,
}

/// Summarize the debit and credit columns independently.
pub fn summarize(dataset: &DataSet, names: &ColumnNames) -> OverviewStats {
    let stats = OverviewStats {
        total_records: dataset.row_count(),
        debit: summarize_column(dataset, &names.debit),
        credit: summarize_column(dataset, &names.credit),
    };
    tracing::debug!(
        total = stats.total_records,
        debit = stats.debit.is_some(),
        credit = stats.credit.is_some(),
        "overview statistics computed"
    );
    stats
}

/// Summary of a single numeric column, or `None` if it is absent or has no non-null values.
pub fn summarize_column(dataset: &DataSet, column: &str) -> Option<DistributionSummary> {
    if !dataset.schema.contains(column) {
        return None;
    }
    distribution(dataset.column_values(column).filter_map(|v| v.as_f64()))
}

fn distribution(values: impl Iterator<Item = f64>) -> Option<DistributionSummary> {
    let mut count = 0usize;
    let mut sum = 0.0f64;
    // bits -> occurrences; `order` keeps first-seen order for ties
    let mut seen: HashMap<u64, usize> = HashMap::new();
    let mut order: Vec<f64> = Vec::new();

    for v in values {
        let v = if v == 0.0 { 0.0 } else { v };
        count += 1;
        sum += v;
        let n = seen.entry(v.to_bits()).or_insert_with(|| {
            order.push(v);
            0
        });
        *n += 1;
    }

    if count == 0 {
        return None;
    }

    let (mode, mode_frequency) = order
        .iter()
        .map(|v| (*v, seen.get(&v.to_bits()).copied().unwrap_or(0)))
        .fold(None, |best: Option<(f64, usize)>, (v, n)| match best {
            Some((_, best_n)) if best_n >= n => best,
            _ => Some((v, n)),
        })?;

    Some(DistributionSummary {
        count,
        mean: sum / count as f64,
        mode,
        mode_frequency,
    })
}
