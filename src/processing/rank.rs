//! Top-N selection by amount.

use std::cmp::Ordering;

use crate::config::ColumnNames;
use crate::types::{DataSet, Value};

/// Which amount a row is ranked by.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RankKey {
    /// Debit amount.
    Debit,
    /// Credit amount.
    Credit,
    /// The larger of `|debit|` and `|credit|`.
    #[default]
    Both,
}

/// Ranking request: key plus row count.
///
/// `top` of `None` or `<= 0` disables ranking.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RankSpec {
    pub key: RankKey,
    pub top: Option<i64>,
}

impl RankSpec {
    pub fn new(key: RankKey, top: Option<i64>) -> Self {
        Self { key, top }
    }

    fn limit(&self) -> Option<usize> {
        self.top
            .filter(|n| *n > 0)
            .map(|n| usize::try_from(n).unwrap_or(usize::MAX))
    }
}

/// Sort descending by the ranking key and keep the first N rows.
///
/// Returns the input unchanged when ranking is disabled or the table is empty. The sort is
/// stable and rows with a null key go last. If the key's column(s) are missing the order is
/// left as is and only the truncation applies. For [`RankKey::Both`] a row with one null
/// side ranks by the other side.
pub fn rank_top_n(dataset: &DataSet, spec: &RankSpec, names: &ColumnNames) -> DataSet {
    let Some(limit) = spec.limit() else {
        return dataset.clone();
    };
    if dataset.is_empty() {
        return dataset.clone();
    }

    let debit = dataset.schema.index_of(&names.debit);
    let credit = dataset.schema.index_of(&names.credit);

    let key_of = |row: &[Value]| -> Option<f64> {
        let amount = |idx: Option<usize>| idx.and_then(|i| row.get(i)).and_then(|v| v.as_f64());
        match (spec.key, debit, credit) {
            (RankKey::Debit, Some(_), _) => amount(debit),
            (RankKey::Credit, _, Some(_)) => amount(credit),
            (RankKey::Both, Some(_), Some(_)) => {
                match (amount(debit).map(f64::abs), amount(credit).map(f64::abs)) {
                    (Some(d), Some(c)) => Some(d.max(c)),
                    (d, c) => d.or(c),
                }
            }
            (RankKey::Both, Some(_), None) => amount(debit),
            (RankKey::Both, None, Some(_)) => amount(credit),
            _ => None,
        }
    };

    let sortable = match spec.key {
        RankKey::Debit => debit.is_some(),
        RankKey::Credit => credit.is_some(),
        RankKey::Both => debit.is_some() || credit.is_some(),
    };

    let mut order: Vec<(usize, Option<f64>)> = dataset
        .rows
        .iter()
        .enumerate()
        .map(|(i, row)| (i, if sortable { key_of(row) } else { None }))
        .collect();
    if sortable {
        order.sort_by(|(_, a), (_, b)| descending_nulls_last(*a, *b));
    }

    let indices: Vec<usize> = order.into_iter().take(limit).map(|(i, _)| i).collect();
    tracing::debug!(key = ?spec.key, kept = indices.len(), "top-n applied");
    dataset.take_rows(&indices)
}

fn descending_nulls_last(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => y.total_cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
