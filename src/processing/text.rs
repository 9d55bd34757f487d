//! Word frequency over a free-text column.
//!
//! Tokens are maximal runs of CJK unified ideographs (U+4E00..=U+9FFF) or ASCII letters and
//! digits. Everything else separates tokens, so `差旅ABC` yields `差旅` and `ABC`.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;

use crate::config::StopWords;
use crate::types::DataSet;

static TOKEN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new("[\u{4e00}-\u{9fff}]+|[A-Za-z0-9]+").expect("token regex")
});

/// Split text into tokens, in order of appearance.
pub fn tokenize(text: &str) -> Vec<String> {
    TOKEN_RE
        .find_iter(text)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Top `top_n` tokens of `column` by count, descending.
///
/// Null cells are skipped. Single-character tokens and stop words are discarded. Ties keep
/// first-encounter order. An absent column yields an empty list.
pub fn word_frequency(
    dataset: &DataSet,
    column: &str,
    stop_words: &StopWords,
    top_n: usize,
) -> Vec<(String, usize)> {
    if !dataset.schema.contains(column) || top_n == 0 {
        return Vec::new();
    }

    let text = dataset
        .column_values(column)
        .filter(|v| !v.is_null())
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(" ");

    let mut counts: HashMap<String, usize> = HashMap::new();
    let mut first_seen: Vec<String> = Vec::new();
    for token in tokenize(&text) {
        if token.chars().count() <= 1 || stop_words.contains(&token) {
            continue;
        }
        match counts.get_mut(&token) {
            Some(n) => *n += 1,
            None => {
                counts.insert(token.clone(), 1);
                first_seen.push(token);
            }
        }
    }

    let mut ranked: Vec<(String, usize)> = first_seen
        .into_iter()
        .map(|t| {
            let n = counts.get(&t).copied().unwrap_or(0);
            (t, n)
        })
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked.truncate(top_n);
    tracing::debug!(column, distinct = counts.len(), kept = ranked.len(), "word frequency");
    ranked
}
