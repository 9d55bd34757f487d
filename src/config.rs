//! Run configuration: physical column names and the stop-word list.
//!
//! Both have built-in defaults matching the journal export this tool was written for. A JSON
//! file can override any subset of fields:
//!
//! ```json
//! { "columns": { "account_code": "Account", "date": "PostingDate" } }
//! ```

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{AnalyzerError, AnalyzerResult};

const DEFAULT_STOP_WORDS: &str = include_str!("../config/stop_words.json");

/// Maps each logical column the pipeline knows about to its header in the input file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnNames {
    pub account_code: String,
    pub date: String,
    pub ledger_book: String,
    pub account_name: String,
    pub summary: String,
    pub voucher_id: String,
    pub voucher_line: String,
    pub debit: String,
    pub credit: String,
    /// Signed amount (debit positive, credit negative).
    pub sign_indicator: String,
    pub customer: String,
    pub supplier: String,
    pub project: String,
}

impl Default for ColumnNames {
    fn default() -> Self {
        Self {
            account_code: "科目编码".to_string(),
            date: "日期".to_string(),
            ledger_book: "账套名称".to_string(),
            account_name: "科目全称".to_string(),
            summary: "摘要".to_string(),
            voucher_id: "凭证唯一号".to_string(),
            voucher_line: "凭证行号".to_string(),
            debit: "借方金额".to_string(),
            credit: "贷方金额".to_string(),
            sign_indicator: "借正贷负".to_string(),
            customer: "客户名称".to_string(),
            supplier: "供应商名称".to_string(),
            project: "项目名称".to_string(),
        }
    }
}

impl ColumnNames {
    /// Columns every input must carry.
    pub fn required(&self) -> [&str; 3] {
        [self.account_code.as_str(), self.date.as_str(), self.ledger_book.as_str()]
    }

    /// The fixed, ordered column set used by the `default` projection.
    pub fn default_projection(&self) -> [&str; 12] {
        [
            self.ledger_book.as_str(),
            self.account_code.as_str(),
            self.account_name.as_str(),
            self.summary.as_str(),
            self.voucher_id.as_str(),
            self.voucher_line.as_str(),
            self.debit.as_str(),
            self.credit.as_str(),
            self.date.as_str(),
            self.customer.as_str(),
            self.supplier.as_str(),
            self.project.as_str(),
        ]
    }

    /// Counterparty columns the `default` projection drops when entirely empty.
    pub fn optional_counterparty(&self) -> [&str; 3] {
        [self.customer.as_str(), self.supplier.as_str(), self.project.as_str()]
    }
}

/// Tokens excluded from word-frequency counts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StopWords {
    /// Revision of the list, bumped whenever entries change.
    #[serde(default)]
    pub version: u32,
    words: HashSet<String>,
}

impl StopWords {
    /// Build a list from arbitrary words.
    pub fn new<I, S>(version: u32, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            version,
            words: words.into_iter().map(Into::into).collect(),
        }
    }

    /// An empty list.
    pub fn none() -> Self {
        Self::new(0, Vec::<String>::new())
    }

    pub fn contains(&self, token: &str) -> bool {
        self.words.contains(token)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Parse a `{ "version": n, "words": [...] }` document.
    pub fn from_json(json: &str) -> AnalyzerResult<Self> {
        serde_json::from_str(json).map_err(|e| AnalyzerError::Config {
            message: format!("stop words: {e}"),
        })
    }

    /// Read a stop-word document from disk.
    pub fn from_path(path: impl AsRef<Path>) -> AnalyzerResult<Self> {
        let path = path.as_ref();
        let text = read_config_file(path)?;
        Self::from_json(&text)
    }
}

impl Default for StopWords {
    fn default() -> Self {
        // The embedded list is validated by `embedded_stop_words_parse`.
        Self::from_json(DEFAULT_STOP_WORDS).unwrap_or_else(|_| Self::none())
    }
}

/// Everything configurable about a run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    pub columns: ColumnNames,
    pub stop_words: StopWords,
}

impl AnalyzerConfig {
    /// Read a JSON config; missing fields keep their defaults.
    pub fn from_path(path: impl AsRef<Path>) -> AnalyzerResult<Self> {
        let path = path.as_ref();
        let text = read_config_file(path)?;
        serde_json::from_str(&text).map_err(|e| AnalyzerError::Config {
            message: format!("{}: {e}", path.display()),
        })
    }
}

fn read_config_file(path: &Path) -> AnalyzerResult<String> {
    fs::read_to_string(path).map_err(|e| AnalyzerError::Config {
        message: format!("cannot read {}: {e}", path.display()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_stop_words_parse() {
        let sw = StopWords::from_json(DEFAULT_STOP_WORDS).unwrap();
        assert_eq!(sw.version, 1);
        assert!(sw.contains("的"));
        assert!(sw.contains("付款"));
        assert!(!sw.contains("差旅"));
        assert_eq!(StopWords::default(), sw);
    }

    #[test]
    fn partial_config_keeps_defaults() {
        let cfg: AnalyzerConfig =
            serde_json::from_str(r#"{ "columns": { "account_code": "Account" } }"#).unwrap();
        assert_eq!(cfg.columns.account_code, "Account");
        assert_eq!(cfg.columns.date, "日期");
        assert!(cfg.stop_words.contains("的"));
    }

    #[test]
    fn malformed_stop_words_are_a_config_error() {
        let err = StopWords::from_json("[1, 2").unwrap_err();
        assert_eq!(err.code(), "config");
    }

    #[test]
    fn default_projection_order_is_fixed() {
        let names = ColumnNames::default();
        let cols = names.default_projection();
        assert_eq!(cols[0], "账套名称");
        assert_eq!(cols[8], "日期");
        assert_eq!(cols[11], "项目名称");
    }
}
