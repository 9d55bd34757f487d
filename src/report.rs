//! Fixed-layout text for the `overview` command.

use std::fmt::Write as _;

use crate::advisory::group_thousands;
use crate::config::ColumnNames;
use crate::processing::{DistributionSummary, OverviewStats};

const BANNER_WIDTH: usize = 60;

/// Render statistics and the word list.
///
/// ```text
/// ============================================================
/// Journal entry overview
/// ============================================================
///
/// Records
///    total: 1,204
///
/// 借方金额 distribution
///    mean: 12,345.68
///    mode: 500.00
///    mode frequency: 37
///
/// 摘要 top words (Top 2)
///     1. 差旅: 88
///     2. 报销: 61
///
/// ============================================================
/// ```
///
/// The debit, credit and word blocks are left out when there is nothing to show.
pub fn format_overview_report(
    stats: &OverviewStats,
    words: &[(String, usize)],
    names: &ColumnNames,
) -> String {
    let banner = "=".repeat(BANNER_WIDTH);
    let mut out = String::new();

    // Writing into a String cannot fail.
    let _ = writeln!(out, "{banner}");
    let _ = writeln!(out, "Journal entry overview");
    let _ = writeln!(out, "{banner}");
    let _ = writeln!(out);
    let _ = writeln!(out, "Records");
    let _ = writeln!(out, "   total: {}", group_thousands(stats.total_records));
    let _ = writeln!(out);

    for (column, summary) in [(&names.debit, &stats.debit), (&names.credit, &stats.credit)] {
        if let Some(summary) = summary {
            write_distribution(&mut out, column, summary);
        }
    }

    if !words.is_empty() {
        let _ = writeln!(out, "{} top words (Top {})", names.summary, words.len());
        for (rank, (word, count)) in words.iter().enumerate() {
            let _ = writeln!(out, "   {:2}. {word}: {}", rank + 1, group_thousands(*count));
        }
        let _ = writeln!(out);
    }

    out.push_str(&banner);
    out
}

fn write_distribution(out: &mut String, column: &str, summary: &DistributionSummary) {
    let _ = writeln!(out, "{column} distribution");
    let _ = writeln!(out, "   mean: {}", format_amount(summary.mean));
    let _ = writeln!(out, "   mode: {}", format_amount(summary.mode));
    let _ = writeln!(out, "   mode frequency: {}", group_thousands(summary.mode_frequency));
    let _ = writeln!(out);
}

/// Two decimals with `,` thousands separators, e.g. `-1,234,567.80`.
pub fn format_amount(value: f64) -> String {
    let fixed = format!("{:.2}", value.abs());
    let (int_part, frac) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3 + 4);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    let sign = if value < 0.0 && fixed.bytes().any(|b| matches!(b, b'1'..=b'9')) {
        "-"
    } else {
        ""
    };
    format!("{sign}{grouped}.{frac}")
}
