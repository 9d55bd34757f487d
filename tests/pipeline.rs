use journal_entry_analyzer::config::{AnalyzerConfig, ColumnNames, StopWords};
use journal_entry_analyzer::ingestion::{RawTable, ReadOptions, ReadRequest};
use journal_entry_analyzer::loader::load_records;
use journal_entry_analyzer::pipeline::{AnalysisRequest, DEFAULT_TOP_WORDS};
use journal_entry_analyzer::processing::{
    apply_filters, project, rank_top_n, FilterCriteria, MatchMode, Projection, RankKey, RankSpec,
};
use journal_entry_analyzer::report::format_overview_report;
use journal_entry_analyzer::types::{DataSet, Value};
use journal_entry_analyzer::Advisory;

fn short_names() -> ColumnNames {
    ColumnNames {
        account_code: "code".into(),
        date: "date".into(),
        ledger_book: "book".into(),
        debit: "debit".into(),
        credit: "credit".into(),
        ..ColumnNames::default()
    }
}

fn three_rows() -> DataSet {
    let raw = RawTable::from_strs(
        &["code", "date", "book", "debit", "credit"],
        &[
            &["1001", "2024-03-01", "A", "100", "0"],
            &["1002", "2024-03-15", "A", "0", "50"],
            &["1001", "2024-06-01", "B", "200", "0"],
        ],
    );
    load_records(raw, &short_names()).unwrap().dataset
}

#[test]
fn account_date_book_filter_keeps_first_row_for_exact_code() {
    let ds = three_rows();
    let criteria =
        FilterCriteria::new("1001", MatchMode::Exact, "2024-01-01", "2024-12-31", "A").unwrap();
    let out = apply_filters(&ds, &criteria, &short_names()).unwrap();
    assert_eq!(out.dataset.rows, vec![ds.rows[0].clone()]);
    assert!(out.advisories.is_empty());
}

#[test]
fn prefix_filter_output_satisfies_every_predicate() {
    let ds = three_rows();
    let criteria =
        FilterCriteria::new("100", MatchMode::Prefix, "2024-01-01", "2024-12-31", "A").unwrap();
    let out = apply_filters(&ds, &criteria, &short_names()).unwrap();

    assert_eq!(out.dataset.row_count(), 2);
    for row in &out.dataset.rows {
        assert!(criteria.code_matches(row[0].as_str().unwrap()));
        assert!(criteria.date_matches(row[1].as_date().unwrap()));
        assert_eq!(row[2].as_str(), Some("A"));
    }
}

#[test]
fn ranking_both_with_one_picks_largest_absolute_amount() {
    let ds = three_rows();
    let out = rank_top_n(&ds, &RankSpec::new(RankKey::Both, Some(1)), &short_names());
    assert_eq!(out.rows, vec![ds.rows[2].clone()]);
}

#[test]
fn explicit_projection_with_unknown_column() {
    let ds = three_rows();
    let out = project(&ds, &Projection::parse("date,book,nonexistent"), &short_names());
    assert_eq!(out.dataset.schema.field_names().collect::<Vec<_>>(), vec!["date", "book"]);
    assert_eq!(out.dataset.row_count(), 3);
    assert_eq!(
        out.advisories,
        vec![Advisory::MissingColumns {
            columns: vec!["nonexistent".to_string()]
        }]
    );
}

fn fixture_request(code: &str, books: &str) -> AnalysisRequest {
    AnalysisRequest {
        source: ReadRequest {
            path: "tests/fixtures/journal.csv".into(),
            options: ReadOptions::default(),
        },
        config: AnalyzerConfig::default(),
        criteria: FilterCriteria::new(code, MatchMode::Prefix, "2024-01-01", "2024-12-31", books)
            .unwrap(),
        query: None,
    }
}

#[test]
fn run_rows_on_fixture() {
    let out = fixture_request("6601", "all")
        .run_rows(&RankSpec::new(RankKey::Both, Some(2)), &Projection::parse("凭证唯一号"))
        .unwrap();

    let ids: Vec<String> = out.dataset.rows.iter().map(|r| r[0].to_string()).collect();
    assert_eq!(ids, vec!["V0002", "V0001"]);
    assert_eq!(
        out.advisories,
        vec![Advisory::CoercionFailures {
            column: "日期".to_string(),
            count: 1
        }]
    );
}

#[test]
fn run_overview_on_fixture() {
    let out = fixture_request("6", "主账套").run_overview(DEFAULT_TOP_WORDS).unwrap();

    assert_eq!(out.stats.total_records, 3);
    let debit = out.stats.debit.unwrap();
    assert_eq!(debit.count, 3);
    assert!((debit.mean - 1833.5).abs() < 1e-9);
    assert_eq!(debit.mode, 1200.0);
    assert_eq!(debit.mode_frequency, 1);

    let credit = out.stats.credit.unwrap();
    assert_eq!((credit.mode, credit.mode_frequency), (0.0, 3));

    assert_eq!(out.words[0], ("报销差旅".to_string(), 2));
    assert!(out.advisories.contains(&Advisory::SimpleTokenizer));

    let report = format_overview_report(&out.stats, &out.words, &ColumnNames::default());
    assert!(report.contains("   mean: 1,833.50"));
}

#[test]
fn replacement_stop_words_change_the_word_list() {
    let mut request = fixture_request("6", "主账套");
    request.config.stop_words = StopWords::new(9, ["报销差旅"]);
    let out = request.run_overview(DEFAULT_TOP_WORDS).unwrap();
    assert!(out.words.iter().all(|(w, _)| w != "报销差旅"));
    assert_eq!(out.words.len(), 3);
}

#[test]
fn null_amounts_are_ignored_by_ranking_and_stats() {
    let raw = RawTable::from_strs(
        &["code", "date", "book", "debit", "credit"],
        &[
            &["1001", "2024-03-01", "A", "", "0"],
            &["1001", "2024-03-02", "A", "n/a", "0"],
            &["1001", "2024-03-03", "A", "5", "0"],
        ],
    );
    let loaded = load_records(raw, &short_names()).unwrap();
    assert_eq!(loaded.coercion.failures("debit"), 1);

    let top = rank_top_n(&loaded.dataset, &RankSpec::new(RankKey::Debit, Some(1)), &short_names());
    assert_eq!(top.rows[0][3], Value::Float64(5.0));
}

#[cfg(feature = "sql")]
#[test]
fn query_runs_on_tables_with_unlabeled_and_repeated_headers() {
    use journal_entry_analyzer::pipeline::select_records;

    let raw = RawTable::from_strs(
        &["科目编码", "日期", "账套名称", "借方金额", "", "", "借方金额"],
        &[
            &["6601", "2024-03-01", "主账套", "500", "x", "", "1"],
            &["6601", "2024-03-02", "主账套", "2500", "", "y", "2"],
        ],
    );
    assert_eq!(&raw.headers[4..], ["Unnamed: 4", "Unnamed: 5", "借方金额.1"]);

    let criteria =
        FilterCriteria::new("6601", MatchMode::Exact, "2024-01-01", "2024-12-31", "all").unwrap();
    let selection = select_records(
        raw,
        &AnalyzerConfig::default(),
        &criteria,
        Some(r#""借方金额" > 1000"#),
    )
    .unwrap();

    assert_eq!(selection.dataset.row_count(), 1);
    let extra = selection.dataset.schema.index_of("借方金额.1").unwrap();
    assert_eq!(selection.dataset.rows[0][extra].to_string(), "2");
}
