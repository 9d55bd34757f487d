use journal_entry_analyzer::config::ColumnNames;
use journal_entry_analyzer::ingestion::csv::{read_csv_from_path, read_csv_from_reader};
use journal_entry_analyzer::loader::load_records;
use journal_entry_analyzer::types::{DataType, Value};
use journal_entry_analyzer::AnalyzerError;

#[test]
fn read_csv_from_path_keeps_every_row_as_text() {
    let t = read_csv_from_path("tests/fixtures/journal.csv").unwrap();

    assert_eq!(t.row_count(), 8);
    assert_eq!(t.headers.len(), 13);
    assert_eq!(t.column_index("摘要"), Some(6));
    assert_eq!(t.rows[0][7].as_deref(), Some("1200.00"));
    assert_eq!(t.rows[6][3].as_deref(), Some("not-a-date"));
    assert_eq!(t.rows[0][10], None);
}

#[test]
fn fixture_loads_with_typed_amounts_and_dates() {
    let t = read_csv_from_path("tests/fixtures/journal.csv").unwrap();
    let loaded = load_records(t, &ColumnNames::default()).unwrap();
    let ds = &loaded.dataset;

    let debit = ds.schema.index_of("借方金额").unwrap();
    let date = ds.schema.index_of("日期").unwrap();
    assert_eq!(ds.schema.fields[debit].data_type, DataType::Float64);
    assert_eq!(ds.rows[1][debit], Value::Float64(3500.5));
    assert_eq!(ds.rows[0][date].to_string(), "2024-01-15");
    assert_eq!(ds.rows[6][date], Value::Null);
    assert_eq!(loaded.coercion.failures("日期"), 1);
    assert_eq!(loaded.coercion.total(), 1);
}

#[test]
fn read_csv_pads_ragged_rows() {
    let input = "科目编码,日期,账套名称,摘要\n1001,2024-03-01\n1002,2024-03-02,A,x,extra\n";
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(input.as_bytes());

    let t = read_csv_from_reader(&mut rdr).unwrap();
    assert_eq!(t.rows[0], vec![Some("1001".to_string()), Some("2024-03-01".to_string()), None, None]);
    assert_eq!(t.rows[1].len(), 4);
}

#[test]
fn missing_csv_file_is_not_found() {
    let err = read_csv_from_path("tests/fixtures/does_not_exist.csv").unwrap_err();
    assert!(matches!(err, AnalyzerError::NotFound { .. }));
    assert_eq!(err.code(), "not-found");
}

#[test]
fn invalid_utf8_is_corrupt() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.csv");
    std::fs::write(&path, b"\xff\xfe\x00code,date\n1,2\n").unwrap();

    let err = read_csv_from_path(&path).unwrap_err();
    assert_eq!(err.code(), "corrupt");
}
