//! `je-analyzer`: filter journal entries and print rows or an overview.
//!
//! ```text
//! je-analyzer data.xlsx -a 6601 -s 2024-01-01 -e 2024-12-31 -b 主账套 get --top 10
//! je-analyzer data.xlsx -a 1002 -s 2024-01-01 -e 2024-12-31 -b all overview
//! ```

use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use journal_entry_analyzer::config::{AnalyzerConfig, StopWords};
use journal_entry_analyzer::ingestion::{
    ReadObserver, ReadOptions, ReadRequest, SheetSelection, StdErrObserver, TracingObserver,
};
use journal_entry_analyzer::output::write_tsv;
use journal_entry_analyzer::pipeline::{AnalysisRequest, DEFAULT_TOP_WORDS};
use journal_entry_analyzer::processing::{FilterCriteria, MatchMode, Projection, RankKey, RankSpec};
use journal_entry_analyzer::report::format_overview_report;
use journal_entry_analyzer::{Advisory, AnalyzerResult};

/// Journal entry analyzer: filter by account code, date range and ledger book.
#[derive(Parser, Debug)]
#[command(name = "je-analyzer", author, version, about, long_about = None)]
struct Cli {
    /// Workbook (.xlsx/.xls/.xlsm/.xlsb/.ods) or .csv file
    #[arg(value_name = "FILE")]
    file: PathBuf,

    /// Account code (科目编码); prefix match unless --exact-match
    #[arg(short = 'a', long = "account-code", value_name = "CODE")]
    account_code: String,

    /// Match the account code exactly
    #[arg(long)]
    exact_match: bool,

    /// Start date, inclusive (YYYY-MM-DD)
    #[arg(short = 's', long = "start-date", value_name = "DATE")]
    start_date: String,

    /// End date, inclusive (YYYY-MM-DD)
    #[arg(short = 'e', long = "end-date", value_name = "DATE")]
    end_date: String,

    /// Ledger book name(s), comma-separated, or "all"
    #[arg(short = 'b', long = "account-book", visible_alias = "book", value_name = "BOOKS")]
    books: String,

    /// Extra SQL WHERE expression, e.g. "借方金额" > 10000
    #[arg(short = 'q', long, value_name = "EXPR")]
    query: Option<String>,

    /// Worksheet to read (default: first sheet)
    #[arg(long, value_name = "NAME", conflicts_with = "all_sheets")]
    sheet: Option<String>,

    /// Read and concatenate every worksheet
    #[arg(long)]
    all_sheets: bool,

    /// JSON file overriding column names and/or stop words
    #[arg(long, value_name = "JSON")]
    config: Option<PathBuf>,

    /// JSON stop-word list replacing the built-in one
    #[arg(long, value_name = "JSON")]
    stop_words: Option<PathBuf>,

    /// Debug logging to stderr (otherwise RUST_LOG applies)
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print matching rows as tab-separated text
    Get {
        /// Keep only the N largest rows by amount
        #[arg(long, value_name = "N", allow_negative_numbers = true)]
        top: Option<i64>,

        /// Amount used for --top
        #[arg(long, value_enum, default_value = "both")]
        top_type: TopType,

        /// all, default, or a comma-separated column list
        #[arg(long, value_name = "COLUMNS", default_value = "default")]
        columns: String,
    },
    /// Print a summary report of the matching rows
    Overview {
        /// Number of frequent words to list
        #[arg(long, value_name = "N", default_value_t = DEFAULT_TOP_WORDS)]
        words: usize,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum TopType {
    /// 借方金额
    Debit,
    /// 贷方金额
    Credit,
    /// Larger absolute value of the two
    Both,
}

impl From<TopType> for RankKey {
    fn from(t: TopType) -> Self {
        match t {
            TopType::Debit => RankKey::Debit,
            TopType::Credit => RankKey::Credit,
            TopType::Both => RankKey::Both,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::debug!(code = e.code(), "run failed");
            eprintln!("error[{}]: {e}", e.code());
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: &Cli) -> AnalyzerResult<()> {
    let request = build_request(cli)?;

    match &cli.command {
        Command::Get {
            top,
            top_type,
            columns,
        } => {
            let rank = RankSpec::new((*top_type).into(), *top);
            let out = request.run_rows(&rank, &Projection::parse(columns))?;
            report_advisories(&out.advisories);
            if !out.dataset.is_empty() {
                write_tsv(&out.dataset, io::stdout().lock())?;
            }
        }
        Command::Overview { words } => {
            let out = request.run_overview(*words)?;
            report_advisories(&out.advisories);
            if !out.is_empty() {
                let report = format_overview_report(&out.stats, &out.words, &request.config.columns);
                let mut stdout = io::stdout().lock();
                writeln!(stdout, "{report}")?;
            }
        }
    }
    Ok(())
}

fn build_request(cli: &Cli) -> AnalyzerResult<AnalysisRequest> {
    let mut config = match &cli.config {
        Some(path) => AnalyzerConfig::from_path(path)?,
        None => AnalyzerConfig::default(),
    };
    if let Some(path) = &cli.stop_words {
        config.stop_words = StopWords::from_path(path)?;
    }

    let match_mode = if cli.exact_match {
        MatchMode::Exact
    } else {
        MatchMode::Prefix
    };
    let criteria = FilterCriteria::new(
        &cli.account_code,
        match_mode,
        &cli.start_date,
        &cli.end_date,
        &cli.books,
    )?;

    let sheet_selection = match (&cli.sheet, cli.all_sheets) {
        (Some(name), _) => SheetSelection::Sheet(name.clone()),
        (None, true) => SheetSelection::AllSheets,
        (None, false) => SheetSelection::First,
    };
    let observer: Arc<dyn ReadObserver> = if cli.verbose {
        Arc::new(TracingObserver)
    } else {
        Arc::new(StdErrObserver)
    };

    Ok(AnalysisRequest {
        source: ReadRequest {
            path: cli.file.clone(),
            options: ReadOptions {
                sheet_selection,
                observer: Some(observer),
                ..ReadOptions::default()
            },
        },
        config,
        criteria,
        query: cli.query.clone().filter(|q| !q.trim().is_empty()),
    })
}

fn report_advisories(advisories: &[Advisory]) {
    for advisory in advisories {
        eprintln!("warning: {advisory}");
    }
}
