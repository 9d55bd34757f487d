use std::path::PathBuf;

use crate::advisory::group_thousands;
use crate::error::AnalyzerError;

use super::unified::ReadFormat;

/// Severity classification used for observer callbacks and alerting thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ReadSeverity {
    /// Informational event.
    Info,
    /// Warning-level event (non-fatal).
    Warning,
    /// Error-level event (read failed).
    Error,
    /// Critical error (file missing or unreadable).
    Critical,
}

impl ReadSeverity {
    /// Severity of a read failure: access problems are critical, decoding problems are errors.
    pub fn for_error(e: &AnalyzerError) -> Self {
        match e {
            AnalyzerError::NotFound { .. }
            | AnalyzerError::PermissionDenied { .. }
            | AnalyzerError::Io(_) => ReadSeverity::Critical,
            _ => ReadSeverity::Error,
        }
    }
}

/// Context about a read attempt.
#[derive(Debug, Clone)]
pub struct ReadContext {
    /// The input path.
    pub path: PathBuf,
    /// Format used for reading.
    pub format: ReadFormat,
}

/// Minimal stats reported on a successful read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadStats {
    /// Number of data rows.
    pub rows: usize,
    /// Number of header columns.
    pub columns: usize,
}

/// Observer interface for read outcomes.
///
/// Implementors can record metrics, logs, or trigger alerts.
pub trait ReadObserver: Send + Sync {
    /// Called when reading succeeds.
    fn on_success(&self, _ctx: &ReadContext, _stats: ReadStats) {}

    /// Called when reading fails.
    fn on_failure(&self, _ctx: &ReadContext, _severity: ReadSeverity, _error: &AnalyzerError) {}

    /// Called when a failure meets the alert threshold.
    ///
    /// Default behavior forwards to [`Self::on_failure`].
    fn on_alert(&self, ctx: &ReadContext, severity: ReadSeverity, error: &AnalyzerError) {
        self.on_failure(ctx, severity, error)
    }
}

/// Prints a one-line load summary to stderr.
///
/// Failures are not printed here; the caller reports the returned error itself.
#[derive(Debug, Default)]
pub struct StdErrObserver;

impl ReadObserver for StdErrObserver {
    fn on_success(&self, ctx: &ReadContext, stats: ReadStats) {
        eprintln!(
            "loaded {} ({} records)",
            ctx.path.display(),
            group_thousands(stats.rows)
        );
    }

    fn on_alert(&self, ctx: &ReadContext, severity: ReadSeverity, error: &AnalyzerError) {
        eprintln!(
            "[ALERT][read][{:?}] format={:?} path={} err={}",
            severity,
            ctx.format,
            ctx.path.display(),
            error
        );
    }
}

/// Forwards read events to `tracing`.
#[derive(Debug, Default)]
pub struct TracingObserver;

impl ReadObserver for TracingObserver {
    fn on_success(&self, ctx: &ReadContext, stats: ReadStats) {
        tracing::info!(
            path = %ctx.path.display(),
            format = ?ctx.format,
            rows = stats.rows,
            columns = stats.columns,
            "read ok"
        );
    }

    fn on_failure(&self, ctx: &ReadContext, severity: ReadSeverity, error: &AnalyzerError) {
        tracing::error!(
            path = %ctx.path.display(),
            format = ?ctx.format,
            ?severity,
            code = error.code(),
            "read failed: {error}"
        );
    }
}
