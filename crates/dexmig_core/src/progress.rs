//! Progress notification channel.
//!
//! Long-running stages report through a [`ProgressSink`] at fixed
//! intervals. Sinks only observe; they never influence the pipeline.

use std::fmt;
use std::path::Path;
use std::time::Duration;

/// Overall state of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressStatus {
    /// Still working.
    Running,
    /// Completed successfully.
    Finished,
    /// Aborted by an error.
    Canceled,
}

impl ProgressStatus {
    /// Upper-case display name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Running => "RUNNING",
            Self::Finished => "FINISHED",
            Self::Canceled => "CANCELED",
        }
    }

    /// Returns whether the run has ended.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        !matches!(self, Self::Running)
    }
}

impl fmt::Display for ProgressStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A snapshot of the status board.
#[derive(Debug, Clone, Copy)]
pub struct ProgressUpdate<'a> {
    /// Run state.
    pub status: ProgressStatus,
    /// Status lines, oldest first.
    pub lines: &'a [String],
    /// Produced file and its size in bytes, once written.
    pub file: Option<(&'a Path, u64)>,
    /// Wall time, present once the run has ended.
    pub elapsed: Option<Duration>,
}

/// Receiver of progress updates.
pub trait ProgressSink {
    /// Receives one update.
    fn report(&mut self, update: &ProgressUpdate<'_>);
}

/// Discards every update.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullProgress;

impl ProgressSink for NullProgress {
    fn report(&mut self, _update: &ProgressUpdate<'_>) {}
}

/// Logs updates through `tracing`.
///
/// Only the newest status line is logged on each update; terminal updates
/// also log the elapsed time and produced file.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingProgress;

impl ProgressSink for TracingProgress {
    fn report(&mut self, update: &ProgressUpdate<'_>) {
        if let Some(line) = update.lines.last() {
            tracing::info!(status = %update.status, "{line}");
        }
        if let Some((path, bytes)) = update.file {
            tracing::info!(
                path = %path.display(),
                size = %crate::status::format_size(bytes),
                "file written"
            );
        }
        if let Some(elapsed) = update.elapsed {
            tracing::info!(
                status = %update.status,
                "ended migration in {:.3}s",
                elapsed.as_secs_f64()
            );
        }
    }
}

impl<S: ProgressSink + ?Sized> ProgressSink for &mut S {
    fn report(&mut self, update: &ProgressUpdate<'_>) {
        (**self).report(update);
    }
}
