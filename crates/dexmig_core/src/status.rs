//! Status board and human-readable formatting.

use crate::progress::{ProgressSink, ProgressStatus, ProgressUpdate};
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Ordered status lines of one run.
///
/// The last line doubles as a progress line: long stages rewrite it in
/// place and replace it with a summary when they finish.
#[derive(Debug)]
pub struct StatusBoard {
    lines: Vec<String>,
    file: Option<(PathBuf, u64)>,
    started: Instant,
}

impl Default for StatusBoard {
    fn default() -> Self {
        Self::new()
    }
}

impl StatusBoard {
    /// Creates an empty board and starts its clock.
    #[must_use]
    pub fn new() -> Self {
        Self {
            lines: Vec::new(),
            file: None,
            started: Instant::now(),
        }
    }

    /// Appends a line.
    pub fn push(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }

    /// Replaces the last line, or appends if the board is empty.
    pub fn replace_last(&mut self, line: impl Into<String>) {
        match self.lines.last_mut() {
            Some(last) => *last = line.into(),
            None => self.lines.push(line.into()),
        }
    }

    /// All lines, oldest first.
    #[must_use]
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// The newest line.
    #[must_use]
    pub fn last(&self) -> Option<&str> {
        self.lines.last().map(String::as_str)
    }

    /// Records the produced file.
    pub fn set_file(&mut self, path: &Path, bytes: u64) {
        self.file = Some((path.to_path_buf(), bytes));
    }

    /// Sends the board to `sink`.
    ///
    /// Elapsed time is only attached to terminal updates.
    pub fn publish(&self, sink: &mut dyn ProgressSink, status: ProgressStatus) {
        let update = ProgressUpdate {
            status,
            lines: &self.lines,
            file: self.file.as_ref().map(|(path, bytes)| (path.as_path(), *bytes)),
            elapsed: status.is_terminal().then(|| self.started.elapsed()),
        };
        sink.report(&update);
    }
}

/// Formats a byte count with binary units and two decimals.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    match bytes {
        b if b < KB => format!("{b} bytes"),
        b if b < MB => format!("{:.2} KB", b as f64 / KB as f64),
        b if b < GB => format!("{:.2} MB", b as f64 / MB as f64),
        b => format!("{:.2} GB", b as f64 / GB as f64),
    }
}

/// Formats a count with comma thousands separators.
#[must_use]
pub fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}
