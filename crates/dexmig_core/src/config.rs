//! Run configuration.

use crate::error::{MigrateError, MigrateResult};

/// Smallest accepted progress interval.
pub const MIN_PROGRESS_INTERVAL: usize = 100;

/// Configuration for an import run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Lines between progress reports while reading the file.
    pub read_progress_interval: usize,

    /// Records between progress reports while resolving a table.
    pub resolve_progress_interval: usize,

    /// Retry a failed batch row by row instead of halting.
    pub row_fallback: bool,

    /// Rows of a failed batch copied into the skipped-records log.
    pub sample_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            read_progress_interval: 10_000,
            resolve_progress_interval: 5_000,
            row_fallback: false,
            sample_size: 3,
        }
    }
}

impl Config {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the read progress interval.
    #[must_use]
    pub const fn read_progress_interval(mut self, lines: usize) -> Self {
        self.read_progress_interval = lines;
        self
    }

    /// Sets the resolve progress interval.
    #[must_use]
    pub const fn resolve_progress_interval(mut self, records: usize) -> Self {
        self.resolve_progress_interval = records;
        self
    }

    /// Enables or disables row-by-row fallback after a batch failure.
    #[must_use]
    pub const fn row_fallback(mut self, value: bool) -> Self {
        self.row_fallback = value;
        self
    }

    /// Sets how many rows of a failed batch are logged.
    #[must_use]
    pub const fn sample_size(mut self, rows: usize) -> Self {
        self.sample_size = rows;
        self
    }

    /// Checks the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`MigrateError::InvalidConfig`] if a progress interval is
    /// below [`MIN_PROGRESS_INTERVAL`].
    pub fn validate(&self) -> MigrateResult<()> {
        for (name, value) in [
            ("read_progress_interval", self.read_progress_interval),
            ("resolve_progress_interval", self.resolve_progress_interval),
        ] {
            if value < MIN_PROGRESS_INTERVAL {
                return Err(MigrateError::invalid_config(format!(
                    "{name} must be at least {MIN_PROGRESS_INTERVAL}, got {value}"
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = Config::default();
        assert_eq!(config.read_progress_interval, 10_000);
        assert_eq!(config.resolve_progress_interval, 5_000);
        assert!(!config.row_fallback);
        assert_eq!(config.sample_size, 3);
        config.validate().unwrap();
    }

    #[test]
    fn builder_pattern() {
        let config = Config::new()
            .read_progress_interval(500)
            .row_fallback(true)
            .sample_size(5);

        assert_eq!(config.read_progress_interval, 500);
        assert!(config.row_fallback);
        assert_eq!(config.sample_size, 5);
    }

    #[test]
    fn tiny_intervals_are_rejected() {
        let err = Config::new().resolve_progress_interval(10).validate().unwrap_err();
        assert!(matches!(err, MigrateError::InvalidConfig { .. }));
        assert!(err.to_string().contains("resolve_progress_interval"));
    }
}
