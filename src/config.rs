// src/config.rs

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use crate::report::ReportFormat;

/// Path checked on every cycle when no config file is given.
pub const DEFAULT_DATA_PATH: &str = "files/temps.txt";

/// Column whose mean is reported by default.
pub const DEFAULT_COLUMN: &str = "st1";

/// Seconds between successive checks of the data path.
pub const DEFAULT_POLL_INTERVAL_SECS: f64 = 10.0;

/// Upper bound on the poll interval; anything above this is a config typo,
/// and `Duration::from_secs_f64` must never be fed an overflowing value.
const MAX_POLL_INTERVAL_SECS: f64 = 31_536_000.0;

/// Everything the watcher needs for one run: where to look, which column to
/// average, how often to look, and how to write the result.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WatchConfig {
    /// Delimited sample file checked each cycle.
    pub data_path: PathBuf,
    /// Column whose arithmetic mean is reported.
    pub column: String,
    /// Delay between successive checks, in seconds. Fractions are allowed.
    pub poll_interval_secs: f64,
    /// Field delimiter in the sample file.
    pub delimiter: char,
    /// Stdout line format.
    pub format: ReportFormat,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from(DEFAULT_DATA_PATH),
            column: DEFAULT_COLUMN.to_string(),
            poll_interval_secs: DEFAULT_POLL_INTERVAL_SECS,
            delimiter: ',',
            format: ReportFormat::Plain,
        }
    }
}

impl WatchConfig {
    /// Read a config from a YAML file. Unknown keys are rejected so a typo
    /// cannot silently fall back to a default.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        serde_yaml::from_str(&text)
            .with_context(|| format!("parsing config file {}", path.display()))
    }

    /// Reject configs the loop cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.data_path.as_os_str().is_empty() {
            bail!("data_path must not be empty");
        }
        if self.column.trim().is_empty() {
            bail!("column must not be empty");
        }
        if !self.poll_interval_secs.is_finite() || self.poll_interval_secs <= 0.0 {
            bail!("poll_interval_secs must be a positive number of seconds");
        }
        if self.poll_interval_secs > MAX_POLL_INTERVAL_SECS {
            bail!(
                "poll_interval_secs must be at most {} (one year)",
                MAX_POLL_INTERVAL_SECS
            );
        }
        if !self.delimiter.is_ascii() {
            bail!("delimiter {:?} is not a single-byte character", self.delimiter);
        }
        Ok(())
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs_f64(self.poll_interval_secs)
    }

    /// Delimiter as the single byte the csv reader wants. `validate` has
    /// already ruled out multi-byte characters.
    pub fn delimiter_byte(&self) -> u8 {
        self.delimiter as u8
    }
}
