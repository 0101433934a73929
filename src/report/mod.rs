// src/report/mod.rs

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{fmt, io::Write, path::PathBuf};

/// The fixed line written when the data file is absent.
pub const FILE_ABSENT_MESSAGE: &str = "file does not exist";

/// How report lines are rendered on stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    /// The bare mean value, or the fixed absence line.
    Plain,
    /// One JSON object per line.
    Json,
}

/// Outcome of one poll cycle that has something to say on stdout. Cycles
/// that fail (unreadable file, missing column) produce no report at all,
/// only an error log.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Report {
    /// The file was present and the configured column was averaged.
    Mean {
        column: String,
        mean: f64,
        rows: usize,
        path: PathBuf,
        observed_at: DateTime<Utc>,
    },
    /// Nothing at the configured path.
    Missing {
        path: PathBuf,
        observed_at: DateTime<Utc>,
    },
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Report::Mean { mean, .. } => write!(f, "{mean}"),
            Report::Missing { .. } => f.write_str(FILE_ABSENT_MESSAGE),
        }
    }
}

/// Write one report line and flush it, so the output is observable while the
/// loop sleeps.
pub fn emit<W: Write>(out: &mut W, report: &Report, format: ReportFormat) -> Result<()> {
    match format {
        ReportFormat::Plain => writeln!(out, "{report}").context("writing report line")?,
        ReportFormat::Json => {
            let line = serde_json::to_string(report).context("serializing report")?;
            writeln!(out, "{line}").context("writing report line")?;
        }
    }
    out.flush().context("flushing report line")
}
