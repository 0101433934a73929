use anyhow::{bail, Context, Result};
use std::{env, path::PathBuf};
use tempwatch::{config::DEFAULT_DATA_PATH, stats, table};
use tracing_subscriber::{fmt, EnvFilter};

/// One-shot look at a sample file: what the watcher would see, column by
/// column. Usage: inspect [DATA_PATH] [DELIMITER]
fn main() -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let path = env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_PATH));
    let delimiter = match env::args().nth(2) {
        Some(arg) => parse_delimiter(&arg)?,
        None => b',',
    };

    tracing::info!(path = %path.display(), "inspecting sample file");

    let snapshot = table::load_snapshot(&path, delimiter)
        .with_context(|| format!("loading {}", path.display()))?;
    let summaries = stats::summarize(&snapshot.batch);

    println!(
        "{}: {} rows, {} columns",
        snapshot.path.display(),
        snapshot.batch.num_rows(),
        snapshot.batch.num_columns()
    );
    println!(
        "{:<20} {:<12} {:>8} {:>8} {:>12} {:>12} {:>12}",
        "column", "type", "values", "missing", "mean", "min", "max"
    );
    for summary in &summaries {
        println!(
            "{:<20} {:<12} {:>8} {:>8} {:>12} {:>12} {:>12}",
            summary.name,
            format!("{:?}", summary.data_type),
            summary.values,
            summary.missing,
            fmt_num(summary.mean),
            fmt_num(summary.min),
            fmt_num(summary.max),
        );
    }

    Ok(())
}

fn fmt_num(value: Option<f64>) -> String {
    value
        .map(|v| format!("{v:.3}"))
        .unwrap_or_else(|| "-".to_string())
}

fn parse_delimiter(arg: &str) -> Result<u8> {
    let mut chars = arg.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c.is_ascii() => Ok(c as u8),
        _ => bail!("delimiter must be a single ASCII character, got {arg:?}"),
    }
}
