// src/poll/mod.rs

use anyhow::{Context, Result};
use chrono::Utc;
use std::io::Write;
use tokio::{
    sync::watch,
    time::{interval, MissedTickBehavior},
};
use tracing::{error, info, instrument};

use crate::{
    config::WatchConfig,
    report::{self, Report},
    stats, table,
};

/// One observation of the configured path.
///
/// Absence is a report, not an error. A file that is present but yields no
/// mean (unreadable, malformed, column absent or non-numeric) is an error;
/// the loop decides what to do with it.
#[instrument(level = "debug", skip(cfg), fields(path = %cfg.data_path.display()))]
pub fn poll_once(cfg: &WatchConfig) -> Result<Report> {
    if !cfg.data_path.exists() {
        return Ok(Report::Missing {
            path: cfg.data_path.clone(),
            observed_at: Utc::now(),
        });
    }

    let snapshot = table::load_snapshot(&cfg.data_path, cfg.delimiter_byte())?;
    let mean = stats::mean_of(&snapshot.batch, &cfg.column)?;
    Ok(Report::Mean {
        column: cfg.column.clone(),
        mean,
        rows: snapshot.batch.num_rows(),
        path: snapshot.path,
        observed_at: snapshot.loaded_at,
    })
}

/// Run the poll loop until `shutdown` fires.
///
/// Every interval the loop observes the path once and writes the report to
/// `out`. A cycle that fails is logged at error level and skipped; it never
/// stops the loop. The first check happens immediately, then the interval
/// cadence takes over; a slow read delays the next check rather than
/// bursting to catch up.
pub async fn run<W>(cfg: WatchConfig, mut shutdown: watch::Receiver<bool>, mut out: W) -> Result<()>
where
    W: Write + Send + 'static,
{
    let mut ticker = interval(cfg.poll_interval());
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    info!(
        path = %cfg.data_path.display(),
        column = %cfg.column,
        interval_secs = cfg.poll_interval_secs,
        "poll loop started"
    );

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                match observe(&cfg).await {
                    Ok(report) => report::emit(&mut out, &report, cfg.format)?,
                    Err(err) => {
                        error!(
                            path = %cfg.data_path.display(),
                            error = ?err,
                            "poll cycle failed; next cycle will try again"
                        );
                    }
                }
            }
            _ = shutdown.changed() => {
                info!("shutdown signal received; poll loop stopping");
                break;
            }
        }
    }

    Ok(())
}

/// The exists/read/parse work is all blocking file I/O, so each cycle runs it
/// on the blocking pool.
async fn observe(cfg: &WatchConfig) -> Result<Report> {
    let cfg = cfg.clone();
    tokio::task::spawn_blocking(move || poll_once(&cfg))
        .await
        .context("poll task panicked or was cancelled")?
}
