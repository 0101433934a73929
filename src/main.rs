use anyhow::Result;
use std::{env, io};
use tempwatch::{config::WatchConfig, poll};
use tokio::sync::watch;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    // stdout is the report stream, so all diagnostics go to stderr
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_writer(io::stderr)
        .with_span_events(fmt::format::FmtSpan::CLOSE)
        .init();
    info!("startup");

    std::panic::set_hook(Box::new(|info| {
        eprintln!("panic: {:?}", info);
    }));

    // ─── 2) load config ──────────────────────────────────────────────
    let cfg = match env::args().nth(1) {
        Some(path) => WatchConfig::load(&path)?,
        None => WatchConfig::default(),
    };
    cfg.validate()?;
    info!(
        path = %cfg.data_path.display(),
        column = %cfg.column,
        interval_secs = cfg.poll_interval_secs,
        "watching for samples"
    );

    // ─── 3) wire up shutdown ─────────────────────────────────────────
    let (tx, rx) = watch::channel(false);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("ctrl-c received; stopping");
            let _ = tx.send(true);
        }
    });

    // ─── 4) poll until told to stop ──────────────────────────────────
    poll::run(cfg, rx, io::stdout()).await?;

    info!("all done");
    Ok(())
}
