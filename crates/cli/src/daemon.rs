//! Daemon lifecycle: watcher, upload loop and signal handling

use anyhow::{Context, Result};
use paperlink_core::{Config, Disposition};
use tokio::sync::watch;
use tracing::{info, warn};
use uploader::{Pipeline, RunStats};
use watcher::{WatchOptions, Watcher};

/// Run until SIGINT/SIGTERM, finish the file in flight and return the upload counters
///
/// Fails only on setup errors (backup dir, http client, watch attach).
pub async fn run(config: Config) -> Result<RunStats> {
    if let Disposition::Backup(dir) = &config.disposition {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Cannot create backup dir {}", dir.display()))?;
    }

    let pipeline = Pipeline::from_config(&config).context("Failed to build http client")?;

    let (stop_tx, stop_rx) = watch::channel(false);
    let (watcher, ready_rx) = Watcher::start(WatchOptions::from_config(&config), stop_rx.clone())
        .context("Failed to start watcher")?;

    tokio::spawn(async move {
        let signal = shutdown_signal().await;
        info!(signal, "received signal, shutting down");
        let _ = stop_tx.send(true);
    });

    info!(
        dir = %watcher.dir().display(),
        extensions = %config.allowed_exts,
        after_upload = %config.disposition.action(),
        rename_uuid = config.rename_to_uuid,
        "watching for files"
    );

    let stats = pipeline.run(ready_rx, stop_rx).await;
    watcher.join().await;
    Ok(stats)
}

#[cfg(unix)]
async fn shutdown_signal() -> &'static str {
    use tokio::signal::unix::{signal, SignalKind};

    match signal(SignalKind::terminate()) {
        Ok(mut term) => tokio::select! {
            _ = tokio::signal::ctrl_c() => "SIGINT",
            _ = term.recv() => "SIGTERM",
        },
        Err(err) => {
            warn!(error = %err, "cannot listen for SIGTERM, only SIGINT will stop the daemon");
            let _ = tokio::signal::ctrl_c().await;
            "SIGINT"
        }
    }
}

#[cfg(not(unix))]
async fn shutdown_signal() -> &'static str {
    let _ = tokio::signal::ctrl_c().await;
    "ctrl-c"
}
