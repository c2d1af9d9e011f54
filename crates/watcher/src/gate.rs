//! Filter-and-probe stage between the debounce engine and the ready queue

use crate::debounce::shutdown_signaled;
use crate::probe::wait_ready;
use paperlink_core::{allowed, ExtensionSet, ReadyPath};
use std::path::PathBuf;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tracing::{debug, info, warn};

/// Readiness probe timing
#[derive(Debug, Clone, Copy)]
pub struct ProbeSettings {
    pub timeout: Duration,
    pub poll_interval: Duration,
}

impl Default for ProbeSettings {
    fn default() -> Self {
        Self {
            timeout: paperlink_core::READY_TIMEOUT,
            poll_interval: paperlink_core::READY_POLL_INTERVAL,
        }
    }
}

/// Forward stable paths that pass the extension filter and readiness probe
///
/// Sending into `ready_tx` blocks while the queue is full; nothing is dropped
/// for backpressure.
pub async fn run_gate(
    mut stable_rx: mpsc::Receiver<PathBuf>,
    ready_tx: mpsc::Sender<ReadyPath>,
    exts: ExtensionSet,
    probe: ProbeSettings,
    mut shutdown: watch::Receiver<bool>,
) {
    loop {
        let path = tokio::select! {
            biased;

            _ = shutdown_signaled(&mut shutdown) => return,
            path = stable_rx.recv() => match path {
                Some(path) => path,
                None => return,
            },
        };

        if !allowed(&path, &exts) {
            debug!(file = %path.display(), "skipping file (extension not allowed)");
            continue;
        }

        let meta = match wait_ready(&path, probe.timeout, probe.poll_interval).await {
            Ok(meta) => meta,
            Err(err) => {
                warn!(file = %path.display(), error = %err, "file not accessible, skipping");
                continue;
            }
        };
        if meta.is_dir() {
            debug!(file = %path.display(), "skipping directory");
            continue;
        }

        info!(file = %path.display(), bytes = meta.len(), "new file detected, queuing upload");
        tokio::select! {
            biased;

            _ = shutdown_signaled(&mut shutdown) => return,
            sent = ready_tx.send(ReadyPath::new(path)) => {
                if sent.is_err() {
                    debug!("ready queue closed, stopping gate");
                    return;
                }
            }
        }
    }
}
