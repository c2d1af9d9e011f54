//! Directory watching for Paperlink
//!
//! This crate turns native filesystem notifications for one directory into a
//! bounded queue of `ReadyPath`s:
//! - Native, non-recursive watch via notify
//! - Sliding-window per-path debouncing on a single owner task
//! - Extension filtering and a readiness probe
//! - Optional startup scan of files already present

pub mod debounce;
pub mod event;
pub mod gate;
pub mod probe;
pub mod scan;
pub mod source;

pub use debounce::{Debouncer, TimerFired};
pub use event::{RawEvent, RawOp};
pub use gate::ProbeSettings;
pub use probe::wait_ready;
pub use source::NativeSource;

use paperlink_core::{Config, ExtensionSet, ReadyPath, DEBOUNCE_DELAY, READY_QUEUE_CAPACITY};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{info, warn};

/// Capacity of the channel between the native callback and the engine
const RAW_QUEUE_CAPACITY: usize = 1024;

/// Watcher errors
#[derive(Debug, Error)]
pub enum WatchError {
    #[error("cannot resolve watch directory {path}: {source}")]
    Resolve {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("watch path is not a directory: {0}")]
    NotADirectory(PathBuf),

    #[error("failed to attach watcher to {path}: {source}")]
    Setup {
        path: PathBuf,
        source: notify::Error,
    },

    #[error("file not accessible after {timeout:?}: {path}")]
    NotReady {
        path: PathBuf,
        timeout: Duration,
        source: std::io::Error,
    },

    #[error("failed to scan {path}: {source}")]
    Scan {
        path: PathBuf,
        source: walkdir::Error,
    },
}

/// Watcher settings
#[derive(Debug, Clone)]
pub struct WatchOptions {
    pub dir: PathBuf,
    pub allowed_exts: ExtensionSet,
    pub poll_interval: Duration,
    pub scan_existing: bool,
    pub debounce_delay: Duration,
    pub probe: ProbeSettings,
    pub queue_capacity: usize,
}

impl WatchOptions {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            allowed_exts: ExtensionSet::allow_all(),
            poll_interval: paperlink_core::DEFAULT_POLL_INTERVAL,
            scan_existing: false,
            debounce_delay: DEBOUNCE_DELAY,
            probe: ProbeSettings::default(),
            queue_capacity: READY_QUEUE_CAPACITY,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self {
            allowed_exts: config.allowed_exts.clone(),
            poll_interval: config.poll_interval,
            scan_existing: config.scan_existing,
            ..Self::new(&config.watch_dir)
        }
    }
}

/// Running watcher: native source plus the engine and gate tasks
#[derive(Debug)]
pub struct Watcher {
    source: NativeSource,
    tasks: Vec<JoinHandle<()>>,
}

impl Watcher {
    /// Attach to the directory and start the pipeline up to the ready queue
    ///
    /// Must be called from within a tokio runtime. The returned receiver
    /// closes once `shutdown` is signaled and the stages have stopped.
    pub fn start(
        opts: WatchOptions,
        shutdown: watch::Receiver<bool>,
    ) -> Result<(Self, mpsc::Receiver<ReadyPath>), WatchError> {
        let dir = opts
            .dir
            .canonicalize()
            .map_err(|source| WatchError::Resolve {
                path: opts.dir.clone(),
                source,
            })?;
        if !dir.is_dir() {
            return Err(WatchError::NotADirectory(dir));
        }

        let (raw_tx, raw_rx) = mpsc::channel(RAW_QUEUE_CAPACITY);
        let (stable_tx, stable_rx) = mpsc::channel(opts.queue_capacity);
        let (ready_tx, ready_rx) = mpsc::channel(opts.queue_capacity);

        let source = NativeSource::attach(&dir, opts.poll_interval, raw_tx.clone())?;
        info!(dir = %dir.display(), "watching directory");

        let mut tasks = vec![
            Debouncer::spawn(opts.debounce_delay, raw_rx, stable_tx, shutdown.clone()),
            tokio::spawn(gate::run_gate(
                stable_rx,
                ready_tx,
                opts.allowed_exts,
                opts.probe,
                shutdown,
            )),
        ];

        // Attached first, so nothing dropped in between is missed
        if opts.scan_existing {
            match scan::existing_files(&dir) {
                Ok(files) => {
                    info!(count = files.len(), "queuing files found at startup");
                    tasks.push(tokio::spawn(async move {
                        for path in files {
                            if raw_tx.send(RawEvent::new(path, RawOp::Create)).await.is_err() {
                                break;
                            }
                        }
                    }));
                }
                Err(err) => warn!(error = %err, "startup scan failed"),
            }
        }

        Ok((Self { source, tasks }, ready_rx))
    }

    /// Canonical path of the watched directory
    pub fn dir(&self) -> &Path {
        self.source.dir()
    }

    /// Wait for the engine and gate tasks to finish, then detach the watch
    pub async fn join(self) {
        for task in self.tasks {
            let _ = task.await;
        }
    }
}
