//! Native event source
//!
//! Wraps notify's recommended backend (inotify, FSEvents, ...) attached
//! non-recursively to a single directory.

use crate::event::{RawEvent, RawOp};
use crate::WatchError;
use notify::event::{ModifyKind, RenameMode};
use notify::{EventKind, RecommendedWatcher, RecursiveMode, Watcher as _};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{error, trace};

/// Live native watch; dropping it detaches the watch
pub struct NativeSource {
    dir: PathBuf,
    _watcher: RecommendedWatcher,
}

impl NativeSource {
    /// Attach to `dir` and forward raw events into `raw_tx`
    ///
    /// `poll_interval` is only a hint for polling backends.
    pub fn attach(
        dir: &Path,
        poll_interval: Duration,
        raw_tx: mpsc::Sender<RawEvent>,
    ) -> Result<Self, WatchError> {
        let handler = move |res: notify::Result<notify::Event>| match res {
            Ok(event) => {
                let op = RawOp::from_kind(&event.kind);
                // A same-directory rename reports [from, to]; only `to` is new
                let paths = if matches!(
                    event.kind,
                    EventKind::Modify(ModifyKind::Name(RenameMode::Both))
                ) {
                    event.paths.last().cloned().into_iter().collect()
                } else {
                    event.paths
                };
                for path in paths {
                    trace!(file = %path.display(), ?op, "raw event");
                    if raw_tx.blocking_send(RawEvent::new(path, op)).is_err() {
                        // Engine has stopped
                        return;
                    }
                }
            }
            Err(err) => error!(error = %err, "watcher error"),
        };

        let config = notify::Config::default().with_poll_interval(poll_interval);
        let mut watcher = RecommendedWatcher::new(handler, config).map_err(|source| {
            WatchError::Setup {
                path: dir.to_path_buf(),
                source,
            }
        })?;
        watcher
            .watch(dir, RecursiveMode::NonRecursive)
            .map_err(|source| WatchError::Setup {
                path: dir.to_path_buf(),
                source,
            })?;

        Ok(Self {
            dir: dir.to_path_buf(),
            _watcher: watcher,
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl std::fmt::Debug for NativeSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NativeSource").field("dir", &self.dir).finish()
    }
}
