//! Readiness probe
//!
//! A stable path may still be briefly unstat-able (network shares, atomic
//! renames by the producer). Poll until it is, or give up for good.

use crate::WatchError;
use std::fs::Metadata;
use std::path::Path;
use std::time::Duration;
use tokio::time::{sleep, Instant};

/// Wait until `path` can be stat'ed, polling every `poll_interval`
pub async fn wait_ready(
    path: &Path,
    timeout: Duration,
    poll_interval: Duration,
) -> Result<Metadata, WatchError> {
    let deadline = Instant::now() + timeout;

    loop {
        match tokio::fs::metadata(path).await {
            Ok(meta) => return Ok(meta),
            Err(source) if Instant::now() >= deadline => {
                return Err(WatchError::NotReady {
                    path: path.to_path_buf(),
                    timeout,
                    source,
                })
            }
            Err(_) => sleep(poll_interval).await,
        }
    }
}
