//! Sequential upload pipeline
//!
//! Per file: `Received -> [Renamed] -> Uploading -> Uploaded -> Disposed`.
//! Any failure before `Uploaded` leaves the source exactly as found. A
//! failure while disposing leaves the source in place although the remote
//! copy exists; it is reported separately because the file will be uploaded
//! again if it is ever re-detected.

use crate::client::PaperlessClient;
use crate::disposition::{dispose, Disposed};
use crate::request::UploadRequest;
use crate::staging::StagedCopy;
use crate::Result;
use paperlink_core::{Config, Disposition, ReadyPath};
use std::fmt;
use std::path::PathBuf;
use tokio::sync::{mpsc, watch};
use tracing::{debug, error, info, warn};

/// Pipeline stage, for logging
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Received,
    Renamed,
    Uploading,
    Uploaded,
    Disposed,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Received => "received",
            Stage::Renamed => "renamed",
            Stage::Uploading => "uploading",
            Stage::Uploaded => "uploaded",
            Stage::Disposed => "disposed",
        };
        f.write_str(name)
    }
}

/// Successful run of the pipeline for one file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Processed {
    pub title: String,
    pub status: u16,
    pub disposed: Disposed,
}

/// Counters reported when the pipeline loop ends
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunStats {
    pub uploaded: usize,
    pub failed: usize,
    pub undisposed: usize,
}

/// Uploads ready files one at a time
#[derive(Debug, Clone)]
pub struct Pipeline {
    client: PaperlessClient,
    rename_to_uuid: bool,
    disposition: Disposition,
    staging_dir: PathBuf,
}

impl Pipeline {
    pub fn new(
        client: PaperlessClient,
        rename_to_uuid: bool,
        disposition: Disposition,
        staging_dir: Option<PathBuf>,
    ) -> Self {
        Self {
            client,
            rename_to_uuid,
            disposition,
            staging_dir: staging_dir.unwrap_or_else(std::env::temp_dir),
        }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self::new(
            PaperlessClient::from_config(config)?,
            config.rename_to_uuid,
            config.disposition.clone(),
            config.staging_dir.clone(),
        ))
    }

    /// Upload one file and dispose of it
    pub async fn process(&self, ready: &ReadyPath) -> Result<Processed> {
        let source = ready.path();
        debug!(file = %source.display(), stage = %Stage::Received, "pipeline stage");

        // Dropped at the end of this call on every path
        let staged = if self.rename_to_uuid {
            let staged = StagedCopy::create(source, &self.staging_dir).await?;
            info!(
                uuid_name = %staged.file_name(),
                original = %source.display(),
                "file copied with uuid name for upload"
            );
            debug!(file = %source.display(), stage = %Stage::Renamed, "pipeline stage");
            Some(staged)
        } else {
            None
        };
        let upload_path = staged.as_ref().map_or(source, |s| s.path());

        let request = UploadRequest::new(source, upload_path);
        debug!(file = %source.display(), stage = %Stage::Uploading, "pipeline stage");
        let outcome = self.client.post_document(&request).await?;
        info!(file = %source.display(), title = %request.title, "upload successful");
        debug!(file = %source.display(), stage = %Stage::Uploaded, "pipeline stage");

        let disposed = dispose(&self.disposition, source).await?;
        debug!(file = %source.display(), stage = %Stage::Disposed, "pipeline stage");

        Ok(Processed {
            title: request.title,
            status: outcome.status,
            disposed,
        })
    }

    /// Upload from `ready_rx` sequentially until it closes or shutdown is set
    ///
    /// Failures are contained per file; the loop always moves on. Once
    /// `shutdown` flips, the file in flight is finished and anything still
    /// queued is left behind.
    pub async fn run(
        self,
        mut ready_rx: mpsc::Receiver<ReadyPath>,
        mut shutdown: watch::Receiver<bool>,
    ) -> RunStats {
        let mut stats = RunStats::default();

        loop {
            let ready = tokio::select! {
                biased;

                _ = shutdown.wait_for(|stop| *stop) => {
                    debug!("shutdown requested, leaving queued files");
                    break;
                }
                ready = ready_rx.recv() => match ready {
                    Some(ready) => ready,
                    None => break,
                },
            };

            let file = ready.path().display().to_string();
            info!(file = %file, "starting upload");

            match self.process(&ready).await {
                Ok(processed) => {
                    stats.uploaded += 1;
                    debug!(
                        file = %file,
                        title = %processed.title,
                        status = processed.status,
                        "file done"
                    );
                }
                Err(err) if err.is_post_upload() => {
                    stats.undisposed += 1;
                    error!(
                        file = %file,
                        error = %err,
                        "uploaded but not disposed; file stays and may be uploaded again"
                    );
                }
                Err(err) => {
                    stats.failed += 1;
                    warn!(
                        file = %file,
                        status = err.status(),
                        error = %err,
                        "upload failed, file left in place"
                    );
                }
            }
        }

        info!(
            uploaded = stats.uploaded,
            failed = stats.failed,
            undisposed = stats.undisposed,
            "upload pipeline stopped"
        );
        stats
    }
}
