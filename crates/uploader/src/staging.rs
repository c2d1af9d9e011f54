//! Uuid-named staging copies
//!
//! The copy lives exactly as long as the guard: dropping a `StagedCopy`
//! removes the file, whether the upload succeeded or not.

use crate::disposition::copy_file;
use crate::{Result, UploadError};
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use uuid::Uuid;

/// A temporary copy of a source file under a fresh uuid name
#[derive(Debug)]
pub struct StagedCopy {
    path: PathBuf,
}

impl StagedCopy {
    /// Copy `source` into `staging_dir` as `<uuid>.<original extension>`
    pub async fn create(source: &Path, staging_dir: &Path) -> Result<Self> {
        let name = match source.extension() {
            Some(ext) => format!("{}.{}", Uuid::new_v4(), ext.to_string_lossy()),
            None => Uuid::new_v4().to_string(),
        };

        // Guard first so a partial copy is cleaned up too
        let staged = Self {
            path: staging_dir.join(name),
        };
        copy_file(source, &staged.path)
            .await
            .map_err(|source_err| UploadError::Stage {
                path: source.to_path_buf(),
                source: source_err,
            })?;

        Ok(staged)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

impl Drop for StagedCopy {
    fn drop(&mut self) {
        match std::fs::remove_file(&self.path) {
            Ok(()) => debug!(path = %self.path.display(), "removed staged copy"),
            Err(err) if err.kind() == io::ErrorKind::NotFound => {}
            Err(err) => {
                warn!(path = %self.path.display(), error = %err, "could not remove staged copy")
            }
        }
    }
}
