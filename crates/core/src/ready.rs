//! Stable, filtered, accessible paths handed to the uploader

use std::path::{Path, PathBuf};

/// A file whose write session has ended and which passed the filter and probe
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadyPath {
    path: PathBuf,
    extension: Option<String>,
}

impl ReadyPath {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let extension = path
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase());
        Self { path, extension }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Lower-cased extension without the leading dot
    pub fn extension(&self) -> Option<&str> {
        self.extension.as_deref()
    }
}
