//! What gets uploaded, and under which name

use std::path::{Path, PathBuf};

/// Fallback content type for unknown extensions
pub const OCTET_STREAM: &str = "application/octet-stream";

/// A single document upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadRequest {
    /// The file found in the watch directory
    pub source_path: PathBuf,
    /// The file actually sent (the source itself or its staged copy)
    pub upload_path: PathBuf,
    /// Stem of the source filename
    pub title: String,
    /// MIME type inferred from the uploaded file's extension
    pub content_type: String,
}

impl UploadRequest {
    pub fn new(source_path: &Path, upload_path: &Path) -> Self {
        Self {
            source_path: source_path.to_path_buf(),
            upload_path: upload_path.to_path_buf(),
            title: title_for(source_path),
            content_type: content_type_for(upload_path),
        }
    }

    /// Filename of the multipart document part
    pub fn file_name(&self) -> String {
        self.upload_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// Document title: the filename with its last extension stripped
pub fn title_for(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// MIME type for `path`'s extension, `application/octet-stream` when unknown
pub fn content_type_for(path: &Path) -> String {
    mime_guess::from_path(path)
        .first()
        .map(|m| m.essence_str().to_string())
        .unwrap_or_else(|| OCTET_STREAM.to_string())
}
