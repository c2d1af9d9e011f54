//! Upload pipeline for Paperlink
//!
//! Ships each ready file to Paperless-ngx and then disposes of the original:
//! - Optional uuid-named staging copy, removed on every exit path
//! - Multipart POST to `/api/documents/post_document/`
//! - Delete or move-to-backup, only after the upload succeeded

pub mod client;
pub mod disposition;
pub mod pipeline;
pub mod request;
pub mod staging;

pub use client::{PaperlessClient, UploadOutcome};
pub use disposition::{dispose, Disposed};
pub use pipeline::{Pipeline, Processed, RunStats, Stage};
pub use request::UploadRequest;
pub use staging::StagedCopy;

use paperlink_core::AfterUpload;
use std::path::PathBuf;
use thiserror::Error;

/// Per-file pipeline errors
#[derive(Debug, Error)]
pub enum UploadError {
    #[error("failed to stage uuid copy of {path}: {source}")]
    Stage {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to build http request: {0}")]
    Client(#[source] reqwest::Error),

    #[error("http post to {endpoint} failed: {source}")]
    Transport {
        endpoint: String,
        source: reqwest::Error,
    },

    #[error("paperless returned HTTP {status}: {body}")]
    Rejected { status: u16, body: String },

    #[error("uploaded but {action} of {path} failed: {source}")]
    Disposition {
        path: PathBuf,
        action: AfterUpload,
        source: std::io::Error,
    },
}

impl UploadError {
    /// True when the remote copy already exists but the local file was kept
    pub fn is_post_upload(&self) -> bool {
        matches!(self, UploadError::Disposition { .. })
    }

    /// HTTP status of a rejected upload
    pub fn status(&self) -> Option<u16> {
        match self {
            UploadError::Rejected { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Result type for upload operations
pub type Result<T> = std::result::Result<T, UploadError>;
