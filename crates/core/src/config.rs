//! Validated runtime configuration
//!
//! The binary assembles a `Config` from flags and an optional config file;
//! every other crate only ever sees the validated result.

use crate::filter::ExtensionSet;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} is required")]
    Missing(&'static str),

    #[error("invalid base url '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("after-upload must be 'delete' or 'backup', got '{0}'")]
    InvalidAfterUpload(String),

    #[error("backup-dir is required when after-upload=backup")]
    MissingBackupDir,
}

/// Post-upload action as written in flags or the config file
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AfterUpload {
    #[default]
    Delete,
    Backup,
}

impl FromStr for AfterUpload {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "delete" => Ok(AfterUpload::Delete),
            "backup" => Ok(AfterUpload::Backup),
            _ => Err(ConfigError::InvalidAfterUpload(s.to_string())),
        }
    }
}

impl fmt::Display for AfterUpload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AfterUpload::Delete => f.write_str("delete"),
            AfterUpload::Backup => f.write_str("backup"),
        }
    }
}

/// What happens to the source file after a successful upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Disposition {
    /// Remove the original file
    Delete,
    /// Move the original file into this directory, keeping its basename
    Backup(PathBuf),
}

impl Disposition {
    /// Resolve the configured action and backup directory into a disposition
    pub fn resolve(action: AfterUpload, backup_dir: Option<PathBuf>) -> Result<Self, ConfigError> {
        match action {
            AfterUpload::Delete => Ok(Disposition::Delete),
            AfterUpload::Backup => match backup_dir {
                Some(dir) if !dir.as_os_str().is_empty() => Ok(Disposition::Backup(dir)),
                _ => Err(ConfigError::MissingBackupDir),
            },
        }
    }

    pub fn action(&self) -> AfterUpload {
        match self {
            Disposition::Delete => AfterUpload::Delete,
            Disposition::Backup(_) => AfterUpload::Backup,
        }
    }
}

/// Runtime configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory watched (non-recursively) for new files
    pub watch_dir: PathBuf,

    /// Paperless base URL, e.g. `https://paperless.example.com`
    pub base_url: String,

    /// API token sent as `Authorization: Token <token>`
    pub token: String,

    /// Accepted extensions (empty = all)
    pub allowed_exts: ExtensionSet,

    /// Upload a uuid-named copy instead of the original filename
    pub rename_to_uuid: bool,

    /// Post-upload action
    pub disposition: Disposition,

    /// Where uuid-named copies are staged (OS temp dir when unset)
    pub staging_dir: Option<PathBuf>,

    /// Fallback poll interval for the native watcher backend
    pub poll_interval: Duration,

    /// Queue files already present in the watch directory at startup
    pub scan_existing: bool,
}

impl Config {
    /// Check that required fields are present and the base url is usable
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.watch_dir.as_os_str().is_empty() {
            return Err(ConfigError::Missing("dir"));
        }
        if self.base_url.trim().is_empty() {
            return Err(ConfigError::Missing("url"));
        }
        if self.token.is_empty() {
            return Err(ConfigError::Missing("token"));
        }

        let parsed = url::Url::parse(&self.base_url).map_err(|e| ConfigError::InvalidUrl {
            url: self.base_url.clone(),
            reason: e.to_string(),
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidUrl {
                url: self.base_url.clone(),
                reason: format!("unsupported scheme '{}'", parsed.scheme()),
            });
        }

        if let Disposition::Backup(dir) = &self.disposition {
            if dir.as_os_str().is_empty() {
                return Err(ConfigError::MissingBackupDir);
            }
        }

        Ok(())
    }
}
