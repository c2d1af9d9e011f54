//! Command-line flags and config file
//!
//! Flags override values from the optional TOML file. The result is the
//! validated `Config` the daemon runs with, plus logging settings that are
//! needed before validation so errors can be logged.

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use paperlink_core::{
    AfterUpload, Config, ConfigError, Disposition, ExtensionSet, DEFAULT_POLL_INTERVAL,
};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Paperlink - ship scanned documents from a folder to Paperless-ngx
#[derive(Parser, Debug, Default)]
#[command(name = "paperlink")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Directory to watch for new files (required)
    #[arg(long)]
    pub dir: Option<PathBuf>,

    /// Paperless-ngx base URL, e.g. https://paperless.example.com (required)
    #[arg(long)]
    pub url: Option<String>,

    /// Paperless-ngx API token (required)
    #[arg(long, env = "PAPERLINK_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Comma-separated allowed file extensions, e.g. pdf,png (empty = all)
    #[arg(long)]
    pub ext: Option<String>,

    /// Upload a uuid-named copy; the original name is used as title
    #[arg(long)]
    pub rename_uuid: bool,

    /// Action after upload: delete | backup
    #[arg(long, value_name = "ACTION")]
    pub after_upload: Option<AfterUpload>,

    /// Backup directory (required when --after-upload=backup)
    #[arg(long)]
    pub backup_dir: Option<PathBuf>,

    /// Where uuid-named copies are staged (default: system temp dir)
    #[arg(long)]
    pub staging_dir: Option<PathBuf>,

    /// Also write logs to this file
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Log output format
    #[arg(long, value_enum)]
    pub log_format: Option<LogFormat>,

    /// Fallback poll interval for the native watcher, e.g. 5s
    #[arg(long, value_parser = humantime::parse_duration)]
    pub poll_interval: Option<Duration>,

    /// Queue files already in the directory at startup
    #[arg(long)]
    pub scan_existing: bool,

    /// TOML config file; flags take precedence
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

/// Log line format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// `extensions` may be written as an array or a comma-separated string
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Extensions {
    List(Vec<String>),
    Csv(String),
}

impl Extensions {
    fn to_set(&self) -> ExtensionSet {
        match self {
            Extensions::List(items) => items.iter().collect(),
            Extensions::Csv(raw) => ExtensionSet::parse(raw),
        }
    }
}

/// Contents of the optional config file
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub dir: Option<PathBuf>,
    pub url: Option<String>,
    pub token: Option<String>,
    pub extensions: Option<Extensions>,
    pub rename_uuid: Option<bool>,
    pub after_upload: Option<AfterUpload>,
    pub backup_dir: Option<PathBuf>,
    pub staging_dir: Option<PathBuf>,
    pub log_file: Option<PathBuf>,
    pub log_format: Option<LogFormat>,
    #[serde(default, with = "humantime_serde")]
    pub poll_interval: Option<Duration>,
    pub scan_existing: Option<bool>,
}

impl FileConfig {
    /// Load and parse a TOML config file
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        toml::from_str(&raw)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }
}

/// Logging settings
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogSettings {
    pub file: Option<PathBuf>,
    pub format: LogFormat,
}

/// Flags layered over the config file
#[derive(Debug, Default)]
pub struct Settings {
    args: Args,
    file: FileConfig,
}

impl Settings {
    /// Load the config file named by `--config`, if any
    pub fn load(args: Args) -> Result<Self> {
        let file = match &args.config {
            Some(path) => FileConfig::load(path)?,
            None => FileConfig::default(),
        };
        Ok(Self::new(args, file))
    }

    pub fn new(args: Args, file: FileConfig) -> Self {
        Self { args, file }
    }

    pub fn log(&self) -> LogSettings {
        LogSettings {
            file: self.args.log_file.clone().or_else(|| self.file.log_file.clone()),
            format: self.args.log_format.or(self.file.log_format).unwrap_or_default(),
        }
    }

    /// Human-readable extension list as configured, for the startup log line
    pub fn extensions(&self) -> ExtensionSet {
        match (&self.args.ext, &self.file.extensions) {
            (Some(raw), _) => ExtensionSet::parse(raw),
            (None, Some(exts)) => exts.to_set(),
            (None, None) => ExtensionSet::allow_all(),
        }
    }

    /// Build and validate the runtime configuration
    pub fn config(&self) -> std::result::Result<Config, ConfigError> {
        let (args, file) = (&self.args, &self.file);

        let after_upload = args.after_upload.or(file.after_upload).unwrap_or_default();
        let backup_dir = args.backup_dir.clone().or_else(|| file.backup_dir.clone());

        let config = Config {
            watch_dir: args
                .dir
                .clone()
                .or_else(|| file.dir.clone())
                .ok_or(ConfigError::Missing("dir"))?,
            base_url: args
                .url
                .clone()
                .or_else(|| file.url.clone())
                .ok_or(ConfigError::Missing("url"))?,
            token: args
                .token
                .clone()
                .or_else(|| file.token.clone())
                .ok_or(ConfigError::Missing("token"))?,
            allowed_exts: self.extensions(),
            rename_to_uuid: args.rename_uuid || file.rename_uuid.unwrap_or(false),
            disposition: Disposition::resolve(after_upload, backup_dir)?,
            staging_dir: args.staging_dir.clone().or_else(|| file.staging_dir.clone()),
            poll_interval: args
                .poll_interval
                .or(file.poll_interval)
                .unwrap_or(DEFAULT_POLL_INTERVAL),
            scan_existing: args.scan_existing || file.scan_existing.unwrap_or(false),
        };

        config.validate()?;
        Ok(config)
    }
}
