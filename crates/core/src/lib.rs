//! Core types for Paperlink
//!
//! This crate provides:
//! - The validated runtime configuration (`Config`, `Disposition`)
//! - The extension allow-set and its filter predicate
//! - The `ReadyPath` handed from the watcher to the uploader
//! - Timing and capacity constants shared by the pipeline stages

pub mod config;
pub mod filter;
pub mod ready;

use std::time::Duration;

// Re-exports
pub use config::{AfterUpload, Config, ConfigError, Disposition};
pub use filter::{allowed, ExtensionSet};
pub use ready::ReadyPath;

/// Quiet period after the last raw event before a path is considered stable
pub const DEBOUNCE_DELAY: Duration = Duration::from_millis(750);

/// How long a stable path may stay unreadable before it is dropped
pub const READY_TIMEOUT: Duration = Duration::from_secs(2);

/// Interval between readiness checks
pub const READY_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Upper bound for a single upload request
pub const UPLOAD_TIMEOUT: Duration = Duration::from_secs(120);

/// Capacity of the queue between the watcher and the uploader
pub const READY_QUEUE_CAPACITY: usize = 16;

/// Capacity of the debounce engine's timer inbox
pub const TIMER_QUEUE_CAPACITY: usize = 64;

/// Default fallback poll interval handed to the native watcher
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);
