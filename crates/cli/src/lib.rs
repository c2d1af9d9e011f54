//! Paperlink binary support: flags, config file, logging and the daemon loop

pub mod daemon;
pub mod logging;
pub mod settings;

pub use settings::{Args, LogFormat, LogSettings, Settings};
