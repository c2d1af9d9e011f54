//! Tracing subscriber setup
//!
//! Stdout always; an additional plain-text (or JSON) file when a log file is
//! configured. `RUST_LOG` overrides the default filter.

use crate::settings::{LogFormat, LogSettings};
use anyhow::{Context, Result};
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Layer, Registry};

const DEFAULT_LOG_FILTER: &str = "info,paperlink=debug,cli_lib=debug,watcher=debug,uploader=debug";

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER))
}

/// Install the global subscriber
///
/// The returned guard flushes the file writer on drop; hold it until exit.
pub fn init(settings: &LogSettings) -> Result<Option<WorkerGuard>> {
    let mut layers: Vec<BoxedLayer> = Vec::new();

    let stdout: BoxedLayer = match settings.format {
        LogFormat::Text => fmt::layer().with_filter(env_filter()).boxed(),
        LogFormat::Json => fmt::layer().json().with_filter(env_filter()).boxed(),
    };
    layers.push(stdout);

    let guard = match &settings.file {
        Some(path) => {
            let (layer, guard) = file_layer(path, settings.format)?;
            layers.push(layer);
            Some(guard)
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(layers)
        .try_init()
        .context("Failed to install tracing subscriber")?;

    Ok(guard)
}

fn file_layer(path: &Path, format: LogFormat) -> Result<(BoxedLayer, WorkerGuard)> {
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let name = path
        .file_name()
        .with_context(|| format!("Log file path has no file name: {}", path.display()))?;

    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create log directory {}", dir.display()))?;

    let appender = tracing_appender::rolling::never(dir, name);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let layer = match format {
        LogFormat::Text => fmt::layer()
            .with_writer(writer)
            .with_ansi(false)
            .with_filter(env_filter())
            .boxed(),
        LogFormat::Json => fmt::layer()
            .json()
            .with_writer(writer)
            .with_filter(env_filter())
            .boxed(),
    };

    Ok((layer, guard))
}
