//! Console and log-file tracing setup.

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Arc;

use remessa_core::truncate_file_tail;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, fmt};

/// Set up tracing with two sinks: the append-only run log (everything at the
/// configured filter, default `info`) and stderr (warnings and errors only,
/// so they don't drown the interactive prompts).
///
/// The log file is truncated to its line budget before the run appends to it.
pub fn init(log_file: &Path, max_lines: usize) -> anyhow::Result<()> {
    truncate_file_tail(log_file, max_lines)?;

    if let Some(parent) = log_file.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file)?;

    let file_layer = fmt::layer()
        .with_target(false)
        .with_ansi(false)
        .with_writer(Arc::new(file))
        .with_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        );

    let console_layer = fmt::layer()
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .with_filter(LevelFilter::WARN);

    tracing_subscriber::registry()
        .with(file_layer)
        .with(console_layer)
        .init();

    Ok(())
}
