//! `tracing` subscriber setup.
//!
//! `RUST_LOG` wins when set; otherwise the configured filter applies, raised
//! to `info` by `--verbose`. The interactive console owns the terminal, so
//! there logs go to a file or nowhere; one-shot modes log to stderr.

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogSink {
    Stderr,
    File(PathBuf),
    Discard,
}

impl LogSink {
    /// Sink for the interactive console.
    pub fn for_console(file: Option<&Path>) -> Self {
        match file {
            Some(path) => Self::File(path.to_path_buf()),
            None => Self::Discard,
        }
    }
}

/// Filter directive used when `RUST_LOG` is unset.
pub fn filter_directive(configured: &str, verbose: bool) -> String {
    if verbose {
        "info".to_string()
    } else if configured.trim().is_empty() {
        "warn".to_string()
    } else {
        configured.to_string()
    }
}

pub fn init_logging(configured: &str, verbose: bool, sink: LogSink) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(filter_directive(configured, verbose)))
        .context("invalid log filter")?;

    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_target(false);
    match sink {
        LogSink::Stderr => builder.with_writer(std::io::stderr).init(),
        LogSink::File(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&path)
                .with_context(|| format!("failed to open log file: {}", path.display()))?;
            builder.with_ansi(false).with_writer(Mutex::new(file)).init();
        }
        LogSink::Discard => builder.with_writer(std::io::sink).init(),
    }
    Ok(())
}
