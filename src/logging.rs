//! Tracing subscriber setup.
//!
//! stdout carries the stdio MCP transport, so human-readable logs go to
//! stderr. With a log file configured, events are appended there as JSON lines.

use std::fs::{File, OpenOptions};
use std::io;
use std::path::Path;
use std::sync::Mutex;

use anyhow::{Context, Result, anyhow};
use tracing_subscriber::EnvFilter;

/// Default directives, extended or overridden by `RUST_LOG`.
const DEFAULT_DIRECTIVES: [&str; 2] = ["todoist_mcp=info", "rmcp=warn"];

pub fn env_filter() -> Result<EnvFilter> {
    let mut filter = EnvFilter::from_default_env();
    for directive in DEFAULT_DIRECTIVES {
        filter = filter.add_directive(directive.parse()?);
    }
    Ok(filter)
}

/// Open `path` for appending, creating it if needed.
pub fn open_log_file(path: &Path) -> io::Result<File> {
    OpenOptions::new().create(true).append(true).open(path)
}

/// Install the global subscriber.
pub fn init_tracing(log_file: Option<&Path>) -> Result<()> {
    let filter = env_filter()?;

    match log_file {
        Some(path) => {
            let file = open_log_file(path)
                .with_context(|| format!("failed to open log file {}", path.display()))?;
            tracing_subscriber::fmt()
                .json()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init()
                .map_err(|e| anyhow!("failed to install tracing subscriber: {}", e))
        }
        None => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(io::stderr)
            .try_init()
            .map_err(|e| anyhow!("failed to install tracing subscriber: {}", e)),
    }
}
