//! Logging setup for the CLI and the TUI
//!
//! The filter comes from `JOBDASH_LOG` (same syntax as `RUST_LOG`), defaulting
//! to `warn`. CLI commands log to stderr. The TUI owns the terminal, so it only
//! logs when a log file is configured.

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use anyhow::Context;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Environment variable holding the log filter.
pub const LOG_ENV: &str = "JOBDASH_LOG";

const DEFAULT_FILTER: &str = "warn";

fn env_filter(verbose: bool) -> EnvFilter {
    if verbose {
        return EnvFilter::new("jobdash=debug");
    }
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Initialize logging to stderr for one-shot and watch commands.
pub fn init_cli_logging(verbose: bool) {
    let result = tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .compact(),
        )
        .with(env_filter(verbose))
        .try_init();

    if let Err(e) = result {
        eprintln!("Warning: could not initialize logging: {e}");
    }
}

/// Initialize logging for the TUI.
///
/// Without a log file nothing is installed and events are dropped.
pub fn init_tui_logging(file: Option<&Path>, verbose: bool) -> anyhow::Result<()> {
    let Some(path) = file else {
        return Ok(());
    };

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log file '{}'", path.display()))?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(Mutex::new(file))
                .with_ansi(false),
        )
        .with(env_filter(verbose))
        .try_init()
        .context("Failed to initialize logging")?;

    tracing::info!(path = %path.display(), "TUI logging started");
    Ok(())
}
