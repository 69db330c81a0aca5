//! jobdash - read-only dashboard for cluster job and node management services

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use crossterm::{
    cursor::{Hide, Show},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen},
};
use tokio::runtime::Runtime;

use jobdash::api::{DashboardClient, FETCH_FAILED_MESSAGE, JobScope};
use jobdash::formatting::format_timestamp;
use jobdash::models::DashboardConfig;
use jobdash::report::{JobsOptions, JobsReport, NodesReport, Rendered};
use jobdash::{display, logging, tui};

#[derive(Parser)]
#[command(name = "jobdash")]
#[command(about = "Read-only dashboard for cluster jobs and nodes", long_about = None)]
#[command(version)]
struct Cli {
    /// Base URL of the dashboard server (overrides config)
    #[arg(short, long, global = true, value_name = "URL")]
    server: Option<String>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show jobs grouped by user, one page at a time
    Jobs {
        /// Job collection to read (default from config)
        #[arg(long, value_enum)]
        scope: Option<JobScope>,

        /// Focus this user instead of the one with the most nodes
        #[arg(short, long)]
        user: Option<String>,

        /// Page of the focused user's jobs to show
        #[arg(short, long)]
        page: Option<usize>,

        /// Render an HTML document instead of a terminal table
        #[arg(long)]
        html: bool,

        /// Write output to FILE instead of stdout
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Watch mode: refresh every N seconds
        #[arg(short, long, value_name = "SECONDS", value_parser = parse_watch_interval)]
        watch: Option<Duration>,
    },

    /// Show node specs and statuses
    Nodes {
        /// Render an HTML document instead of a terminal table
        #[arg(long)]
        html: bool,

        /// Write output to FILE instead of stdout
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Watch mode: refresh every N seconds
        #[arg(short, long, value_name = "SECONDS", value_parser = parse_watch_interval)]
        watch: Option<Duration>,
    },

    /// Show detailed information for a specific job
    Job {
        /// Job ID to inspect
        job_id: String,
    },

    /// Show detailed information for a specific node
    Node {
        /// Node name to inspect
        name: String,
    },

    /// Launch interactive TUI mode
    #[command(alias = "ui")]
    Tui {
        /// Job collection to read (default from config)
        #[arg(long, value_enum)]
        scope: Option<JobScope>,
    },
}

/// Longest accepted `--watch` interval (one day)
const MAX_WATCH_SECS: f64 = 86_400.0;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let (mut config, warnings) = DashboardConfig::load().context("Failed to load configuration")?;
    if let Some(server) = cli.server {
        config.server.base_url = server;
    }

    let client = DashboardClient::new(&config.server).context("Invalid server configuration")?;
    let default_scope = JobScope::from_name(&config.display.job_scope).unwrap_or_default();

    let command = match cli.command {
        Some(Commands::Tui { scope }) => {
            // The TUI owns the terminal and shows config warnings in its status bar
            logging::init_tui_logging(config.logging.file.as_deref(), cli.verbose)?;
            return tui::run(config, warnings, client, scope.unwrap_or(default_scope));
        }
        other => other,
    };

    logging::init_cli_logging(cli.verbose);
    for warning in &warnings {
        eprintln!("Warning: {warning}");
    }

    let rt = Runtime::new().context("Failed to start async runtime")?;

    match command {
        Some(Commands::Jobs {
            scope,
            user,
            page,
            html,
            output,
            watch,
        }) => {
            let options = JobsOptions {
                scope: scope.unwrap_or(default_scope),
                user,
                page,
                html,
            };
            let mut report = JobsReport::new(options);
            run_command(watch_interval(watch), output.as_deref(), html, || {
                rt.block_on(report.poll(&client))
            })?;
        }
        Some(Commands::Nodes { html, output, watch }) => {
            let mut report = NodesReport::new(html);
            run_command(watch_interval(watch), output.as_deref(), html, || {
                rt.block_on(report.poll(&client))
            })?;
        }
        Some(Commands::Job { job_id }) => {
            let job = rt
                .block_on(client.fetch_job(&job_id))
                .with_context(|| format!("Failed to fetch job {job_id}"))?;
            println!("{}", display::format_job_details(&job, Some(&client)));
        }
        Some(Commands::Node { name }) => {
            let node = rt
                .block_on(client.fetch_node(&name))
                .with_context(|| format!("Failed to fetch node {name}"))?;
            println!("{}", display::format_node_details(&node));
        }
        Some(Commands::Tui { .. }) | None => {
            // Default: show the jobs view
            let mut report = JobsReport::new(JobsOptions {
                scope: default_scope,
                ..JobsOptions::default()
            });
            run_command(None, None, false, || rt.block_on(report.poll(&client)))?;
        }
    }

    Ok(())
}

/// Run a report once or in watch mode, writing to stdout or a file
///
/// Only a one-shot terminal report fails on a fetch error. Every other mode
/// renders the error together with the last data loaded.
fn run_command<F>(watch: Option<Duration>, output: Option<&Path>, html: bool, mut poll: F) -> Result<()>
where
    F: FnMut() -> Rendered,
{
    match (output, watch) {
        (Some(path), Some(interval)) => loop {
            // Rewrite the file on every tick; Ctrl+C ends the process
            write_output(path, &poll().output)?;
            thread::sleep(interval);
        },
        (None, Some(interval)) => watch_loop(interval, poll),
        (output, None) => {
            let rendered = poll();
            if let Some(error) = rendered.error
                && !html
            {
                return Err(anyhow::Error::new(error).context(FETCH_FAILED_MESSAGE));
            }
            match output {
                Some(path) => write_output(path, &rendered.output),
                None => {
                    println!("{}", rendered.output);
                    Ok(())
                }
            }
        }
    }
}

/// Parse `--watch SECONDS`; zero turns watch mode off (see [`watch_interval`]).
fn parse_watch_interval(value: &str) -> Result<Duration, String> {
    let secs: f64 = value
        .trim()
        .parse()
        .map_err(|_| format!("'{value}' is not a number of seconds"))?;
    if !(0.0..=MAX_WATCH_SECS).contains(&secs) {
        return Err(format!("must be between 0 and {MAX_WATCH_SECS} seconds"));
    }
    Duration::try_from_secs_f64(secs).map_err(|e| e.to_string())
}

fn watch_interval(watch: Option<Duration>) -> Option<Duration> {
    watch.filter(|interval| !interval.is_zero())
}

fn write_output(path: &Path, content: &str) -> Result<()> {
    std::fs::write(path, content)
        .with_context(|| format!("Failed to write output to '{}'", path.display()))?;
    tracing::info!(path = %path.display(), bytes = content.len(), "wrote output");
    Ok(())
}

/// Watch loop that repeatedly polls a report with flicker-free updates
fn watch_loop<F>(interval: Duration, mut poll: F) -> Result<()>
where
    F: FnMut() -> Rendered,
{
    // Set up Ctrl+C handler
    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();

    ctrlc::set_handler(move || {
        r.store(false, Ordering::SeqCst);
    })
    .context("Error setting Ctrl-C handler")?;

    // Enter alternate screen buffer and hide cursor for clean display
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, Hide)?;

    let result = (|| -> Result<()> {
        while running.load(Ordering::SeqCst) {
            let timestamp = format_timestamp(chrono::Local::now());

            // A failed fetch is already part of the output, above the last data
            let output = poll().output;

            let screen_content = format!(
                "{output}\n\nLast updated: {timestamp} | Refreshing every {}s | Press Ctrl+C to exit",
                interval.as_secs_f64()
            );

            // Synchronized update: the terminal draws the frame only once complete
            write!(stdout, "\x1B[?2026h")?;
            write!(stdout, "\x1B[H{screen_content}\x1B[J")?;
            write!(stdout, "\x1B[?2026l")?;
            stdout.flush()?;

            thread::sleep(interval);
        }
        Ok(())
    })();

    // Always restore terminal state
    execute!(io::stdout(), Show, LeaveAlternateScreen)?;

    println!("Watch mode stopped.");

    result
}
