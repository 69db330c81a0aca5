//! Terminal User Interface for jobdash
//!
//! This module provides an interactive dashboard over the job/node info API.
//! It features:
//! - Jobs view grouped by user with paging, and a nodes view
//! - Dual-channel event architecture (priority input, serialized fetches)
//! - Keyboard-driven navigation
//! - Optional automatic refresh
//! - The last good data stays usable when a fetch fails

pub mod app;
pub mod event;
pub mod runtime;
pub mod theme;
pub mod ui;

use std::io::{self, IsTerminal, stdout};
use std::time::Duration;

use anyhow::{Result, bail};
use crossterm::{
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::prelude::*;

use crate::api::{DashboardClient, JobScope};
use crate::models::DashboardConfig;
use crate::tui::app::App;
use crate::tui::event::DataSource;
use crate::tui::runtime::{
    TuiRuntime, create_channels, create_request_channel, run_event_loop, spawn_fetcher,
    spawn_input_task, spawn_refresh_timer,
};

/// Terminal capability requirements for TUI mode
#[derive(Debug)]
pub struct TerminalCapabilities {
    pub is_tty: bool,
    pub term_type: String,
    pub supports_alternate_screen: bool,
}

impl TerminalCapabilities {
    /// Detect terminal capabilities
    pub fn detect() -> Self {
        let is_tty = stdout().is_terminal();
        let term_type = std::env::var("TERM").unwrap_or_default();
        Self::from_parts(is_tty, term_type)
    }

    fn from_parts(is_tty: bool, term_type: String) -> Self {
        // Check for known problematic terminals
        let supports_alternate_screen = !matches!(term_type.as_str(), "dumb" | "" | "unknown");

        Self {
            is_tty,
            term_type,
            supports_alternate_screen,
        }
    }

    /// Check if terminal is suitable for TUI mode
    pub fn is_suitable(&self) -> bool {
        self.is_tty && self.supports_alternate_screen
    }

    /// Get error message for unsuitable terminal
    pub fn error_message(&self) -> String {
        if !self.is_tty {
            "TUI mode requires an interactive terminal (stdout is not a TTY).\n\
             Hint: Use non-TUI commands like 'jobdash jobs' or 'jobdash nodes' instead."
                .to_string()
        } else if !self.supports_alternate_screen {
            format!(
                "Terminal type '{}' may not support TUI mode.\n\
                 Hint: Set TERM to a supported value (e.g., xterm-256color) or use CLI mode.",
                if self.term_type.is_empty() {
                    "(unset)"
                } else {
                    &self.term_type
                }
            )
        } else {
            "Unknown terminal capability issue.".to_string()
        }
    }
}

/// Run the TUI application
pub async fn run_tui(
    config: DashboardConfig,
    config_warnings: Vec<String>,
    client: DashboardClient,
    scope: JobScope,
) -> Result<()> {
    // Check terminal capabilities before attempting TUI mode
    let capabilities = TerminalCapabilities::detect();
    if !capabilities.is_suitable() {
        bail!("{}", capabilities.error_message());
    }

    let (input_tx, input_rx, data_tx, data_rx) = create_channels();
    let (request_tx, request_rx) = create_request_channel();

    let mut runtime = TuiRuntime::new();
    runtime.track(spawn_input_task(input_tx, runtime.cancel_token()));
    runtime.track(spawn_fetcher(
        client.clone(),
        scope,
        request_rx,
        data_tx,
        runtime.cancel_token(),
    ));

    if config.refresh.auto_refresh {
        for (source, secs) in [
            (DataSource::Jobs, config.refresh.jobs_interval),
            (DataSource::Nodes, config.refresh.nodes_interval),
        ] {
            runtime.track(spawn_refresh_timer(
                request_tx.clone(),
                source,
                Duration::from_secs(secs),
                runtime.cancel_token(),
            ));
        }
    }

    let mut app = App::new(config, config_warnings, client, scope, request_tx);
    app.start();

    let mut terminal = setup_terminal()?;

    let result = run_event_loop(app, input_rx, data_rx, |app| {
        terminal.draw(|frame| ui::render(app, frame))?;
        Ok(())
    })
    .await;

    runtime.shutdown().await;
    restore_terminal(&mut terminal)?;

    result
}

/// Setup the terminal for TUI mode
fn setup_terminal() -> Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

/// Restore the terminal to normal mode
fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

/// Run the TUI with the tokio runtime (entry point from main)
pub fn run(
    config: DashboardConfig,
    config_warnings: Vec<String>,
    client: DashboardClient,
    scope: JobScope,
) -> Result<()> {
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(run_tui(config, config_warnings, client, scope))
}
