//! Event types for the TUI
//!
//! This module implements a dual-channel event architecture:
//! - InputEvent: Priority channel for user input (never dropped)
//! - DataEvent: Data channel for fetch results from the API

use chrono::{DateTime, Local};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::models::{JobCollection, NodeCollection};

/// Input events from the terminal (priority channel - never dropped)
#[derive(Debug, Clone)]
pub enum InputEvent {
    /// Keyboard input
    Key(KeyEvent),
    /// Terminal resize
    Resize(u16, u16),
}

/// Data source identifiers for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataSource {
    Jobs,
    Nodes,
}

impl std::fmt::Display for DataSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DataSource::Jobs => write!(f, "jobs"),
            DataSource::Nodes => write!(f, "nodes"),
        }
    }
}

/// What a fetch was asked for and why.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchRequest {
    pub source: DataSource,
    /// Timer-driven refreshes keep the focused user and page
    pub background: bool,
}

impl FetchRequest {
    #[must_use]
    pub fn user(source: DataSource) -> Self {
        Self {
            source,
            background: false,
        }
    }

    #[must_use]
    pub fn background(source: DataSource) -> Self {
        Self {
            source,
            background: true,
        }
    }
}

/// Data events produced by the fetcher task
#[derive(Debug)]
pub enum DataEvent {
    /// Jobs collection fetched
    JobsUpdated {
        jobs: JobCollection,
        fetched_at: DateTime<Local>,
        background: bool,
    },

    /// Nodes collection fetched
    NodesUpdated {
        nodes: NodeCollection,
        fetched_at: DateTime<Local>,
    },

    /// Fetch error from a data source
    FetchError { source: DataSource, error: String },
}

/// Result of processing an event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventResult {
    /// Continue running, UI needs redraw
    Continue,
    /// Continue running, no UI change needed
    Unchanged,
    /// Quit the application
    Quit,
}

/// Key action mappings for the TUI
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    // Row selection
    MoveUp,
    MoveDown,
    MoveToTop,
    MoveToBottom,

    // Paging and user focus
    PreviousPage,
    NextPage,
    NextUser,
    PreviousUser,

    // View switching
    SwitchToJobs,
    SwitchToNodes,

    // Cell toggles
    ToggleNodeList,
    ToggleHistory,

    // Actions
    Select,
    Refresh,

    // UI
    ShowHelp,
    Escape,
    Quit,

    // Unknown/unhandled
    Unknown,
}

impl KeyAction {
    /// Map a key event to an action
    pub fn from_key_event(event: KeyEvent) -> Self {
        let KeyEvent {
            code, modifiers, ..
        } = event;

        match code {
            // Quit
            KeyCode::Char('q') => KeyAction::Quit,

            // Ctrl+ combinations must come before bare character matches
            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => KeyAction::Quit,

            // Rows
            KeyCode::Char('j') | KeyCode::Down => KeyAction::MoveDown,
            KeyCode::Char('k') | KeyCode::Up => KeyAction::MoveUp,
            KeyCode::Char('g') | KeyCode::Home => KeyAction::MoveToTop,
            KeyCode::Char('G') | KeyCode::End => KeyAction::MoveToBottom,

            // Pages and users
            KeyCode::Left | KeyCode::PageUp => KeyAction::PreviousPage,
            KeyCode::Right | KeyCode::PageDown => KeyAction::NextPage,
            KeyCode::Tab => KeyAction::NextUser,
            KeyCode::BackTab => KeyAction::PreviousUser,

            // View switching
            KeyCode::Char('1') => KeyAction::SwitchToJobs,
            KeyCode::Char('2') => KeyAction::SwitchToNodes,

            // Cells
            KeyCode::Char('n') => KeyAction::ToggleNodeList,
            KeyCode::Char('h') => KeyAction::ToggleHistory,

            // Actions
            KeyCode::Enter => KeyAction::Select,
            KeyCode::Char('r') => KeyAction::Refresh,

            // Help
            KeyCode::Char('?') | KeyCode::F(1) => KeyAction::ShowHelp,
            KeyCode::Esc => KeyAction::Escape,

            _ => KeyAction::Unknown,
        }
    }
}
