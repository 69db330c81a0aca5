//! Application state types for the TUI
//!
//! This module contains all the state management types:
//! - View states (Jobs, Nodes)
//! - Modal states (Help, Detail)
//! - Selection and navigation state (ListState)
//! - Feedback state for errors and config warnings

use std::time::{Duration, Instant};

use chrono::{DateTime, Local};

use crate::dashboard::{JobRow, NodeRow, NodesView, PageView, PaginationController, render_nodes};
use crate::models::{JobCollection, JobRecord, NodeCollection, NodeRecord};

// ============================================================================
// List Navigation State
// ============================================================================

/// Row selection within the visible table
#[derive(Debug, Clone, Default)]
pub struct ListState {
    pub selected: usize,
}

impl ListState {
    pub fn clamp(&mut self, list_len: usize) {
        self.selected = self.selected.min(list_len.saturating_sub(1));
    }

    pub fn move_up(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn move_down(&mut self, list_len: usize) {
        if list_len > 0 && self.selected < list_len - 1 {
            self.selected += 1;
        }
    }

    pub fn move_to_top(&mut self) {
        self.selected = 0;
    }

    pub fn move_to_bottom(&mut self, list_len: usize) {
        self.selected = list_len.saturating_sub(1);
    }
}

// ============================================================================
// Per-View State Types
// ============================================================================

/// Jobs tab: the pagination controller plus the page currently on screen.
///
/// The page keeps its own disclosure state, so toggles last until the next
/// re-render (page change, user change or fetch).
#[derive(Debug, Default)]
pub struct JobsViewState {
    pub controller: PaginationController,
    pub page: PageView,
    pub list_state: ListState,
    pub last_updated: Option<DateTime<Local>>,
}

impl JobsViewState {
    /// Install a fetched collection. Background refreshes keep the focused
    /// user and page.
    pub fn load(&mut self, jobs: JobCollection, fetched_at: DateTime<Local>, background: bool) {
        if background {
            self.controller.refresh(jobs);
        } else {
            self.controller.load(jobs);
            self.list_state.move_to_top();
        }
        self.last_updated = Some(fetched_at);
        self.rerender();
    }

    fn rerender(&mut self) {
        self.page = self.controller.render();
        self.list_state.clamp(self.page.rows.len());
    }

    /// Re-render after a focus or page move, starting at the first row.
    fn moved(&mut self, changed: bool) -> bool {
        if changed {
            self.list_state.move_to_top();
            self.rerender();
        }
        changed
    }

    pub fn next_page(&mut self) -> bool {
        let changed = self.controller.next_page();
        self.moved(changed)
    }

    pub fn previous_page(&mut self) -> bool {
        let changed = self.controller.previous_page();
        self.moved(changed)
    }

    pub fn next_user(&mut self) -> bool {
        let changed = self.controller.select_next_user();
        self.moved(changed)
    }

    pub fn previous_user(&mut self) -> bool {
        let changed = self.controller.select_previous_user();
        self.moved(changed)
    }

    #[must_use]
    pub fn selected_row(&self) -> Option<&JobRow> {
        self.page.rows.get(self.list_state.selected)
    }

    #[must_use]
    pub fn selected_job(&self) -> Option<&JobRecord> {
        let row = self.selected_row()?;
        self.controller.jobs().find(row.id.as_str())
    }

    /// Toggle the node-list cell of the selected row.
    pub fn toggle_node_list(&mut self) -> bool {
        match self.page.rows.get_mut(self.list_state.selected) {
            Some(row) => {
                row.node_list.toggle();
                true
            }
            None => false,
        }
    }

    /// Toggle the status-history cell of the selected row.
    pub fn toggle_history(&mut self) -> bool {
        match self.page.rows.get_mut(self.list_state.selected) {
            Some(row) => {
                row.history.toggle();
                true
            }
            None => false,
        }
    }
}

/// Nodes tab
#[derive(Debug, Default)]
pub struct NodesViewState {
    pub nodes: NodeCollection,
    pub view: NodesView,
    pub list_state: ListState,
    pub last_updated: Option<DateTime<Local>>,
}

impl NodesViewState {
    pub fn load(&mut self, nodes: NodeCollection, fetched_at: DateTime<Local>) {
        self.view = render_nodes(&nodes);
        self.nodes = nodes;
        self.last_updated = Some(fetched_at);
        self.list_state.clamp(self.view.rows.len());
    }

    #[must_use]
    pub fn selected_row(&self) -> Option<&NodeRow> {
        self.view.rows.get(self.list_state.selected)
    }

    #[must_use]
    pub fn selected_node(&self) -> Option<&NodeRecord> {
        let row = self.selected_row()?;
        self.nodes.find(row.id.as_str())
    }
}

// ============================================================================
// View Enum
// ============================================================================

/// Current view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    Jobs,
    Nodes,
}

impl View {
    /// Parse the configured default view; anything unrecognized is Jobs.
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "nodes" => View::Nodes,
            _ => View::Jobs,
        }
    }

    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            View::Jobs => "Jobs",
            View::Nodes => "Nodes",
        }
    }
}

// ============================================================================
// Modal State
// ============================================================================

/// Modal overlay state - only one modal can be active at a time.
#[derive(Debug, Default, PartialEq, Eq)]
pub enum ModalState {
    #[default]
    None,
    Help,
    /// Detail of the selected row in the current view
    Detail,
}

impl ModalState {
    #[must_use]
    pub fn is_active(&self) -> bool {
        !matches!(self, ModalState::None)
    }
}

// ============================================================================
// Feedback State
// ============================================================================

/// Feedback shown in the status bar: the last fetch error and config warnings
#[derive(Debug)]
pub struct FeedbackState {
    last_error: Option<(String, Instant)>,
    error_display_duration: Duration,
    pub config_warnings: Vec<String>,
}

impl FeedbackState {
    pub fn new(config_warnings: Vec<String>) -> Self {
        Self {
            last_error: None,
            error_display_duration: Duration::from_secs(5),
            config_warnings,
        }
    }

    pub fn set_error(&mut self, msg: String) {
        self.last_error = Some((msg, Instant::now()));
    }

    pub fn clear_error(&mut self) {
        self.last_error = None;
    }

    /// Get the current error message if it should be shown
    #[must_use]
    pub fn current_error(&self) -> Option<&str> {
        self.last_error
            .as_ref()
            .filter(|(_, at)| at.elapsed() < self.error_display_duration)
            .map(|(msg, _)| msg.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn jobs(count: usize) -> JobCollection {
        let mut payload = serde_json::Map::new();
        for id in 0..count {
            payload.insert(
                id.to_string(),
                json!({"spec": {"userName": if id % 2 == 1 { "alice" } else { "bob" }},
                       "status": {"slurmJobRunCurrentStatus": {"state": "RUNNING",
                           "physicalNodeSnapshots": {"n": {"slurmNodeName": "a"}}}}}),
            );
        }
        JobCollection::from_value(&serde_json::Value::Object(payload)).unwrap()
    }

    #[test]
    fn test_list_state_navigation() {
        let mut state = ListState::default();

        state.move_down(5);
        assert_eq!(state.selected, 1);

        state.move_to_bottom(5);
        assert_eq!(state.selected, 4);
        state.move_down(5);
        assert_eq!(state.selected, 4);

        state.clamp(2);
        assert_eq!(state.selected, 1);

        state.move_to_top();
        state.move_up();
        assert_eq!(state.selected, 0);
    }

    #[test]
    fn test_jobs_view_paging_resets_selection() {
        let mut view = JobsViewState::default();
        view.load(jobs(250), Local::now(), false);

        // alice has 125 jobs: two pages
        assert_eq!(view.controller.focused_user(), Some("alice"));
        assert_eq!(view.page.rows.len(), 100);

        view.list_state.move_to_bottom(view.page.rows.len());
        assert!(view.next_page());
        assert_eq!(view.page.rows.len(), 25);
        assert_eq!(view.list_state.selected, 0);
        assert!(!view.next_page());
        assert!(view.previous_page());
        assert!(!view.previous_page());
    }

    #[test]
    fn test_background_refresh_keeps_page() {
        let mut view = JobsViewState::default();
        view.load(jobs(250), Local::now(), false);
        view.next_page();

        view.load(jobs(250), Local::now(), true);
        assert_eq!(view.controller.current_page(), 2);

        view.load(jobs(250), Local::now(), false);
        assert_eq!(view.controller.current_page(), 1);
    }

    #[test]
    fn test_toggles_apply_to_selected_row() {
        let mut view = JobsViewState::default();
        assert!(!view.toggle_history());

        view.load(jobs(4), Local::now(), false);
        view.list_state.move_down(view.page.rows.len());
        assert!(view.toggle_history());
        assert!(view.toggle_node_list());

        assert!(view.page.rows[1].history.is_open());
        assert!(!view.page.rows[1].node_list.is_open());
        assert!(!view.page.rows[0].history.is_open());

        // A page change re-renders with default disclosure
        view.next_user();
        view.previous_user();
        assert!(!view.page.rows[1].history.is_open());
    }

    #[test]
    fn test_selected_job_matches_row() {
        let mut view = JobsViewState::default();
        view.load(jobs(3), Local::now(), false);
        // bob owns jobs 2 and 0, so he has the most nodes
        let job = view.selected_job().unwrap();
        assert_eq!(job.id.as_str(), "2");
        assert_eq!(job.user_name, "bob");
    }

    #[test]
    fn test_nodes_view_selection() {
        let mut view = NodesViewState::default();
        let nodes = NodeCollection::from_value(&json!({"a": {}, "b": {}})).unwrap();
        view.load(nodes, Local::now());
        view.list_state.move_down(view.view.rows.len());
        assert_eq!(view.selected_node().unwrap().name, "a");
    }

    #[test]
    fn test_view_from_name() {
        assert_eq!(View::from_name("Nodes"), View::Nodes);
        assert_eq!(View::from_name("jobs"), View::Jobs);
        assert_eq!(View::from_name("partitions"), View::Jobs);
    }

    #[test]
    fn test_feedback_error() {
        let mut feedback = FeedbackState::new(Vec::new());
        assert!(feedback.current_error().is_none());
        feedback.set_error("boom".to_string());
        assert_eq!(feedback.current_error(), Some("boom"));
        feedback.clear_error();
        assert!(feedback.current_error().is_none());
    }
}
