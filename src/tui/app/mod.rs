//! Application state and core logic for the TUI
//!
//! The architecture follows a TEA-inspired pattern with mutable state and
//! method-based updates: input and data events mutate [`App`], and the UI is
//! redrawn from it afterwards.

mod state;

pub use state::{FeedbackState, JobsViewState, ListState, ModalState, NodesViewState, View};

use tokio::sync::mpsc;

use crate::api::{DashboardClient, FETCH_FAILED_MESSAGE, JobScope};
use crate::models::DashboardConfig;
use crate::tui::event::{DataEvent, DataSource, EventResult, FetchRequest, InputEvent, KeyAction};

/// Main application state
pub struct App {
    // Lifecycle
    pub running: bool,

    // View State
    pub current_view: View,
    pub modal: ModalState,

    // Per-View States
    pub jobs_view: JobsViewState,
    pub nodes_view: NodesViewState,

    // Feedback
    pub feedback: FeedbackState,

    // Configuration
    pub config: DashboardConfig,
    pub scope: JobScope,
    pub client: DashboardClient,

    // Communication
    requests: mpsc::Sender<FetchRequest>,
}

impl App {
    pub fn new(
        config: DashboardConfig,
        config_warnings: Vec<String>,
        client: DashboardClient,
        scope: JobScope,
        requests: mpsc::Sender<FetchRequest>,
    ) -> Self {
        Self {
            running: true,
            current_view: View::from_name(&config.display.default_view),
            modal: ModalState::None,
            jobs_view: JobsViewState::default(),
            nodes_view: NodesViewState::default(),
            feedback: FeedbackState::new(config_warnings),
            config,
            scope,
            client,
            requests,
        }
    }

    /// Ask for the initial data of both views.
    pub fn start(&mut self) {
        self.request_fetch(DataSource::Jobs);
        self.request_fetch(DataSource::Nodes);
    }

    /// Queue a user-initiated fetch behind any fetch in flight.
    fn request_fetch(&mut self, source: DataSource) {
        match self.requests.try_send(FetchRequest::user(source)) {
            Ok(()) => {}
            Err(mpsc::error::TrySendError::Full(_)) => {
                tracing::debug!(%source, "fetch queue full, request dropped");
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                tracing::warn!(%source, "fetcher stopped");
                self.feedback.set_error(FETCH_FAILED_MESSAGE.to_string());
            }
        }
    }

    /// Handle an input event
    pub fn handle_input(&mut self, event: InputEvent) -> EventResult {
        match event {
            InputEvent::Key(key_event) => self.handle_action(KeyAction::from_key_event(key_event)),
            InputEvent::Resize(_, _) => EventResult::Continue,
        }
    }

    /// Handle a key action
    fn handle_action(&mut self, action: KeyAction) -> EventResult {
        // Overlays take priority
        match self.modal {
            ModalState::Help => {
                return match action {
                    KeyAction::Escape | KeyAction::ShowHelp | KeyAction::Quit => {
                        self.modal = ModalState::None;
                        EventResult::Continue
                    }
                    _ => EventResult::Unchanged,
                };
            }
            ModalState::Detail => {
                return match action {
                    KeyAction::Escape | KeyAction::Select | KeyAction::Quit => {
                        self.modal = ModalState::None;
                        EventResult::Continue
                    }
                    _ => EventResult::Unchanged,
                };
            }
            ModalState::None => {}
        }

        match action {
            KeyAction::Quit => {
                self.running = false;
                EventResult::Quit
            }

            KeyAction::MoveUp
            | KeyAction::MoveDown
            | KeyAction::MoveToTop
            | KeyAction::MoveToBottom => {
                self.move_selection(action);
                EventResult::Continue
            }

            KeyAction::PreviousPage => self.on_jobs(JobsViewState::previous_page),
            KeyAction::NextPage => self.on_jobs(JobsViewState::next_page),
            KeyAction::NextUser => self.on_jobs(JobsViewState::next_user),
            KeyAction::PreviousUser => self.on_jobs(JobsViewState::previous_user),
            KeyAction::ToggleNodeList => self.on_jobs(JobsViewState::toggle_node_list),
            KeyAction::ToggleHistory => self.on_jobs(JobsViewState::toggle_history),

            KeyAction::SwitchToJobs => self.switch_view(View::Jobs),
            KeyAction::SwitchToNodes => self.switch_view(View::Nodes),

            KeyAction::Select => {
                if self.has_selection() {
                    self.modal = ModalState::Detail;
                    EventResult::Continue
                } else {
                    EventResult::Unchanged
                }
            }
            KeyAction::Refresh => {
                let source = match self.current_view {
                    View::Jobs => DataSource::Jobs,
                    View::Nodes => DataSource::Nodes,
                };
                self.request_fetch(source);
                EventResult::Unchanged
            }
            KeyAction::ShowHelp => {
                self.modal = ModalState::Help;
                EventResult::Continue
            }

            KeyAction::Escape | KeyAction::Unknown => EventResult::Unchanged,
        }
    }

    /// Apply a jobs-tab operation; ignored on other tabs.
    fn on_jobs(&mut self, op: impl FnOnce(&mut JobsViewState) -> bool) -> EventResult {
        if self.current_view == View::Jobs && op(&mut self.jobs_view) {
            EventResult::Continue
        } else {
            EventResult::Unchanged
        }
    }

    fn switch_view(&mut self, view: View) -> EventResult {
        if self.current_view == view {
            return EventResult::Unchanged;
        }
        self.current_view = view;
        EventResult::Continue
    }

    fn move_selection(&mut self, action: KeyAction) {
        let (list_state, len) = match self.current_view {
            View::Jobs => (
                &mut self.jobs_view.list_state,
                self.jobs_view.page.rows.len(),
            ),
            View::Nodes => (
                &mut self.nodes_view.list_state,
                self.nodes_view.view.rows.len(),
            ),
        };

        match action {
            KeyAction::MoveUp => list_state.move_up(),
            KeyAction::MoveDown => list_state.move_down(len),
            KeyAction::MoveToTop => list_state.move_to_top(),
            KeyAction::MoveToBottom => list_state.move_to_bottom(len),
            _ => {}
        }
    }

    fn has_selection(&self) -> bool {
        match self.current_view {
            View::Jobs => self.jobs_view.selected_job().is_some(),
            View::Nodes => self.nodes_view.selected_node().is_some(),
        }
    }

    /// Handle a data event from the fetcher
    pub fn handle_data(&mut self, event: DataEvent) -> EventResult {
        match event {
            DataEvent::JobsUpdated {
                jobs,
                fetched_at,
                background,
            } => {
                self.jobs_view.load(jobs, fetched_at, background);
                self.feedback.clear_error();
                self.close_stale_detail(View::Jobs);
                EventResult::Continue
            }
            DataEvent::NodesUpdated { nodes, fetched_at } => {
                self.nodes_view.load(nodes, fetched_at);
                self.feedback.clear_error();
                self.close_stale_detail(View::Nodes);
                EventResult::Continue
            }
            DataEvent::FetchError { source, error } => {
                tracing::warn!(%source, %error, "keeping last loaded data");
                self.feedback.set_error(FETCH_FAILED_MESSAGE.to_string());
                EventResult::Continue
            }
        }
    }

    /// A detail overlay whose record vanished in a reload is closed.
    fn close_stale_detail(&mut self, view: View) {
        if self.modal == ModalState::Detail && self.current_view == view && !self.has_selection() {
            self.modal = ModalState::None;
        }
    }

    #[must_use]
    pub fn current_error(&self) -> Option<&str> {
        self.feedback.current_error()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{JobCollection, NodeCollection};
    use chrono::Local;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use serde_json::json;

    fn app() -> (App, mpsc::Receiver<FetchRequest>) {
        let (tx, rx) = mpsc::channel(4);
        let config = DashboardConfig::default();
        let client = DashboardClient::new(&config.server).unwrap();
        (App::new(config, Vec::new(), client, JobScope::Active, tx), rx)
    }

    fn key(app: &mut App, code: KeyCode) -> EventResult {
        app.handle_input(InputEvent::Key(KeyEvent::new(code, KeyModifiers::NONE)))
    }

    fn jobs_loaded(app: &mut App) {
        let jobs = JobCollection::from_value(&json!({
            "3": {"spec": {"userName": "alice"}, "status": {"slurmJobRunCurrentStatus":
                {"state": "RUNNING", "physicalNodeSnapshots": {"n": {"slurmNodeName": "a"}}}}},
            "2": {"spec": {"userName": "bob"}},
            "1": {"spec": {"userName": "alice"}}
        }))
        .unwrap();
        app.handle_data(DataEvent::JobsUpdated {
            jobs,
            fetched_at: Local::now(),
            background: false,
        });
    }

    #[test]
    fn test_start_requests_both_views() {
        let (mut app, mut rx) = app();
        app.start();
        assert_eq!(rx.try_recv().unwrap(), FetchRequest::user(DataSource::Jobs));
        assert_eq!(rx.try_recv().unwrap(), FetchRequest::user(DataSource::Nodes));
    }

    #[test]
    fn test_quit() {
        let (mut app, _rx) = app();
        assert_eq!(key(&mut app, KeyCode::Char('q')), EventResult::Quit);
        assert!(!app.running);
    }

    #[test]
    fn test_user_navigation() {
        let (mut app, _rx) = app();
        jobs_loaded(&mut app);
        assert_eq!(app.jobs_view.controller.focused_user(), Some("alice"));
        assert_eq!(app.jobs_view.page.rows.len(), 2);

        assert_eq!(key(&mut app, KeyCode::Tab), EventResult::Continue);
        assert_eq!(app.jobs_view.controller.focused_user(), Some("bob"));
        key(&mut app, KeyCode::Tab);
        assert_eq!(app.jobs_view.controller.focused_user(), Some("alice"));

        // Single page: paging is a no-op
        assert_eq!(key(&mut app, KeyCode::Right), EventResult::Unchanged);
    }

    #[test]
    fn test_toggle_keys() {
        let (mut app, _rx) = app();
        jobs_loaded(&mut app);

        key(&mut app, KeyCode::Char('h'));
        assert!(app.jobs_view.page.rows[0].history.is_open());
        key(&mut app, KeyCode::Char('n'));
        assert!(!app.jobs_view.page.rows[0].node_list.is_open());
    }

    #[test]
    fn test_jobs_keys_ignored_on_nodes_tab() {
        let (mut app, _rx) = app();
        jobs_loaded(&mut app);
        key(&mut app, KeyCode::Char('2'));
        assert_eq!(app.current_view, View::Nodes);
        assert_eq!(key(&mut app, KeyCode::Tab), EventResult::Unchanged);
        assert_eq!(app.jobs_view.controller.focused_user(), Some("alice"));
    }

    #[test]
    fn test_fetch_error_keeps_data() {
        let (mut app, _rx) = app();
        jobs_loaded(&mut app);
        app.handle_data(DataEvent::FetchError {
            source: DataSource::Jobs,
            error: "connection refused".to_string(),
        });
        assert_eq!(app.current_error(), Some(FETCH_FAILED_MESSAGE));
        assert_eq!(app.jobs_view.page.rows.len(), 2);

        // Navigation still works on the last good data
        key(&mut app, KeyCode::Tab);
        assert_eq!(app.jobs_view.controller.focused_user(), Some("bob"));
    }

    #[test]
    fn test_refresh_requests_current_view() {
        let (mut app, mut rx) = app();
        key(&mut app, KeyCode::Char('2'));
        key(&mut app, KeyCode::Char('r'));
        assert_eq!(rx.try_recv().unwrap(), FetchRequest::user(DataSource::Nodes));
    }

    #[test]
    fn test_detail_overlay() {
        let (mut app, _rx) = app();
        assert_eq!(key(&mut app, KeyCode::Enter), EventResult::Unchanged);

        jobs_loaded(&mut app);
        key(&mut app, KeyCode::Enter);
        assert_eq!(app.modal, ModalState::Detail);

        // Other keys are swallowed while the overlay is open
        assert_eq!(key(&mut app, KeyCode::Tab), EventResult::Unchanged);
        key(&mut app, KeyCode::Esc);
        assert_eq!(app.modal, ModalState::None);
    }

    #[test]
    fn test_detail_closes_when_record_disappears() {
        let (mut app, _rx) = app();
        key(&mut app, KeyCode::Char('2'));
        app.handle_data(DataEvent::NodesUpdated {
            nodes: NodeCollection::from_value(&json!({"n1": {}})).unwrap(),
            fetched_at: Local::now(),
        });
        key(&mut app, KeyCode::Enter);
        assert_eq!(app.modal, ModalState::Detail);

        app.handle_data(DataEvent::NodesUpdated {
            nodes: NodeCollection::default(),
            fetched_at: Local::now(),
        });
        assert_eq!(app.modal, ModalState::None);
    }

    #[test]
    fn test_help_overlay() {
        let (mut app, _rx) = app();
        key(&mut app, KeyCode::Char('?'));
        assert_eq!(app.modal, ModalState::Help);
        assert_eq!(key(&mut app, KeyCode::Char('j')), EventResult::Unchanged);
        key(&mut app, KeyCode::Char('q'));
        assert_eq!(app.modal, ModalState::None);
        assert!(app.running);
    }
}
