//! Paging through the focused user's jobs.
//!
//! [`PaginationController`] owns the loaded collection, its aggregation and
//! navigation, and the [`ViewState`] (focused user + current page). Every
//! transition is a method on the controller; rendering is a pure function of
//! the controller's state.

use crate::models::{JobCollection, JobRecord, RecordId};

use super::aggregate::{Aggregation, aggregate};
use super::collapsible::{Collapsible, Disclosure};
use super::navigation::{Navigation, build_navigation};
use super::node_list::{NodeListView, render_node_list};
use super::{Cell, NOT_AVAILABLE, PAGE_SIZE, pretty_json};

/// Which user's jobs are shown, and which page of them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewState {
    pub focused_user: Option<String>,
    /// 1-based page number.
    pub current_page: usize,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            focused_user: None,
            current_page: 1,
        }
    }
}

/// One rendered table row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobRow {
    pub id: RecordId,
    pub state: Cell,
    /// Pretty-printed spec, or `N/A`.
    pub spec: String,
    pub node_list: Collapsible<NodeListView>,
    /// Pretty-printed status history, or `N/A`. Starts collapsed.
    pub history: Collapsible<String>,
}

/// Everything needed to draw the jobs table for one page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageView {
    pub rows: Vec<JobRow>,
    /// `"<user> (<N> nodes): Page <p> of <total>"`, absent when no user is shown.
    pub status_line: Option<String>,
    pub page: usize,
    pub total_pages: usize,
    pub previous_disabled: bool,
    pub next_disabled: bool,
}

impl PageView {
    fn empty(page: usize) -> Self {
        Self {
            rows: Vec::new(),
            status_line: None,
            page,
            total_pages: 0,
            previous_disabled: true,
            next_disabled: true,
        }
    }
}

impl Default for PageView {
    fn default() -> Self {
        Self::empty(1)
    }
}

/// Render one job as a table row.
#[must_use]
pub fn render_job_row(job: &JobRecord) -> JobRow {
    let spec = job
        .spec
        .as_ref()
        .map_or_else(|| NOT_AVAILABLE.to_string(), pretty_json);
    let history = job
        .status_history
        .as_ref()
        .map_or_else(|| NOT_AVAILABLE.to_string(), pretty_json);

    JobRow {
        id: job.id.clone(),
        state: Cell {
            text: job.state.as_str().to_string(),
            tone: job.state.tone(),
        },
        spec,
        node_list: render_node_list(&job.node_snapshots),
        history: Collapsible::new(history, Disclosure::Closed),
    }
}

#[derive(Debug, Clone, Default)]
pub struct PaginationController {
    jobs: JobCollection,
    aggregation: Aggregation,
    navigation: Navigation,
    view: ViewState,
}

impl PaginationController {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace all state with a freshly fetched collection.
    ///
    /// Focus moves to the user with the most nodes and the page resets to 1.
    pub fn load(&mut self, jobs: JobCollection) {
        self.aggregation = aggregate(&jobs);
        self.navigation = build_navigation(&self.aggregation);
        self.jobs = jobs;
        self.view = ViewState {
            focused_user: self.aggregation.focused_user().map(String::from),
            current_page: 1,
        };
    }

    /// Like [`load`](Self::load), but keeps the focused user and page when the
    /// user still has jobs. Used for background polling.
    pub fn refresh(&mut self, jobs: JobCollection) {
        let previous = self.view.clone();
        self.load(jobs);

        let Some(user) = previous.focused_user else {
            return;
        };
        if self.aggregation.group(&user).is_some() {
            self.view.focused_user = Some(user);
            self.view.current_page = previous.current_page.clamp(1, self.total_pages().max(1));
        }
    }

    #[must_use]
    pub fn jobs(&self) -> &JobCollection {
        &self.jobs
    }

    #[must_use]
    pub fn aggregation(&self) -> &Aggregation {
        &self.aggregation
    }

    #[must_use]
    pub fn navigation(&self) -> &Navigation {
        &self.navigation
    }

    #[must_use]
    pub fn view_state(&self) -> &ViewState {
        &self.view
    }

    #[must_use]
    pub fn focused_user(&self) -> Option<&str> {
        self.view.focused_user.as_deref()
    }

    #[must_use]
    pub fn current_page(&self) -> usize {
        self.view.current_page
    }

    /// `ceil(group size / PAGE_SIZE)`, zero when the focused user has no jobs.
    #[must_use]
    pub fn total_pages(&self) -> usize {
        self.focused_user()
            .and_then(|user| self.aggregation.group(user))
            .map_or(0, |group| group.len().div_ceil(PAGE_SIZE))
    }

    /// Focus `user_name` and go back to page 1.
    ///
    /// Returns whether the user has any jobs. An unknown user is still
    /// focused and renders as an empty table.
    pub fn select_user(&mut self, user_name: &str) -> bool {
        self.view.focused_user = Some(user_name.to_string());
        self.view.current_page = 1;
        let known = self.aggregation.group(user_name).is_some();
        if !known {
            tracing::debug!(user = user_name, "selected user has no jobs");
        }
        known
    }

    /// Focus the next user in navigation order.
    pub fn select_next_user(&mut self) -> bool {
        match self.navigation.next_user(self.focused_user()).map(String::from) {
            Some(user) => self.select_user(&user),
            None => false,
        }
    }

    /// Focus the previous user in navigation order.
    pub fn select_previous_user(&mut self) -> bool {
        match self
            .navigation
            .previous_user(self.focused_user())
            .map(String::from)
        {
            Some(user) => self.select_user(&user),
            None => false,
        }
    }

    /// Go back one page. No-op on page 1.
    pub fn previous_page(&mut self) -> bool {
        if self.view.current_page > 1 {
            self.view.current_page -= 1;
            true
        } else {
            false
        }
    }

    /// Go forward one page. No-op on the last page.
    pub fn next_page(&mut self) -> bool {
        // Recomputed on every call so a stale page count can't overshoot
        if self.view.current_page < self.total_pages() {
            self.view.current_page += 1;
            true
        } else {
            false
        }
    }

    /// Jump to `page` and render it. Out-of-range pages render empty.
    pub fn render_page(&mut self, page: usize) -> PageView {
        self.view.current_page = page;
        self.render()
    }

    /// Render the current page.
    #[must_use]
    pub fn render(&self) -> PageView {
        let page = self.view.current_page;
        let Some(user) = self.focused_user() else {
            return PageView::empty(page);
        };
        let Some(group) = self.aggregation.group(user) else {
            return PageView::empty(page);
        };

        let total_pages = group.len().div_ceil(PAGE_SIZE);
        let start = page.saturating_sub(1).saturating_mul(PAGE_SIZE);
        let end = start.saturating_add(PAGE_SIZE).min(group.len());

        let rows = if page == 0 || start >= group.len() {
            Vec::new()
        } else {
            let records = self.jobs.records();
            group.jobs[start..end]
                .iter()
                .map(|&i| render_job_row(&records[i]))
                .collect()
        };

        PageView {
            rows,
            status_line: Some(format!(
                "{user} ({} nodes): Page {page} of {total_pages}",
                group.node_count
            )),
            page,
            total_pages,
            previous_disabled: page == 1,
            next_disabled: page == total_pages,
        }
    }
}
