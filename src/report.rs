//! Jobs and nodes reports for the one-shot and watch commands
//!
//! A report owns the last collection that loaded successfully. A failed fetch
//! is logged and the last good data is rendered again under the fetch-failed
//! message, so a watch loop never loses its table to one bad poll.

use crate::api::{DashboardClient, FETCH_FAILED_MESSAGE, FetchError, JobScope};
use crate::dashboard::{NodesView, PageView, PaginationController, render_nodes};
use crate::{display, html};

/// One poll of a report.
#[derive(Debug)]
pub struct Rendered {
    /// Terminal text or HTML document, always present
    pub output: String,
    /// Why this poll could not fetch fresh data
    pub error: Option<FetchError>,
}

/// What the jobs report shows
#[derive(Debug, Clone, Default)]
pub struct JobsOptions {
    pub scope: JobScope,
    /// Focus this user instead of the one with the most nodes
    pub user: Option<String>,
    pub page: Option<usize>,
    pub html: bool,
}

/// Jobs view kept across polls
#[derive(Debug)]
pub struct JobsReport {
    options: JobsOptions,
    controller: PaginationController,
    page: PageView,
}

impl JobsReport {
    #[must_use]
    pub fn new(options: JobsOptions) -> Self {
        Self {
            options,
            controller: PaginationController::new(),
            page: PageView::default(),
        }
    }

    /// Fetch the jobs and render. On failure the previous data is rendered.
    pub async fn poll(&mut self, client: &DashboardClient) -> Rendered {
        let error = match client.fetch_jobs(self.options.scope).await {
            Ok(jobs) => {
                self.apply(jobs);
                None
            }
            Err(e) => {
                tracing::warn!(error = %e, scope = self.options.scope.as_str(), "failed to fetch jobs");
                Some(e)
            }
        };

        let message = error.as_ref().map(|_| FETCH_FAILED_MESSAGE);
        Rendered {
            output: self.render(client, message),
            error,
        }
    }

    fn apply(&mut self, jobs: crate::models::JobCollection) {
        self.controller.load(jobs);
        if let Some(user) = &self.options.user {
            self.controller.select_user(user);
        }
        self.page = match self.options.page {
            Some(page) => self.controller.render_page(page),
            None => self.controller.render(),
        };
    }

    fn render(&self, client: &DashboardClient, error: Option<&str>) -> String {
        let nav = self.controller.navigation();
        let focused = self.controller.focused_user();
        if self.options.html {
            return html::render_jobs_document(nav, focused, &self.page, error);
        }

        let mut output = error.map(display::format_fetch_error).unwrap_or_default();
        output.push_str(&display::format_jobs_page(nav, focused, &self.page, Some(client)));
        output
    }
}

/// Nodes view kept across polls
#[derive(Debug, Default)]
pub struct NodesReport {
    html: bool,
    view: NodesView,
}

impl NodesReport {
    #[must_use]
    pub fn new(html: bool) -> Self {
        Self {
            html,
            view: NodesView::default(),
        }
    }

    /// Fetch the nodes and render. On failure the previous data is rendered.
    pub async fn poll(&mut self, client: &DashboardClient) -> Rendered {
        let error = match client.fetch_nodes().await {
            Ok(nodes) => {
                self.view = render_nodes(&nodes);
                None
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to fetch nodes");
                Some(e)
            }
        };

        let message = error.as_ref().map(|_| FETCH_FAILED_MESSAGE);
        let output = if self.html {
            html::render_nodes_document(&self.view, message)
        } else {
            let mut output = message.map(display::format_fetch_error).unwrap_or_default();
            output.push_str(&display::format_nodes(&self.view));
            output
        };

        Rendered { output, error }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ServerConfig;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    const JOBS: &str = r#"{"7": {"spec": {"userName": "alice"},
        "status": {"slurmJobRunCurrentStatus": {"state": "RUNNING",
            "physicalNodeSnapshots": {"n1": {"slurmNodeName": "node-a", "physicalNodeName": "host-a"}}}}}}"#;

    const NODES: &str = r#"{"gpu-1": {"spec": {"slurmNodeSpec": {"goalState": "up"}},
        "status": {"k8sNodeStatus": {"removed": false}, "slurmNodeStatus": {"removed": false}}}}"#;

    /// Serve one canned response per connection, in order.
    async fn serve(responses: Vec<(&'static str, &'static str)>) -> DashboardClient {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            for (status_line, body) in responses {
                let (mut socket, _) = listener.accept().await.unwrap();
                let mut buf = vec![0u8; 8192];
                let _ = socket.read(&mut buf).await.unwrap();
                let response = format!(
                    "HTTP/1.1 {status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                    body.len()
                );
                socket.write_all(response.as_bytes()).await.unwrap();
                let _ = socket.shutdown().await;
            }
        });

        DashboardClient::new(&ServerConfig {
            base_url: format!("http://{addr}"),
            timeout_secs: 5,
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_failed_poll_keeps_last_jobs_html() {
        let client = serve(vec![("200 OK", JOBS), ("500 Internal Server Error", "boom")]).await;
        let mut report = JobsReport::new(JobsOptions {
            html: true,
            ..JobsOptions::default()
        });

        let first = report.poll(&client).await;
        assert!(first.error.is_none());
        assert!(first.output.contains("node-a"));
        assert!(!first.output.contains(FETCH_FAILED_MESSAGE));

        let second = report.poll(&client).await;
        assert!(matches!(second.error, Some(FetchError::Status { status: 500, .. })));
        assert!(second.output.contains("node-a"));
        assert!(second.output.contains("alice (1 nodes): Page 1 of 1"));
        assert!(second.output.contains(FETCH_FAILED_MESSAGE));
    }

    #[tokio::test]
    async fn test_failed_poll_keeps_last_jobs_table() {
        let client = serve(vec![("200 OK", JOBS), ("503 Service Unavailable", "")]).await;
        let mut report = JobsReport::new(JobsOptions::default());

        report.poll(&client).await;
        let second = report.poll(&client).await;
        assert!(second.error.is_some());
        assert!(second.output.contains(FETCH_FAILED_MESSAGE));
        assert!(second.output.contains("RUNNING"));
        assert!(second.output.contains("node-a"));
    }

    #[tokio::test]
    async fn test_requested_user_and_page_survive_reload() {
        let client = serve(vec![("200 OK", JOBS), ("200 OK", JOBS)]).await;
        let mut report = JobsReport::new(JobsOptions {
            user: Some("bob".to_string()),
            html: true,
            ..JobsOptions::default()
        });

        for _ in 0..2 {
            let rendered = report.poll(&client).await;
            assert!(rendered.error.is_none());
            assert!(!rendered.output.contains("node-a"));
            assert!(!rendered.output.contains("Page 1 of"));
        }
    }

    #[tokio::test]
    async fn test_failed_poll_keeps_last_nodes() {
        let client = serve(vec![("200 OK", NODES), ("404 Not Found", "")]).await;
        let mut report = NodesReport::new(true);

        assert!(report.poll(&client).await.error.is_none());
        let second = report.poll(&client).await;
        assert!(second.error.is_some());
        assert!(second.output.contains("gpu-1"));
        assert!(second.output.contains(FETCH_FAILED_MESSAGE));
    }

    #[tokio::test]
    async fn test_first_poll_failure_renders_empty_view() {
        let client = serve(vec![("500 Internal Server Error", "")]).await;
        let mut report = NodesReport::new(false);

        let rendered = report.poll(&client).await;
        assert!(rendered.error.is_some());
        assert!(rendered.output.contains(FETCH_FAILED_MESSAGE));
        assert!(rendered.output.contains("No nodes found"));
    }
}
