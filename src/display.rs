//! Terminal rendering of the jobs and nodes views for one-shot and watch mode

use owo_colors::OwoColorize;
use tabled::{
    Table, Tabled,
    settings::{Alignment, Modify, Style, Width, object::Rows},
};

use crate::api::DashboardClient;
use crate::dashboard::{
    Cell, Collapsible, JobRow, Navigation, NodeLine, NodeListView, NodesView, PageView,
    pretty_json,
};
use crate::formatting::truncate_string;
use crate::models::{JobRecord, NodeRecord, Tone};

/// Maximum rendered table width before cells wrap.
const TABLE_WIDTH: usize = 200;

/// Color text by tone
fn paint(text: &str, tone: Tone) -> String {
    match tone {
        Tone::Normal => text.to_string(),
        Tone::Good => text.green().to_string(),
        Tone::Alert => text.red().to_string(),
    }
}

fn paint_cell(cell: &Cell) -> String {
    paint(&cell.text, cell.tone)
}

/// Table row for job display
#[derive(Tabled)]
struct JobTableRow {
    #[tabled(rename = "ID")]
    id: String,

    #[tabled(rename = "State")]
    state: String,

    #[tabled(rename = "Spec")]
    spec: String,

    #[tabled(rename = "Nodes")]
    nodes: String,

    #[tabled(rename = "Status History")]
    history: String,
}

/// Table row for node display
#[derive(Tabled)]
struct NodeTableRow {
    #[tabled(rename = "Name")]
    name: String,

    #[tabled(rename = "Spec")]
    spec: String,

    #[tabled(rename = "K8s Status")]
    k8s_status: String,

    #[tabled(rename = "Slurm Status")]
    slurm_status: String,
}

/// One node line: `logical | physical | ranks 0-7 -> <first link> .. :<last port>`
fn format_node_line(line: &NodeLine, client: Option<&DashboardClient>) -> String {
    let logical = line.logical_name.as_deref().unwrap_or("?");
    let physical = line.physical_name.as_deref().unwrap_or("?");

    match (line.ranks.first(), line.ranks.last()) {
        (Some(first), Some(last)) => {
            let href = client.map_or_else(|| first.href.clone(), |c| c.resolve(&first.href));
            format!(
                "{} | {} | ranks {}-{}: {} .. :{}",
                logical.cyan(),
                physical,
                first.rank,
                last.rank,
                href,
                last.port
            )
        }
        _ => format!("{} | {}", logical.cyan(), physical),
    }
}

fn format_node_list(cell: &Collapsible<NodeListView>, client: Option<&DashboardClient>) -> String {
    let Some(view) = cell.visible() else {
        return "▸ nodes".dimmed().to_string();
    };
    match view {
        NodeListView::Nodes(lines) => lines
            .iter()
            .map(|line| format_node_line(line, client))
            .collect::<Vec<_>>()
            .join("\n"),
        placeholder => placeholder
            .placeholder()
            .unwrap_or_default()
            .yellow()
            .to_string(),
    }
}

fn format_history(cell: &Collapsible<String>) -> String {
    match cell.visible() {
        Some(history) => history.clone(),
        None => "▸ history".dimmed().to_string(),
    }
}

fn job_table_row(row: &JobRow, client: Option<&DashboardClient>) -> JobTableRow {
    JobTableRow {
        id: row.id.to_string(),
        state: paint_cell(&row.state),
        spec: row.spec.clone(),
        nodes: format_node_list(&row.node_list, client),
        history: format_history(&row.history),
    }
}

/// User selectors on one line, the focused user highlighted.
pub fn format_navigation(nav: &Navigation, focused_user: Option<&str>) -> String {
    nav.entries()
        .iter()
        .map(|entry| {
            let label = entry.label();
            if Some(entry.user_name.as_str()) == focused_user {
                format!("[{}]", label.bold().cyan())
            } else {
                label
            }
        })
        .collect::<Vec<_>>()
        .join("  ")
}

/// Render one page of the jobs view.
///
/// Row cells are drawn in their current disclosure state; status history is
/// collapsed unless the row was toggled open.
pub fn format_jobs_page(
    nav: &Navigation,
    focused_user: Option<&str>,
    view: &PageView,
    client: Option<&DashboardClient>,
) -> String {
    let mut output = String::new();

    if !nav.is_empty() {
        output.push_str(&format!("{} {}\n", "Users:".bold(), format_navigation(nav, focused_user)));
    }

    if view.rows.is_empty() {
        output.push_str(&"No jobs found".yellow().to_string());
        output.push('\n');
    } else {
        let rows: Vec<JobTableRow> = view.rows.iter().map(|row| job_table_row(row, client)).collect();
        let mut table = Table::new(rows);
        table
            .with(Style::rounded())
            .with(Width::wrap(TABLE_WIDTH).keep_words(true))
            .with(Modify::new(Rows::first()).with(Alignment::center()));
        output.push_str(&table.to_string());
        output.push('\n');
    }

    if let Some(status) = &view.status_line {
        let mut controls = Vec::new();
        if !view.previous_disabled {
            controls.push(format!("--page {}", view.page.saturating_sub(1)));
        }
        if !view.next_disabled {
            controls.push(format!("--page {}", view.page + 1));
        }
        output.push_str(&status.bold().to_string());
        if !controls.is_empty() {
            output.push_str(&format!("  ({})", controls.join(", ")).dimmed().to_string());
        }
        output.push('\n');
    }

    output
}

/// Error line shown above the last loaded data.
pub fn format_fetch_error(message: &str) -> String {
    format!("{}\n", message.red().bold())
}

/// Render the nodes view.
pub fn format_nodes(view: &NodesView) -> String {
    if view.rows.is_empty() {
        return "No nodes found".yellow().to_string();
    }

    let rows: Vec<NodeTableRow> = view
        .rows
        .iter()
        .map(|row| NodeTableRow {
            name: row.name.clone(),
            spec: paint_cell(&row.spec),
            k8s_status: paint_cell(&row.k8s_status),
            slurm_status: paint_cell(&row.slurm_status),
        })
        .collect();

    let mut table = Table::new(rows);
    table
        .with(Style::rounded())
        .with(Width::wrap(TABLE_WIDTH).keep_words(true))
        .with(Modify::new(Rows::first()).with(Alignment::center()));

    let mut output = table.to_string();
    if let Some(summary) = view.summary() {
        output.push('\n');
        output.push_str(&summary.bold().to_string());
    }
    output
}

fn section(title: &str, body: &str) -> String {
    format!("\n{}\n{}\n", title.bold().underline(), body)
}

fn header(title: &str) -> String {
    format!("{}\n", truncate_string(title, 78).blue().bold())
}

/// Detailed view of a single job
pub fn format_job_details(job: &JobRecord, client: Option<&DashboardClient>) -> String {
    let row = crate::dashboard::render_job_row(job);
    let mut output = header(&format!("Job {}", job.id));

    output.push_str(&format!("  {} {}\n", "User:".bold(), job.user_name));
    output.push_str(&format!("  {} {}\n", "State:".bold(), paint_cell(&row.state)));
    output.push_str(&format!("  {} {}\n", "Nodes:".bold(), job.node_count()));

    output.push_str(&section("Node list", &format_node_list(&row.node_list, client)));
    output.push_str(&section("Spec", &row.spec));

    // Detail view shows history expanded
    let mut history = row.history;
    history.toggle();
    output.push_str(&section("Status history", &format_history(&history)));

    if !job.defects.is_empty() {
        let defects: Vec<String> = job.defects.iter().map(|d| format!("  - {d}")).collect();
        output.push_str(&section("Defaulted fields", &defects.join("\n").yellow().to_string()));
    }

    output
}

/// Detailed view of a single node
pub fn format_node_details(node: &NodeRecord) -> String {
    let mut output = header(&format!("Node {}", node.name));

    output.push_str(&format!(
        "  {} {}\n",
        "Goal state:".bold(),
        paint(node.goal_state.as_str(), node.spec_tone())
    ));

    for (title, block) in [("K8s status", &node.k8s_status), ("Slurm status", &node.slurm_status)] {
        let body = match &block.raw {
            Some(raw) => paint(&pretty_json(raw), block.tone()),
            None => paint(crate::dashboard::UNKNOWN_STATUS, Tone::Alert),
        };
        output.push_str(&section(title, &body));
    }

    if let Some(spec) = &node.spec {
        output.push_str(&section("Spec", &pretty_json(spec)));
    }

    if !node.defects.is_empty() {
        let defects: Vec<String> = node.defects.iter().map(|d| format!("  - {d}")).collect();
        output.push_str(&section("Defaulted fields", &defects.join("\n").yellow().to_string()));
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::{PaginationController, render_nodes};
    use crate::models::{JobCollection, NodeCollection, RecordId};
    use serde_json::json;

    fn strip_ansi(s: &str) -> String {
        let mut result = String::new();
        let mut in_escape = false;
        for ch in s.chars() {
            if ch == '\x1b' {
                in_escape = true;
            } else if in_escape && ch == 'm' {
                in_escape = false;
            } else if !in_escape {
                result.push(ch);
            }
        }
        result
    }

    fn controller() -> PaginationController {
        let payload = json!({
            "5": {"spec": {"userName": "alice"}, "status": {"slurmJobRunCurrentStatus": {
                "state": "RUNNING",
                "physicalNodeSnapshots": {"n1": {"slurmNodeName": "a", "physicalNodeName": "p1"}}
            }, "slurmJobRunStatusHistory": [{"state": "PENDING"}]}},
            "3": {"spec": {"userName": "bob"}}
        });
        let mut controller = PaginationController::new();
        controller.load(JobCollection::from_value(&payload).unwrap());
        controller
    }

    #[test]
    fn test_jobs_page() {
        let controller = controller();
        let out = strip_ansi(&format_jobs_page(
            controller.navigation(),
            controller.focused_user(),
            &controller.render(),
            None,
        ));

        assert!(out.contains("[alice (1 nodes)]"));
        assert!(out.contains("bob (0 nodes)"));
        assert!(out.contains("RUNNING"));
        assert!(out.contains("a | p1 | ranks 0-7: api/proxy/a:3724/ .. :3731"));
        assert!(out.contains("▸ history"));
        assert!(!out.contains("PENDING"));
        assert!(out.contains("alice (1 nodes): Page 1 of 1"));
    }

    #[test]
    fn test_toggled_history_is_shown() {
        let controller = controller();
        let mut view = controller.render();
        view.rows[0].history.toggle();
        let out = format_jobs_page(controller.navigation(), controller.focused_user(), &view, None);
        assert!(out.contains("PENDING"));
    }

    #[test]
    fn test_empty_jobs_page() {
        let out = strip_ansi(&format_jobs_page(
            &Navigation::default(),
            None,
            &PaginationController::new().render(),
            None,
        ));
        assert!(out.contains("No jobs found"));
        assert!(!out.contains("Page"));
    }

    #[test]
    fn test_nodes_table() {
        let nodes = NodeCollection::from_value(&json!({
            "n1": {"metadata": {"name": "n1"}, "status": {"k8sNodeStatus": {"removed": true}}}
        }))
        .unwrap();
        let out = strip_ansi(&format_nodes(&render_nodes(&nodes)));
        assert!(out.contains("n1"));
        assert!(out.contains("UNKNOWN"));
        assert!(out.contains("1 nodes, 1 flagged"));
    }

    #[test]
    fn test_job_details() {
        let job = JobRecord::from_value(
            RecordId::new("77"),
            &json!({"spec": {"userName": "carol"}, "status": {"slurmJobRunStatusHistory": []}}),
        );
        let out = strip_ansi(&format_job_details(&job, None));
        assert!(out.contains("Job 77"));
        assert!(out.contains("User: carol"));
        assert!(out.contains("State: REMOVED"));
        assert!(out.contains("N/A"));
        assert!(out.contains("Defaulted fields"));
    }

    #[test]
    fn test_node_details() {
        let node = NodeRecord::from_value(
            RecordId::new("gpu-3"),
            &json!({"spec": {"slurmNodeSpec": {"goalState": "down"}}}),
        );
        let out = strip_ansi(&format_node_details(&node));
        assert!(out.contains("Node gpu-3"));
        assert!(out.contains("Goal state: down"));
        assert!(out.contains("UNKNOWN"));
    }
}
