//! Static HTML rendering of the jobs and nodes views.
//!
//! Produces a self-contained document with the element IDs the dashboard page
//! has always exposed (`jobsTable`, `nodesTable`, `userNameNav`, `pagination`,
//! `pageInfo`, `errorMessage`). Collapsible cells are `<details>` elements so
//! the open/closed toggle works without script. All record content is escaped.

use std::fmt::Write;

use crate::dashboard::{
    Cell, Collapsible, JobRow, Navigation, NodeListView, NodesView, PageView, UNKNOWN_STATUS,
};
use crate::models::Tone;

const STYLE: &str = r#"
    body { font-family: sans-serif; margin: 1em; }
    table { border-collapse: collapse; width: 100%; }
    th, td { border: 1px solid #ccc; padding: 4px; vertical-align: top; text-align: left; }
    pre { margin: 0; }
    #userNameNav button.selected { font-weight: bold; }
    .node-item .separator { margin: 0 0.5em; color: #888; }
    .rank-link { margin-right: 0.4em; }
    #errorMessage { color: red; }
"#;

/// Escape text for use in element content and attribute values.
#[must_use]
pub fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

fn style_attr(tone: Tone) -> String {
    tone.css_color()
        .map(|color| format!(r#" style="color: {color}""#))
        .unwrap_or_default()
}

fn layout(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <title>{title}</title>
    <style>{STYLE}</style>
</head>
<body>
{body}
</body>
</html>
"#,
        title = escape_html(title),
    )
}

fn error_region(error: Option<&str>) -> String {
    format!(
        r#"<div id="errorMessage">{}</div>"#,
        error.map(escape_html).unwrap_or_default()
    )
}

fn pre(text: &str) -> String {
    format!("<pre>{}</pre>", escape_html(text))
}

/// State text is shown JSON-quoted, e.g. `"RUNNING"`.
fn state_cell(cell: &Cell) -> String {
    let quoted = serde_json::to_string(&cell.text).unwrap_or_else(|_| cell.text.clone());
    format!("<td{}>{}</td>", style_attr(cell.tone), pre(&quoted))
}

fn pre_cell(cell: &Cell) -> String {
    format!("<td{}>{}</td>", style_attr(cell.tone), pre(&cell.text))
}

/// Missing status blocks read as a quoted `"UNKNOWN"`.
fn status_cell(cell: &Cell) -> String {
    if cell.text == UNKNOWN_STATUS {
        state_cell(cell)
    } else {
        pre_cell(cell)
    }
}

fn collapsible_cell(summary: &str, cell: &Collapsible<String>, body: impl FnOnce(&str) -> String) -> String {
    let state = cell.state();
    let open = if state.is_open() { " open" } else { "" };
    format!(
        r#"<td class="collapsible {class}"><details class="collapsible {class}"{open}><summary>{summary}</summary>{body}</details></td>"#,
        class = state.class(),
        body = body(cell.content()),
    )
}

fn node_list_cell(cell: &Collapsible<NodeListView>) -> String {
    let mut body = String::new();
    match cell.content() {
        NodeListView::Nodes(lines) => {
            for line in lines {
                let logical = line.logical_name.as_deref().unwrap_or_default();
                let physical = line.physical_name.as_deref().unwrap_or_default();
                let ranks: String = line
                    .ranks
                    .iter()
                    .map(|rank| {
                        format!(
                            r#"<a href="{}" class="rank-link">{}</a>"#,
                            escape_html(&rank.href),
                            rank.rank
                        )
                    })
                    .collect();
                let _ = write!(
                    body,
                    r#"<div class="node-item"><span class="node-name">{}</span><span class="separator">|</span><span class="node-physical-name">{}</span><span class="separator">|</span><span class="rank-container">{ranks}</span></div>"#,
                    escape_html(logical),
                    escape_html(physical),
                );
            }
        }
        placeholder => {
            let _ = write!(body, "<p>{}</p>", placeholder.placeholder().unwrap_or_default());
        }
    }

    let state = cell.state();
    let open = if state.is_open() { " open" } else { "" };
    format!(
        r#"<td class="collapsible {class}"><details class="node-list"{open}><summary>nodes</summary>{body}</details></td>"#,
        class = state.class(),
    )
}

fn job_row(row: &JobRow) -> String {
    format!(
        "<tr><td>{id}</td>{state}<td>{spec}</td>{nodes}{history}</tr>",
        id = escape_html(row.id.as_str()),
        state = state_cell(&row.state),
        spec = pre(&row.spec),
        nodes = node_list_cell(&row.node_list),
        history = collapsible_cell("history", &row.history, pre),
    )
}

fn navigation(nav: &Navigation, focused_user: Option<&str>) -> String {
    let buttons: String = nav
        .entries()
        .iter()
        .map(|entry| {
            let selected = if Some(entry.user_name.as_str()) == focused_user {
                r#" class="selected""#
            } else {
                ""
            };
            format!(
                r#"<button data-user="{}"{selected}>{}</button>"#,
                escape_html(&entry.user_name),
                escape_html(&entry.label())
            )
        })
        .collect();
    format!(r#"<nav id="userNameNav">{buttons}</nav>"#)
}

fn pagination(view: &PageView) -> String {
    let disabled = |d: bool| if d { " disabled" } else { "" };
    format!(
        r#"<div id="pagination"><button id="previousPage"{prev}>Previous</button><span id="pageInfo">{info}</span><button id="nextPage"{next}>Next</button></div>"#,
        prev = disabled(view.previous_disabled),
        next = disabled(view.next_disabled),
        info = view.status_line.as_deref().map(escape_html).unwrap_or_default(),
    )
}

/// Render the jobs view as a full HTML document.
#[must_use]
pub fn render_jobs_document(
    nav: &Navigation,
    focused_user: Option<&str>,
    view: &PageView,
    error: Option<&str>,
) -> String {
    let rows: String = view.rows.iter().map(job_row).collect();
    let body = format!(
        r#"<h1>Jobs</h1>
{error}
<table id="jobsTable">
<thead><tr><th>ID</th><th>State</th><th>Spec</th><th>Nodes</th><th>Status History</th></tr></thead>
<tbody>{rows}</tbody>
</table>
{nav}
{pagination}"#,
        error = error_region(error),
        nav = navigation(nav, focused_user),
        pagination = pagination(view),
    );
    layout("Jobs", &body)
}

/// Render the nodes view as a full HTML document.
#[must_use]
pub fn render_nodes_document(view: &NodesView, error: Option<&str>) -> String {
    let rows: String = view
        .rows
        .iter()
        .map(|row| {
            format!(
                "<tr><td>{}</td>{}{}{}</tr>",
                escape_html(&row.name),
                pre_cell(&row.spec),
                status_cell(&row.k8s_status),
                status_cell(&row.slurm_status),
            )
        })
        .collect();

    let body = format!(
        r#"<h1>Nodes</h1>
{error}
<table id="nodesTable">
<thead><tr><th>Name</th><th>Spec</th><th>K8s Status</th><th>Slurm Status</th></tr></thead>
<tbody>{rows}</tbody>
</table>"#,
        error = error_region(error),
    );
    layout("Nodes", &body)
}
