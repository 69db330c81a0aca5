//! Jobs view rendering
//!
//! The user navigation line, one page of the focused user's jobs, and the
//! pagination line below it.

use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState};

use crate::dashboard::{Collapsible, JobRow, NodeLine, NodeListView};
use crate::formatting::{head_lines, single_line, truncate_string};
use crate::tui::app::App;
use crate::tui::theme::Theme;

use super::widgets::create_table_header;

/// Expanded cells are cut to this many lines in the table
const MAX_CELL_LINES: usize = 6;

pub fn render_jobs_view(app: &App, frame: &mut Frame, area: Rect, theme: &Theme) {
    let jobs_view = &app.jobs_view;
    let title = format!(" Jobs ({}) ", app.scope.as_str());

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.border_focused))
        .title(title);

    let inner = block.inner(area);
    frame.render_widget(block, area);

    if jobs_view.controller.jobs().is_empty() {
        let msg = if jobs_view.last_updated.is_none() {
            "Loading jobs..."
        } else {
            "No jobs found"
        };
        let para = Paragraph::new(msg)
            .style(Style::default().fg(theme.border))
            .alignment(Alignment::Center);
        frame.render_widget(para, inner);
        return;
    }

    let chunks = Layout::vertical([
        Constraint::Length(1), // User navigation
        Constraint::Min(3),    // Table
        Constraint::Length(1), // Pagination
    ])
    .split(inner);

    render_navigation(app, frame, chunks[0], theme);
    render_jobs_table(app, frame, chunks[1], theme);
    render_pagination(app, frame, chunks[2], theme);
}

fn render_navigation(app: &App, frame: &mut Frame, area: Rect, theme: &Theme) {
    let focused = app.jobs_view.controller.focused_user();
    let mut spans = vec![Span::styled("Users: ", Style::default().fg(theme.border))];

    for entry in app.jobs_view.controller.navigation().entries() {
        let label = entry.label();
        if Some(entry.user_name.as_str()) == focused {
            spans.push(Span::styled(
                format!("[{label}]"),
                Style::default().fg(theme.user_highlight).bold(),
            ));
        } else {
            spans.push(Span::styled(label, Style::default().fg(theme.fg)));
        }
        spans.push(Span::raw("  "));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn node_line_text(line: &NodeLine) -> String {
    let logical = line.logical_name.as_deref().unwrap_or("?");
    let physical = line.physical_name.as_deref().unwrap_or("?");
    match (line.ranks.first(), line.ranks.last()) {
        (Some(first), Some(last)) => {
            format!("{logical} | {physical} | :{}-:{}", first.port, last.port)
        }
        _ => format!("{logical} | {physical}"),
    }
}

/// Node-list cell text: one line per node when open.
fn node_list_text(cell: &Collapsible<NodeListView>) -> String {
    match cell.visible() {
        None => format!("▸ {} node(s)", node_count(cell.content())),
        Some(NodeListView::Nodes(lines)) => {
            let text = lines.iter().map(node_line_text).collect::<Vec<_>>().join("\n");
            head_lines(&text, MAX_CELL_LINES)
        }
        Some(placeholder) => placeholder.placeholder().unwrap_or_default().to_string(),
    }
}

fn node_count(view: &NodeListView) -> usize {
    match view {
        NodeListView::Nodes(lines) => lines.len(),
        _ => 0,
    }
}

fn history_text(cell: &Collapsible<String>) -> String {
    match cell.visible() {
        None => "▸ history".to_string(),
        Some(history) => head_lines(history, MAX_CELL_LINES),
    }
}

fn job_to_row(row: &JobRow, theme: &Theme) -> Row<'static> {
    let nodes = node_list_text(&row.node_list);
    let history = history_text(&row.history);
    let height = nodes.lines().count().max(history.lines().count()).max(1);

    let dim = Style::default().fg(theme.border);
    let nodes_style = if row.node_list.is_open() {
        Style::default().fg(theme.link)
    } else {
        dim
    };
    let history_style = if row.history.is_open() {
        Style::default().fg(theme.fg)
    } else {
        dim
    };

    Row::new(vec![
        Cell::from(row.id.to_string()),
        Cell::from(row.state.text.clone()).style(Style::default().fg(theme.tone_color(row.state.tone))),
        Cell::from(truncate_string(&single_line(&row.spec), 60)),
        Cell::from(nodes).style(nodes_style),
        Cell::from(history).style(history_style),
    ])
    .height(u16::try_from(height).unwrap_or(u16::MAX))
}

fn render_jobs_table(app: &App, frame: &mut Frame, area: Rect, theme: &Theme) {
    let page = &app.jobs_view.page;

    if page.rows.is_empty() {
        let para = Paragraph::new("No jobs for this user")
            .style(Style::default().fg(theme.border))
            .alignment(Alignment::Center);
        frame.render_widget(para, area);
        return;
    }

    let header = create_table_header(&["ID", "State", "Spec", "Nodes", "Status History"], theme);
    let rows: Vec<Row> = page.rows.iter().map(|row| job_to_row(row, theme)).collect();

    let widths = [
        Constraint::Length(10), // ID
        Constraint::Length(10), // State
        Constraint::Min(20),    // Spec
        Constraint::Length(36), // Nodes
        Constraint::Min(20),    // Status History
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .row_highlight_style(Style::default().bg(theme.selected_bg));

    // Rows have uneven heights, so let the table work out the scroll offset
    let mut state = TableState::default().with_selected(Some(app.jobs_view.list_state.selected));
    frame.render_stateful_widget(table, area, &mut state);
}

fn render_pagination(app: &App, frame: &mut Frame, area: Rect, theme: &Theme) {
    let page = &app.jobs_view.page;
    let control = |label: &'static str, disabled: bool| {
        let style = if disabled {
            Style::default().fg(theme.border)
        } else {
            Style::default().fg(theme.user_highlight).bold()
        };
        Span::styled(label, style)
    };

    let spans = vec![
        control("◀ Previous", page.previous_disabled),
        Span::raw("  "),
        Span::styled(
            page.status_line.clone().unwrap_or_default(),
            Style::default().fg(theme.fg),
        ),
        Span::raw("  "),
        control("Next ▶", page.next_disabled),
    ];

    frame.render_widget(
        Paragraph::new(Line::from(spans)).alignment(Alignment::Center),
        area,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::render_node_list;
    use crate::models::{NodeSnapshots, PhysicalNodeSnapshot};

    fn snapshots(count: usize) -> NodeSnapshots {
        NodeSnapshots::Nodes(
            (0..count)
                .map(|i| {
                    (
                        format!("n{i}"),
                        PhysicalNodeSnapshot {
                            slurm_node_name: Some(format!("node-{i}")),
                            physical_node_name: Some(format!("host-{i}")),
                            k8s_node_name: None,
                        },
                    )
                })
                .collect(),
        )
    }

    #[test]
    fn test_node_list_text_open_and_closed() {
        let mut cell = render_node_list(&snapshots(2));
        assert_eq!(
            node_list_text(&cell),
            "node-0 | host-0 | :3724-:3731\nnode-1 | host-1 | :3724-:3731"
        );
        cell.toggle();
        assert_eq!(node_list_text(&cell), "▸ 2 node(s)");
    }

    #[test]
    fn test_node_list_text_is_capped() {
        let cell = render_node_list(&snapshots(10));
        let text = node_list_text(&cell);
        assert_eq!(text.lines().count(), MAX_CELL_LINES + 1);
        assert!(text.ends_with("… 4 more line(s)"));
    }

    #[test]
    fn test_placeholders() {
        assert_eq!(node_list_text(&render_node_list(&NodeSnapshots::Empty)), "No data available");
        assert_eq!(node_list_text(&render_node_list(&NodeSnapshots::Unavailable)), "N/A");
    }
}
