//! Nodes view rendering

use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table};

use crate::dashboard::NodeRow;
use crate::tui::app::App;
use crate::tui::theme::Theme;

use super::widgets::{calculate_scroll_offset, create_table_header, tone_cell};

pub fn render_nodes_view(app: &App, frame: &mut Frame, area: Rect, theme: &Theme) {
    let nodes_view = &app.nodes_view;

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.border_focused))
        .title(format!(" Nodes ({}) ", nodes_view.view.rows.len()));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    if nodes_view.view.rows.is_empty() {
        let msg = if nodes_view.last_updated.is_none() {
            "Loading nodes..."
        } else {
            "No nodes found"
        };
        let para = Paragraph::new(msg)
            .style(Style::default().fg(theme.border))
            .alignment(Alignment::Center);
        frame.render_widget(para, inner);
        return;
    }

    let chunks = Layout::vertical([
        Constraint::Min(3),    // Node table
        Constraint::Length(1), // Summary footer
    ])
    .split(inner);

    let header = create_table_header(&["Name", "Spec", "K8s Status", "Slurm Status"], theme);

    let available_height = chunks[0].height.saturating_sub(1) as usize;
    let selected = nodes_view.list_state.selected;
    let scroll_offset =
        calculate_scroll_offset(selected, available_height, nodes_view.view.rows.len());

    let rows: Vec<Row> = nodes_view
        .view
        .rows
        .iter()
        .enumerate()
        .skip(scroll_offset)
        .take(available_height)
        .map(|(i, node)| node_to_row(node, i == selected, theme))
        .collect();

    let widths = [
        Constraint::Length(20),     // Name
        Constraint::Percentage(30), // Spec
        Constraint::Percentage(25), // K8s status
        Constraint::Percentage(25), // Slurm status
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .row_highlight_style(Style::default().bg(theme.selected_bg));

    frame.render_widget(table, chunks[0]);

    let summary = nodes_view.view.summary().unwrap_or_default();
    let flagged = nodes_view.view.rows.iter().any(NodeRow::needs_attention);
    let style = if flagged {
        Style::default().fg(theme.warn)
    } else {
        Style::default().fg(theme.border)
    };
    frame.render_widget(
        Paragraph::new(format!(" {summary}  (Enter: full detail)")).style(style),
        chunks[1],
    );
}

fn node_to_row(node: &NodeRow, is_selected: bool, theme: &Theme) -> Row<'static> {
    let name_style = if node.needs_attention() {
        Style::default().fg(theme.alert).bold()
    } else {
        Style::default().fg(theme.fg)
    };

    let row = Row::new(vec![
        Cell::from(node.name.clone()).style(name_style),
        tone_cell(&node.spec, 80, theme),
        tone_cell(&node.k8s_status, 60, theme),
        tone_cell(&node.slurm_status, 60, theme),
    ]);

    if is_selected {
        row.style(Style::default().bg(theme.selected_bg))
    } else {
        row
    }
}
