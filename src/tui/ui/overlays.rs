//! Overlay and popup rendering
//!
//! Handles rendering of the help overlay and the job/node detail popup.

use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use crate::dashboard::{NodeListView, UNKNOWN_STATUS, pretty_json, render_job_row};
use crate::models::{FieldDefect, JobRecord, NodeRecord, Tone};
use crate::tui::app::{App, View};
use crate::tui::theme::Theme;

use super::widgets::{centered_rect, detail_row, indented_block, section_header};

pub fn render_help_overlay(frame: &mut Frame, area: Rect, theme: &Theme) {
    let popup_area = centered_rect(60, 70, area);

    // Clear the area first
    frame.render_widget(Clear, popup_area);

    let heading = |text: &'static str| {
        Line::from(vec![Span::styled(
            text,
            Style::default().fg(theme.user_highlight).bold(),
        )])
    };

    let help_text = vec![
        Line::from(vec![Span::styled(
            "jobdash - Keyboard Shortcuts",
            Style::default().bold(),
        )]),
        Line::from(""),
        heading("Rows"),
        Line::from("  j / Down       Move selection down"),
        Line::from("  k / Up         Move selection up"),
        Line::from("  g / Home       Jump to top"),
        Line::from("  G / End        Jump to bottom"),
        Line::from(""),
        heading("Jobs view"),
        Line::from("  Left / PgUp    Previous page"),
        Line::from("  Right / PgDn   Next page"),
        Line::from("  Tab            Next user"),
        Line::from("  Shift+Tab      Previous user"),
        Line::from("  n              Expand/collapse node list"),
        Line::from("  h              Expand/collapse status history"),
        Line::from(""),
        heading("General"),
        Line::from("  1 / 2          Jobs / Nodes view"),
        Line::from("  Enter          Details of selected row"),
        Line::from("  r              Fetch current view again"),
        Line::from("  ?/F1           Show this help"),
        Line::from("  Esc            Close overlay"),
        Line::from("  q              Quit application"),
        Line::from(""),
        Line::from(vec![Span::styled(
            "Press ? or Esc to close this help",
            Style::default().fg(theme.border),
        )]),
    ];

    let help_para = Paragraph::new(help_text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.border_focused))
                .title(" Help "),
        )
        .style(Style::default().fg(theme.fg));

    frame.render_widget(help_para, popup_area);
}

/// Detail popup for the selected job or node
pub fn render_detail_popup(app: &App, frame: &mut Frame, area: Rect, theme: &Theme) {
    let content = match app.current_view {
        View::Jobs => app
            .jobs_view
            .selected_job()
            .map(|job| job_detail(app, job, theme)),
        View::Nodes => app
            .nodes_view
            .selected_node()
            .map(|node| node_detail(node, theme)),
    };
    let Some((title, border_color, lines)) = content else {
        return;
    };

    let popup_area = centered_rect(80, 85, area);
    frame.render_widget(Clear, popup_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color))
        .title(title)
        .title_bottom(Line::from(" Esc: close ").right_aligned());

    let para = Paragraph::new(lines)
        .block(block)
        .style(Style::default().fg(theme.fg))
        .wrap(Wrap { trim: false });

    frame.render_widget(para, popup_area);
}

fn border_for(tone: Tone, theme: &Theme) -> Color {
    match tone {
        Tone::Normal => theme.border_focused,
        _ => theme.tone_color(tone),
    }
}

fn defect_lines(defects: &[FieldDefect], theme: &Theme) -> Vec<Line<'static>> {
    if defects.is_empty() {
        return Vec::new();
    }
    let mut lines = vec![Line::from(""), section_header("Defaulted fields", theme)];
    lines.extend(defects.iter().map(|defect| {
        Line::from(Span::styled(
            format!("  - {defect}"),
            Style::default().fg(theme.warn),
        ))
    }));
    lines
}

fn job_detail(app: &App, job: &JobRecord, theme: &Theme) -> (String, Color, Vec<Line<'static>>) {
    let row = render_job_row(job);
    let state_style = Style::default().fg(theme.tone_color(row.state.tone)).bold();

    let mut lines = vec![
        detail_row("User", Span::raw(job.user_name.clone())),
        detail_row("State", Span::styled(row.state.text.clone(), state_style)),
        detail_row("Nodes", Span::raw(job.node_count().to_string())),
        Line::from(""),
        section_header("Node list", theme),
    ];

    match row.node_list.content() {
        NodeListView::Nodes(nodes) => {
            for node in nodes {
                lines.push(Line::from(format!(
                    "  {} | {}",
                    node.logical_name.as_deref().unwrap_or("?"),
                    node.physical_name.as_deref().unwrap_or("?"),
                )));
                for rank in &node.ranks {
                    lines.push(Line::from(vec![
                        Span::styled(format!("    rank {} ", rank.rank), Style::default().fg(theme.border)),
                        Span::styled(app.client.resolve(&rank.href), Style::default().fg(theme.link)),
                    ]));
                }
            }
        }
        placeholder => lines.push(Line::from(format!(
            "  {}",
            placeholder.placeholder().unwrap_or_default()
        ))),
    }

    lines.push(Line::from(""));
    lines.push(section_header("Spec", theme));
    lines.extend(indented_block(&row.spec, Style::default()));

    lines.push(Line::from(""));
    lines.push(section_header("Status history", theme));
    lines.extend(indented_block(row.history.content(), Style::default()));

    lines.extend(defect_lines(&job.defects, theme));

    let title = format!(" Job {} [{}] ", job.id, row.state.text);
    (title, border_for(row.state.tone, theme), lines)
}

fn node_detail(node: &NodeRecord, theme: &Theme) -> (String, Color, Vec<Line<'static>>) {
    let spec_tone = node.spec_tone();
    let mut lines = vec![detail_row(
        "Goal state",
        Span::styled(
            node.goal_state.as_str().to_string(),
            Style::default().fg(theme.tone_color(spec_tone)).bold(),
        ),
    )];

    for (title, block) in [("K8s status", &node.k8s_status), ("Slurm status", &node.slurm_status)] {
        let style = Style::default().fg(theme.tone_color(block.tone()));
        lines.push(Line::from(""));
        lines.push(section_header(title, theme));
        match &block.raw {
            Some(raw) => lines.extend(indented_block(&pretty_json(raw), style)),
            None => lines.extend(indented_block(UNKNOWN_STATUS, style)),
        }
    }

    if let Some(spec) = &node.spec {
        lines.push(Line::from(""));
        lines.push(section_header("Spec", theme));
        lines.extend(indented_block(&pretty_json(spec), Style::default()));
    }

    lines.extend(defect_lines(&node.defects, theme));

    let attention = [spec_tone, node.k8s_status.tone(), node.slurm_status.tone()]
        .contains(&Tone::Alert);
    let border = if attention { theme.alert } else { theme.border_focused };
    (format!(" Node {} ", node.name), border, lines)
}
