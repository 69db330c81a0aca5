//! UI rendering for the TUI
//!
//! This module handles all rendering using ratatui. The rendering is event-driven -
//! we only render when an event triggers a state change, not at a fixed frame rate.

mod jobs;
mod nodes;
mod overlays;
mod widgets;

use chrono::{DateTime, Local};
use ratatui::prelude::*;
use ratatui::widgets::{Paragraph, Tabs};

use crate::formatting::format_age;
use crate::tui::app::{App, ModalState, View};
use crate::tui::theme::Theme;

use jobs::render_jobs_view;
use nodes::render_nodes_view;
use overlays::{render_detail_popup, render_help_overlay};

/// Render the entire TUI
pub fn render(app: &App, frame: &mut Frame) {
    let theme = Theme::from_name(&app.config.display.theme);
    let area = frame.area();

    // Main layout: header, content, footer
    let layout = Layout::vertical([
        Constraint::Length(1), // Tab bar
        Constraint::Length(1), // Info bar
        Constraint::Min(0),    // Main content
        Constraint::Length(2), // Status bar
    ])
    .split(area);

    render_tab_bar(app, frame, layout[0], &theme);
    render_info_bar(app, frame, layout[1], &theme);
    render_content(app, frame, layout[2], &theme);
    render_status_bar(app, frame, layout[3], &theme);

    match app.modal {
        ModalState::Help => render_help_overlay(frame, area, &theme),
        ModalState::Detail => render_detail_popup(app, frame, area, &theme),
        ModalState::None => {}
    }
}

fn render_tab_bar(app: &App, frame: &mut Frame, area: Rect, theme: &Theme) {
    let titles: Vec<Line> = [View::Jobs, View::Nodes]
        .iter()
        .enumerate()
        .map(|(i, view)| {
            let num = format!("[{}]", i + 1);
            let label = view.label();
            if *view == app.current_view {
                Line::from(vec![
                    Span::styled(num, Style::default().fg(theme.user_highlight)),
                    Span::styled(label, Style::default().fg(theme.selected_fg).bold()),
                ])
            } else {
                Line::from(vec![
                    Span::styled(num, Style::default().fg(theme.border)),
                    Span::raw(label),
                ])
            }
        })
        .collect();

    let tabs = Tabs::new(titles)
        .select(app.current_view as usize)
        .divider(" | ")
        .style(Style::default().fg(theme.fg))
        .highlight_style(Style::default().fg(theme.selected_fg).bold());

    frame.render_widget(tabs, area);
}

fn render_info_bar(app: &App, frame: &mut Frame, area: Rect, theme: &Theme) {
    let aggregation = app.jobs_view.controller.aggregation();
    let info = format!(
        " {} | Scope: {} | {} jobs, {} users | {} nodes",
        app.client.base_url(),
        app.scope.as_str(),
        aggregation.total_jobs(),
        aggregation.groups().len(),
        app.nodes_view.view.rows.len(),
    );

    let para = Paragraph::new(info).style(Style::default().fg(theme.border));
    frame.render_widget(para, area);
}

fn render_content(app: &App, frame: &mut Frame, area: Rect, theme: &Theme) {
    match app.current_view {
        View::Jobs => render_jobs_view(app, frame, area, theme),
        View::Nodes => render_nodes_view(app, frame, area, theme),
    }
}

fn updated_span(last_updated: Option<DateTime<Local>>, theme: &Theme) -> Span<'static> {
    match last_updated {
        Some(at) => Span::styled(
            format!("Updated: {}", format_age(at, Local::now())),
            Style::default().fg(theme.border),
        ),
        None => Span::styled("Loading...", Style::default().fg(theme.warn)),
    }
}

fn render_status_bar(app: &App, frame: &mut Frame, area: Rect, theme: &Theme) {
    let layout = Layout::vertical([Constraint::Length(1), Constraint::Length(1)]).split(area);

    // Keybindings line - context-sensitive
    let keybinds = match app.current_view {
        View::Jobs => {
            " j/k:move  ←/→:page  Tab:user  n:nodes  h:history  Enter:detail  r:refresh  ?:help  q:quit "
        }
        View::Nodes => " j/k:move  Enter:detail  r:refresh  ?:help  q:quit ",
    };
    let keybinds_para = Paragraph::new(keybinds).style(Style::default().fg(theme.border));
    frame.render_widget(keybinds_para, layout[0]);

    let mut status_parts = Vec::new();

    if app.modal == ModalState::Detail {
        status_parts.push(Span::styled(
            " [DETAIL]",
            Style::default().fg(theme.warn).bold(),
        ));
    }

    status_parts.push(Span::raw(" "));
    let last_updated = match app.current_view {
        View::Jobs => app.jobs_view.last_updated,
        View::Nodes => app.nodes_view.last_updated,
    };
    status_parts.push(updated_span(last_updated, theme));

    if app.config.refresh.auto_refresh {
        status_parts.push(Span::styled(" (auto)", Style::default().fg(theme.border)));
    }

    // Config warnings display (persistent)
    if let Some(first) = app.feedback.config_warnings.first() {
        let warning_text = match app.feedback.config_warnings.len() {
            1 => format!(" | WARN: {first}"),
            n => format!(" | WARN: {first} (+{} more)", n - 1),
        };
        status_parts.push(Span::styled(warning_text, Style::default().fg(theme.warn)));
    }

    // Error display (temporary, auto-dismisses)
    if let Some(error) = app.current_error() {
        status_parts.push(Span::styled(
            format!(" | ERROR: {error} "),
            Style::default().fg(theme.alert),
        ));
    }

    frame.render_widget(Paragraph::new(Line::from(status_parts)), layout[1]);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{DashboardClient, JobScope};
    use crate::models::{DashboardConfig, JobCollection};
    use crate::tui::event::DataEvent;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;
    use serde_json::json;
    use tokio::sync::mpsc;

    fn app() -> App {
        let (tx, _rx) = mpsc::channel(4);
        let config = DashboardConfig::default();
        let client = DashboardClient::new(&config.server).unwrap();
        App::new(config, Vec::new(), client, JobScope::Active, tx)
    }

    fn draw(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(160, 40)).unwrap();
        terminal.draw(|frame| render(app, frame)).unwrap();
        let buffer = terminal.backend().buffer();
        buffer
            .content()
            .chunks(buffer.area.width as usize)
            .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_loading_screen() {
        let screen = draw(&app());
        assert!(screen.contains("Loading jobs..."));
        assert!(screen.contains("[1]"));
        assert!(screen.contains("Nodes"));
    }

    #[test]
    fn test_jobs_screen() {
        let mut app = app();
        app.handle_data(DataEvent::JobsUpdated {
            jobs: JobCollection::from_value(&json!({
                "12": {"spec": {"userName": "alice"}, "status": {"slurmJobRunCurrentStatus":
                    {"state": "RUNNING", "physicalNodeSnapshots": {"x": {"slurmNodeName": "node-a", "physicalNodeName": "host-a"}}}}},
                "11": {"spec": {"userName": "bob"}}
            }))
            .unwrap(),
            fetched_at: Local::now(),
            background: false,
        });

        let screen = draw(&app);
        assert!(screen.contains("[alice (1 nodes)]"));
        assert!(screen.contains("bob (0 nodes)"));
        assert!(screen.contains("RUNNING"));
        assert!(screen.contains("node-a | host-a"));
        assert!(screen.contains("alice (1 nodes): Page 1 of 1"));
    }

    #[test]
    fn test_help_overlay_drawn() {
        let mut app = app();
        app.modal = ModalState::Help;
        assert!(draw(&app).contains("Keyboard Shortcuts"));
    }
}
