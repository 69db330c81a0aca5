//! Reusable UI widgets and helper functions
//!
//! This module contains shared rendering utilities used across different views.

use ratatui::prelude::*;
use ratatui::widgets::{Cell, Row};

use crate::dashboard;
use crate::formatting::{single_line, truncate_string};
use crate::tui::theme::Theme;

/// Create a styled table header row from column names
pub fn create_table_header<'a>(columns: &[&'a str], theme: &Theme) -> Row<'a> {
    let header_cells = columns
        .iter()
        .map(|h| Cell::from(*h).style(Style::default().fg(theme.header_fg).bold()));
    Row::new(header_cells)
        .style(Style::default().bg(theme.header_bg))
        .height(1)
}

/// Calculate scroll offset to keep selection visible
pub fn calculate_scroll_offset(selected: usize, visible_height: usize, total: usize) -> usize {
    if visible_height == 0 || total == 0 {
        return 0;
    }

    if selected < visible_height / 2 {
        0
    } else if selected > total.saturating_sub(visible_height / 2) {
        total.saturating_sub(visible_height)
    } else {
        selected.saturating_sub(visible_height / 2)
    }
}

/// Create a centered rectangle
pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::vertical([
        Constraint::Percentage((100 - percent_y) / 2),
        Constraint::Percentage(percent_y),
        Constraint::Percentage((100 - percent_y) / 2),
    ])
    .split(area);

    Layout::horizontal([
        Constraint::Percentage((100 - percent_x) / 2),
        Constraint::Percentage(percent_x),
        Constraint::Percentage((100 - percent_x) / 2),
    ])
    .split(popup_layout[1])[1]
}

/// A JSON cell squeezed onto one line and colored by tone
pub fn tone_cell(cell: &dashboard::Cell, max_len: usize, theme: &Theme) -> Cell<'static> {
    Cell::from(truncate_string(&single_line(&cell.text), max_len))
        .style(Style::default().fg(theme.tone_color(cell.tone)))
}

/// Bold section title inside a popup
pub fn section_header(title: &str, theme: &Theme) -> Line<'static> {
    Line::from(Span::styled(
        title.to_string(),
        Style::default().fg(theme.user_highlight).bold(),
    ))
}

/// `  Label:  value` line inside a popup
pub fn detail_row(label: &str, value: Span<'static>) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("  {:<12} ", format!("{label}:")), Style::default().bold()),
        value,
    ])
}

/// Multi-line text as indented popup lines
pub fn indented_block(text: &str, style: Style) -> Vec<Line<'static>> {
    text.lines()
        .map(|line| Line::from(Span::styled(format!("    {line}"), style)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scroll_offset() {
        assert_eq!(calculate_scroll_offset(0, 10, 100), 0);
        assert_eq!(calculate_scroll_offset(50, 10, 100), 45);
        assert_eq!(calculate_scroll_offset(99, 10, 100), 90);
        assert_eq!(calculate_scroll_offset(3, 0, 100), 0);
    }

    #[test]
    fn test_centered_rect_fits_inside() {
        let area = Rect::new(0, 0, 100, 50);
        let popup = centered_rect(60, 50, area);
        assert!(popup.x >= area.x && popup.right() <= area.right());
        assert!(popup.y >= area.y && popup.bottom() <= area.bottom());
        assert_eq!(popup.width, 60);
    }

    #[test]
    fn test_indented_block() {
        let lines = indented_block("{\n  \"a\": 1\n}", Style::default());
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1].to_string(), "      \"a\": 1");
    }
}
