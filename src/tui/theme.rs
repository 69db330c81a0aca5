//! Theme definitions for the TUI
//!
//! This module provides colorblind-safe themes for both dark and light terminals.
//! The default is "dark" but users can configure "light" via config file or env var.

use ratatui::style::Color;

use crate::models::Tone;

/// Available theme names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThemeName {
    #[default]
    Dark,
    Light,
}

impl ThemeName {
    pub fn from_name(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "light" => ThemeName::Light,
            _ => ThemeName::Dark,
        }
    }
}

/// Color theme for the TUI
#[derive(Debug, Clone)]
pub struct Theme {
    pub name: ThemeName,

    // Base colors
    pub fg: Color,
    pub border: Color,
    pub border_focused: Color,

    // Cell tones (colorblind-safe)
    pub good: Color,
    pub alert: Color,
    pub warn: Color,

    // UI elements
    pub selected_bg: Color,
    pub selected_fg: Color,
    pub header_bg: Color,
    pub header_fg: Color,
    pub link: Color,

    // Focused user in the navigation line
    pub user_highlight: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}

impl Theme {
    /// Create a dark theme (default)
    pub fn dark() -> Self {
        Self {
            name: ThemeName::Dark,

            fg: Color::White,
            border: Color::DarkGray,
            border_focused: Color::Cyan,

            good: Color::Rgb(0, 200, 0),     // Bright green
            alert: Color::Rgb(255, 80, 80),  // Bright red
            warn: Color::Rgb(255, 180, 0),   // Orange

            selected_bg: Color::Rgb(60, 60, 80),
            selected_fg: Color::White,
            header_bg: Color::Rgb(40, 80, 120),
            header_fg: Color::White,
            link: Color::Rgb(80, 160, 255),

            user_highlight: Color::Cyan,
        }
    }

    /// Create a light theme
    /// Uses darker, more saturated colors for visibility on light backgrounds
    pub fn light() -> Self {
        Self {
            name: ThemeName::Light,

            fg: Color::Black,
            border: Color::Rgb(120, 120, 120),
            border_focused: Color::Rgb(0, 100, 180),

            good: Color::Rgb(0, 140, 0),     // Dark green
            alert: Color::Rgb(200, 0, 0),    // Dark red
            warn: Color::Rgb(200, 120, 0),   // Dark orange

            selected_bg: Color::Rgb(200, 220, 255),
            selected_fg: Color::Black,
            header_bg: Color::Rgb(180, 200, 230),
            header_fg: Color::Black,
            link: Color::Rgb(0, 80, 180),

            user_highlight: Color::Rgb(0, 100, 180),
        }
    }

    /// Create theme from name string
    pub fn from_name(name: &str) -> Self {
        match ThemeName::from_name(name) {
            ThemeName::Dark => Self::dark(),
            ThemeName::Light => Self::light(),
        }
    }

    /// Color for a cell tone
    pub fn tone_color(&self, tone: Tone) -> Color {
        match tone {
            Tone::Normal => self.fg,
            Tone::Good => self.good,
            Tone::Alert => self.alert,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_theme_from_name() {
        let dark = Theme::from_name("dark");
        assert_eq!(dark.name, ThemeName::Dark);

        let light = Theme::from_name("Light");
        assert_eq!(light.name, ThemeName::Light);

        // Unknown defaults to dark
        let unknown = Theme::from_name("solarized");
        assert_eq!(unknown.name, ThemeName::Dark);
    }

    #[test]
    fn test_tone_colors() {
        let theme = Theme::dark();
        assert_eq!(theme.tone_color(Tone::Good), theme.good);
        assert_eq!(theme.tone_color(Tone::Alert), theme.alert);
        assert_eq!(theme.tone_color(Tone::Normal), theme.fg);
    }
}
