//! Job lifecycle and node goal states, plus the tone used to color a cell.
//!
//! The API reports states as free-form strings. Only a few values change how a
//! cell is drawn, so the enums keep those as variants and carry everything else
//! through verbatim.

use serde_json::Value;

/// Visual emphasis for a rendered cell.
///
/// Every surface (HTML, terminal table, TUI) maps these to its own colors:
/// `Good` is green, `Alert` is red.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tone {
    #[default]
    Normal,
    Good,
    Alert,
}

impl Tone {
    /// CSS color for the HTML surface, `None` for the page default.
    #[must_use]
    pub fn css_color(&self) -> Option<&'static str> {
        match self {
            Tone::Normal => None,
            Tone::Good => Some("green"),
            Tone::Alert => Some("red"),
        }
    }
}

// ============================================================================
// Job State
// ============================================================================

/// Current lifecycle state of a job run.
///
/// `Removed` doubles as the sentinel for a state the record does not carry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobState {
    Running,
    Removed,
    /// Any other state, kept as the text the server sent.
    Other(String),
}

impl JobState {
    /// Parse a state string as reported by the job controller.
    #[must_use]
    pub fn from_state_string(state: &str) -> Self {
        match state {
            "RUNNING" => Self::Running,
            "REMOVED" => Self::Removed,
            other => Self::Other(other.to_string()),
        }
    }

    /// Build a state from an arbitrary JSON value.
    ///
    /// Strings go through [`JobState::from_state_string`]; any other non-null
    /// value is shown as its JSON text. `None` means no usable state.
    #[must_use]
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Null => None,
            Value::String(s) => Some(Self::from_state_string(s)),
            other => Some(Self::Other(other.to_string())),
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Running => "RUNNING",
            Self::Removed => "REMOVED",
            Self::Other(s) => s,
        }
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        matches!(self, Self::Running)
    }

    #[must_use]
    pub fn tone(&self) -> Tone {
        match self {
            Self::Running => Tone::Good,
            Self::Removed => Tone::Alert,
            Self::Other(_) => Tone::Normal,
        }
    }
}

impl std::fmt::Display for JobState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Node Goal State
// ============================================================================

/// Desired scheduler state for a physical node.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum GoalState {
    #[default]
    Up,
    Down,
    Other(String),
}

impl GoalState {
    #[must_use]
    pub fn from_state_string(state: &str) -> Self {
        match state {
            "up" => Self::Up,
            "down" => Self::Down,
            other => Self::Other(other.to_string()),
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Up => "up",
            Self::Down => "down",
            Self::Other(s) => s,
        }
    }

    #[must_use]
    pub fn tone(&self) -> Tone {
        match self {
            Self::Down => Tone::Alert,
            _ => Tone::Normal,
        }
    }
}
