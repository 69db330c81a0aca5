//! Progressive-disclosure cells.
//!
//! A collapsible wraps already-rendered content of any type and remembers
//! whether it is shown. State lives in the cell itself, so toggling one cell
//! never touches its neighbours.

/// Disclosure state of a collapsible cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disclosure {
    Open,
    Closed,
}

impl Disclosure {
    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Self::Open => Self::Closed,
            Self::Closed => Self::Open,
        }
    }

    #[must_use]
    pub fn is_open(self) -> bool {
        matches!(self, Self::Open)
    }

    /// CSS class used by the HTML surface.
    #[must_use]
    pub fn class(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Closed => "closed",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Collapsible<T> {
    content: T,
    state: Disclosure,
}

impl<T> Collapsible<T> {
    /// Wrap `content` starting in `initial`.
    #[must_use]
    pub fn new(content: T, initial: Disclosure) -> Self {
        Self {
            content,
            state: initial,
        }
    }

    /// Exactly one state transition per call.
    pub fn toggle(&mut self) {
        self.state = self.state.toggled();
    }

    #[must_use]
    pub fn state(&self) -> Disclosure {
        self.state
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.state.is_open()
    }

    #[must_use]
    pub fn content(&self) -> &T {
        &self.content
    }

    /// The content, only while open.
    #[must_use]
    pub fn visible(&self) -> Option<&T> {
        self.is_open().then_some(&self.content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state_is_respected() {
        assert!(Collapsible::new("x", Disclosure::Open).is_open());
        assert!(!Collapsible::new("x", Disclosure::Closed).is_open());
    }

    #[test]
    fn test_toggle_flips_once_per_call() {
        let mut cell = Collapsible::new(String::from("history"), Disclosure::Closed);
        assert_eq!(cell.visible(), None);

        cell.toggle();
        assert_eq!(cell.state(), Disclosure::Open);
        assert_eq!(cell.visible().map(String::as_str), Some("history"));

        cell.toggle();
        assert_eq!(cell.state(), Disclosure::Closed);
        assert_eq!(cell.visible(), None);
    }

    #[test]
    fn test_cells_are_independent() {
        let mut cells = vec![
            Collapsible::new(1, Disclosure::Closed),
            Collapsible::new(2, Disclosure::Closed),
        ];
        cells[0].toggle();
        assert!(cells[0].is_open());
        assert!(!cells[1].is_open());
    }

    #[test]
    fn test_css_class() {
        assert_eq!(Disclosure::Open.class(), "open");
        assert_eq!(Disclosure::Closed.toggled().class(), "open");
    }
}
