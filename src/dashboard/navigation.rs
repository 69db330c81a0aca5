//! User selectors derived from an aggregation.

use super::aggregate::Aggregation;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavEntry {
    pub user_name: String,
    pub node_count: usize,
}

impl NavEntry {
    /// Button label, e.g. `alice (12 nodes)`
    #[must_use]
    pub fn label(&self) -> String {
        format!("{} ({} nodes)", self.user_name, self.node_count)
    }
}

/// User selectors, most nodes first.
///
/// Rebuilt from scratch on every fetch; the new navigation replaces the old.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Navigation {
    entries: Vec<NavEntry>,
}

impl Navigation {
    #[must_use]
    pub fn entries(&self) -> &[NavEntry] {
        &self.entries
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn position(&self, user_name: &str) -> Option<usize> {
        self.entries.iter().position(|e| e.user_name == user_name)
    }

    /// The entry after `current`, wrapping around. Starts at the top when
    /// `current` is not listed.
    #[must_use]
    pub fn next_user(&self, current: Option<&str>) -> Option<&str> {
        if self.entries.is_empty() {
            return None;
        }
        let next = match current.and_then(|user| self.position(user)) {
            Some(i) => (i + 1) % self.entries.len(),
            None => 0,
        };
        Some(self.entries[next].user_name.as_str())
    }

    /// The entry before `current`, wrapping around.
    #[must_use]
    pub fn previous_user(&self, current: Option<&str>) -> Option<&str> {
        if self.entries.is_empty() {
            return None;
        }
        let len = self.entries.len();
        let previous = match current.and_then(|user| self.position(user)) {
            Some(i) => (i + len - 1) % len,
            None => len - 1,
        };
        Some(self.entries[previous].user_name.as_str())
    }
}

/// Build the user selectors, descending by node count.
///
/// The sort is stable, so users with equal counts keep their order of first
/// appearance in the collection.
#[must_use]
pub fn build_navigation(aggregation: &Aggregation) -> Navigation {
    let mut entries: Vec<NavEntry> = aggregation
        .groups()
        .iter()
        .map(|group| NavEntry {
            user_name: group.user_name.clone(),
            node_count: group.node_count,
        })
        .collect();
    entries.sort_by(|a, b| b.node_count.cmp(&a.node_count));
    Navigation { entries }
}
