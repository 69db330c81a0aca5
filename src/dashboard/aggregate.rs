//! Grouping of jobs by owning user.

use std::collections::HashMap;

use crate::models::JobCollection;

/// The jobs of one user, in collection order (highest job ID first).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserGroup {
    pub user_name: String,
    /// Indices into the collection the aggregation was built from.
    pub jobs: Vec<usize>,
    /// Sum of the node counts of all `jobs`.
    pub node_count: usize,
}

impl UserGroup {
    #[must_use]
    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }
}

/// Jobs grouped by user, plus the user shown by default.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Aggregation {
    /// Groups in order of first appearance in the collection.
    groups: Vec<UserGroup>,
    index: HashMap<String, usize>,
    focused_user: Option<String>,
}

impl Aggregation {
    #[must_use]
    pub fn groups(&self) -> &[UserGroup] {
        &self.groups
    }

    #[must_use]
    pub fn group(&self, user_name: &str) -> Option<&UserGroup> {
        self.index.get(user_name).map(|&i| &self.groups[i])
    }

    /// The user with the most nodes; the first such user wins ties.
    /// `None` only for an empty collection.
    #[must_use]
    pub fn focused_user(&self) -> Option<&str> {
        self.focused_user.as_deref()
    }

    #[must_use]
    pub fn node_count(&self, user_name: &str) -> Option<usize> {
        self.group(user_name).map(|g| g.node_count)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Number of jobs across all groups.
    #[must_use]
    pub fn total_jobs(&self) -> usize {
        self.groups.iter().map(UserGroup::len).sum()
    }
}

/// Group a job collection by resolved user name and pick the focused user.
#[must_use]
pub fn aggregate(jobs: &JobCollection) -> Aggregation {
    let mut groups: Vec<UserGroup> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for (position, job) in jobs.iter().enumerate() {
        let slot = match index.get(&job.user_name) {
            Some(&slot) => slot,
            None => {
                index.insert(job.user_name.clone(), groups.len());
                groups.push(UserGroup {
                    user_name: job.user_name.clone(),
                    jobs: Vec::new(),
                    node_count: 0,
                });
                groups.len() - 1
            }
        };
        let group = &mut groups[slot];
        group.jobs.push(position);
        group.node_count += job.node_count();
    }

    // Strict `>` so the first group with the maximum keeps the focus
    let mut focused: Option<&UserGroup> = None;
    for group in &groups {
        if focused.is_none_or(|best| group.node_count > best.node_count) {
            focused = Some(group);
        }
    }
    let focused_user = focused.map(|g| g.user_name.clone());

    tracing::debug!(
        users = groups.len(),
        jobs = jobs.len(),
        focused = ?focused_user,
        "aggregated jobs by user"
    );

    Aggregation {
        groups,
        index,
        focused_user,
    }
}
