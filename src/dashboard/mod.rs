//! Presentation state for the jobs and nodes views.
//!
//! Everything here is pure: a fetched collection goes in, an explicit render
//! model (`PageView`, `NodesView`) comes out. The HTML, terminal table and TUI
//! surfaces only ever draw these models.
//!
//! Control flow for the jobs view:
//! fetch -> [`aggregate`] -> [`build_navigation`] -> [`PaginationController`]
//! renders page 1 -> page or user changes re-render through the controller,
//! which builds each row's node list and history cells.

mod aggregate;
mod collapsible;
mod navigation;
mod node_list;
mod nodes_view;
mod pagination;

pub use aggregate::{Aggregation, UserGroup, aggregate};
pub use collapsible::{Collapsible, Disclosure};
pub use navigation::{NavEntry, Navigation, build_navigation};
pub use node_list::{NodeLine, NodeListView, RankLink, rank_href, render_node_list};
pub use nodes_view::{NodeRow, NodesView, UNKNOWN_STATUS, render_nodes};
pub use pagination::{JobRow, PageView, PaginationController, ViewState, render_job_row};

/// Jobs shown per page for the focused user.
pub const PAGE_SIZE: usize = 100;

/// Rank links emitted per node.
pub const RANK_COUNT: u16 = 8;

/// Port of rank 0; rank `i` listens on `RANK_BASE_PORT + i`.
pub const RANK_BASE_PORT: u16 = 3724;

/// Path of the same-origin reverse proxy that fronts per-rank services.
pub const DEFAULT_PROXY_BASE: &str = "api/proxy";

/// Placeholder for a value the record does not carry.
pub const NOT_AVAILABLE: &str = "N/A";

/// Placeholder for a node snapshot map with no entries.
pub const NO_DATA: &str = "No data available";

/// A text cell with its emphasis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    pub text: String,
    pub tone: crate::models::Tone,
}

/// Pretty-print a JSON value the way every cell shows it.
#[must_use]
pub fn pretty_json(value: &serde_json::Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}
