//! Node list cells: one line per physical node with its rank links.

use crate::models::NodeSnapshots;

use super::collapsible::{Collapsible, Disclosure};
use super::{DEFAULT_PROXY_BASE, RANK_BASE_PORT, RANK_COUNT};

/// Link to one rank's service on a node, through the same-origin proxy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankLink {
    pub rank: u16,
    pub port: u16,
    /// Relative URL, e.g. `api/proxy/node-a:3724/`
    pub href: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeLine {
    /// Slurm node name, `None` when the snapshot does not carry one.
    pub logical_name: Option<String>,
    pub physical_name: Option<String>,
    /// Empty when there is no logical name to address.
    pub ranks: Vec<RankLink>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeListView {
    Nodes(Vec<NodeLine>),
    /// The snapshot map is present but empty.
    NoData,
    /// The snapshot map is absent or malformed.
    Unavailable,
}

impl NodeListView {
    /// Text shown instead of a node list, if any.
    #[must_use]
    pub fn placeholder(&self) -> Option<&'static str> {
        match self {
            NodeListView::Nodes(_) => None,
            NodeListView::NoData => Some(super::NO_DATA),
            NodeListView::Unavailable => Some(super::NOT_AVAILABLE),
        }
    }
}

/// `<proxy-base>/<logical-name>:<port>/` for one rank.
#[must_use]
pub fn rank_href(logical_name: &str, rank: u16) -> String {
    format!(
        "{DEFAULT_PROXY_BASE}/{logical_name}:{}/",
        RANK_BASE_PORT + rank
    )
}

fn rank_links(logical_name: &str) -> Vec<RankLink> {
    (0..RANK_COUNT)
        .map(|rank| RankLink {
            rank,
            port: RANK_BASE_PORT + rank,
            href: rank_href(logical_name, rank),
        })
        .collect()
}

/// Build a node list cell. Node lists start expanded.
#[must_use]
pub fn render_node_list(snapshots: &NodeSnapshots) -> Collapsible<NodeListView> {
    let view = match snapshots {
        NodeSnapshots::Nodes(nodes) => NodeListView::Nodes(
            nodes
                .iter()
                .map(|(_, snapshot)| NodeLine {
                    logical_name: snapshot.slurm_node_name.clone(),
                    physical_name: snapshot.physical_node_name.clone(),
                    ranks: snapshot
                        .slurm_node_name
                        .as_deref()
                        .map(rank_links)
                        .unwrap_or_default(),
                })
                .collect(),
        ),
        NodeSnapshots::Empty => NodeListView::NoData,
        NodeSnapshots::Unavailable => NodeListView::Unavailable,
    };
    Collapsible::new(view, Disclosure::Open)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PhysicalNodeSnapshot;

    fn snapshot(logical: Option<&str>, physical: Option<&str>) -> PhysicalNodeSnapshot {
        PhysicalNodeSnapshot {
            slurm_node_name: logical.map(String::from),
            physical_node_name: physical.map(String::from),
            k8s_node_name: None,
        }
    }

    #[test]
    fn test_single_node_has_eight_rank_links() {
        let snapshots =
            NodeSnapshots::Nodes(vec![("n1".to_string(), snapshot(Some("a"), Some("p1")))]);
        let cell = render_node_list(&snapshots);
        assert!(cell.is_open());

        let NodeListView::Nodes(lines) = cell.content() else {
            panic!("expected node lines");
        };
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].logical_name.as_deref(), Some("a"));
        assert_eq!(lines[0].physical_name.as_deref(), Some("p1"));

        let ports: Vec<u16> = lines[0].ranks.iter().map(|r| r.port).collect();
        assert_eq!(ports, (3724..=3731).collect::<Vec<u16>>());
        assert_eq!(lines[0].ranks[0].href, "api/proxy/a:3724/");
        assert_eq!(lines[0].ranks[7].href, "api/proxy/a:3731/");
        assert_eq!(lines[0].ranks[7].rank, 7);
    }

    #[test]
    fn test_empty_map_is_no_data() {
        let cell = render_node_list(&NodeSnapshots::Empty);
        assert_eq!(cell.content(), &NodeListView::NoData);
        assert_eq!(cell.content().placeholder(), Some("No data available"));
        assert!(cell.is_open());
    }

    #[test]
    fn test_malformed_map_is_not_available() {
        let cell = render_node_list(&NodeSnapshots::Unavailable);
        assert_eq!(cell.content().placeholder(), Some("N/A"));
    }

    #[test]
    fn test_node_without_logical_name_has_no_links() {
        let snapshots = NodeSnapshots::Nodes(vec![("n1".to_string(), snapshot(None, Some("p1")))]);
        let cell = render_node_list(&snapshots);
        let NodeListView::Nodes(lines) = cell.content() else {
            panic!("expected node lines");
        };
        assert!(lines[0].ranks.is_empty());
        assert_eq!(lines[0].physical_name.as_deref(), Some("p1"));
    }
}
