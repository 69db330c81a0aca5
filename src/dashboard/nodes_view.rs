//! Rows of the nodes table.
//!
//! The nodes view is not paginated or grouped: every node is one row, highest
//! node name first, with its spec and both status blocks pretty-printed.

use crate::models::{NodeCollection, NodeRecord, RecordId, StatusBlock, Tone};

use super::{Cell, NOT_AVAILABLE, pretty_json};

/// Shown (and flagged) in place of a status block the node does not carry.
pub const UNKNOWN_STATUS: &str = "UNKNOWN";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeRow {
    pub id: RecordId,
    pub name: String,
    pub spec: Cell,
    pub k8s_status: Cell,
    pub slurm_status: Cell,
}

impl NodeRow {
    /// Whether any cell of the row is flagged.
    #[must_use]
    pub fn needs_attention(&self) -> bool {
        [&self.spec, &self.k8s_status, &self.slurm_status]
            .iter()
            .any(|cell| cell.tone == Tone::Alert)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodesView {
    pub rows: Vec<NodeRow>,
}

impl NodesView {
    /// `"<N> nodes, <M> flagged"`, absent for an empty collection.
    #[must_use]
    pub fn summary(&self) -> Option<String> {
        if self.rows.is_empty() {
            return None;
        }
        let flagged = self.rows.iter().filter(|r| r.needs_attention()).count();
        Some(format!("{} nodes, {flagged} flagged", self.rows.len()))
    }
}

fn status_cell(block: &StatusBlock) -> Cell {
    Cell {
        text: block
            .raw
            .as_ref()
            .map_or_else(|| UNKNOWN_STATUS.to_string(), pretty_json),
        tone: block.tone(),
    }
}

fn render_node_row(node: &NodeRecord) -> NodeRow {
    NodeRow {
        id: node.id.clone(),
        name: node.name.clone(),
        spec: Cell {
            text: node
                .spec
                .as_ref()
                .map_or_else(|| NOT_AVAILABLE.to_string(), pretty_json),
            tone: node.spec_tone(),
        },
        k8s_status: status_cell(&node.k8s_status),
        slurm_status: status_cell(&node.slurm_status),
    }
}

/// Render every node of a collection, in collection order.
#[must_use]
pub fn render_nodes(nodes: &NodeCollection) -> NodesView {
    NodesView {
        rows: nodes.iter().map(render_node_row).collect(),
    }
}
