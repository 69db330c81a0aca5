//! Job records from the job controller's info API.
//!
//! A job is keyed by its Slurm job ID and carries a free-form `spec` (submitting
//! user, command, comment) and a `status` with the current run and its history.
//! Only the fields the dashboard actually reads are validated; everything else
//! stays opaque JSON and is shown pretty-printed.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::collection::ApiRecord;
use super::defect::{FieldDefect, json_kind, lookup, lookup_present};
use super::record_id::RecordId;
use super::state::JobState;

/// User name for jobs whose spec carries no usable `userName`.
pub const UNKNOWN_USER: &str = "Unknown";

const USER_NAME_FIELD: &str = "spec.userName";
const STATE_FIELD: &str = "status.slurmJobRunCurrentStatus.state";
const SNAPSHOTS_FIELD: &str = "status.slurmJobRunCurrentStatus.physicalNodeSnapshots";
const HISTORY_FIELD: &str = "status.slurmJobRunStatusHistory";
const SPEC_FIELD: &str = "spec";
const SLURM_NODE_NAME_FIELD: &str = "physicalNodeSnapshots.*.slurmNodeName";
const PHYSICAL_NODE_NAME_FIELD: &str = "physicalNodeSnapshots.*.physicalNodeName";
const K8S_NODE_NAME_FIELD: &str = "physicalNodeSnapshots.*.k8sNodeName";

/// A physical node a job run was scheduled on, as captured at scheduling time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PhysicalNodeSnapshot {
    /// Slurm (logical) node name; rank links are addressed through it.
    #[serde(default)]
    pub slurm_node_name: Option<String>,

    #[serde(default)]
    pub physical_node_name: Option<String>,

    #[serde(default)]
    pub k8s_node_name: Option<String>,
}

/// The node snapshot map of a job's current run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeSnapshots {
    /// Snapshots in payload order, keyed by node identifier.
    Nodes(Vec<(String, PhysicalNodeSnapshot)>),
    /// The map is present but holds no nodes (or is `null`).
    Empty,
    /// The map is absent or not shaped like a snapshot map.
    Unavailable,
}

impl NodeSnapshots {
    /// Number of nodes the run holds. Unusable maps count as zero.
    #[must_use]
    pub fn node_count(&self) -> usize {
        match self {
            NodeSnapshots::Nodes(nodes) => nodes.len(),
            NodeSnapshots::Empty | NodeSnapshots::Unavailable => 0,
        }
    }
}

/// A job with every field the dashboard reads resolved to a value.
#[derive(Debug, Clone, PartialEq)]
pub struct JobRecord {
    pub id: RecordId,
    pub user_name: String,
    /// Raw spec, `None` when the record has none.
    pub spec: Option<Value>,
    pub state: JobState,
    pub node_snapshots: NodeSnapshots,
    /// Raw status history, `None` when the record has none.
    pub status_history: Option<Value>,
    /// Fields that fell back to their default.
    pub defects: Vec<FieldDefect>,
}

impl JobRecord {
    /// Resolve a raw job record, applying defaults for every unusable field.
    #[must_use]
    pub fn from_value(id: RecordId, value: &Value) -> Self {
        let mut defects = Vec::new();

        if !value.is_object() {
            defects.push(FieldDefect::NotAnObject(json_kind(value)));
            return Self {
                id,
                user_name: UNKNOWN_USER.to_string(),
                spec: None,
                state: JobState::Removed,
                node_snapshots: NodeSnapshots::Unavailable,
                status_history: None,
                defects,
            };
        }

        let user_name = validate_user_name(value).unwrap_or_else(|defect| {
            defects.push(defect);
            UNKNOWN_USER.to_string()
        });
        let spec = validate_spec(value).map_or_else(
            |defect| {
                defects.push(defect);
                None
            },
            Some,
        );
        let state = validate_state(value).unwrap_or_else(|defect| {
            defects.push(defect);
            JobState::Removed
        });
        let node_snapshots = validate_node_snapshots(value, &mut defects).unwrap_or_else(|defect| {
            defects.push(defect);
            NodeSnapshots::Unavailable
        });
        let status_history = validate_status_history(value).map_or_else(
            |defect| {
                defects.push(defect);
                None
            },
            Some,
        );

        if !defects.is_empty() {
            tracing::debug!(job = %id, ?defects, "job record has defaulted fields");
        }

        Self {
            id,
            user_name,
            spec,
            state,
            node_snapshots,
            status_history,
            defects,
        }
    }

    /// Number of physical nodes held by the current run.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.node_snapshots.node_count()
    }
}

impl ApiRecord for JobRecord {
    fn from_value(id: RecordId, value: &Value) -> Self {
        JobRecord::from_value(id, value)
    }

    fn id(&self) -> &RecordId {
        &self.id
    }
}

/// `spec.userName` must be a non-empty string.
pub fn validate_user_name(record: &Value) -> Result<String, FieldDefect> {
    match lookup_present(record, USER_NAME_FIELD)? {
        Value::String(name) if !name.is_empty() => Ok(name.clone()),
        Value::String(_) => Err(FieldDefect::Missing(USER_NAME_FIELD)),
        other => Err(FieldDefect::WrongType {
            field: USER_NAME_FIELD,
            expected: "a string",
            found: json_kind(other),
        }),
    }
}

pub fn validate_spec(record: &Value) -> Result<Value, FieldDefect> {
    lookup(record, SPEC_FIELD).cloned()
}

/// The current run's state; `null` counts as missing.
pub fn validate_state(record: &Value) -> Result<JobState, FieldDefect> {
    let raw = lookup_present(record, STATE_FIELD)?;
    JobState::from_json(raw).ok_or(FieldDefect::Missing(STATE_FIELD))
}

/// The current run's node snapshot map.
///
/// `null` and `{}` are valid and mean "no nodes". Every entry must be an
/// object; each one is a node. Name fields that are not strings are shown as
/// their JSON text and reported in `entry_defects`.
pub fn validate_node_snapshots(
    record: &Value,
    entry_defects: &mut Vec<FieldDefect>,
) -> Result<NodeSnapshots, FieldDefect> {
    let map = match lookup(record, SNAPSHOTS_FIELD)? {
        Value::Null => return Ok(NodeSnapshots::Empty),
        Value::Object(map) => map,
        other => {
            return Err(FieldDefect::WrongType {
                field: SNAPSHOTS_FIELD,
                expected: "an object",
                found: json_kind(other),
            });
        }
    };

    if map.is_empty() {
        return Ok(NodeSnapshots::Empty);
    }

    if let Some(entry) = map.values().find(|entry| !entry.is_object()) {
        return Err(FieldDefect::WrongType {
            field: SNAPSHOTS_FIELD,
            expected: "a map of node snapshots",
            found: json_kind(entry),
        });
    }

    let nodes = map
        .iter()
        .map(|(key, entry)| {
            let snapshot = PhysicalNodeSnapshot {
                slurm_node_name: snapshot_name(entry, "slurmNodeName", SLURM_NODE_NAME_FIELD, entry_defects),
                physical_node_name: snapshot_name(
                    entry,
                    "physicalNodeName",
                    PHYSICAL_NODE_NAME_FIELD,
                    entry_defects,
                ),
                k8s_node_name: snapshot_name(entry, "k8sNodeName", K8S_NODE_NAME_FIELD, entry_defects),
            };
            (key.clone(), snapshot)
        })
        .collect();

    Ok(NodeSnapshots::Nodes(nodes))
}

/// One name field of a snapshot entry. Absent or `null` is `None`.
fn snapshot_name(
    entry: &Value,
    key: &str,
    field: &'static str,
    defects: &mut Vec<FieldDefect>,
) -> Option<String> {
    match entry.get(key)? {
        Value::Null => None,
        Value::String(name) => Some(name.clone()),
        other => {
            defects.push(FieldDefect::WrongType {
                field,
                expected: "a string",
                found: json_kind(other),
            });
            Some(other.to_string())
        }
    }
}

pub fn validate_status_history(record: &Value) -> Result<Value, FieldDefect> {
    lookup(record, HISTORY_FIELD).cloned()
}
