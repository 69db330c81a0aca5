//! Physical node records from the node controller's info API.
//!
//! Each node carries a `spec` with the desired scheduler goal state and two
//! independent status blocks: one from Kubernetes and one from Slurm.

use serde_json::Value;

use super::collection::ApiRecord;
use super::defect::{FieldDefect, json_kind, lookup, lookup_present};
use super::record_id::RecordId;
use super::state::{GoalState, Tone};

const NAME_FIELD: &str = "metadata.name";
const SPEC_FIELD: &str = "spec";
const GOAL_STATE_FIELD: &str = "spec.slurmNodeSpec.goalState";
const LEGACY_GOAL_STATE_FIELD: &str = "spec.goalState";
const K8S_STATUS_FIELD: &str = "status.k8sNodeStatus";
const SLURM_STATUS_FIELD: &str = "status.slurmNodeStatus";

/// One of a node's status sub-objects.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StatusBlock {
    /// Raw sub-object, `None` when the record does not carry it.
    pub raw: Option<Value>,
    pub removed: bool,
}

impl StatusBlock {
    fn from_record(record: &Value, field: &'static str, defects: &mut Vec<FieldDefect>) -> Self {
        match lookup_present(record, field) {
            Ok(raw) => {
                let removed = match raw.get("removed") {
                    None | Some(Value::Null) => false,
                    Some(Value::Bool(removed)) => *removed,
                    Some(other) => {
                        defects.push(FieldDefect::WrongType {
                            field,
                            expected: "a boolean `removed` flag",
                            found: json_kind(other),
                        });
                        false
                    }
                };
                Self {
                    raw: Some(raw.clone()),
                    removed,
                }
            }
            Err(defect) => {
                defects.push(defect);
                Self::default()
            }
        }
    }

    #[must_use]
    pub fn is_known(&self) -> bool {
        self.raw.is_some()
    }

    /// Missing blocks and removed nodes are flagged.
    #[must_use]
    pub fn tone(&self) -> Tone {
        if self.raw.is_none() || self.removed {
            Tone::Alert
        } else {
            Tone::Normal
        }
    }
}

/// A node with every field the dashboard reads resolved to a value.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeRecord {
    pub id: RecordId,
    pub name: String,
    pub spec: Option<Value>,
    pub goal_state: GoalState,
    pub k8s_status: StatusBlock,
    pub slurm_status: StatusBlock,
    pub defects: Vec<FieldDefect>,
}

impl NodeRecord {
    #[must_use]
    pub fn from_value(id: RecordId, value: &Value) -> Self {
        let mut defects = Vec::new();

        if !value.is_object() {
            defects.push(FieldDefect::NotAnObject(json_kind(value)));
            return Self {
                name: id.as_str().to_string(),
                id,
                spec: None,
                goal_state: GoalState::default(),
                k8s_status: StatusBlock::default(),
                slurm_status: StatusBlock::default(),
                defects,
            };
        }

        let name = validate_name(value).unwrap_or_else(|defect| {
            defects.push(defect);
            id.as_str().to_string()
        });
        let spec = lookup(value, SPEC_FIELD).ok().cloned();
        let goal_state = validate_goal_state(value).unwrap_or_else(|defect| {
            defects.push(defect);
            GoalState::default()
        });
        let k8s_status = StatusBlock::from_record(value, K8S_STATUS_FIELD, &mut defects);
        let slurm_status = StatusBlock::from_record(value, SLURM_STATUS_FIELD, &mut defects);

        if !defects.is_empty() {
            tracing::debug!(node = %id, ?defects, "node record has defaulted fields");
        }

        Self {
            id,
            name,
            spec,
            goal_state,
            k8s_status,
            slurm_status,
            defects,
        }
    }

    /// Tone of the spec cell: a node the operator wants down is flagged.
    #[must_use]
    pub fn spec_tone(&self) -> Tone {
        self.goal_state.tone()
    }
}

impl ApiRecord for NodeRecord {
    fn from_value(id: RecordId, value: &Value) -> Self {
        NodeRecord::from_value(id, value)
    }

    fn id(&self) -> &RecordId {
        &self.id
    }
}

pub fn validate_name(record: &Value) -> Result<String, FieldDefect> {
    match lookup_present(record, NAME_FIELD)? {
        Value::String(name) if !name.is_empty() => Ok(name.clone()),
        Value::String(_) => Err(FieldDefect::Missing(NAME_FIELD)),
        other => Err(FieldDefect::WrongType {
            field: NAME_FIELD,
            expected: "a string",
            found: json_kind(other),
        }),
    }
}

/// Goal state from `spec.slurmNodeSpec.goalState`, falling back to the older
/// top-level `spec.goalState`.
pub fn validate_goal_state(record: &Value) -> Result<GoalState, FieldDefect> {
    let raw = lookup_present(record, GOAL_STATE_FIELD)
        .or_else(|_| lookup_present(record, LEGACY_GOAL_STATE_FIELD))
        .map_err(|_| FieldDefect::Missing(GOAL_STATE_FIELD))?;

    match raw {
        Value::String(state) => Ok(GoalState::from_state_string(state)),
        other => Err(FieldDefect::WrongType {
            field: GOAL_STATE_FIELD,
            expected: "a string",
            found: json_kind(other),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn node(key: &str, value: Value) -> NodeRecord {
        NodeRecord::from_value(RecordId::new(key), &value)
    }

    #[test]
    fn test_complete_node() {
        let record = node(
            "gpu-001",
            json!({
                "metadata": {"name": "gpu-001"},
                "spec": {"slurmNodeSpec": {"goalState": "down"}},
                "status": {
                    "k8sNodeStatus": {"removed": false, "ready": true},
                    "slurmNodeStatus": {"removed": true}
                }
            }),
        );

        assert_eq!(record.name, "gpu-001");
        assert_eq!(record.goal_state, GoalState::Down);
        assert_eq!(record.spec_tone(), Tone::Alert);
        assert!(!record.k8s_status.removed);
        assert_eq!(record.k8s_status.tone(), Tone::Normal);
        assert!(record.slurm_status.removed);
        assert_eq!(record.slurm_status.tone(), Tone::Alert);
        assert!(record.defects.is_empty());
    }

    #[test]
    fn test_goal_state_defaults_up() {
        let record = node("n1", json!({"metadata": {"name": "n1"}, "spec": {}}));
        assert_eq!(record.goal_state, GoalState::Up);
        assert_eq!(record.spec_tone(), Tone::Normal);
    }

    #[test]
    fn test_legacy_goal_state() {
        let record = node("n1", json!({"spec": {"goalState": "down"}}));
        assert_eq!(record.goal_state, GoalState::Down);
    }

    #[test]
    fn test_name_falls_back_to_key() {
        let record = node("cpu-17", json!({"spec": {}}));
        assert_eq!(record.name, "cpu-17");
    }

    #[test]
    fn test_missing_status_is_unknown() {
        let record = node("n1", json!({"metadata": {"name": "n1"}}));
        assert!(!record.k8s_status.is_known());
        assert!(!record.slurm_status.is_known());
        assert_eq!(record.k8s_status.tone(), Tone::Alert);
        assert!(!record.k8s_status.removed);
    }

    #[test]
    fn test_removed_flag_defaults_false() {
        let record = node("n1", json!({"status": {"k8sNodeStatus": {}}}));
        assert!(record.k8s_status.is_known());
        assert!(!record.k8s_status.removed);
        assert_eq!(record.k8s_status.tone(), Tone::Normal);
    }

    #[test]
    fn test_non_object_node() {
        let record = node("n9", json!(42));
        assert_eq!(record.name, "n9");
        assert_eq!(record.defects, vec![FieldDefect::NotAnObject("a number")]);
    }
}
