//! Data models for the job/node info API.
//!
//! Records arrive as opaque JSON keyed by ID. This module resolves the fields
//! the dashboard reads into typed values (with documented defaults), and holds
//! the configuration types.

mod collection;
mod config;
mod defect;
mod job;
mod node;
mod record_id;
mod state;

pub use collection::{ApiRecord, Collection, CollectionError};
pub use config::{
    ConfigError, DashboardConfig, DisplayConfig, LoggingConfig, RefreshConfig, ServerConfig,
};
pub use defect::{FieldDefect, json_kind, lookup, lookup_present};
pub use job::{
    JobRecord, NodeSnapshots, PhysicalNodeSnapshot, UNKNOWN_USER, validate_node_snapshots,
    validate_spec, validate_state, validate_status_history, validate_user_name,
};
pub use node::{NodeRecord, StatusBlock, validate_goal_state, validate_name};
pub use record_id::{RecordId, sort_descending_by_id};
pub use state::{GoalState, JobState, Tone};

/// All jobs returned by one fetch, highest job ID first.
pub type JobCollection = Collection<JobRecord>;

/// All nodes returned by one fetch, highest node name first.
pub type NodeCollection = Collection<NodeRecord>;
