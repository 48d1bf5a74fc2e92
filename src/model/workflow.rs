// src/model/workflow.rs

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::node::Node;

/// Immutable workflow definition.
///
/// `state` and `templates` are opaque to the scheduler and only carried so
/// that a run round-trips without loss.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Workflow {
    pub version: String,

    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub state: Option<serde_json::Value>,

    #[serde(default)]
    pub templates: Vec<serde_json::Value>,

    pub nodes: Vec<Node>,
}

impl Workflow {
    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }
}

/// Status of a workflow run. Owned by the host; the scheduler never reads it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorkflowStatus {
    #[default]
    Pending,
    Running,
    Completed,
    Failed,
    AwaitingTrigger,
    Canceled,
}

/// One execution of a [`Workflow`]. Scheduling never crosses runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowRun {
    pub id: Uuid,

    pub workflow: Workflow,

    pub status: WorkflowStatus,

    #[serde(default)]
    pub params: BTreeMap<String, String>,

    /// Ids of the tasks created for this run.
    #[serde(default)]
    pub tasks: Vec<Uuid>,

    pub started_at: DateTime<Utc>,

    #[serde(default)]
    pub ended_at: Option<DateTime<Utc>>,
}

impl WorkflowRun {
    /// Fresh run of `workflow` with no tasks yet.
    pub fn new(workflow: Workflow) -> Self {
        Self {
            id: Uuid::new_v4(),
            workflow,
            status: WorkflowStatus::Pending,
            params: BTreeMap::new(),
            tasks: Vec::new(),
            started_at: Utc::now(),
            ended_at: None,
        }
    }
}
