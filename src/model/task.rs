// src/model/task.rs

//! Runtime task instances.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::matrix::MatrixRecord;

/// Lifecycle status of a [`Task`].
///
/// Transitions are applied by the host, except that the matrix reconciler
/// may retire a child straight to `WontDo`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaskStatus {
    #[default]
    Pending,
    Running,
    Completed,
    Failed,
    AwaitingTrigger,
    /// A dependency can no longer complete.
    Blocked,
    /// Retired matrix child. Terminal; never revived.
    WontDo,
}

impl TaskStatus {
    /// Completed, Failed and WontDo are final for a task instance.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            TaskStatus::Completed | TaskStatus::Failed | TaskStatus::WontDo
        )
    }

    pub fn is_active(self) -> bool {
        self != TaskStatus::WontDo
    }
}

/// One runtime instance of a node within a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: Uuid,

    pub workflow_run_id: Uuid,

    pub node_id: String,

    pub status: TaskStatus,

    /// True only for the aggregation task of a matrix node.
    #[serde(default)]
    pub is_master: bool,

    /// Set on matrix children; points at the node's master task.
    #[serde(default)]
    pub master_task_id: Option<Uuid>,

    /// The value-record this child was expanded from.
    #[serde(default)]
    pub matrix_values: Option<MatrixRecord>,

    #[serde(default)]
    pub started_at: Option<DateTime<Utc>>,

    #[serde(default)]
    pub ended_at: Option<DateTime<Utc>>,

    #[serde(default)]
    pub error: Option<String>,

    #[serde(default)]
    pub logs: Vec<String>,
}

impl Task {
    /// A plain task, or a master task when `is_master` is set.
    pub fn new(workflow_run_id: Uuid, node_id: impl Into<String>, is_master: bool) -> Self {
        Self {
            id: Uuid::new_v4(),
            workflow_run_id,
            node_id: node_id.into(),
            status: TaskStatus::Pending,
            is_master,
            master_task_id: None,
            matrix_values: None,
            started_at: None,
            ended_at: None,
            error: None,
            logs: Vec::new(),
        }
    }

    /// A matrix child task belonging to `master_task_id`.
    pub fn new_matrix(
        workflow_run_id: Uuid,
        node_id: impl Into<String>,
        master_task_id: Uuid,
        matrix_values: MatrixRecord,
    ) -> Self {
        Self {
            master_task_id: Some(master_task_id),
            matrix_values: Some(matrix_values),
            ..Self::new(workflow_run_id, node_id, false)
        }
    }

    /// Non-master task carrying a value-record.
    pub fn is_matrix_child(&self) -> bool {
        !self.is_master && self.matrix_values.is_some()
    }
}
