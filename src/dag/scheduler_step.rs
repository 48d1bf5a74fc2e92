// src/dag/scheduler_step.rs

//! Change sets returned by the scheduler for the host to apply.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::{Task, TaskStatus};

/// Result of one matrix reconciliation pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatrixTaskChanges {
    /// Tasks to persist: new children, plus any master that was missing.
    pub new_tasks: Vec<Task>,
    /// Active children whose record left the state array.
    pub tasks_to_mark_wont_do: Vec<Uuid>,
    /// Every `from_state` master, re-emitted on every pass.
    pub master_tasks_to_update: Vec<Uuid>,
}

impl MatrixTaskChanges {
    /// True when the pass changes no task rows (master updates aside).
    pub fn is_noop(&self) -> bool {
        self.new_tasks.is_empty() && self.tasks_to_mark_wont_do.is_empty()
    }
}

/// Classification of the pending tasks of a run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunnableTaskChanges {
    /// Dependencies satisfied and a manual go-ahead is required.
    pub tasks_to_await_trigger: Vec<Uuid>,
    /// Dependencies satisfied; dispatch now.
    pub runnable_tasks: Vec<Uuid>,
    /// A dependency can never complete. Always empty under
    /// `FailedDependencyPolicy::Wait`.
    #[serde(default)]
    pub tasks_to_block: Vec<Uuid>,
}

/// New status for a master task, from [`crate::dag::master::master_status`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MasterStatusUpdate {
    pub task_id: Uuid,
    pub status: TaskStatus,
}
