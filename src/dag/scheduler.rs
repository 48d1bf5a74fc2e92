// src/dag/scheduler.rs

use uuid::Uuid;

use crate::config::SchedulerConfig;
use crate::dag::master::master_status_updates;
use crate::dag::planner::calculate_initial_tasks;
use crate::dag::reconciler::calculate_matrix_task_changes;
use crate::dag::resolver::find_runnable_tasks;
use crate::dag::scheduler_step::{MasterStatusUpdate, MatrixTaskChanges, RunnableTaskChanges};
use crate::errors::Result;
use crate::model::{RunState, Task, WorkflowRun};

/// Stateless scheduler facade.
///
/// Holds only configuration. Every call is a fresh computation over the
/// snapshot it is given and returns a change set for the host to apply;
/// nothing is cached between calls, so calls may be repeated or issued
/// concurrently for the same snapshot.
///
/// The host must still serialize "read snapshot, call, persist" per run.
#[derive(Debug, Clone, Copy, Default)]
pub struct Scheduler {
    config: SchedulerConfig,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: SchedulerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    /// Full starting task set of a run. Call once, at run creation.
    pub fn calculate_initial_tasks(&self, workflow_run: &WorkflowRun) -> Result<Vec<Task>> {
        Ok(calculate_initial_tasks(workflow_run))
    }

    /// Additions and retirements that bring `from_state` matrices in line
    /// with `state`.
    pub fn calculate_matrix_task_changes(
        &self,
        workflow_run_id: Uuid,
        workflow_run: &WorkflowRun,
        tasks: &[Task],
        state: &RunState,
    ) -> Result<MatrixTaskChanges> {
        Ok(calculate_matrix_task_changes(
            workflow_run_id,
            workflow_run,
            tasks,
            state,
        ))
    }

    /// Pending tasks that may be dispatched, need a trigger, or are blocked.
    pub fn find_runnable_tasks(
        &self,
        workflow_run: &WorkflowRun,
        tasks: &[Task],
    ) -> Result<RunnableTaskChanges> {
        find_runnable_tasks(workflow_run, tasks, self.config.failed_dependency)
    }

    /// New statuses for the given masters, derived from their children.
    pub fn master_status_updates(
        &self,
        tasks: &[Task],
        master_ids: &[Uuid],
    ) -> Vec<MasterStatusUpdate> {
        master_status_updates(tasks, master_ids)
    }
}
