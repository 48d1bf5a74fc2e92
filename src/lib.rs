// src/lib.rs

//! Workflow task scheduling as pure functions over run snapshots.
//!
//! A host loads a run, its tasks and the run state, asks the scheduler what
//! should change, persists the answer, dispatches runnable tasks, and
//! repeats. The scheduler itself never performs IO or keeps state between
//! calls.
//!
//! - [`model`]: workflows, nodes, runs and tasks.
//! - [`dag`]: the scheduling operations and their change sets.
//! - [`engine`]: an in-memory reference host driving one run.
//! - [`config`] / [`logging`] / [`errors`]: ambient plumbing.

pub mod config;
pub mod dag;
pub mod engine;
pub mod errors;
pub mod logging;
pub mod model;
pub mod types;

use uuid::Uuid;

use crate::dag::{MatrixTaskChanges, RunnableTaskChanges, Scheduler};
use crate::errors::Result;
use crate::model::{RunState, Task, WorkflowRun};

/// Initial task set of a run, with the default configuration.
pub fn calculate_initial_tasks(workflow_run: &WorkflowRun) -> Result<Vec<Task>> {
    Scheduler::new().calculate_initial_tasks(workflow_run)
}

/// Matrix reconciliation, with the default configuration.
pub fn calculate_matrix_task_changes(
    workflow_run_id: Uuid,
    workflow_run: &WorkflowRun,
    tasks: &[Task],
    state: &RunState,
) -> Result<MatrixTaskChanges> {
    Scheduler::new().calculate_matrix_task_changes(workflow_run_id, workflow_run, tasks, state)
}

/// Runnable-task resolution, with the default configuration.
pub fn find_runnable_tasks(workflow_run: &WorkflowRun, tasks: &[Task]) -> Result<RunnableTaskChanges> {
    Scheduler::new().find_runnable_tasks(workflow_run, tasks)
}
