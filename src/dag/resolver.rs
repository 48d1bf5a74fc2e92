// src/dag/resolver.rs

//! Classification of pending tasks into runnable / awaiting trigger / blocked.

use tracing::{debug, info};

use crate::dag::graph::DagGraph;
use crate::dag::scheduler_step::RunnableTaskChanges;
use crate::dag::state_manager::{DependencyResolver, DependencyVerdict};
use crate::dag::task_info::TaskIndex;
use crate::errors::{Result, TaskdagError};
use crate::model::{Task, TaskStatus, WorkflowRun};
use crate::types::FailedDependencyPolicy;

/// Decide, for every pending non-master task, whether it can run now.
///
/// A matrix child is gated by its node's dependencies only; siblings never
/// gate each other. Manual nodes (`type = manual` or `trigger.type = manual`)
/// with satisfied dependencies go to `tasks_to_await_trigger`.
///
/// Fails with [`TaskdagError::NodeNotFound`] if a pending task names a node
/// that is not in the run's workflow.
pub fn find_runnable_tasks(
    workflow_run: &WorkflowRun,
    tasks: &[Task],
    policy: FailedDependencyPolicy,
) -> Result<RunnableTaskChanges> {
    let workflow = &workflow_run.workflow;
    let graph = DagGraph::from_workflow(workflow);
    let index = TaskIndex::build(tasks);
    let deps = DependencyResolver::new(&graph, workflow, &index);

    let mut changes = RunnableTaskChanges::default();

    for task in tasks {
        if task.status != TaskStatus::Pending || task.is_master {
            continue;
        }

        let node = workflow
            .node(&task.node_id)
            .ok_or_else(|| TaskdagError::NodeNotFound(task.node_id.clone()))?;

        match deps.verdict_for(&node.id) {
            DependencyVerdict::Satisfied if node.requires_manual_trigger() => {
                debug!(task = %task.id, node = %node.id, "dependencies met; awaiting manual trigger");
                changes.tasks_to_await_trigger.push(task.id);
            }
            DependencyVerdict::Satisfied => {
                debug!(task = %task.id, node = %node.id, "dependencies met; runnable");
                changes.runnable_tasks.push(task.id);
            }
            DependencyVerdict::Unreachable if policy == FailedDependencyPolicy::Block => {
                debug!(task = %task.id, node = %node.id, "upstream can no longer complete; blocking");
                changes.tasks_to_block.push(task.id);
            }
            DependencyVerdict::Unreachable | DependencyVerdict::Waiting => {}
        }
    }

    info!(
        run_id = %workflow_run.id,
        runnable = changes.runnable_tasks.len(),
        awaiting_trigger = changes.tasks_to_await_trigger.len(),
        blocked = changes.tasks_to_block.len(),
        "runnable tasks resolved"
    );

    Ok(changes)
}
