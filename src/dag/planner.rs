// src/dag/planner.rs

//! Initial task planning for a freshly started run.

use std::collections::HashSet;

use tracing::{debug, info};

use crate::model::{MatrixSource, Strategy, Task, WorkflowRun};

/// Produce the full starting task set of a run.
///
/// - plain node: one task;
/// - matrix with `values`: a master plus one child per record;
/// - matrix with `from_state` (or no source at all): the master only. State
///   is not consulted here; the reconciler adds children later.
pub fn calculate_initial_tasks(workflow_run: &WorkflowRun) -> Vec<Task> {
    let mut tasks = Vec::new();

    for node in &workflow_run.workflow.nodes {
        match &node.strategy {
            Some(Strategy { source, .. }) => {
                let master = Task::new(workflow_run.id, node.id.clone(), true);
                let master_id = master.id;
                tasks.push(master);

                if let MatrixSource::Values(values) = source {
                    let mut seen = HashSet::with_capacity(values.len());
                    for record in values {
                        if !seen.insert(record) {
                            debug!(
                                node = %node.id,
                                record = %record,
                                "duplicate matrix record in `values`; skipping"
                            );
                            continue;
                        }
                        tasks.push(Task::new_matrix(
                            workflow_run.id,
                            node.id.clone(),
                            master_id,
                            record.clone(),
                        ));
                    }
                    debug!(node = %node.id, children = seen.len(), "planned static matrix");
                } else {
                    debug!(node = %node.id, "planned matrix master; children come later");
                }
            }
            None => {
                tasks.push(Task::new(workflow_run.id, node.id.clone(), false));
            }
        }
    }

    info!(
        run_id = %workflow_run.id,
        nodes = workflow_run.workflow.nodes.len(),
        tasks = tasks.len(),
        "initial tasks planned"
    );

    tasks
}
