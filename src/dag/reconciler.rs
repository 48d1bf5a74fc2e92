// src/dag/reconciler.rs

//! Keeps `from_state` matrix fan-out in sync with the run state.

use std::collections::HashSet;

use serde_json::Value;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::dag::scheduler_step::MatrixTaskChanges;
use crate::dag::task_info::TaskIndex;
use crate::model::{MatrixRecord, Node, RunState, Task, WorkflowRun};

/// Diff the active children of every `from_state` matrix node against the
/// records currently found in `state`.
///
/// Matching is by full record equality only. Nothing is assumed about an
/// `id`-like key: records that differ in any key or value are different
/// instances.
pub fn calculate_matrix_task_changes(
    workflow_run_id: Uuid,
    workflow_run: &WorkflowRun,
    tasks: &[Task],
    state: &RunState,
) -> MatrixTaskChanges {
    let index = TaskIndex::build(tasks);
    let mut changes = MatrixTaskChanges::default();

    for node in &workflow_run.workflow.nodes {
        let Some(state_key) = node.state_key() else {
            continue;
        };

        debug!(
            node = %node.id,
            state_key = %state_key,
            "reconciling matrix node against run state"
        );

        reconcile_node(workflow_run_id, node, state_key, &index, state, &mut changes);
    }

    info!(
        run_id = %workflow_run_id,
        new_tasks = changes.new_tasks.len(),
        wont_do = changes.tasks_to_mark_wont_do.len(),
        masters = changes.master_tasks_to_update.len(),
        "matrix reconciliation complete"
    );

    changes
}

fn reconcile_node(
    workflow_run_id: Uuid,
    node: &Node,
    state_key: &str,
    index: &TaskIndex<'_>,
    state: &RunState,
    changes: &mut MatrixTaskChanges,
) {
    let node_tasks = index.node(&node.id);

    let master_id = match node_tasks.and_then(|nt| nt.master()) {
        Some(master) => master.id,
        None => {
            let master = Task::new(workflow_run_id, node.id.clone(), true);
            debug!(node = %node.id, task = %master.id, "master task missing; creating it");
            let id = master.id;
            changes.new_tasks.push(master);
            id
        }
    };

    let desired = desired_records(node, state_key, state);

    let (existing, duplicates) = node_tasks
        .map(|nt| nt.active_children_by_record(master_id))
        .unwrap_or_default();

    // Create children for records with no active task under this master.
    for record in &desired {
        if existing.contains_key(record) {
            continue;
        }
        debug!(node = %node.id, record = %record, "new matrix record; creating child task");
        changes.new_tasks.push(Task::new_matrix(
            workflow_run_id,
            node.id.clone(),
            master_id,
            record.clone(),
        ));
    }

    // Retire active children whose record is gone, duplicates, and children
    // of any other master (their records were re-created above). Walk the
    // node's children in input order so output is deterministic.
    let desired_set: HashSet<&MatrixRecord> = desired.iter().collect();
    if let Some(nt) = node_tasks {
        for child in nt.active_children() {
            let Some(record) = child.matrix_values.as_ref() else {
                continue;
            };
            let is_duplicate = duplicates.iter().any(|d| d.id == child.id);
            let is_orphan = child.master_task_id != Some(master_id);
            if is_orphan || is_duplicate || !desired_set.contains(record) {
                debug!(
                    node = %node.id,
                    task = %child.id,
                    record = %record,
                    duplicate = is_duplicate,
                    orphan = is_orphan,
                    "matrix record no longer wanted; marking WontDo"
                );
                changes.tasks_to_mark_wont_do.push(child.id);
            }
        }
    }

    if !changes.master_tasks_to_update.contains(&master_id) {
        changes.master_tasks_to_update.push(master_id);
    }
}

/// Records wanted for `node` right now, deduplicated, in state-array order.
///
/// A missing key or a non-array value yields no records.
fn desired_records(node: &Node, state_key: &str, state: &RunState) -> Vec<MatrixRecord> {
    let items = match state.get(state_key) {
        Some(Value::Array(items)) => items,
        Some(other) => {
            warn!(
                node = %node.id,
                state_key = %state_key,
                kind = json_kind(other),
                "matrix state value is not an array; treating as empty"
            );
            return Vec::new();
        }
        None => {
            debug!(node = %node.id, state_key = %state_key, "matrix state key missing");
            return Vec::new();
        }
    };

    let mut seen = HashSet::with_capacity(items.len());
    let mut records = Vec::with_capacity(items.len());

    for item in items {
        match MatrixRecord::from_json(item) {
            Some(record) => {
                if seen.insert(record.clone()) {
                    records.push(record);
                }
            }
            None => warn!(
                node = %node.id,
                state_key = %state_key,
                item = %item,
                "matrix state item is not an object; skipping"
            ),
        }
    }

    debug!(
        node = %node.id,
        items = items.len(),
        records = records.len(),
        "read matrix records from state"
    );

    records
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
