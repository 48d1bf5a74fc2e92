// src/dag/master.rs

//! Aggregate status of matrix master tasks.

use tracing::debug;
use uuid::Uuid;

use crate::dag::scheduler_step::MasterStatusUpdate;
use crate::dag::task_info::TaskIndex;
use crate::model::{Task, TaskStatus};

/// Status a master task should have given its children.
///
/// Retired (`WontDo`) children are ignored. With no active children the
/// master stays where it is, unless it has already left `Pending` or some
/// children were retired, in which case there is nothing left to do and it
/// is `Completed`.
pub fn master_status(master: &Task, children: &[&Task]) -> TaskStatus {
    let active: Vec<&Task> = children
        .iter()
        .copied()
        .filter(|t| t.status.is_active())
        .collect();

    if active.is_empty() {
        let any_retired = children.len() > active.len();
        return if master.status != TaskStatus::Pending || any_retired {
            TaskStatus::Completed
        } else {
            master.status
        };
    }

    let any = |status: TaskStatus| active.iter().any(|t| t.status == status);

    if active.iter().all(|t| t.status.is_terminal()) {
        return if any(TaskStatus::Failed) {
            TaskStatus::Failed
        } else {
            TaskStatus::Completed
        };
    }

    [
        TaskStatus::Failed,
        TaskStatus::Blocked,
        TaskStatus::AwaitingTrigger,
        TaskStatus::Running,
        TaskStatus::Pending,
    ]
    .into_iter()
    .find(|s| any(*s))
    .unwrap_or(master.status)
}

/// Recompute each listed master and report the ones whose status changes.
///
/// Ids that are unknown or not masters are skipped.
pub fn master_status_updates(tasks: &[Task], master_ids: &[Uuid]) -> Vec<MasterStatusUpdate> {
    let index = TaskIndex::build(tasks);

    master_ids
        .iter()
        .filter_map(|id| index.task(*id))
        .filter(|master| master.is_master)
        .filter_map(|master| {
            let children = index.children_of_master(master.id);
            let status = master_status(master, &children);
            if status == master.status {
                return None;
            }
            debug!(
                task = %master.id,
                node = %master.node_id,
                from = ?master.status,
                to = ?status,
                "master status changes"
            );
            Some(MasterStatusUpdate {
                task_id: master.id,
                status,
            })
        })
        .collect()
}
