// src/dag/task_info.rs

//! Per-call task lookup index.

use std::collections::HashMap;

use uuid::Uuid;

use crate::model::{MatrixRecord, Task};

/// Tasks of one node, split by role.
#[derive(Debug, Default)]
pub struct NodeTasks<'a> {
    /// Master tasks. Normally at most one; extras are ignored.
    pub masters: Vec<&'a Task>,
    /// Matrix children in any status, including retired ones.
    pub children: Vec<&'a Task>,
    /// Non-master tasks without a value-record (plain node tasks).
    pub singles: Vec<&'a Task>,
}

impl<'a> NodeTasks<'a> {
    pub fn master(&self) -> Option<&'a Task> {
        self.masters.first().copied()
    }

    /// Children that have not been retired to `WontDo`.
    pub fn active_children(&self) -> impl Iterator<Item = &'a Task> + '_ {
        self.children.iter().copied().filter(|t| t.status.is_active())
    }

    /// Active children of `master_id` keyed by their value-record, in input
    /// order. Children pointing at any other master are left out.
    ///
    /// If two active children share a record, only the first is in the map;
    /// the rest are returned as duplicates.
    pub fn active_children_by_record(
        &self,
        master_id: Uuid,
    ) -> (HashMap<&'a MatrixRecord, &'a Task>, Vec<&'a Task>) {
        let mut by_record = HashMap::new();
        let mut duplicates = Vec::new();

        for task in self
            .active_children()
            .filter(|t| t.master_task_id == Some(master_id))
        {
            if let Some(record) = task.matrix_values.as_ref() {
                if by_record.contains_key(record) {
                    duplicates.push(task);
                } else {
                    by_record.insert(record, task);
                }
            }
        }

        (by_record, duplicates)
    }
}

/// Lookup index over a flat task list: node id to its tasks, task id to task.
///
/// Built fresh per scheduler call from the snapshot it was given; there is no
/// parent/child tree, children point at their master by id.
#[derive(Debug, Default)]
pub struct TaskIndex<'a> {
    by_node: HashMap<&'a str, NodeTasks<'a>>,
    by_id: HashMap<Uuid, &'a Task>,
}

impl<'a> TaskIndex<'a> {
    pub fn build(tasks: &'a [Task]) -> Self {
        let mut index = TaskIndex::default();

        for task in tasks {
            index.by_id.insert(task.id, task);

            let entry = index.by_node.entry(task.node_id.as_str()).or_default();
            if task.is_master {
                entry.masters.push(task);
            } else if task.matrix_values.is_some() {
                entry.children.push(task);
            } else {
                entry.singles.push(task);
            }
        }

        index
    }

    pub fn node(&self, node_id: &str) -> Option<&NodeTasks<'a>> {
        self.by_node.get(node_id)
    }

    pub fn task(&self, id: Uuid) -> Option<&'a Task> {
        self.by_id.get(&id).copied()
    }

    /// Children that point at `master_id`, in any status.
    pub fn children_of_master(&self, master_id: Uuid) -> Vec<&'a Task> {
        let Some(master) = self.task(master_id) else {
            return Vec::new();
        };
        self.node(&master.node_id)
            .map(|nt| {
                nt.children
                    .iter()
                    .copied()
                    .filter(|t| t.master_task_id == Some(master_id))
                    .collect()
            })
            .unwrap_or_default()
    }
}
