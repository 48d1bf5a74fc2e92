// src/dag/state_manager.rs

//! Node-level dependency state for one scheduling pass.

use std::collections::HashMap;

use tracing::{debug, warn};

use crate::dag::graph::DagGraph;
use crate::dag::task_info::{NodeTasks, TaskIndex};
use crate::model::{Task, TaskStatus, Workflow};

/// How a node looks to the nodes that depend on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeCompletion {
    /// Every relevant task is `Completed`.
    Complete,
    /// Not complete yet, but still able to complete.
    Incomplete,
    /// Can no longer complete: a task failed, was retired or blocked, or an
    /// upstream node is doomed.
    Doomed,
}

/// Verdict for a single dependant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DependencyVerdict {
    Satisfied,
    Waiting,
    /// At least one dependency is doomed.
    Unreachable,
}

/// Computes [`NodeCompletion`] for every workflow node once, in topological
/// order, so that doom propagates through pending ancestors in a single pass.
///
/// This is the canonical implementation of dependency satisfaction:
/// - a non-matrix node is complete iff its task is `Completed`;
/// - a matrix node is complete iff it has at least one active child and
///   every active child is `Completed`. The master's own status is ignored.
pub struct DependencyResolver<'g> {
    graph: &'g DagGraph,
    completion: HashMap<&'g str, NodeCompletion>,
}

impl<'g> DependencyResolver<'g> {
    pub fn new(graph: &'g DagGraph, workflow: &Workflow, index: &TaskIndex<'_>) -> Self {
        let mut completion: HashMap<&'g str, NodeCompletion> = HashMap::new();

        for node_id in graph.topological_order() {
            let is_matrix = workflow.node(node_id).map(|n| n.is_matrix()).unwrap_or(false);
            let own = match index.node(node_id) {
                Some(tasks) if is_matrix => matrix_completion(tasks),
                Some(tasks) => single_completion(tasks),
                None => NodeCompletion::Incomplete,
            };

            let upstream_doomed = graph
                .dependencies_of(node_id)
                .iter()
                .any(|dep| completion.get(dep.as_str()) == Some(&NodeCompletion::Doomed));

            let state = match own {
                NodeCompletion::Incomplete if upstream_doomed => NodeCompletion::Doomed,
                other => other,
            };

            debug!(node = %node_id, completion = ?state, "node completion computed");
            completion.insert(node_id, state);
        }

        Self { graph, completion }
    }

    /// Whether all declared dependencies of `node_id` are complete.
    pub fn verdict_for(&self, node_id: &str) -> DependencyVerdict {
        let mut verdict = DependencyVerdict::Satisfied;

        for dep in self.graph.dependencies_of(node_id) {
            match self.completion.get(dep.as_str()) {
                Some(NodeCompletion::Complete) => {}
                Some(NodeCompletion::Doomed) => return DependencyVerdict::Unreachable,
                Some(NodeCompletion::Incomplete) => verdict = DependencyVerdict::Waiting,
                None => {
                    warn!(
                        node = %node_id,
                        dep = %dep,
                        "dependency is not a node of this workflow; treating as unsatisfied"
                    );
                    verdict = DependencyVerdict::Waiting;
                }
            }
        }

        verdict
    }
}

fn dooms_dependants(task: &Task, matrix: bool) -> bool {
    match task.status {
        TaskStatus::Failed | TaskStatus::Blocked => true,
        // A retired matrix child just drops out of the set.
        TaskStatus::WontDo => !matrix,
        _ => false,
    }
}

fn single_completion(tasks: &NodeTasks<'_>) -> NodeCompletion {
    if tasks.singles.is_empty() {
        return NodeCompletion::Incomplete;
    }
    if tasks.singles.iter().any(|t| dooms_dependants(t, false)) {
        return NodeCompletion::Doomed;
    }
    if tasks.singles.iter().all(|t| t.status == TaskStatus::Completed) {
        NodeCompletion::Complete
    } else {
        NodeCompletion::Incomplete
    }
}

fn matrix_completion(tasks: &NodeTasks<'_>) -> NodeCompletion {
    let mut any = false;
    let mut all_completed = true;

    for child in tasks.active_children() {
        any = true;
        if dooms_dependants(child, true) {
            return NodeCompletion::Doomed;
        }
        if child.status != TaskStatus::Completed {
            all_completed = false;
        }
    }

    // No active children yet: not reconciled, or the state array is empty.
    if any && all_completed {
        NodeCompletion::Complete
    } else {
        NodeCompletion::Incomplete
    }
}
