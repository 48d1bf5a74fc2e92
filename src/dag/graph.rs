// src/dag/graph.rs

use std::collections::HashMap;

use petgraph::algo::toposort;
use petgraph::graphmap::DiGraphMap;
use tracing::warn;

use crate::model::Workflow;

/// Internal node structure: stores immediate deps.
#[derive(Debug, Clone)]
struct DagNode {
    /// Direct dependencies: nodes that must complete before this one can run.
    deps: Vec<String>,
}

/// In-memory DAG of a workflow's nodes, keyed by node id.
///
/// Built fresh on every scheduler call. Cycles are not rejected;
/// [`DagGraph::topological_order`] degrades to declaration order instead.
#[derive(Debug, Clone)]
pub struct DagGraph {
    nodes: HashMap<String, DagNode>,
    /// Node ids in workflow declaration order.
    order: Vec<String>,
}

impl DagGraph {
    pub fn from_workflow(workflow: &Workflow) -> Self {
        let mut nodes: HashMap<String, DagNode> = HashMap::new();
        let mut order = Vec::with_capacity(workflow.nodes.len());

        // First pass: create nodes with their dependency lists.
        for node in &workflow.nodes {
            order.push(node.id.clone());
            nodes.insert(
                node.id.clone(),
                DagNode {
                    deps: node.depends_on.clone(),
                },
            );
        }

        // Second pass: report dangling references. They stay in `deps` and
        // are never satisfied.
        for node in &workflow.nodes {
            for dep in node.depends_on.iter().filter(|d| !nodes.contains_key(*d)) {
                warn!(
                    node = %node.id,
                    dep = %dep,
                    "depends_on references a node that is not in the workflow"
                );
            }
        }

        Self { nodes, order }
    }

    /// All node ids, in declaration order.
    pub fn nodes(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(|s| s.as_str())
    }

    /// Immediate dependencies of a node (its `depends_on`).
    pub fn dependencies_of(&self, id: &str) -> &[String] {
        self.nodes
            .get(id)
            .map(|n| n.deps.as_slice())
            .unwrap_or(&[])
    }

    /// Node ids with every dependency ordered before its dependents.
    ///
    /// Ties keep declaration order as far as petgraph allows. On a cycle the
    /// plain declaration order is returned.
    pub fn topological_order(&self) -> Vec<&str> {
        // Edge direction: dep -> node.
        let mut graph: DiGraphMap<&str, ()> = DiGraphMap::new();

        for id in &self.order {
            graph.add_node(id.as_str());
        }
        for id in &self.order {
            for dep in self.dependencies_of(id) {
                if self.nodes.contains_key(dep) {
                    graph.add_edge(dep.as_str(), id.as_str(), ());
                }
            }
        }

        match toposort(&graph, None) {
            Ok(order) => order,
            Err(cycle) => {
                warn!(
                    node = %cycle.node_id(),
                    "cycle in depends_on; falling back to declaration order"
                );
                self.nodes().collect()
            }
        }
    }
}
