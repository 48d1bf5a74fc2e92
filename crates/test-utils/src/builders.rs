#![allow(dead_code)]

use std::collections::BTreeMap;

use taskdag::model::{
    MatrixRecord, Node, NodeType, Strategy, Task, TaskStatus, Trigger, TriggerType, Workflow,
    WorkflowRun,
};

/// Builder for `Workflow` to simplify test setup.
pub struct WorkflowBuilder {
    workflow: Workflow,
}

impl WorkflowBuilder {
    pub fn new() -> Self {
        Self {
            workflow: Workflow {
                version: "1".to_string(),
                name: None,
                description: None,
                state: None,
                templates: vec![],
                nodes: vec![],
            },
        }
    }

    pub fn with_node(mut self, node: Node) -> Self {
        self.workflow.nodes.push(node);
        self
    }

    pub fn build(self) -> Workflow {
        self.workflow
    }

    /// Build the workflow and wrap it in a fresh run.
    pub fn build_run(self) -> WorkflowRun {
        WorkflowRun::new(self.build())
    }
}

impl Default for WorkflowBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for `Node`.
pub struct NodeBuilder {
    node: Node,
}

impl NodeBuilder {
    pub fn new(id: &str) -> Self {
        Self {
            node: Node {
                id: id.to_string(),
                name: format!("Node {id}"),
                description: None,
                r#type: NodeType::Automatic,
                depends_on: vec![],
                trigger: None,
                strategy: None,
                runtime: Some(serde_json::json!({ "type": "direct" })),
                steps: vec![serde_json::json!({
                    "name": "Step 1",
                    "run": format!("echo 'Running {id}'"),
                })],
                env: BTreeMap::new(),
            },
        }
    }

    pub fn after(mut self, dep: &str) -> Self {
        self.node.depends_on.push(dep.to_string());
        self
    }

    pub fn manual(mut self) -> Self {
        self.node.r#type = NodeType::Manual;
        self
    }

    pub fn manual_trigger(mut self) -> Self {
        self.node.trigger = Some(Trigger {
            r#type: TriggerType::Manual,
        });
        self
    }

    pub fn matrix_values(mut self, values: Vec<MatrixRecord>) -> Self {
        self.node.strategy = Some(Strategy::matrix_values(values));
        self
    }

    pub fn matrix_from_state(mut self, key: &str) -> Self {
        self.node.strategy = Some(Strategy::matrix_from_state(key));
        self
    }

    pub fn build(self) -> Node {
        self.node
    }
}

/// Single-key record, e.g. `record("id", "a")`.
pub fn record(key: &str, value: &str) -> MatrixRecord {
    MatrixRecord::from([(key, value)])
}

/// Copy of `task` with a different status.
pub fn with_status(task: &Task, status: TaskStatus) -> Task {
    Task {
        status,
        ..task.clone()
    }
}
