use std::collections::HashSet;

use taskdag::engine::{CoreRuntime, CoreStep, RuntimeEvent, TaskOutcome};
use taskdag::errors::Result;
use uuid::Uuid;

/// A fake executor that:
/// - records which tasks were "run", by node id, in dispatch order
/// - immediately reports completion for each dispatched task, failing the
///   ones whose node is listed in `failing_nodes`.
pub struct FakeExecutor {
    failing_nodes: HashSet<String>,
    executed: Vec<String>,
}

impl FakeExecutor {
    pub fn new() -> Self {
        Self::failing(&[])
    }

    pub fn failing(nodes: &[&str]) -> Self {
        Self {
            failing_nodes: nodes.iter().map(|s| s.to_string()).collect(),
            executed: Vec::new(),
        }
    }

    pub fn executed(&self) -> &[String] {
        &self.executed
    }

    /// Feed `first` into the runtime, then keep completing dispatched tasks
    /// until nothing new is dispatched. Returns the number of events handled.
    pub fn drive(&mut self, runtime: &mut CoreRuntime, first: RuntimeEvent) -> Result<usize> {
        let mut queue: Vec<Uuid> = runtime.step(first).map(|s| s.dispatched())?;
        let mut events = 1;

        while !queue.is_empty() {
            let task_id = queue.remove(0);
            let node_id = match runtime.task(task_id) {
                Some(t) => t.node_id.clone(),
                None => continue,
            };
            self.executed.push(node_id.clone());

            let outcome = if self.failing_nodes.contains(&node_id) {
                TaskOutcome::Failed(format!("{node_id} failed"))
            } else {
                TaskOutcome::Success
            };

            let step: CoreStep = runtime.step(RuntimeEvent::TaskCompleted {
                task: task_id,
                outcome,
            })?;
            events += 1;
            queue.extend(step.dispatched());
        }

        Ok(events)
    }
}

impl Default for FakeExecutor {
    fn default() -> Self {
        Self::new()
    }
}
