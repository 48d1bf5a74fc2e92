// src/engine/event_handlers.rs

//! Event handling logic for the core runtime.

use tracing::{debug, warn};
use uuid::Uuid;

use crate::dag::Scheduler;
use crate::engine::TaskOutcome;
use crate::engine::core::RunStore;
use crate::errors::Result;
use crate::model::TaskStatus;

/// Command produced by the core, to be executed by an outer shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoreCommand {
    /// Send these tasks (now `Running`) to the executor.
    DispatchTasks(Vec<Uuid>),
    /// These tasks now wait for a manual go-ahead.
    AwaitTrigger(Vec<Uuid>),
    /// These tasks were blocked by an upstream failure.
    Blocked(Vec<Uuid>),
}

/// Decision returned by the core after handling a single event.
#[derive(Debug, Clone, Default)]
pub struct CoreStep {
    pub commands: Vec<CoreCommand>,
    /// False once the run can make no further progress.
    pub keep_running: bool,
}

impl CoreStep {
    /// All task ids dispatched in this step.
    pub fn dispatched(&self) -> Vec<Uuid> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                CoreCommand::DispatchTasks(ids) => Some(ids.clone()),
                _ => None,
            })
            .flatten()
            .collect()
    }
}

/// Write a state key and reconcile matrix fan-out against the new snapshot.
pub fn handle_state_change(
    scheduler: &Scheduler,
    store: &mut RunStore,
    key: String,
    value: serde_json::Value,
) -> Result<CoreStep> {
    debug!(state_key = %key, "run state changed");
    store.state.insert(key, value);

    let changes = scheduler.calculate_matrix_task_changes(
        store.run.id,
        &store.run,
        &store.tasks,
        &store.state,
    )?;
    store.apply_matrix_changes(scheduler, changes);

    Ok(CoreStep::default())
}

/// Record an executor's outcome and refresh the task's master, if any.
pub fn handle_task_completion(
    scheduler: &Scheduler,
    store: &mut RunStore,
    task: Uuid,
    outcome: TaskOutcome,
) -> CoreStep {
    let Some(current) = store.task_mut(task) else {
        warn!(task = %task, "completion for unknown task; ignoring");
        return CoreStep::default();
    };

    if current.status != TaskStatus::Running {
        warn!(
            task = %task,
            status = ?current.status,
            "completion for a task that is not running; ignoring"
        );
        return CoreStep::default();
    }

    let master = current.master_task_id;
    let status = match outcome {
        TaskOutcome::Success => TaskStatus::Completed,
        TaskOutcome::Failed(message) => {
            current.error = Some(message);
            TaskStatus::Failed
        }
    };
    store.set_status(task, status);

    if let Some(master_id) = master {
        store.update_masters(scheduler, &[master_id]);
    }

    CoreStep::default()
}

/// Release a task held in `AwaitingTrigger` and dispatch it right away.
pub fn handle_trigger_release(scheduler: &Scheduler, store: &mut RunStore, task: Uuid) -> CoreStep {
    let Some(current) = store.task_mut(task) else {
        warn!(task = %task, "trigger for unknown task; ignoring");
        return CoreStep::default();
    };

    if current.status != TaskStatus::AwaitingTrigger {
        warn!(
            task = %task,
            status = ?current.status,
            "trigger for a task that is not awaiting one; ignoring"
        );
        return CoreStep::default();
    }

    let master = current.master_task_id;
    store.set_status(task, TaskStatus::Running);
    if let Some(master_id) = master {
        store.update_masters(scheduler, &[master_id]);
    }

    CoreStep {
        commands: vec![CoreCommand::DispatchTasks(vec![task])],
        keep_running: true,
    }
}

/// Resolve runnability and apply it: gate manual tasks, block unreachable
/// ones, and mark runnable ones `Running` for dispatch.
pub fn settle(scheduler: &Scheduler, store: &mut RunStore) -> Result<CoreStep> {
    let changes = scheduler.find_runnable_tasks(&store.run, &store.tasks)?;
    let mut commands = Vec::new();

    for id in &changes.tasks_to_await_trigger {
        store.set_status(*id, TaskStatus::AwaitingTrigger);
    }
    for id in &changes.tasks_to_block {
        store.set_status(*id, TaskStatus::Blocked);
    }
    for id in &changes.runnable_tasks {
        store.set_status(*id, TaskStatus::Running);
    }

    let masters = store.master_ids();
    store.update_masters(scheduler, &masters);

    if !changes.tasks_to_await_trigger.is_empty() {
        commands.push(CoreCommand::AwaitTrigger(changes.tasks_to_await_trigger));
    }
    if !changes.tasks_to_block.is_empty() {
        commands.push(CoreCommand::Blocked(changes.tasks_to_block));
    }
    if !changes.runnable_tasks.is_empty() {
        commands.push(CoreCommand::DispatchTasks(changes.runnable_tasks));
    }

    Ok(CoreStep {
        commands,
        keep_running: true,
    })
}
