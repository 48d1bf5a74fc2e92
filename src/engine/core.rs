// src/engine/core.rs

//! Pure core runtime state machine.
//!
//! [`CoreRuntime`] consumes [`RuntimeEvent`]s and produces:
//! - an updated run (tasks, state snapshot)
//! - a list of commands describing what an executor should do next
//!
//! It has no channels, no async runtime, and performs no IO.

use chrono::Utc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::dag::{MatrixTaskChanges, Scheduler};
use crate::engine::RuntimeEvent;
use crate::engine::event_handlers::{
    CoreStep, handle_state_change, handle_task_completion, handle_trigger_release, settle,
};
use crate::errors::Result;
use crate::model::{RunState, Task, TaskStatus, WorkflowRun};

/// Everything the host persists for one run.
#[derive(Debug, Clone)]
pub struct RunStore {
    pub run: WorkflowRun,
    pub tasks: Vec<Task>,
    pub state: RunState,
}

impl RunStore {
    pub fn task_mut(&mut self, id: Uuid) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|t| t.id == id)
    }

    pub fn add_tasks(&mut self, new_tasks: Vec<Task>) {
        for task in new_tasks {
            self.run.tasks.push(task.id);
            self.tasks.push(task);
        }
    }

    /// Move a task to `status`, stamping start/end times.
    pub fn set_status(&mut self, id: Uuid, status: TaskStatus) {
        let Some(task) = self.task_mut(id) else {
            warn!(task = %id, "status change for unknown task; ignoring");
            return;
        };
        if task.status == status {
            return;
        }
        debug!(task = %id, from = ?task.status, to = ?status, "task status change");

        let now = Utc::now();
        if status == TaskStatus::Running && task.started_at.is_none() {
            task.started_at = Some(now);
        }
        if status.is_terminal() || status == TaskStatus::Blocked {
            task.ended_at = Some(now);
        } else {
            task.ended_at = None;
        }
        task.status = status;
    }

    /// Persist a reconciliation result.
    pub fn apply_matrix_changes(&mut self, scheduler: &Scheduler, changes: MatrixTaskChanges) {
        let MatrixTaskChanges {
            new_tasks,
            tasks_to_mark_wont_do,
            master_tasks_to_update,
        } = changes;

        self.add_tasks(new_tasks);
        for id in tasks_to_mark_wont_do {
            self.set_status(id, TaskStatus::WontDo);
        }
        self.update_masters(scheduler, &master_tasks_to_update);
    }

    /// Recompute the given masters from their children.
    pub fn update_masters(&mut self, scheduler: &Scheduler, master_ids: &[Uuid]) {
        for update in scheduler.master_status_updates(&self.tasks, master_ids) {
            self.set_status(update.task_id, update.status);
        }
    }

    pub fn master_ids(&self) -> Vec<Uuid> {
        self.tasks
            .iter()
            .filter(|t| t.is_master)
            .map(|t| t.id)
            .collect()
    }
}

/// Pure core runtime for one workflow run.
#[derive(Debug)]
pub struct CoreRuntime {
    scheduler: Scheduler,
    store: RunStore,
}

impl CoreRuntime {
    /// Plan the initial task set of `run`, reconcile it against `state` and
    /// aggregate masters. Nothing is dispatched until the first [`step`].
    ///
    /// [`step`]: CoreRuntime::step
    pub fn start(scheduler: Scheduler, run: WorkflowRun, state: RunState) -> Result<Self> {
        let tasks = scheduler.calculate_initial_tasks(&run)?;
        let mut store = RunStore {
            run,
            tasks: Vec::new(),
            state,
        };
        store.add_tasks(tasks);

        let changes = scheduler.calculate_matrix_task_changes(
            store.run.id,
            &store.run,
            &store.tasks,
            &store.state,
        )?;
        store.apply_matrix_changes(&scheduler, changes);

        let masters = store.master_ids();
        store.update_masters(&scheduler, &masters);

        info!(
            run_id = %store.run.id,
            tasks = store.tasks.len(),
            "core runtime started"
        );

        Ok(Self { scheduler, store })
    }

    pub fn run(&self) -> &WorkflowRun {
        &self.store.run
    }

    pub fn tasks(&self) -> &[Task] {
        &self.store.tasks
    }

    pub fn task(&self, id: Uuid) -> Option<&Task> {
        self.store.tasks.iter().find(|t| t.id == id)
    }

    pub fn state(&self) -> &RunState {
        &self.store.state
    }

    /// True when every non-master task is terminal or blocked, i.e. no
    /// event can make further progress.
    pub fn is_finished(&self) -> bool {
        self.store
            .tasks
            .iter()
            .filter(|t| !t.is_master)
            .all(|t| t.status.is_terminal() || t.status == TaskStatus::Blocked)
    }

    /// Handle a single runtime event, updating the run and returning the
    /// resulting commands.
    pub fn step(&mut self, event: RuntimeEvent) -> Result<CoreStep> {
        let mut step = match event {
            RuntimeEvent::StateChanged { key, value } => {
                handle_state_change(&self.scheduler, &mut self.store, key, value)?
            }
            RuntimeEvent::TaskCompleted { task, outcome } => {
                handle_task_completion(&self.scheduler, &mut self.store, task, outcome)
            }
            RuntimeEvent::TriggerReleased { task } => {
                handle_trigger_release(&self.scheduler, &mut self.store, task)
            }
            RuntimeEvent::Tick => CoreStep::default(),
        };

        let mut settled = settle(&self.scheduler, &mut self.store)?;
        step.commands.append(&mut settled.commands);
        step.keep_running = !self.is_finished();

        Ok(step)
    }
}
