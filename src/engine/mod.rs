// src/engine/mod.rs

//! In-memory reference host for a single workflow run.
//!
//! The scheduler in [`crate::dag`] only computes change sets. Something has
//! to own the run, its tasks and the state snapshot, feed them to the
//! scheduler, and apply what comes back. [`CoreRuntime`] does exactly that,
//! synchronously and without IO, so embedding hosts have a worked example of
//! the loop and tests can drive whole runs event by event.

use uuid::Uuid;

/// Outcome of a task execution as reported by an executor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskOutcome {
    Success,
    Failed(String),
}

/// Events flowing into the runtime from executors, users and state writers.
#[derive(Debug, Clone)]
pub enum RuntimeEvent {
    /// A run state key was written; matrix fan-out is reconciled.
    StateChanged {
        key: String,
        value: serde_json::Value,
    },
    /// An executor finished a dispatched task.
    TaskCompleted { task: Uuid, outcome: TaskOutcome },
    /// Someone gave the go-ahead for a task awaiting a manual trigger.
    TriggerReleased { task: Uuid },
    /// Re-evaluate without any new input.
    Tick,
}

pub mod core;
pub mod event_handlers;

pub use core::CoreRuntime;
pub use event_handlers::{CoreCommand, CoreStep};
