// src/model/mod.rs

//! Serializable data model shared by the scheduler and its host.
//!
//! - [`workflow`]: workflow definitions and runs.
//! - [`node`]: node definitions, triggers and matrix strategies.
//! - [`task`]: runtime task instances and their status.
//! - [`matrix`]: canonical matrix value-records.

pub mod matrix;
pub mod node;
pub mod task;
pub mod workflow;

pub use matrix::MatrixRecord;
pub use node::{MatrixSource, Node, NodeType, Strategy, StrategyType, Trigger, TriggerType};
pub use task::{Task, TaskStatus};
pub use workflow::{Workflow, WorkflowRun, WorkflowStatus};

/// External run state snapshot: state key to arbitrary JSON value.
pub type RunState = std::collections::HashMap<String, serde_json::Value>;
