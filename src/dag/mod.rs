// src/dag/mod.rs

//! DAG representation and scheduling.
//!
//! - [`graph`] holds the node dependency graph of a workflow.
//! - [`task_info`] indexes a flat task list by node and role.
//! - [`state_manager`] decides, per node, whether dependants may proceed.
//! - [`planner`], [`reconciler`] and [`resolver`] are the three scheduling
//!   operations; [`master`] aggregates matrix master status.
//! - [`scheduler`] is the configured facade over all of them.
//! - [`scheduler_step`] defines the change sets they return.

pub mod graph;
pub mod master;
pub mod planner;
pub mod reconciler;
pub mod resolver;
pub mod scheduler;
pub mod scheduler_step;
pub mod state_manager;
pub mod task_info;

pub use graph::DagGraph;
pub use master::{master_status, master_status_updates};
pub use scheduler::Scheduler;
pub use scheduler_step::{MasterStatusUpdate, MatrixTaskChanges, RunnableTaskChanges};
pub use state_manager::{DependencyResolver, DependencyVerdict, NodeCompletion};
pub use task_info::{NodeTasks, TaskIndex};
