// tests/runtime_fake_executor.rs

mod common;
use crate::common::builders::{NodeBuilder, WorkflowBuilder, record};
use crate::common::fake_executor::FakeExecutor;
use crate::common::init_tracing;

use std::error::Error;

use serde_json::json;

use taskdag::config::SchedulerConfig;
use taskdag::dag::Scheduler;
use taskdag::engine::{CoreCommand, CoreRuntime, RuntimeEvent, TaskOutcome};
use taskdag::model::{RunState, TaskStatus, WorkflowRun};
use taskdag::types::FailedDependencyPolicy;

type TestResult = Result<(), Box<dyn Error>>;

/// Very simple chain: A -> B -> C
fn simple_chain_run() -> WorkflowRun {
    WorkflowBuilder::new()
        .with_node(NodeBuilder::new("A").build())
        .with_node(NodeBuilder::new("B").after("A").build())
        .with_node(NodeBuilder::new("C").after("B").build())
        .build_run()
}

fn statuses_of(runtime: &CoreRuntime, node: &str) -> Vec<TaskStatus> {
    runtime
        .tasks()
        .iter()
        .filter(|t| t.node_id == node && !t.is_master)
        .map(|t| t.status)
        .collect()
}

fn master_status(runtime: &CoreRuntime, node: &str) -> Option<TaskStatus> {
    runtime
        .tasks()
        .iter()
        .find(|t| t.node_id == node && t.is_master)
        .map(|t| t.status)
}

#[test]
fn chain_runs_in_dependency_order() -> TestResult {
    init_tracing();
    let mut runtime = CoreRuntime::start(Scheduler::new(), simple_chain_run(), RunState::new())?;
    let mut executor = FakeExecutor::new();

    executor.drive(&mut runtime, RuntimeEvent::Tick)?;

    assert_eq!(executor.executed(), ["A", "B", "C"]);
    assert!(runtime.is_finished());
    for node in ["A", "B", "C"] {
        assert_eq!(statuses_of(&runtime, node), vec![TaskStatus::Completed]);
    }
    let a = runtime.tasks().iter().find(|t| t.node_id == "A").unwrap();
    assert!(a.started_at.is_some());
    assert!(a.ended_at.is_some());
    Ok(())
}

#[test]
fn first_tick_dispatches_only_roots() -> TestResult {
    let mut runtime = CoreRuntime::start(Scheduler::new(), simple_chain_run(), RunState::new())?;

    let step = runtime.step(RuntimeEvent::Tick)?;

    assert_eq!(step.dispatched().len(), 1);
    assert!(step.keep_running);
    assert_eq!(statuses_of(&runtime, "A"), vec![TaskStatus::Running]);
    assert_eq!(statuses_of(&runtime, "B"), vec![TaskStatus::Pending]);
    Ok(())
}

#[test]
fn static_matrix_fans_out_and_joins() -> TestResult {
    let run = WorkflowBuilder::new()
        .with_node(
            NodeBuilder::new("build")
                .matrix_values(vec![record("os", "linux"), record("os", "mac")])
                .build(),
        )
        .with_node(NodeBuilder::new("publish").after("build").build())
        .build_run();
    let mut runtime = CoreRuntime::start(Scheduler::new(), run, RunState::new())?;
    let mut executor = FakeExecutor::new();

    executor.drive(&mut runtime, RuntimeEvent::Tick)?;

    assert_eq!(executor.executed(), ["build", "build", "publish"]);
    assert_eq!(master_status(&runtime, "build"), Some(TaskStatus::Completed));
    assert!(runtime.is_finished());
    Ok(())
}

#[test]
fn state_change_fans_out_dynamic_matrix() -> TestResult {
    init_tracing();
    let run = WorkflowBuilder::new()
        .with_node(NodeBuilder::new("discover").build())
        .with_node(
            NodeBuilder::new("process")
                .after("discover")
                .matrix_from_state("items")
                .build(),
        )
        .with_node(NodeBuilder::new("report").after("process").build())
        .build_run();
    let mut runtime = CoreRuntime::start(Scheduler::new(), run, RunState::new())?;
    let mut executor = FakeExecutor::new();

    // Only `discover` can run; `process` has no children yet.
    executor.drive(&mut runtime, RuntimeEvent::Tick)?;
    assert_eq!(executor.executed(), ["discover"]);
    assert!(statuses_of(&runtime, "process").is_empty());
    assert_eq!(statuses_of(&runtime, "report"), vec![TaskStatus::Pending]);

    executor.drive(
        &mut runtime,
        RuntimeEvent::StateChanged {
            key: "items".to_string(),
            value: json!([{ "id": "a" }, { "id": "b" }, { "id": "c" }]),
        },
    )?;

    assert_eq!(
        executor.executed(),
        ["discover", "process", "process", "process", "report"]
    );
    assert_eq!(master_status(&runtime, "process"), Some(TaskStatus::Completed));
    assert_eq!(runtime.state()["items"].as_array().map(Vec::len), Some(3));
    assert!(runtime.is_finished());
    Ok(())
}

#[test]
fn shrinking_state_retires_pending_children() -> TestResult {
    let run = WorkflowBuilder::new()
        .with_node(NodeBuilder::new("gate").manual().build())
        .with_node(
            NodeBuilder::new("process")
                .after("gate")
                .matrix_from_state("items")
                .build(),
        )
        .build_run();
    let state = RunState::from([("items".to_string(), json!([{ "id": "a" }, { "id": "b" }]))]);
    let mut runtime = CoreRuntime::start(Scheduler::new(), run, state)?;
    assert_eq!(statuses_of(&runtime, "process").len(), 2);

    runtime.step(RuntimeEvent::StateChanged {
        key: "items".to_string(),
        value: json!([{ "id": "b" }]),
    })?;

    let mut statuses = statuses_of(&runtime, "process");
    statuses.sort_by_key(|s| format!("{s:?}"));
    assert_eq!(statuses, vec![TaskStatus::Pending, TaskStatus::WontDo]);
    assert_eq!(runtime.run().tasks.len(), runtime.tasks().len());
    Ok(())
}

#[test]
fn manual_node_waits_for_trigger_release() -> TestResult {
    let run = WorkflowBuilder::new()
        .with_node(NodeBuilder::new("build").build())
        .with_node(NodeBuilder::new("deploy").after("build").manual_trigger().build())
        .build_run();
    let mut runtime = CoreRuntime::start(Scheduler::new(), run, RunState::new())?;
    let mut executor = FakeExecutor::new();

    executor.drive(&mut runtime, RuntimeEvent::Tick)?;

    assert_eq!(executor.executed(), ["build"]);
    assert_eq!(statuses_of(&runtime, "deploy"), vec![TaskStatus::AwaitingTrigger]);
    assert!(!runtime.is_finished());

    let deploy = runtime
        .tasks()
        .iter()
        .find(|t| t.node_id == "deploy")
        .map(|t| t.id)
        .unwrap();
    executor.drive(&mut runtime, RuntimeEvent::TriggerReleased { task: deploy })?;

    assert_eq!(executor.executed(), ["build", "deploy"]);
    assert!(runtime.is_finished());
    Ok(())
}

#[test]
fn await_trigger_is_reported_as_a_command() -> TestResult {
    let run = WorkflowBuilder::new()
        .with_node(NodeBuilder::new("approve").manual().build())
        .build_run();
    let mut runtime = CoreRuntime::start(Scheduler::new(), run, RunState::new())?;

    let step = runtime.step(RuntimeEvent::Tick)?;

    assert!(matches!(
        step.commands.as_slice(),
        [CoreCommand::AwaitTrigger(ids)] if ids.len() == 1
    ));
    assert!(step.dispatched().is_empty());
    Ok(())
}

#[test]
fn failure_blocks_downstream_and_finishes_run() -> TestResult {
    let mut runtime = CoreRuntime::start(Scheduler::new(), simple_chain_run(), RunState::new())?;
    let mut executor = FakeExecutor::failing(&["A"]);

    executor.drive(&mut runtime, RuntimeEvent::Tick)?;

    assert_eq!(executor.executed(), ["A"]);
    assert_eq!(statuses_of(&runtime, "A"), vec![TaskStatus::Failed]);
    assert_eq!(statuses_of(&runtime, "B"), vec![TaskStatus::Blocked]);
    assert_eq!(statuses_of(&runtime, "C"), vec![TaskStatus::Blocked]);
    let a = runtime.tasks().iter().find(|t| t.node_id == "A").unwrap();
    assert_eq!(a.error.as_deref(), Some("A failed"));
    assert!(runtime.is_finished());
    Ok(())
}

#[test]
fn wait_policy_keeps_downstream_pending() -> TestResult {
    let scheduler = Scheduler::with_config(
        SchedulerConfig::default().with_failed_dependency(FailedDependencyPolicy::Wait),
    );
    let mut runtime = CoreRuntime::start(scheduler, simple_chain_run(), RunState::new())?;
    let mut executor = FakeExecutor::failing(&["A"]);

    executor.drive(&mut runtime, RuntimeEvent::Tick)?;

    assert_eq!(statuses_of(&runtime, "B"), vec![TaskStatus::Pending]);
    assert!(!runtime.is_finished());
    Ok(())
}

#[test]
fn stale_completion_is_ignored() -> TestResult {
    let mut runtime = CoreRuntime::start(Scheduler::new(), simple_chain_run(), RunState::new())?;
    let b = runtime
        .tasks()
        .iter()
        .find(|t| t.node_id == "B")
        .map(|t| t.id)
        .unwrap();

    // B never started.
    let step = runtime.step(RuntimeEvent::TaskCompleted {
        task: b,
        outcome: TaskOutcome::Success,
    })?;

    assert_eq!(statuses_of(&runtime, "B"), vec![TaskStatus::Pending]);
    // Settling still dispatches A.
    assert_eq!(step.dispatched().len(), 1);
    Ok(())
}
