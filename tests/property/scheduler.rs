use std::collections::HashSet;

use proptest::prelude::*;
use serde_json::{Value, json};

use taskdag::dag::Scheduler;
use taskdag::engine::{CoreRuntime, RuntimeEvent, TaskOutcome};
use taskdag::model::{RunState, TaskStatus, Workflow};
use taskdag_test_utils::builders::{NodeBuilder, WorkflowBuilder};

// Strategy to generate a valid workflow.
// We ensure acyclicity by only allowing node N to depend on nodes 0..N-1.
// Every third node fans out over the `items` state key.
fn workflow_strategy(max_nodes: usize) -> impl Strategy<Value = Workflow> {
    (1..=max_nodes).prop_flat_map(|num_nodes| {
        let deps_strat = proptest::collection::vec(
            proptest::collection::vec(any::<usize>(), 0..num_nodes),
            num_nodes,
        );

        deps_strat.prop_map(move |raw_deps| {
            let mut builder = WorkflowBuilder::new();
            for (i, potential_deps) in raw_deps.into_iter().enumerate() {
                let id = format!("node_{i}");
                let mut node = NodeBuilder::new(&id);

                let mut valid_deps = HashSet::new();
                for dep_idx in potential_deps {
                    if i > 0 {
                        valid_deps.insert(dep_idx % i);
                    }
                }
                for dep_idx in valid_deps {
                    node = node.after(&format!("node_{dep_idx}"));
                }
                if i % 3 == 2 {
                    node = node.matrix_from_state("items");
                }
                builder = builder.with_node(node.build());
            }
            builder.build()
        })
    })
}

// Arrays of small records; duplicates and non-objects included on purpose.
fn items_strategy() -> impl Strategy<Value = Value> {
    proptest::collection::vec(
        prop_oneof![
            (0..4u8).prop_map(|n| json!({ "id": n.to_string() })),
            (0..4u8).prop_map(|n| json!({ "id": n })),
            Just(json!("not a record")),
        ],
        0..6,
    )
    .prop_map(Value::Array)
}

proptest! {
    #[test]
    fn reconciliation_is_idempotent(
        workflow in workflow_strategy(8),
        items in items_strategy(),
    ) {
        let scheduler = Scheduler::new();
        let run = taskdag::model::WorkflowRun::new(workflow);
        let mut tasks = scheduler.calculate_initial_tasks(&run).unwrap();
        let state = RunState::from([("items".to_string(), items)]);

        let first = scheduler
            .calculate_matrix_task_changes(run.id, &run, &tasks, &state)
            .unwrap();
        tasks.extend(first.new_tasks);
        for task in tasks.iter_mut() {
            if first.tasks_to_mark_wont_do.contains(&task.id) {
                task.status = TaskStatus::WontDo;
            }
        }

        let second = scheduler
            .calculate_matrix_task_changes(run.id, &run, &tasks, &state)
            .unwrap();
        prop_assert!(second.new_tasks.is_empty());
        prop_assert!(second.tasks_to_mark_wont_do.is_empty());
        prop_assert_eq!(second.master_tasks_to_update, first.master_tasks_to_update);

        // No two active children of a node share a record.
        let mut seen = HashSet::new();
        for task in tasks.iter().filter(|t| t.status.is_active()) {
            if let Some(record) = &task.matrix_values {
                prop_assert!(seen.insert((task.node_id.clone(), record.clone())));
            }
        }
    }

    #[test]
    fn runtime_eventually_finishes(
        workflow in workflow_strategy(8),
        items in items_strategy(),
        failing in proptest::collection::vec(0..8usize, 0..3),
    ) {
        let failing: HashSet<String> = failing.into_iter().map(|i| format!("node_{i}")).collect();
        let run = taskdag::model::WorkflowRun::new(workflow);
        let state = RunState::from([("items".to_string(), items)]);
        let mut runtime = CoreRuntime::start(Scheduler::new(), run, state).unwrap();

        let mut queue = runtime.step(RuntimeEvent::Tick).unwrap().dispatched();
        let mut steps = 0;
        while let Some(task) = queue.pop() {
            steps += 1;
            prop_assert!(steps < 1_000, "runtime did not settle");

            let node = runtime.task(task).map(|t| t.node_id.clone()).unwrap();
            let outcome = if failing.contains(&node) {
                TaskOutcome::Failed("boom".to_string())
            } else {
                TaskOutcome::Success
            };
            let step = runtime
                .step(RuntimeEvent::TaskCompleted { task, outcome })
                .unwrap();
            queue.extend(step.dispatched());
        }

        // Nothing is left running, and a node is only ever completed after
        // everything it depends on.
        for task in runtime.tasks().iter().filter(|t| !t.is_master) {
            prop_assert_ne!(task.status, TaskStatus::Running);
        }
        for task in runtime.tasks().iter().filter(|t| t.status == TaskStatus::Completed && !t.is_master) {
            let node = runtime.run().workflow.node(&task.node_id).unwrap();
            for dep in &node.depends_on {
                prop_assert!(runtime
                    .tasks()
                    .iter()
                    .filter(|t| &t.node_id == dep && !t.is_master && t.status.is_active())
                    .all(|t| t.status == TaskStatus::Completed));
            }
        }
    }
}
