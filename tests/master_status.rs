// tests/master_status.rs

mod common;
use crate::common::builders::{record, with_status};

use taskdag::dag::{master_status, master_status_updates};
use taskdag::model::{Task, TaskStatus};
use uuid::Uuid;

fn family(statuses: &[TaskStatus]) -> (Task, Vec<Task>) {
    let run_id = Uuid::new_v4();
    let master = Task::new(run_id, "fan", true);
    let children = statuses
        .iter()
        .enumerate()
        .map(|(i, s)| {
            with_status(
                &Task::new_matrix(run_id, "fan", master.id, record("i", &i.to_string())),
                *s,
            )
        })
        .collect();
    (master, children)
}

fn status_of(statuses: &[TaskStatus]) -> TaskStatus {
    let (master, children) = family(statuses);
    let refs: Vec<&Task> = children.iter().collect();
    master_status(&master, &refs)
}

#[test]
fn all_children_completed_completes_master() {
    use TaskStatus::*;
    assert_eq!(status_of(&[Completed, Completed]), Completed);
}

#[test]
fn any_failure_among_finished_children_fails_master() {
    use TaskStatus::*;
    assert_eq!(status_of(&[Completed, Failed]), Failed);
}

#[test]
fn unfinished_children_follow_priority_order() {
    use TaskStatus::*;
    assert_eq!(status_of(&[Running, Pending]), Running);
    assert_eq!(status_of(&[Pending, Pending]), Pending);
    assert_eq!(status_of(&[AwaitingTrigger, Running]), AwaitingTrigger);
    assert_eq!(status_of(&[Blocked, Running, Completed]), Blocked);
    assert_eq!(status_of(&[Failed, Running]), Failed);
}

#[test]
fn retired_children_are_ignored() {
    use TaskStatus::*;
    assert_eq!(status_of(&[WontDo, Completed]), Completed);
    assert_eq!(status_of(&[WontDo, Running]), Running);
}

#[test]
fn master_without_children_stays_pending() {
    assert_eq!(status_of(&[]), TaskStatus::Pending);
}

#[test]
fn master_with_only_retired_children_is_completed() {
    assert_eq!(status_of(&[TaskStatus::WontDo]), TaskStatus::Completed);
}

#[test]
fn updates_only_report_changes() {
    let (master, mut children) = family(&[TaskStatus::Pending, TaskStatus::Pending]);
    let mut tasks = vec![master.clone()];
    tasks.append(&mut children);

    assert!(master_status_updates(&tasks, &[master.id]).is_empty());

    tasks[1].status = TaskStatus::Running;
    let updates = master_status_updates(&tasks, &[master.id]);
    assert_eq!(updates.len(), 1);
    assert_eq!(updates[0].task_id, master.id);
    assert_eq!(updates[0].status, TaskStatus::Running);
}

#[test]
fn unknown_and_non_master_ids_are_skipped() {
    let (master, children) = family(&[TaskStatus::Completed]);
    let child_id = children[0].id;
    let mut tasks = vec![master];
    tasks.extend(children);

    let updates = master_status_updates(&tasks, &[Uuid::new_v4(), child_id]);

    assert!(updates.is_empty());
}
