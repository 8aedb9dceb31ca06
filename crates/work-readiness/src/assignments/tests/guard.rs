use chrono::Duration;

use super::common::*;
use crate::assignments::domain::AssignmentStatus;
use crate::assignments::{AssignmentConflictGuard, RejectionReason};

fn due_on(day: u32) -> chrono::DateTime<chrono::Utc> {
    date(day)
        .and_hms_opt(17, 0, 0)
        .expect("valid time")
        .and_utc()
}

#[test]
fn overdue_record_on_another_date_blocks_worker() {
    let existing = vec![record("w-1", date(10), AssignmentStatus::Overdue, due_on(10))];

    let rejection = AssignmentConflictGuard
        .check(&request(&["w-1", "w-2"], today()), &existing, now())
        .expect("batch rejected");

    assert_eq!(rejection.reason, RejectionReason::OverdueAssignments);
    assert_eq!(rejection.overdue_workers, vec![worker("w-1")]);
    assert!(rejection.pending_not_due_workers.is_empty());
    assert!(!rejection.success);
    assert!(rejection.error.contains("2025-06-16"));
    assert!(rejection.message.contains("cannot receive new assignments"));
}

#[test]
fn overdue_record_on_requested_date_blocks_worker() {
    let existing = vec![record(
        "w-1",
        today(),
        AssignmentStatus::Overdue,
        now() - Duration::hours(1),
    )];

    let rejection = AssignmentConflictGuard
        .check(&request(&["w-1"], today()), &existing, now())
        .expect("batch rejected");

    assert_eq!(rejection.overdue_workers, vec![worker("w-1")]);
}

#[test]
fn pending_not_due_on_requested_date_blocks_worker() {
    let existing = vec![record(
        "w-2",
        date(17),
        AssignmentStatus::Pending,
        due_on(17),
    )];

    let rejection = AssignmentConflictGuard
        .check(&request(&["w-1", "w-2"], date(17)), &existing, now())
        .expect("batch rejected");

    assert_eq!(rejection.reason, RejectionReason::PendingNotDue);
    assert_eq!(rejection.pending_not_due_workers, vec![worker("w-2")]);
    assert!(rejection.overdue_workers.is_empty());
    assert_eq!(rejection.offending_workers(), &[worker("w-2")]);
}

#[test]
fn pending_not_due_on_another_date_does_not_block() {
    let existing = vec![record(
        "w-2",
        date(18),
        AssignmentStatus::Pending,
        due_on(18),
    )];

    let outcome = AssignmentConflictGuard.check(&request(&["w-2"], date(17)), &existing, now());

    assert!(outcome.is_none());
}

#[test]
fn pending_past_due_is_left_to_the_overdue_sweep() {
    let existing = vec![record(
        "w-3",
        today(),
        AssignmentStatus::Pending,
        now() - Duration::minutes(5),
    )];

    let outcome = AssignmentConflictGuard.check(&request(&["w-3"], today()), &existing, now());

    assert!(outcome.is_none());
}

#[test]
fn completed_and_cancelled_records_never_block() {
    let existing = vec![
        completed(
            "w-1",
            today(),
            now() + Duration::hours(8),
            now() - Duration::hours(1),
        ),
        record(
            "w-2",
            today(),
            AssignmentStatus::Cancelled,
            now() + Duration::hours(8),
        ),
    ];

    let outcome =
        AssignmentConflictGuard.check(&request(&["w-1", "w-2"], today()), &existing, now());

    assert!(outcome.is_none());
}

#[test]
fn overdue_conflicts_take_precedence_over_pending() {
    let existing = vec![
        record("w-1", date(12), AssignmentStatus::Overdue, due_on(12)),
        record("w-2", today(), AssignmentStatus::Pending, due_on(16)),
    ];

    let rejection = AssignmentConflictGuard
        .check(&request(&["w-1", "w-2"], today()), &existing, now())
        .expect("batch rejected");

    assert_eq!(rejection.reason, RejectionReason::OverdueAssignments);
    assert_eq!(rejection.overdue_workers, vec![worker("w-1")]);
    assert!(rejection.pending_not_due_workers.is_empty());
}

#[test]
fn records_for_other_workers_are_ignored() {
    let existing = vec![record("w-9", date(3), AssignmentStatus::Overdue, due_on(3))];

    let outcome = AssignmentConflictGuard.check(&request(&["w-1"], today()), &existing, now());

    assert!(outcome.is_none());
}

#[test]
fn offenders_are_listed_once_in_request_order() {
    let existing = vec![
        record("w-3", date(2), AssignmentStatus::Overdue, due_on(2)),
        record("w-1", date(4), AssignmentStatus::Overdue, due_on(4)),
        record("w-3", date(9), AssignmentStatus::Overdue, due_on(9)),
    ];

    let rejection = AssignmentConflictGuard
        .check(
            &request(&["w-1", "w-2", "w-3"], today()),
            &existing,
            now(),
        )
        .expect("batch rejected");

    assert_eq!(rejection.overdue_workers, vec![worker("w-1"), worker("w-3")]);
}

#[test]
fn rejection_serializes_for_api_consumers() {
    let existing = vec![record("w-1", date(10), AssignmentStatus::Overdue, due_on(10))];
    let rejection = AssignmentConflictGuard
        .check(&request(&["w-1"], today()), &existing, now())
        .expect("batch rejected");

    let value = serde_json::to_value(&rejection).expect("json");

    assert_eq!(value["success"], false);
    assert_eq!(value["reason"], "overdue_assignments");
    assert_eq!(value["overdueWorkers"], serde_json::json!(["w-1"]));
    assert_eq!(value["assignedDate"], "2025-06-16");
    assert!(value.get("pendingNotDueWorkers").is_none());
}
