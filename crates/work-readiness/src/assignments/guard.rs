use std::collections::HashSet;

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use super::domain::{AssignmentRecord, AssignmentStatus, BatchAssignmentRequest, WorkerId};

/// Why a batch was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectionReason {
    OverdueAssignments,
    PendingNotDue,
}

/// Structured business rejection returned instead of creating a batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentRejection {
    pub success: bool,
    pub reason: RejectionReason,
    pub error: String,
    pub message: String,
    pub assigned_date: NaiveDate,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub overdue_workers: Vec<WorkerId>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub pending_not_due_workers: Vec<WorkerId>,
}

impl AssignmentRejection {
    fn overdue(assigned_date: NaiveDate, workers: Vec<WorkerId>) -> Self {
        Self {
            success: false,
            reason: RejectionReason::OverdueAssignments,
            error: format!(
                "Cannot create assignments for {assigned_date}: {} worker(s) have overdue assignments",
                workers.len()
            ),
            message: "Workers with overdue assignments cannot receive new assignments on the same date until the overdue work is resolved.".to_string(),
            assigned_date,
            overdue_workers: workers,
            pending_not_due_workers: Vec::new(),
        }
    }

    fn pending_not_due(assigned_date: NaiveDate, workers: Vec<WorkerId>) -> Self {
        Self {
            success: false,
            reason: RejectionReason::PendingNotDue,
            error: format!(
                "Cannot create assignments for {assigned_date}: {} worker(s) already have a pending assignment that is not yet due",
                workers.len()
            ),
            message: "Workers with pending assignments that are not yet due cannot receive new assignments.".to_string(),
            assigned_date,
            overdue_workers: Vec::new(),
            pending_not_due_workers: workers,
        }
    }

    /// Workers the caller should drop from the batch before retrying.
    pub fn offending_workers(&self) -> &[WorkerId] {
        match self.reason {
            RejectionReason::OverdueAssignments => &self.overdue_workers,
            RejectionReason::PendingNotDue => &self.pending_not_due_workers,
        }
    }
}

/// Same-day conflict detection for batch scheduling.
///
/// An overdue record on any date blocks its worker. A pending record that is not yet due
/// blocks only when it targets the requested date. Overdue conflicts are reported first.
#[derive(Debug, Default, Clone, Copy)]
pub struct AssignmentConflictGuard;

impl AssignmentConflictGuard {
    pub fn check(
        &self,
        request: &BatchAssignmentRequest,
        existing: &[AssignmentRecord],
        now: DateTime<Utc>,
    ) -> Option<AssignmentRejection> {
        let requested: HashSet<&WorkerId> = request.worker_ids.iter().collect();
        let relevant = existing
            .iter()
            .filter(|record| requested.contains(&record.worker_id));

        let mut overdue: HashSet<&WorkerId> = HashSet::new();
        let mut pending_not_due: HashSet<&WorkerId> = HashSet::new();
        for record in relevant {
            if record.status == AssignmentStatus::Overdue {
                overdue.insert(&record.worker_id);
            } else if record.assigned_date == request.assigned_date
                && record.is_pending_not_due(now)
            {
                pending_not_due.insert(&record.worker_id);
            }
        }

        if !overdue.is_empty() {
            let workers = in_request_order(&request.worker_ids, &overdue);
            return Some(AssignmentRejection::overdue(request.assigned_date, workers));
        }

        if !pending_not_due.is_empty() {
            let workers = in_request_order(&request.worker_ids, &pending_not_due);
            return Some(AssignmentRejection::pending_not_due(
                request.assigned_date,
                workers,
            ));
        }

        None
    }
}

fn in_request_order(requested: &[WorkerId], flagged: &HashSet<&WorkerId>) -> Vec<WorkerId> {
    let mut seen = HashSet::new();
    requested
        .iter()
        .filter(|worker| flagged.contains(worker) && seen.insert(*worker))
        .cloned()
        .collect()
}
