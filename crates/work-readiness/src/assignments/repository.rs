use chrono::NaiveDate;
use serde::Serialize;

use super::domain::{AssignmentRecord, WorkerId};

/// Storage abstraction for assignment records.
pub trait AssignmentRepository: Send + Sync {
    /// Every record for the given workers, regardless of date or status.
    fn find_by_worker_ids(
        &self,
        worker_ids: &[WorkerId],
    ) -> Result<Vec<AssignmentRecord>, RepositoryError>;

    fn insert_many(
        &self,
        records: Vec<AssignmentRecord>,
    ) -> Result<Vec<AssignmentRecord>, RepositoryError>;
}

/// A worker and date that already hold a live assignment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotConflict {
    pub worker_id: WorkerId,
    pub assigned_date: NaiveDate,
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    /// Every clashing slot in the rejected insert.
    #[error("assignments already exist for {}", describe_conflicts(.conflicts))]
    Conflict { conflicts: Vec<SlotConflict> },
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

fn describe_conflicts(conflicts: &[SlotConflict]) -> String {
    conflicts
        .iter()
        .map(|conflict| format!("worker {} on {}", conflict.worker_id.0, conflict.assigned_date))
        .collect::<Vec<_>>()
        .join(", ")
}
