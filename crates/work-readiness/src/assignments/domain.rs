use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Opaque worker identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorkerId(pub String);

impl WorkerId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }
}

/// Identifier wrapper for scheduled assignments.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssignmentId(pub String);

/// Lifecycle of a check-in assignment. Transitions happen outside this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssignmentStatus {
    Pending,
    Completed,
    Overdue,
    Cancelled,
}

impl AssignmentStatus {
    pub fn label(&self) -> &'static str {
        match self {
            AssignmentStatus::Pending => "Pending",
            AssignmentStatus::Completed => "Completed",
            AssignmentStatus::Overdue => "Overdue",
            AssignmentStatus::Cancelled => "Cancelled",
        }
    }
}

/// One worker's scheduled work-readiness check-in for one date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentRecord {
    pub id: AssignmentId,
    pub worker_id: WorkerId,
    #[serde(default)]
    pub team: Option<String>,
    #[serde(default)]
    pub assigned_by: Option<String>,
    pub assigned_date: NaiveDate,
    pub due_time: DateTime<Utc>,
    pub status: AssignmentStatus,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl AssignmentRecord {
    /// Overdue by status, or still pending after the due time passed.
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        match self.status {
            AssignmentStatus::Overdue => true,
            AssignmentStatus::Pending => self.due_time <= now,
            AssignmentStatus::Completed | AssignmentStatus::Cancelled => false,
        }
    }

    pub fn is_pending_not_due(&self, now: DateTime<Utc>) -> bool {
        self.status == AssignmentStatus::Pending && self.due_time > now
    }

    pub fn completed_on_time(&self) -> bool {
        self.status == AssignmentStatus::Completed
            && self
                .completed_at
                .map(|completed| completed <= self.due_time)
                .unwrap_or(false)
    }
}

/// Batch scheduling request issued by a team leader.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchAssignmentRequest {
    pub worker_ids: Vec<WorkerId>,
    pub assigned_date: NaiveDate,
    /// Overrides the configured time of day on `assigned_date`.
    #[serde(default)]
    pub due_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub team: Option<String>,
    #[serde(default)]
    pub assigned_by: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}
