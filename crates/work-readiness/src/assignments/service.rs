use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tracing::{info, warn};

use super::domain::{
    AssignmentId, AssignmentRecord, AssignmentStatus, BatchAssignmentRequest, WorkerId,
};
use super::guard::{AssignmentConflictGuard, AssignmentRejection};
use super::repository::{AssignmentRepository, RepositoryError};
use crate::clock::{Clock, SystemClock};
use crate::config::AssignmentConfig;
use crate::kpi::{calculate_assignment_kpi, AssignmentKpiInput, KpiResult};

/// Service composing the conflict guard, repository, and clock.
///
/// The check and the insert are separate round-trips, so two overlapping batches can both
/// pass the guard. Repositories that enforce a `(worker_id, assigned_date)` unique
/// constraint surface the loser as [`RepositoryError::Conflict`].
pub struct WorkReadinessService<R> {
    repository: Arc<R>,
    clock: Arc<dyn Clock>,
    guard: AssignmentConflictGuard,
    config: AssignmentConfig,
}

static ASSIGNMENT_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_assignment_id() -> AssignmentId {
    let id = ASSIGNMENT_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    AssignmentId(format!("wra-{id:06}"))
}

/// Result of a batch scheduling attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum BatchAssignmentOutcome {
    Created(Vec<AssignmentRecord>),
    Rejected(AssignmentRejection),
}

impl<R> WorkReadinessService<R>
where
    R: AssignmentRepository + 'static,
{
    pub fn new(repository: Arc<R>, config: AssignmentConfig) -> Self {
        Self::with_clock(repository, config, Arc::new(SystemClock))
    }

    pub fn with_clock(
        repository: Arc<R>,
        config: AssignmentConfig,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            repository,
            clock,
            guard: AssignmentConflictGuard,
            config,
        }
    }

    /// Schedule one pending assignment per worker unless the guard rejects the batch.
    pub fn create_assignments(
        &self,
        request: BatchAssignmentRequest,
    ) -> Result<BatchAssignmentOutcome, AssignmentServiceError> {
        let request = normalize(request)?;
        let now = self.clock.now();

        let existing = self.repository.find_by_worker_ids(&request.worker_ids)?;
        if let Some(rejection) = self.guard.check(&request, &existing, now) {
            warn!(
                assigned_date = %request.assigned_date,
                reason = ?rejection.reason,
                blocked = rejection.offending_workers().len(),
                requested = request.worker_ids.len(),
                "rejected work-readiness batch"
            );
            return Ok(BatchAssignmentOutcome::Rejected(rejection));
        }

        let due_time = request.due_time.unwrap_or_else(|| {
            request
                .assigned_date
                .and_time(self.config.due_time_of_day)
                .and_utc()
        });

        let records = request
            .worker_ids
            .iter()
            .map(|worker_id| AssignmentRecord {
                id: next_assignment_id(),
                worker_id: worker_id.clone(),
                team: request.team.clone(),
                assigned_by: request.assigned_by.clone(),
                assigned_date: request.assigned_date,
                due_time,
                status: AssignmentStatus::Pending,
                created_at: now,
                completed_at: None,
                notes: request.notes.clone(),
            })
            .collect();

        let stored = self.repository.insert_many(records)?;
        info!(
            assigned_date = %request.assigned_date,
            created = stored.len(),
            "created work-readiness assignments"
        );
        Ok(BatchAssignmentOutcome::Created(stored))
    }

    /// Assignment KPI for one worker as of the service clock.
    pub fn worker_kpi(&self, worker_id: &WorkerId) -> Result<KpiResult, AssignmentServiceError> {
        let now = self.clock.now();
        let records: Vec<AssignmentRecord> = self
            .repository
            .find_by_worker_ids(std::slice::from_ref(worker_id))?
            .into_iter()
            .filter(|record| &record.worker_id == worker_id)
            .collect();

        let input = AssignmentKpiInput::from_records(&records, now);
        Ok(calculate_assignment_kpi(&input, now))
    }
}

fn normalize(
    mut request: BatchAssignmentRequest,
) -> Result<BatchAssignmentRequest, AssignmentServiceError> {
    if request.worker_ids.is_empty() {
        return Err(AssignmentServiceError::InvalidRequest(
            "at least one worker id is required".to_string(),
        ));
    }

    let mut seen = HashSet::new();
    let mut worker_ids = Vec::with_capacity(request.worker_ids.len());
    for WorkerId(raw) in request.worker_ids {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(AssignmentServiceError::InvalidRequest(
                "worker ids must not be blank".to_string(),
            ));
        }
        if seen.insert(trimmed.to_string()) {
            worker_ids.push(WorkerId::new(trimmed));
        }
    }

    request.worker_ids = worker_ids;
    Ok(request)
}

/// Error raised by the assignment service.
#[derive(Debug, thiserror::Error)]
pub enum AssignmentServiceError {
    #[error("invalid assignment request: {0}")]
    InvalidRequest(String),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
