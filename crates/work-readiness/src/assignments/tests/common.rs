use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use serde_json::Value;

use crate::assignments::domain::{
    AssignmentId, AssignmentRecord, AssignmentStatus, BatchAssignmentRequest, WorkerId,
};
use crate::assignments::repository::{AssignmentRepository, RepositoryError, SlotConflict};
use crate::assignments::WorkReadinessService;
use crate::clock::FixedClock;
use crate::config::AssignmentConfig;

pub(super) fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 16, 9, 0, 0)
        .single()
        .expect("valid timestamp")
}

pub(super) fn today() -> NaiveDate {
    now().date_naive()
}

pub(super) fn date(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, day).expect("valid date")
}

pub(super) fn worker(id: &str) -> WorkerId {
    WorkerId::new(id)
}

pub(super) fn record(
    worker_id: &str,
    assigned_date: NaiveDate,
    status: AssignmentStatus,
    due_time: DateTime<Utc>,
) -> AssignmentRecord {
    AssignmentRecord {
        id: AssignmentId(format!("seed-{worker_id}-{assigned_date}")),
        worker_id: worker(worker_id),
        team: Some("Line A".to_string()),
        assigned_by: Some("leader-1".to_string()),
        assigned_date,
        due_time,
        status,
        created_at: due_time - Duration::hours(12),
        completed_at: None,
        notes: None,
    }
}

pub(super) fn completed(
    worker_id: &str,
    assigned_date: NaiveDate,
    due_time: DateTime<Utc>,
    completed_at: DateTime<Utc>,
) -> AssignmentRecord {
    AssignmentRecord {
        completed_at: Some(completed_at),
        ..record(
            worker_id,
            assigned_date,
            AssignmentStatus::Completed,
            due_time,
        )
    }
}

pub(super) fn request(worker_ids: &[&str], assigned_date: NaiveDate) -> BatchAssignmentRequest {
    BatchAssignmentRequest {
        worker_ids: worker_ids.iter().map(|id| worker(id)).collect(),
        assigned_date,
        due_time: None,
        team: Some("Line A".to_string()),
        assigned_by: Some("leader-1".to_string()),
        notes: Some("Pre-shift readiness check".to_string()),
    }
}

pub(super) fn build_service(
    seed: Vec<AssignmentRecord>,
) -> (WorkReadinessService<MemoryRepository>, Arc<MemoryRepository>) {
    let repository = Arc::new(MemoryRepository::seeded(seed));
    let service = service_with(repository.clone());
    (service, repository)
}

pub(super) fn service_with<R>(repository: Arc<R>) -> WorkReadinessService<R>
where
    R: AssignmentRepository + 'static,
{
    WorkReadinessService::with_clock(
        repository,
        AssignmentConfig::default(),
        Arc::new(FixedClock(now())),
    )
}

#[derive(Default, Clone)]
pub(super) struct MemoryRepository {
    records: Arc<Mutex<Vec<AssignmentRecord>>>,
    inserts: Arc<Mutex<usize>>,
}

impl MemoryRepository {
    pub(super) fn seeded(records: Vec<AssignmentRecord>) -> Self {
        Self {
            records: Arc::new(Mutex::new(records)),
            inserts: Arc::default(),
        }
    }

    pub(super) fn records(&self) -> Vec<AssignmentRecord> {
        self.records.lock().expect("repository mutex poisoned").clone()
    }

    pub(super) fn insert_calls(&self) -> usize {
        *self.inserts.lock().expect("counter mutex poisoned")
    }
}

impl AssignmentRepository for MemoryRepository {
    fn find_by_worker_ids(
        &self,
        worker_ids: &[WorkerId],
    ) -> Result<Vec<AssignmentRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard
            .iter()
            .filter(|record| worker_ids.contains(&record.worker_id))
            .cloned()
            .collect())
    }

    fn insert_many(
        &self,
        records: Vec<AssignmentRecord>,
    ) -> Result<Vec<AssignmentRecord>, RepositoryError> {
        *self.inserts.lock().expect("counter mutex poisoned") += 1;
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        guard.extend(records.iter().cloned());
        Ok(records)
    }
}

/// Returns every record it holds, ignoring the worker filter.
pub(super) struct UnfilteredRepository(pub(super) Vec<AssignmentRecord>);

impl AssignmentRepository for UnfilteredRepository {
    fn find_by_worker_ids(
        &self,
        _worker_ids: &[WorkerId],
    ) -> Result<Vec<AssignmentRecord>, RepositoryError> {
        Ok(self.0.clone())
    }

    fn insert_many(
        &self,
        records: Vec<AssignmentRecord>,
    ) -> Result<Vec<AssignmentRecord>, RepositoryError> {
        Ok(records)
    }
}

pub(super) struct UniqueViolationRepository;

impl AssignmentRepository for UniqueViolationRepository {
    fn find_by_worker_ids(
        &self,
        _worker_ids: &[WorkerId],
    ) -> Result<Vec<AssignmentRecord>, RepositoryError> {
        Ok(Vec::new())
    }

    fn insert_many(
        &self,
        records: Vec<AssignmentRecord>,
    ) -> Result<Vec<AssignmentRecord>, RepositoryError> {
        Err(RepositoryError::Conflict {
            conflicts: records
                .iter()
                .map(|record| SlotConflict {
                    worker_id: record.worker_id.clone(),
                    assigned_date: record.assigned_date,
                })
                .collect(),
        })
    }
}

pub(super) struct UnavailableRepository;

impl AssignmentRepository for UnavailableRepository {
    fn find_by_worker_ids(
        &self,
        _worker_ids: &[WorkerId],
    ) -> Result<Vec<AssignmentRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn insert_many(
        &self,
        _records: Vec<AssignmentRecord>,
    ) -> Result<Vec<AssignmentRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 16 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
