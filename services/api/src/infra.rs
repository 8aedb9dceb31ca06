use chrono::{DateTime, NaiveDate, Utc};
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashSet;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};
use work_readiness::assignments::{
    AssignmentRecord, AssignmentRepository, AssignmentStatus, RepositoryError, SlotConflict,
    WorkerId,
};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Process-local store enforcing one live assignment per worker and date.
#[derive(Default, Clone)]
pub(crate) struct InMemoryAssignmentRepository {
    records: Arc<Mutex<Vec<AssignmentRecord>>>,
}

impl InMemoryAssignmentRepository {
    pub(crate) fn seed(&self, records: impl IntoIterator<Item = AssignmentRecord>) {
        self.records
            .lock()
            .expect("repository mutex poisoned")
            .extend(records);
    }
}

impl AssignmentRepository for InMemoryAssignmentRepository {
    fn find_by_worker_ids(
        &self,
        worker_ids: &[WorkerId],
    ) -> Result<Vec<AssignmentRecord>, RepositoryError> {
        let wanted: HashSet<&WorkerId> = worker_ids.iter().collect();
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard
            .iter()
            .filter(|record| wanted.contains(&record.worker_id))
            .cloned()
            .collect())
    }

    fn insert_many(
        &self,
        records: Vec<AssignmentRecord>,
    ) -> Result<Vec<AssignmentRecord>, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");

        let mut live: HashSet<(WorkerId, NaiveDate)> = guard
            .iter()
            .filter(|record| record.status != AssignmentStatus::Cancelled)
            .map(|record| (record.worker_id.clone(), record.assigned_date))
            .collect();
        let conflicts: Vec<SlotConflict> = records
            .iter()
            .filter(|record| !live.insert((record.worker_id.clone(), record.assigned_date)))
            .map(|record| SlotConflict {
                worker_id: record.worker_id.clone(),
                assigned_date: record.assigned_date,
            })
            .collect();
        if !conflicts.is_empty() {
            return Err(RepositoryError::Conflict { conflicts });
        }

        guard.extend(records.iter().cloned());
        Ok(records)
    }
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

pub(crate) fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, String> {
    DateTime::parse_from_rfc3339(raw.trim())
        .map(|timestamp| timestamp.with_timezone(&Utc))
        .map_err(|err| format!("failed to parse '{raw}' as an RFC 3339 timestamp ({err})"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use work_readiness::assignments::AssignmentId;

    fn record(id: &str, worker: &str, day: u32, status: AssignmentStatus) -> AssignmentRecord {
        let due_time = Utc
            .with_ymd_and_hms(2025, 7, day, 23, 0, 0)
            .single()
            .expect("valid timestamp");
        AssignmentRecord {
            id: AssignmentId(id.to_string()),
            worker_id: WorkerId::new(worker),
            team: None,
            assigned_by: None,
            assigned_date: due_time.date_naive(),
            due_time,
            status,
            created_at: due_time,
            completed_at: None,
            notes: None,
        }
    }

    #[test]
    fn insert_many_rejects_duplicate_worker_dates() {
        let repository = InMemoryAssignmentRepository::default();
        repository.seed([record("a-1", "w-1", 3, AssignmentStatus::Pending)]);

        let result = repository.insert_many(vec![
            record("a-2", "w-2", 3, AssignmentStatus::Pending),
            record("a-3", "w-1", 3, AssignmentStatus::Pending),
        ]);

        match result {
            Err(RepositoryError::Conflict { conflicts }) => {
                assert_eq!(conflicts.len(), 1);
                assert_eq!(conflicts[0].worker_id, WorkerId::new("w-1"));
            }
            other => panic!("expected conflict, got {other:?}"),
        }
        assert_eq!(
            repository
                .find_by_worker_ids(&[WorkerId::new("w-2")])
                .expect("query succeeds")
                .len(),
            0
        );
    }

    #[test]
    fn insert_many_reports_every_clashing_worker() {
        let repository = InMemoryAssignmentRepository::default();
        repository.seed([
            record("a-1", "w-1", 3, AssignmentStatus::Pending),
            record("a-2", "w-3", 3, AssignmentStatus::Overdue),
        ]);

        let result = repository.insert_many(vec![
            record("a-3", "w-1", 3, AssignmentStatus::Pending),
            record("a-4", "w-2", 3, AssignmentStatus::Pending),
            record("a-5", "w-3", 3, AssignmentStatus::Pending),
        ]);

        match result {
            Err(RepositoryError::Conflict { conflicts }) => {
                let workers: Vec<&str> = conflicts
                    .iter()
                    .map(|conflict| conflict.worker_id.0.as_str())
                    .collect();
                assert_eq!(workers, vec!["w-1", "w-3"]);
            }
            other => panic!("expected conflict, got {other:?}"),
        }
    }

    #[test]
    fn cancelled_assignments_free_the_slot() {
        let repository = InMemoryAssignmentRepository::default();
        repository.seed([record("a-1", "w-1", 3, AssignmentStatus::Cancelled)]);

        let stored = repository
            .insert_many(vec![record("a-2", "w-1", 3, AssignmentStatus::Pending)])
            .expect("insert succeeds");

        assert_eq!(stored.len(), 1);
        assert_eq!(
            repository
                .find_by_worker_ids(&[WorkerId::new("w-1")])
                .expect("query succeeds")
                .len(),
            2
        );
    }

    #[test]
    fn parses_dates_and_timestamps() {
        assert_eq!(
            parse_date(" 2025-07-03 "),
            Ok(NaiveDate::from_ymd_opt(2025, 7, 3).expect("valid"))
        );
        assert!(parse_date("07/03/2025").is_err());
        assert_eq!(
            parse_timestamp("2025-07-03T08:00:00-05:00"),
            Ok(Utc
                .with_ymd_and_hms(2025, 7, 3, 13, 0, 0)
                .single()
                .expect("valid"))
        );
    }
}
