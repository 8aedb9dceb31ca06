use chrono::{DateTime, Utc};

use super::domain::{AssignmentRecord, AssignmentStatus};
use crate::kpi::{AssignmentKpiInput, OverdueAssignment};

impl AssignmentKpiInput {
    /// Summarize one worker's assignment history as of `now`.
    ///
    /// Cancelled assignments are ignored. Pending assignments past their due time count as
    /// overdue. Late completions travel with the overdue entries so the score can apply
    /// shift-based decay and recovery bonuses.
    pub fn from_records(records: &[AssignmentRecord], now: DateTime<Utc>) -> Self {
        let active: Vec<&AssignmentRecord> = records
            .iter()
            .filter(|record| record.status != AssignmentStatus::Cancelled)
            .collect();

        let completed = active
            .iter()
            .filter(|record| record.status == AssignmentStatus::Completed)
            .count() as u32;
        let on_time_completed = active
            .iter()
            .filter(|record| record.completed_on_time())
            .count() as u32;
        let pending_count = active
            .iter()
            .filter(|record| record.is_pending_not_due(now))
            .count() as u32;
        let overdue_count = active
            .iter()
            .filter(|record| record.is_overdue(now))
            .count() as u32;

        let on_time_rate = if completed == 0 {
            0.0
        } else {
            f64::from(on_time_completed) / f64::from(completed) * 100.0
        };

        let dated: Vec<OverdueAssignment> = active
            .iter()
            .filter(|record| {
                record.is_overdue(now)
                    || (record.status == AssignmentStatus::Completed
                        && record
                            .completed_at
                            .map(|completed| completed > record.due_time)
                            .unwrap_or(false))
            })
            .map(|record| OverdueAssignment {
                due_time: record.due_time,
                completed_at: record.completed_at,
            })
            .collect();

        Self {
            completed,
            total: active.len() as u32,
            on_time_completed,
            on_time_rate,
            pending_count,
            overdue_count,
            overdue_assignments: if dated.is_empty() { None } else { Some(dated) },
        }
    }
}
