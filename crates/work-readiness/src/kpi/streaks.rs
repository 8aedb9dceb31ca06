use std::collections::BTreeSet;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// A worker's daily readiness check-in; only the submission instant matters here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssessmentSubmission {
    pub submitted_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreakResult {
    pub current: u32,
    pub longest: u32,
}

/// Current and longest runs of consecutive UTC calendar days with a submission.
///
/// `current` is the run ending at the most recent submission date, not at today.
pub fn calculate_streaks(assessments: &[AssessmentSubmission]) -> StreakResult {
    let dates: BTreeSet<NaiveDate> = assessments
        .iter()
        .map(|assessment| assessment.submitted_at.date_naive())
        .collect();

    let mut previous: Option<NaiveDate> = None;
    let mut run = 0;
    let mut longest = 0;

    for date in dates {
        run = match previous.and_then(|prior| prior.succ_opt()) {
            Some(next) if next == date => run + 1,
            _ => 1,
        };
        longest = longest.max(run);
        previous = Some(date);
    }

    StreakResult {
        current: run,
        longest,
    }
}
