use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::rating::{
    clamp_score, KpiResult, COLOR_AMBER, COLOR_BLUE, COLOR_DEEP_RED, COLOR_GRAY, COLOR_GREEN,
    COLOR_RED,
};

const COMPLETION_WEIGHT: f64 = 0.7;
const ON_TIME_WEIGHT: f64 = 0.3;

const PENDING_BONUS_PER_ASSIGNMENT: f64 = 1.0;
const MAX_PENDING_BONUS: f64 = 5.0;

const FLAT_PENALTY_PER_OVERDUE: f64 = 2.0;
const MAX_OVERDUE_PENALTY: f64 = 10.0;

const SHIFT_HOURS: i64 = 8;
const DECAY_BASE_PENALTY: f64 = 1.0;
const DECAY_PENALTY_PER_SHIFT: f64 = 0.25;
const MAX_DECAY_PENALTY_PER_ASSIGNMENT: f64 = 4.0;

const MAX_RECOVERY_BONUS: f64 = 5.0;

/// `(window, bonus)` pairs for late completions, tightest window first.
fn recovery_windows() -> [(Duration, f64); 2] {
    [(Duration::hours(24), 2.0), (Duration::hours(48), 1.0)]
}

/// Letter-grade bands as `(minimum score, rating, grade, color)`.
static GRADE_BANDS: [(f64, &str, &str, &str); 4] = [
    (90.0, "Excellent", "A", COLOR_GREEN),
    (80.0, "Good", "B", COLOR_BLUE),
    (70.0, "Average", "C", COLOR_AMBER),
    (50.0, "Below Average", "D", COLOR_RED),
];

/// Overdue (or late-completed) assignment with the timestamps the decay path needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverdueAssignment {
    pub due_time: DateTime<Utc>,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
}

impl OverdueAssignment {
    fn completed_late(&self) -> Option<Duration> {
        self.completed_at
            .map(|completed| completed - self.due_time)
            .filter(|lateness| *lateness > Duration::zero())
    }
}

/// Per-worker assignment counts feeding [`calculate_assignment_kpi`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AssignmentKpiInput {
    pub completed: u32,
    pub total: u32,
    pub on_time_completed: u32,
    /// Percentage of completions submitted before their due time.
    pub on_time_rate: f64,
    pub pending_count: u32,
    pub overdue_count: u32,
    #[serde(default)]
    pub overdue_assignments: Option<Vec<OverdueAssignment>>,
}

/// Individually inspectable score contributions.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentKpiBreakdown {
    pub completion_rate: f64,
    pub on_time_rate: f64,
    pub on_time_completed: u32,
    pub base_score: f64,
    pub pending_bonus: f64,
    pub overdue_penalty: f64,
    pub recovery_bonus: f64,
    pub recovered_assignments: u32,
    pub shift_based_decay_applied: bool,
}

/// Score a worker's assignment history.
///
/// The overdue penalty scales with `overdue_count`. Dated entries that are still open switch
/// it to shift-based decay measured up to `now`. Dated late completions only earn recovery.
pub fn calculate_assignment_kpi(input: &AssignmentKpiInput, now: DateTime<Utc>) -> KpiResult {
    if input.total == 0 {
        return KpiResult {
            rating: "No Assignments",
            score: 0.0,
            color: COLOR_GRAY,
            letter_grade: Some("N/A"),
            breakdown: None,
        };
    }

    let completion_rate = clamp_score(f64::from(input.completed) / f64::from(input.total) * 100.0);
    let on_time_rate = clamp_score(input.on_time_rate);
    let base_score = completion_rate * COMPLETION_WEIGHT + on_time_rate * ON_TIME_WEIGHT;

    let pending_bonus = if input.pending_count > 0 && input.overdue_count == 0 {
        (f64::from(input.pending_count) * PENDING_BONUS_PER_ASSIGNMENT).min(MAX_PENDING_BONUS)
    } else {
        0.0
    };

    let dated: Vec<&OverdueAssignment> = input.overdue_assignments.iter().flatten().collect();

    // Only open overdue work is penalized. Late completions feed the recovery bonus.
    let still_open: Vec<&OverdueAssignment> = dated
        .iter()
        .copied()
        .filter(|assignment| assignment.completed_at.is_none())
        .take(input.overdue_count as usize)
        .collect();

    let shift_based_decay_applied = !still_open.is_empty();
    let raw_penalty = if shift_based_decay_applied {
        let undated = input.overdue_count as usize - still_open.len();
        shift_decay_penalty(&still_open, now) + undated as f64 * FLAT_PENALTY_PER_OVERDUE
    } else {
        f64::from(input.overdue_count) * FLAT_PENALTY_PER_OVERDUE
    };
    let overdue_penalty = raw_penalty.min(MAX_OVERDUE_PENALTY);

    let (recovery_bonus, recovered_assignments) = recovery_bonus(&dated);

    let score = round2(clamp_score(
        base_score + pending_bonus - overdue_penalty + recovery_bonus,
    ));

    let (rating, grade, color) = GRADE_BANDS
        .iter()
        .find(|(minimum, ..)| score >= *minimum)
        .map(|(_, rating, grade, color)| (*rating, *grade, *color))
        .unwrap_or(("Needs Improvement", "F", COLOR_DEEP_RED));

    KpiResult {
        rating,
        score,
        color,
        letter_grade: Some(grade),
        breakdown: Some(AssignmentKpiBreakdown {
            completion_rate: round2(completion_rate),
            on_time_rate: round2(on_time_rate),
            on_time_completed: input.on_time_completed,
            base_score: round2(base_score),
            pending_bonus: round2(pending_bonus),
            overdue_penalty: round2(overdue_penalty),
            recovery_bonus: round2(recovery_bonus),
            recovered_assignments,
            shift_based_decay_applied,
        }),
    }
}

/// Each open overdue assignment costs a base penalty plus a share for every full shift since due.
fn shift_decay_penalty(open: &[&OverdueAssignment], now: DateTime<Utc>) -> f64 {
    open.iter()
        .map(|assignment| {
            let shifts = ((now - assignment.due_time).num_hours() / SHIFT_HOURS).max(0);
            (DECAY_BASE_PENALTY + shifts as f64 * DECAY_PENALTY_PER_SHIFT)
                .min(MAX_DECAY_PENALTY_PER_ASSIGNMENT)
        })
        .sum()
}

fn recovery_bonus(dated: &[&OverdueAssignment]) -> (f64, u32) {
    let windows = recovery_windows();
    let mut bonus = 0.0;
    let mut recovered = 0;

    for lateness in dated.iter().filter_map(|assignment| assignment.completed_late()) {
        if let Some((_, award)) = windows.iter().find(|(window, _)| lateness <= *window) {
            bonus += award;
            recovered += 1;
        }
    }

    (bonus.min(MAX_RECOVERY_BONUS), recovered)
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
