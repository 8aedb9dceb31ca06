use serde::Serialize;

use super::assignment::AssignmentKpiBreakdown;

pub(crate) const COLOR_GRAY: &str = "#6b7280";
pub(crate) const COLOR_AMBER: &str = "#f59e0b";
pub(crate) const COLOR_BLUE: &str = "#3b82f6";
pub(crate) const COLOR_GREEN: &str = "#10b981";
pub(crate) const COLOR_LIME: &str = "#22c55e";
pub(crate) const COLOR_RED: &str = "#ef4444";
pub(crate) const COLOR_DEEP_RED: &str = "#dc2626";

/// Rating object handed to the UI/report layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KpiResult {
    pub rating: &'static str,
    pub score: f64,
    pub color: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub letter_grade: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub breakdown: Option<AssignmentKpiBreakdown>,
}

impl KpiResult {
    pub(crate) fn new(rating: &'static str, score: f64, color: &'static str) -> Self {
        Self {
            rating,
            score,
            color,
            letter_grade: None,
            breakdown: None,
        }
    }
}

/// Consecutive-day tiers as `(minimum days, rating, score, color)`, highest first.
static CONSECUTIVE_DAY_TIERS: [(i64, &str, f64, &str); 8] = [
    (7, "Perfect", 100.0, COLOR_GREEN),
    (6, "Excellent", 90.0, COLOR_LIME),
    (5, "Strong", 80.0, COLOR_LIME),
    (4, "Consistent", 65.0, COLOR_BLUE),
    (3, "Good Progress", 50.0, COLOR_BLUE),
    (2, "Building Momentum", 35.0, COLOR_AMBER),
    (1, "Getting Started", 20.0, COLOR_AMBER),
    (0, "Not Started", 0.0, COLOR_GRAY),
];

/// Rate bands shared by completion-rate and weekly team KPIs.
static RATE_BANDS: [(f64, &str, &str); 4] = [
    (90.0, "Excellent", COLOR_GREEN),
    (75.0, "Good", COLOR_BLUE),
    (60.0, "Average", COLOR_AMBER),
    (40.0, "Needs Improvement", COLOR_RED),
];

/// Daily-completion KPI for a run of consecutive check-in days.
///
/// Negative counts are treated as zero; the tiers saturate at seven days.
pub fn calculate_kpi(consecutive_days: i64) -> KpiResult {
    let days = consecutive_days.max(0);
    CONSECUTIVE_DAY_TIERS
        .iter()
        .find(|(minimum, ..)| days >= *minimum)
        .map(|(_, rating, score, color)| KpiResult::new(*rating, *score, *color))
        .unwrap_or_else(|| KpiResult::new("Not Started", 0.0, COLOR_GRAY))
}

/// Completion-rate KPI. The score is the rate itself, clamped to `[0, 100]`.
pub fn calculate_completion_rate_kpi(rate: f64) -> KpiResult {
    let score = clamp_score(rate);
    let (rating, color) = RATE_BANDS
        .iter()
        .find(|(minimum, ..)| score >= *minimum)
        .map(|(_, rating, color)| (*rating, *color))
        .unwrap_or(("Poor", COLOR_DEEP_RED));
    KpiResult::new(rating, score, color)
}

/// Weekly team submission KPI with the submitted/total pair carried for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyTeamKpi {
    #[serde(flatten)]
    pub kpi: KpiResult,
    pub submitted_count: u32,
    pub total_count: u32,
}

impl WeeklyTeamKpi {
    /// Derive the submission rate from raw counts; an empty team scores zero.
    pub fn from_counts(submitted_count: u32, total_count: u32) -> Self {
        let rate = if total_count == 0 {
            0.0
        } else {
            f64::from(submitted_count) / f64::from(total_count) * 100.0
        };
        calculate_weekly_team_kpi(rate, submitted_count, total_count)
    }
}

pub fn calculate_weekly_team_kpi(
    submission_rate_percent: f64,
    submitted_count: u32,
    total_count: u32,
) -> WeeklyTeamKpi {
    WeeklyTeamKpi {
        kpi: calculate_completion_rate_kpi(submission_rate_percent),
        submitted_count,
        total_count,
    }
}

pub(crate) fn clamp_score(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 100.0)
    }
}
