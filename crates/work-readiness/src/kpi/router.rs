use axum::{routing::post, Json, Router};
use chrono::{DateTime, Utc};
use serde::Deserialize;

use super::assignment::{calculate_assignment_kpi, AssignmentKpiInput};
use super::rating::{
    calculate_completion_rate_kpi, calculate_kpi, calculate_weekly_team_kpi, KpiResult,
    WeeklyTeamKpi,
};
use super::streaks::{calculate_streaks, AssessmentSubmission, StreakResult};

/// Stateless JSON wrappers around the KPI calculators.
pub fn kpi_router() -> Router {
    Router::new()
        .route("/api/v1/kpi/consecutive-days", post(consecutive_days_handler))
        .route("/api/v1/kpi/completion-rate", post(completion_rate_handler))
        .route("/api/v1/kpi/weekly-team", post(weekly_team_handler))
        .route("/api/v1/kpi/assignment", post(assignment_handler))
        .route("/api/v1/kpi/streaks", post(streaks_handler))
}

#[derive(Debug, Deserialize)]
pub(crate) struct ConsecutiveDaysRequest {
    pub(crate) consecutive_days: i64,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CompletionRateRequest {
    pub(crate) rate: f64,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WeeklyTeamRequest {
    pub(crate) submission_rate: f64,
    pub(crate) submitted_count: u32,
    pub(crate) total_count: u32,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AssignmentKpiRequest {
    #[serde(flatten)]
    pub(crate) input: AssignmentKpiInput,
    #[serde(default)]
    pub(crate) evaluated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct StreaksRequest {
    pub(crate) assessments: Vec<AssessmentSubmission>,
}

pub(crate) async fn consecutive_days_handler(
    Json(request): Json<ConsecutiveDaysRequest>,
) -> Json<KpiResult> {
    Json(calculate_kpi(request.consecutive_days))
}

pub(crate) async fn completion_rate_handler(
    Json(request): Json<CompletionRateRequest>,
) -> Json<KpiResult> {
    Json(calculate_completion_rate_kpi(request.rate))
}

pub(crate) async fn weekly_team_handler(
    Json(request): Json<WeeklyTeamRequest>,
) -> Json<WeeklyTeamKpi> {
    Json(calculate_weekly_team_kpi(
        request.submission_rate,
        request.submitted_count,
        request.total_count,
    ))
}

pub(crate) async fn assignment_handler(
    Json(request): Json<AssignmentKpiRequest>,
) -> Json<KpiResult> {
    let now = request.evaluated_at.unwrap_or_else(Utc::now);
    Json(calculate_assignment_kpi(&request.input, now))
}

pub(crate) async fn streaks_handler(Json(request): Json<StreaksRequest>) -> Json<StreakResult> {
    Json(calculate_streaks(&request.assessments))
}
