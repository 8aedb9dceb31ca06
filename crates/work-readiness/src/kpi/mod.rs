//! KPI scoring engine consumed by the admin, team-leader, and worker dashboards.
//!
//! Every calculator is a pure function returning a fresh [`KpiResult`]; callers decide how to
//! render labels and colors.

mod assignment;
mod rating;
pub mod router;
mod streaks;


pub use assignment::{
    calculate_assignment_kpi, AssignmentKpiBreakdown, AssignmentKpiInput, OverdueAssignment,
};
pub use rating::{
    calculate_completion_rate_kpi, calculate_kpi, calculate_weekly_team_kpi, KpiResult,
    WeeklyTeamKpi,
};
pub use router::kpi_router;
pub use streaks::{calculate_streaks, AssessmentSubmission, StreakResult};
