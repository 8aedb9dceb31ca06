use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde_json::json;

use super::domain::{BatchAssignmentRequest, WorkerId};
use super::repository::{AssignmentRepository, RepositoryError};
use super::service::{AssignmentServiceError, BatchAssignmentOutcome, WorkReadinessService};

/// Router builder exposing batch scheduling and per-worker KPI endpoints.
pub fn assignment_router<R>(service: Arc<WorkReadinessService<R>>) -> Router
where
    R: AssignmentRepository + 'static,
{
    Router::new()
        .route(
            "/api/v1/work-readiness/assignments",
            post(create_assignments_handler::<R>),
        )
        .route(
            "/api/v1/work-readiness/workers/:worker_id/kpi",
            get(worker_kpi_handler::<R>),
        )
        .with_state(service)
}

pub(crate) async fn create_assignments_handler<R>(
    State(service): State<Arc<WorkReadinessService<R>>>,
    axum::Json(request): axum::Json<BatchAssignmentRequest>,
) -> Response
where
    R: AssignmentRepository + 'static,
{
    match service.create_assignments(request) {
        Ok(BatchAssignmentOutcome::Created(assignments)) => {
            let payload = json!({
                "success": true,
                "count": assignments.len(),
                "assignments": assignments,
            });
            (StatusCode::CREATED, axum::Json(payload)).into_response()
        }
        Ok(BatchAssignmentOutcome::Rejected(rejection)) => {
            (StatusCode::CONFLICT, axum::Json(rejection)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn worker_kpi_handler<R>(
    State(service): State<Arc<WorkReadinessService<R>>>,
    Path(worker_id): Path<String>,
) -> Response
where
    R: AssignmentRepository + 'static,
{
    match service.worker_kpi(&WorkerId(worker_id)) {
        Ok(kpi) => (StatusCode::OK, axum::Json(kpi)).into_response(),
        Err(error) => error_response(error),
    }
}

impl AssignmentServiceError {
    /// HTTP status shared by the assignment routes and [`crate::error::AppError`].
    pub fn status_code(&self) -> StatusCode {
        match self {
            AssignmentServiceError::InvalidRequest(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AssignmentServiceError::Repository(RepositoryError::Conflict { .. }) => {
                StatusCode::CONFLICT
            }
            AssignmentServiceError::Repository(RepositoryError::Unavailable(_)) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

fn error_response(error: AssignmentServiceError) -> Response {
    let status = error.status_code();

    let mut payload = json!({
        "success": false,
        "error": error.to_string(),
    });
    if let AssignmentServiceError::Repository(RepositoryError::Conflict { conflicts }) = &error {
        payload["conflicts"] = json!(conflicts);
    }
    (status, axum::Json(payload)).into_response()
}
