use crate::assignments::AssignmentServiceError;
use crate::config::ConfigError;
use crate::telemetry::TelemetryError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Io(std::io::Error),
    Server(axum::Error),
    Assignment(AssignmentServiceError),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::Server(err) => write!(f, "server error: {}", err),
            AppError::Assignment(err) => write!(f, "assignment error: {}", err),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Server(err) => Some(err),
            AppError::Assignment(err) => Some(err),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Assignment(err) => err.status_code(),
            AppError::Config(_)
            | AppError::Telemetry(_)
            | AppError::Io(_)
            | AppError::Server(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<axum::Error> for AppError {
    fn from(value: axum::Error) -> Self {
        Self::Server(value)
    }
}

impl From<AssignmentServiceError> for AppError {
    fn from(value: AssignmentServiceError) -> Self {
        Self::Assignment(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assignments::{RepositoryError, SlotConflict, WorkerId};

    #[test]
    fn invalid_requests_map_to_unprocessable_entity() {
        let error = AppError::from(AssignmentServiceError::InvalidRequest(
            "at least one worker id is required".to_string(),
        ));
        assert!(error.to_string().contains("at least one worker id"));
        assert_eq!(
            error.into_response().status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
    }

    #[test]
    fn assignment_errors_match_router_statuses() {
        let errors = [
            AssignmentServiceError::InvalidRequest("blank worker id".to_string()),
            AssignmentServiceError::Repository(RepositoryError::Conflict {
                conflicts: vec![SlotConflict {
                    worker_id: WorkerId::new("w-1"),
                    assigned_date: chrono::NaiveDate::from_ymd_opt(2025, 6, 16)
                        .expect("valid date"),
                }],
            }),
            AssignmentServiceError::Repository(RepositoryError::Unavailable(
                "store offline".to_string(),
            )),
        ];

        for error in errors {
            let expected = error.status_code();
            assert_eq!(AppError::from(error).into_response().status(), expected);
        }
    }

    #[test]
    fn config_errors_map_to_internal_error() {
        let error = AppError::from(ConfigError::InvalidPort);
        assert_eq!(
            error.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
