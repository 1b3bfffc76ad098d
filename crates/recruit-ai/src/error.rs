use crate::config::ConfigError;
use crate::telemetry::TelemetryError;
use crate::workflows::recruitment::router::status_for;
use crate::workflows::recruitment::RecruitmentServiceError;
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
    Payload(serde_json::Error),
    Workflow(RecruitmentServiceError),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::Payload(err) => write!(f, "payload error: {}", err),
            AppError::Workflow(err) => write!(f, "workflow error: {}", err),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Payload(err) => Some(err),
            AppError::Workflow(err) => Some(err),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Payload(_) => StatusCode::BAD_REQUEST,
            AppError::Workflow(err) => status_for(err),
            AppError::Config(_) | AppError::Telemetry(_) | AppError::Io(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
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

impl From<serde_json::Error> for AppError {
    fn from(value: serde_json::Error) -> Self {
        Self::Payload(value)
    }
}

impl From<RecruitmentServiceError> for AppError {
    fn from(value: RecruitmentServiceError) -> Self {
        Self::Workflow(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::recruitment::RepositoryError;

    #[test]
    fn workflow_errors_keep_their_http_status() {
        let missing =
            AppError::from(RecruitmentServiceError::Repository(RepositoryError::NotFound));
        assert_eq!(missing.into_response().status(), StatusCode::NOT_FOUND);

        let payload = serde_json::from_str::<serde_json::Value>("{").expect_err("truncated");
        let response = AppError::from(payload).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn listener_failures_surface_as_io_errors() {
        let bind = std::io::Error::new(std::io::ErrorKind::AddrInUse, "port 8080 taken");
        let error = AppError::from(bind);
        assert!(matches!(error, AppError::Io(_)));
        assert_eq!(error.to_string(), "io error: port 8080 taken");
        assert_eq!(
            error.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
