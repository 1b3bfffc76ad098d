use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::warn;

use super::domain::CandidateId;
use super::intake::CandidateSubmission;
use super::pipeline::TransitionError;
use super::repository::{
    CandidateRepository, CandidateView, EmployeeAccount, EmployeeProvisioner, RepositoryError,
};
use super::service::{RecruitmentService, RecruitmentServiceError, StageChangeRequest};
use super::stage::PipelineStage;

const STAGE_LISTING_LIMIT: usize = 200;

/// Router builder exposing candidate intake, scoring and pipeline endpoints.
pub fn recruitment_router<R, P>(service: Arc<RecruitmentService<R, P>>) -> Router
where
    R: CandidateRepository + 'static,
    P: EmployeeProvisioner + 'static,
{
    Router::new()
        .route("/api/v1/candidates", post(apply_handler::<R, P>))
        .route(
            "/api/v1/candidates/:candidate_id",
            get(candidate_handler::<R, P>),
        )
        .route(
            "/api/v1/candidates/:candidate_id/score",
            get(score_handler::<R, P>),
        )
        .route(
            "/api/v1/candidates/:candidate_id/stage",
            post(stage_handler::<R, P>),
        )
        .route(
            "/api/v1/candidates/:candidate_id/offer/accept",
            post(accept_offer_handler::<R, P>),
        )
        .route(
            "/api/v1/candidates/:candidate_id/joining/confirm",
            post(confirm_joining_handler::<R, P>),
        )
        .route("/api/v1/pipeline/:stage", get(stage_listing_handler::<R, P>))
        .with_state(service)
}

#[derive(Debug, Serialize)]
struct StageChangeView {
    candidate: CandidateView,
    #[serde(skip_serializing_if = "Option::is_none")]
    employee: Option<EmployeeAccount>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct JoiningConfirmation {
    pub joining_date: NaiveDate,
}

pub(crate) fn status_for(error: &RecruitmentServiceError) -> StatusCode {
    match error {
        RecruitmentServiceError::Intake(_) => StatusCode::UNPROCESSABLE_ENTITY,
        RecruitmentServiceError::Transition(TransitionError::MissingSchedule(_)) => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        RecruitmentServiceError::Transition(_) => StatusCode::CONFLICT,
        RecruitmentServiceError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
        RecruitmentServiceError::Repository(
            RepositoryError::Conflict | RepositoryError::StaleVersion { .. },
        ) => StatusCode::CONFLICT,
        RecruitmentServiceError::Repository(RepositoryError::Unavailable(_))
        | RecruitmentServiceError::Provisioning(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn error_response(error: RecruitmentServiceError) -> Response {
    let status = status_for(&error);
    if status.is_server_error() {
        warn!(%error, "recruitment request failed");
    }

    let payload = match &error {
        RecruitmentServiceError::Transition(transition) => json!({
            "error": error.to_string(),
            "kind": transition.kind(),
        }),
        _ => json!({ "error": error.to_string() }),
    };
    (status, axum::Json(payload)).into_response()
}

pub(crate) async fn apply_handler<R, P>(
    State(service): State<Arc<RecruitmentService<R, P>>>,
    axum::Json(submission): axum::Json<CandidateSubmission>,
) -> Response
where
    R: CandidateRepository + 'static,
    P: EmployeeProvisioner + 'static,
{
    match service.apply(submission) {
        Ok(record) => {
            let view = service.view(&record);
            (StatusCode::CREATED, axum::Json(view)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn candidate_handler<R, P>(
    State(service): State<Arc<RecruitmentService<R, P>>>,
    Path(candidate_id): Path<String>,
) -> Response
where
    R: CandidateRepository + 'static,
    P: EmployeeProvisioner + 'static,
{
    match service.get(&CandidateId(candidate_id)) {
        Ok(record) => (StatusCode::OK, axum::Json(service.view(&record))).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn score_handler<R, P>(
    State(service): State<Arc<RecruitmentService<R, P>>>,
    Path(candidate_id): Path<String>,
) -> Response
where
    R: CandidateRepository + 'static,
    P: EmployeeProvisioner + 'static,
{
    match service.score_view(&CandidateId(candidate_id)) {
        Ok(view) => (StatusCode::OK, axum::Json(view)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn stage_handler<R, P>(
    State(service): State<Arc<RecruitmentService<R, P>>>,
    Path(candidate_id): Path<String>,
    axum::Json(request): axum::Json<StageChangeRequest>,
) -> Response
where
    R: CandidateRepository + 'static,
    P: EmployeeProvisioner + 'static,
{
    match service.advance(&CandidateId(candidate_id), request) {
        Ok(outcome) => {
            let view = StageChangeView {
                candidate: service.view(&outcome.record),
                employee: outcome.employee,
            };
            (StatusCode::OK, axum::Json(view)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn accept_offer_handler<R, P>(
    State(service): State<Arc<RecruitmentService<R, P>>>,
    Path(candidate_id): Path<String>,
) -> Response
where
    R: CandidateRepository + 'static,
    P: EmployeeProvisioner + 'static,
{
    match service.accept_offer(&CandidateId(candidate_id)) {
        Ok(record) => (StatusCode::OK, axum::Json(service.view(&record))).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn confirm_joining_handler<R, P>(
    State(service): State<Arc<RecruitmentService<R, P>>>,
    Path(candidate_id): Path<String>,
    axum::Json(confirmation): axum::Json<JoiningConfirmation>,
) -> Response
where
    R: CandidateRepository + 'static,
    P: EmployeeProvisioner + 'static,
{
    match service.confirm_joining(&CandidateId(candidate_id), confirmation.joining_date) {
        Ok(record) => (StatusCode::OK, axum::Json(service.view(&record))).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn stage_listing_handler<R, P>(
    State(service): State<Arc<RecruitmentService<R, P>>>,
    Path(stage): Path<String>,
) -> Response
where
    R: CandidateRepository + 'static,
    P: EmployeeProvisioner + 'static,
{
    let stage = match stage.parse::<PipelineStage>() {
        Ok(stage) => stage,
        Err(error) => {
            let payload = json!({ "error": error.to_string() });
            return (StatusCode::BAD_REQUEST, axum::Json(payload)).into_response();
        }
    };

    match service.list_stage(stage, STAGE_LISTING_LIMIT) {
        Ok(records) => {
            let candidates: Vec<CandidateView> =
                records.iter().map(|record| service.view(record)).collect();
            let payload = json!({
                "stage": stage,
                "count": candidates.len(),
                "candidates": candidates,
            });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(error) => error_response(error),
    }
}
