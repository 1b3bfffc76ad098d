use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use recruit_ai::error::AppError;
use recruit_ai::workflows::recruitment::{
    recruitment_router, CandidateIntake, CandidateRepository, CandidateSubmission,
    EmployeeProvisioner, IntakeAdjustment, RecruitmentService, ScoreBreakdown, ScoringEngine,
    ShortlistPolicy,
};
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;

/// Score for a submission that has not been recorded as a candidate.
#[derive(Debug, Serialize)]
pub(crate) struct ScorePreviewResponse {
    #[serde(flatten)]
    pub(crate) breakdown: ScoreBreakdown,
    pub(crate) adjustments: Vec<IntakeAdjustment>,
    pub(crate) shortlist_eligible: bool,
    pub(crate) shortlist_hint: String,
}

pub(crate) fn with_recruitment_routes<R, P>(
    service: Arc<RecruitmentService<R, P>>,
) -> axum::Router
where
    R: CandidateRepository + 'static,
    P: EmployeeProvisioner + 'static,
{
    recruitment_router(service)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
        .route(
            "/api/v1/score/preview",
            axum::routing::post(score_preview_endpoint),
        )
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

pub(crate) async fn score_preview_endpoint(
    Extension(state): Extension<AppState>,
    Json(payload): Json<serde_json::Value>,
) -> Result<Json<ScorePreviewResponse>, AppError> {
    let submission: CandidateSubmission = serde_json::from_value(payload)?;
    Ok(Json(preview_score(&submission, &state.shortlist)))
}

pub(crate) fn preview_score(
    submission: &CandidateSubmission,
    shortlist: &ShortlistPolicy,
) -> ScorePreviewResponse {
    let intake = CandidateIntake::new().profile_from_submission(submission);
    let breakdown = ScoringEngine::new().breakdown(&intake.profile);

    ScorePreviewResponse {
        shortlist_eligible: shortlist.is_eligible(breakdown.total),
        shortlist_hint: shortlist.hint(),
        adjustments: intake.adjustments,
        breakdown,
    }
}
