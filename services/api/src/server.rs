use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemoryCandidateRepository, InMemoryEmployeeDirectory};
use crate::routes::with_recruitment_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use recruit_ai::config::AppConfig;
use recruit_ai::error::AppError;
use recruit_ai::telemetry;
use recruit_ai::workflows::recruitment::RecruitmentService;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::{info, warn};

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    if config.recruitment.onboarding.initial_password.is_none() {
        warn!("APP_EMPLOYEE_INITIAL_PASSWORD unset; new employee logins will require a reset");
    }

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
        shortlist: config.recruitment.shortlist,
    };

    let repository = Arc::new(InMemoryCandidateRepository::default());
    let directory = Arc::new(InMemoryEmployeeDirectory::default());
    let recruitment_service = Arc::new(RecruitmentService::new(
        repository,
        directory,
        config.recruitment.clone(),
    ));

    let app = with_recruitment_routes(recruitment_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        shortlist_minimum = config.recruitment.shortlist.minimum_score(),
        "recruitment service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
