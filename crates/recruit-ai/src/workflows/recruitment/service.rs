use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::config::RecruitmentConfig;
use crate::telemetry::AUDIT_TARGET;

use super::domain::{CandidateId, CandidateRecord};
use super::intake::{CandidateIntake, CandidateSubmission, IntakeError};
use super::pipeline::{PipelineStateMachine, TransitionError, TransitionPayload};
use super::repository::{
    login_for, CandidateRepository, CandidateView, EmployeeAccount, EmployeeAccountRequest,
    EmployeeProvisioner, InitialCredential, ProvisioningError, RepositoryError, ScoreView,
};
use super::scoring::{ScoreBreakdown, ScoringEngine};
use super::stage::PipelineStage;

/// Service composing intake, scoring, the pipeline state machine and persistence.
pub struct RecruitmentService<R, P> {
    intake: CandidateIntake,
    engine: ScoringEngine,
    pipeline: PipelineStateMachine,
    repository: Arc<R>,
    provisioner: Arc<P>,
    config: RecruitmentConfig,
}

static CANDIDATE_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_candidate_id() -> CandidateId {
    let id = CANDIDATE_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    CandidateId(format!("cand-{id:06}"))
}

/// Body of a stage-change request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageChangeRequest {
    pub target: PipelineStage,
    #[serde(default, alias = "interviewDate")]
    pub interview_date: Option<String>,
    #[serde(default, alias = "expectedVersion")]
    pub expected_version: Option<u64>,
}

impl StageChangeRequest {
    pub fn to(target: PipelineStage) -> Self {
        Self {
            target,
            interview_date: None,
            expected_version: None,
        }
    }

    pub fn with_interview_date(mut self, raw: impl Into<String>) -> Self {
        self.interview_date = Some(raw.into());
        self
    }

    pub fn expecting_version(mut self, version: u64) -> Self {
        self.expected_version = Some(version);
        self
    }

    fn payload(&self) -> TransitionPayload {
        TransitionPayload {
            interview_date: self.interview_date.clone(),
        }
    }
}

/// Result of a successful stage change.
#[derive(Debug, Clone)]
pub struct StageChangeOutcome {
    pub record: CandidateRecord,
    pub employee: Option<EmployeeAccount>,
}

impl<R, P> RecruitmentService<R, P>
where
    R: CandidateRepository + 'static,
    P: EmployeeProvisioner + 'static,
{
    pub fn new(repository: Arc<R>, provisioner: Arc<P>, config: RecruitmentConfig) -> Self {
        Self::with_pipeline(PipelineStateMachine::new(), repository, provisioner, config)
    }

    pub fn with_pipeline(
        pipeline: PipelineStateMachine,
        repository: Arc<R>,
        provisioner: Arc<P>,
        config: RecruitmentConfig,
    ) -> Self {
        Self {
            intake: CandidateIntake::new(),
            engine: ScoringEngine::new(),
            pipeline,
            repository,
            provisioner,
            config,
        }
    }

    pub fn config(&self) -> &RecruitmentConfig {
        &self.config
    }

    /// Open a candidate record at `CareerEnquiry` from an enquiry submission.
    pub fn apply(
        &self,
        submission: CandidateSubmission,
    ) -> Result<CandidateRecord, RecruitmentServiceError> {
        let outcome = self.intake.admit(submission)?;
        let id = next_candidate_id();

        for adjustment in &outcome.adjustments {
            warn!(candidate = %id.0, ?adjustment, "candidate submission adjusted at intake");
        }

        let record = CandidateRecord::enquiry(
            id,
            outcome.full_name,
            outcome.vacancy,
            outcome.profile,
            self.pipeline.now(),
        );

        let stored = self.repository.insert(record)?;
        info!(candidate = %stored.id.0, "career enquiry recorded");
        Ok(stored)
    }

    pub fn get(&self, id: &CandidateId) -> Result<CandidateRecord, RecruitmentServiceError> {
        let record = self
            .repository
            .fetch(id)?
            .ok_or(RepositoryError::NotFound)?;
        Ok(record)
    }

    pub fn view(&self, record: &CandidateRecord) -> CandidateView {
        let score = self.engine.score(&record.profile);
        CandidateView::new(record, score, &self.config.shortlist)
    }

    pub fn score(&self, id: &CandidateId) -> Result<ScoreBreakdown, RecruitmentServiceError> {
        let record = self.get(id)?;
        Ok(self.engine.breakdown(&record.profile))
    }

    pub fn score_view(&self, id: &CandidateId) -> Result<ScoreView, RecruitmentServiceError> {
        let breakdown = self.score(id)?;
        Ok(ScoreView::new(id.clone(), breakdown, &self.config.shortlist))
    }

    /// Move a candidate to `request.target`, provisioning an employee login on the final step.
    pub fn advance(
        &self,
        id: &CandidateId,
        request: StageChangeRequest,
    ) -> Result<StageChangeOutcome, RecruitmentServiceError> {
        let record = self.get(id)?;
        if let Some(expected) = request.expected_version {
            if expected != record.version {
                return Err(RepositoryError::StaleVersion {
                    expected,
                    found: record.version,
                }
                .into());
            }
        }

        let from = record.current_stage;
        let updated = self
            .pipeline
            .transition(record, request.target, &request.payload())?;

        let employee = if updated.current_stage == PipelineStage::AddedAsEmployee {
            let account = self.provisioner.provision(self.account_request(&updated))?;
            info!(
                target: AUDIT_TARGET,
                candidate = %updated.id.0,
                employee_code = %account.employee_code,
                must_reset_password = account.must_reset_password,
                "employee login provisioned"
            );
            Some(account)
        } else {
            None
        };

        let stored = self.repository.update(updated)?;
        info!(
            target: AUDIT_TARGET,
            candidate = %stored.id.0,
            from = %from,
            to = %stored.current_stage,
            "candidate stage changed"
        );

        Ok(StageChangeOutcome {
            record: stored,
            employee,
        })
    }

    pub fn accept_offer(
        &self,
        id: &CandidateId,
    ) -> Result<CandidateRecord, RecruitmentServiceError> {
        let record = self.get(id)?;
        let updated = self.pipeline.accept_offer(record)?;
        let stored = self.repository.update(updated)?;
        info!(target: AUDIT_TARGET, candidate = %stored.id.0, "offer letter accepted");
        Ok(stored)
    }

    pub fn confirm_joining(
        &self,
        id: &CandidateId,
        joining_date: NaiveDate,
    ) -> Result<CandidateRecord, RecruitmentServiceError> {
        let record = self.get(id)?;
        let updated = self.pipeline.confirm_joining(record, joining_date)?;
        let stored = self.repository.update(updated)?;
        info!(
            target: AUDIT_TARGET,
            candidate = %stored.id.0,
            %joining_date,
            "joining letter received"
        );
        Ok(stored)
    }

    /// Candidates currently sitting in `stage`.
    pub fn list_stage(
        &self,
        stage: PipelineStage,
        limit: usize,
    ) -> Result<Vec<CandidateRecord>, RecruitmentServiceError> {
        Ok(self.repository.by_stage(stage, limit)?)
    }

    fn account_request(&self, record: &CandidateRecord) -> EmployeeAccountRequest {
        let onboarding = &self.config.onboarding;
        let credential = match &onboarding.initial_password {
            Some(secret) => InitialCredential::Configured(secret.clone()),
            None => InitialCredential::ResetRequired,
        };

        EmployeeAccountRequest {
            candidate_id: record.id.clone(),
            full_name: record.full_name.clone(),
            login: login_for(&record.full_name, &record.id, &onboarding.login_domain),
            joining_date: record
                .joining_letter
                .as_ref()
                .and_then(|letter| letter.joining_date),
            credential,
        }
    }
}

/// Error raised by the recruitment service.
#[derive(Debug, thiserror::Error)]
pub enum RecruitmentServiceError {
    #[error(transparent)]
    Intake(#[from] IntakeError),
    #[error(transparent)]
    Transition(#[from] TransitionError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Provisioning(#[from] ProvisioningError),
}
