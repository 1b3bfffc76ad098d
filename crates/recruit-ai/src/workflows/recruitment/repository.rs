use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::domain::{CandidateId, CandidateRecord, JoiningLetter, OfferLetter, StageEvent};
use super::scoring::{ScoreBreakdown, ShortlistPolicy};
use super::stage::PipelineStage;

/// Storage abstraction so the service can be exercised in isolation.
///
/// Implementations must serialize writes per candidate: `update` only succeeds when the stored
/// version equals `record.version`, and bumps it.
pub trait CandidateRepository: Send + Sync {
    fn insert(&self, record: CandidateRecord) -> Result<CandidateRecord, RepositoryError>;
    fn update(&self, record: CandidateRecord) -> Result<CandidateRecord, RepositoryError>;
    fn fetch(&self, id: &CandidateId) -> Result<Option<CandidateRecord>, RepositoryError>;
    fn by_stage(
        &self,
        stage: PipelineStage,
        limit: usize,
    ) -> Result<Vec<CandidateRecord>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("record changed concurrently (expected version {expected}, found {found})")]
    StaleVersion { expected: u64, found: u64 },
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Initial secret for a provisioned login. Never a built-in default.
#[derive(Clone, PartialEq, Eq)]
pub enum InitialCredential {
    Configured(String),
    ResetRequired,
}

impl fmt::Debug for InitialCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InitialCredential::Configured(_) => f.write_str("Configured(<redacted>)"),
            InitialCredential::ResetRequired => f.write_str("ResetRequired"),
        }
    }
}

/// Login request raised when a candidate is added as an employee.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmployeeAccountRequest {
    pub candidate_id: CandidateId,
    pub full_name: String,
    pub login: String,
    pub joining_date: Option<NaiveDate>,
    pub credential: InitialCredential,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeAccount {
    pub employee_code: String,
    pub candidate_id: CandidateId,
    pub login: String,
    pub must_reset_password: bool,
}

/// Outbound hook into the employee directory.
pub trait EmployeeProvisioner: Send + Sync {
    fn provision(
        &self,
        request: EmployeeAccountRequest,
    ) -> Result<EmployeeAccount, ProvisioningError>;
}

#[derive(Debug, thiserror::Error)]
pub enum ProvisioningError {
    #[error("login {0} is already taken")]
    DuplicateLogin(String),
    #[error("employee directory unavailable: {0}")]
    Transport(String),
}

/// Build a login such as `asha.verma@staff.local` from a candidate's name.
pub fn login_for(full_name: &str, candidate_id: &CandidateId, domain: &str) -> String {
    let local = full_name
        .split_whitespace()
        .map(|part| {
            part.chars()
                .filter(|ch| ch.is_ascii_alphanumeric())
                .map(|ch| ch.to_ascii_lowercase())
                .collect::<String>()
        })
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(".");

    if local.is_empty() {
        format!("{}@{domain}", candidate_id.0)
    } else {
        format!("{local}@{domain}")
    }
}

/// Candidate representation returned by the API.
#[derive(Debug, Clone, Serialize)]
pub struct CandidateView {
    pub candidate_id: CandidateId,
    pub full_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vacancy: Option<String>,
    pub current_stage: PipelineStage,
    pub closed: bool,
    pub allowed_next_stages: Vec<PipelineStage>,
    pub stage_history: Vec<StageEvent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interview_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offer_letter: Option<OfferLetter>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub joining_letter: Option<JoiningLetter>,
    pub score: u32,
    pub shortlist_eligible: bool,
    pub version: u64,
}

impl CandidateView {
    pub fn new(record: &CandidateRecord, score: u32, policy: &ShortlistPolicy) -> Self {
        Self {
            candidate_id: record.id.clone(),
            full_name: record.full_name.clone(),
            vacancy: record.vacancy.clone(),
            current_stage: record.current_stage,
            closed: record.is_closed(),
            allowed_next_stages: record.current_stage.successors().to_vec(),
            stage_history: record.stage_history.clone(),
            interview_date: record.interview_date,
            offer_letter: record.offer_letter.clone(),
            joining_letter: record.joining_letter.clone(),
            score,
            shortlist_eligible: policy.is_eligible(score),
            version: record.version,
        }
    }
}

/// Score detail with the human shortlisting hint alongside.
#[derive(Debug, Clone, Serialize)]
pub struct ScoreView {
    pub candidate_id: CandidateId,
    #[serde(flatten)]
    pub breakdown: ScoreBreakdown,
    pub shortlist_eligible: bool,
    pub shortlist_hint: String,
}

impl ScoreView {
    pub fn new(
        candidate_id: CandidateId,
        breakdown: ScoreBreakdown,
        policy: &ShortlistPolicy,
    ) -> Self {
        Self {
            shortlist_eligible: policy.is_eligible(breakdown.total),
            shortlist_hint: policy.hint(),
            candidate_id,
            breakdown,
        }
    }
}
