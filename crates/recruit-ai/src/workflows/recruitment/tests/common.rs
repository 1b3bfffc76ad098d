use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::{DateTime, Utc};
use serde_json::{json, Value};

use crate::config::RecruitmentConfig;
use crate::workflows::recruitment::domain::{
    AgeGroup, CandidateId, CandidateProfile, CandidateRecord, Education, ExperienceScores,
    Location, OperationsScores, SalaryExpectation, SubScore,
};
use crate::workflows::recruitment::intake::CandidateSubmission;
use crate::workflows::recruitment::pipeline::{
    FixedClock, PipelineStateMachine, TransitionPayload,
};
use crate::workflows::recruitment::repository::{
    CandidateRepository, EmployeeAccount, EmployeeAccountRequest, EmployeeProvisioner,
    InitialCredential, ProvisioningError, RepositoryError,
};
use crate::workflows::recruitment::stage::PipelineStage;
use crate::workflows::recruitment::{recruitment_router, RecruitmentService};

pub(super) const INTERVIEW_AT: &str = "2026-10-26T10:00:00Z";

pub(super) fn now() -> DateTime<Utc> {
    DateTime::parse_from_rfc3339("2026-10-19T09:00:00Z")
        .expect("valid timestamp")
        .with_timezone(&Utc)
}

pub(super) fn machine() -> PipelineStateMachine {
    PipelineStateMachine::with_clock(Arc::new(FixedClock(now())))
}

pub(super) fn scenario_profile() -> CandidateProfile {
    CandidateProfile {
        education: Education::GraduateMathsEconomics,
        age_group: AgeGroup::From26To30,
        has_vehicle: true,
        location: Location::HbRoad,
        native_place: "Bhopal".to_string(),
        spoken_english: true,
        salary_expectation: SalaryExpectation::From10To12K,
        experience: ExperienceScores {
            administrative: SubScore::clamped(2),
            insurance_sales: SubScore::clamped(1),
            any_sales: SubScore::clamped(0),
            field_work: SubScore::clamped(3),
        },
        operations: OperationsScores {
            data_management: SubScore::clamped(1),
            back_office: SubScore::clamped(0),
            mis: SubScore::clamped(2),
        },
    }
}

/// The same candidate as `scenario_profile`, in the shape the enquiry screens post.
pub(super) fn scenario_submission_json() -> Value {
    json!({
        "fullName": "Asha Verma",
        "vacancyId": "vac-ops-07",
        "education": "Graduate (Maths/Economics)",
        "ageGroup": "26-30yr",
        "hasVehicle": "Yes",
        "location": "H.B Road",
        "nativePlace": " bhopal ",
        "spokenEnglish": true,
        "salaryExpectation": "10K-12K",
        "experience": {
            "administrative": 2,
            "insuranceSales": "1",
            "anySales": 0,
            "fieldWork": 3
        },
        "operations": {
            "dataManagement": 1,
            "backOffice": null,
            "mis": 2
        }
    })
}

pub(super) fn submission() -> CandidateSubmission {
    serde_json::from_value(scenario_submission_json()).expect("submission parses")
}

pub(super) fn enquiry_record() -> CandidateRecord {
    CandidateRecord::enquiry(
        CandidateId("cand-test".to_string()),
        "Asha Verma",
        Some("vac-ops-07".to_string()),
        scenario_profile(),
        now(),
    )
}

pub(super) fn interview_payload() -> TransitionPayload {
    TransitionPayload::with_interview_date(INTERVIEW_AT)
}

/// Successive targets that lead from `CareerEnquiry` to `stage`.
pub(super) fn path_to(stage: PipelineStage) -> Vec<PipelineStage> {
    use PipelineStage::*;
    let funnel = [
        ResumeShortlisted,
        InterviewProcess,
        Selected,
        OfferLetterSent,
        JoiningLetterSent,
        AddedAsEmployee,
    ];
    match stage {
        CareerEnquiry => Vec::new(),
        Rejected => vec![Rejected],
        other => {
            let end = funnel
                .iter()
                .position(|candidate| *candidate == other)
                .expect("stage is on the funnel");
            funnel[..=end].to_vec()
        }
    }
}

pub(super) fn record_at(stage: PipelineStage) -> CandidateRecord {
    let machine = machine();
    path_to(stage)
        .into_iter()
        .fold(enquiry_record(), |record, target| {
            machine
                .transition(record, target, &interview_payload())
                .expect("funnel step succeeds")
        })
}

pub(super) fn build_service() -> (
    RecruitmentService<MemoryRepository, MemoryProvisioner>,
    Arc<MemoryRepository>,
    Arc<MemoryProvisioner>,
) {
    build_service_with(RecruitmentConfig::default())
}

pub(super) fn build_service_with(
    config: RecruitmentConfig,
) -> (
    RecruitmentService<MemoryRepository, MemoryProvisioner>,
    Arc<MemoryRepository>,
    Arc<MemoryProvisioner>,
) {
    let repository = Arc::new(MemoryRepository::default());
    let provisioner = Arc::new(MemoryProvisioner::default());
    let service = RecruitmentService::with_pipeline(
        machine(),
        repository.clone(),
        provisioner.clone(),
        config,
    );
    (service, repository, provisioner)
}

#[derive(Default, Clone)]
pub(super) struct MemoryRepository {
    pub(super) records: Arc<Mutex<HashMap<CandidateId, CandidateRecord>>>,
}

impl CandidateRepository for MemoryRepository {
    fn insert(&self, record: CandidateRecord) -> Result<CandidateRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&record.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(record.id.clone(), record.clone());
        Ok(record)
    }

    fn update(&self, mut record: CandidateRecord) -> Result<CandidateRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        let stored = guard.get(&record.id).ok_or(RepositoryError::NotFound)?;
        if stored.version != record.version {
            return Err(RepositoryError::StaleVersion {
                expected: record.version,
                found: stored.version,
            });
        }
        record.version += 1;
        guard.insert(record.id.clone(), record.clone());
        Ok(record)
    }

    fn fetch(&self, id: &CandidateId) -> Result<Option<CandidateRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn by_stage(
        &self,
        stage: PipelineStage,
        limit: usize,
    ) -> Result<Vec<CandidateRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        let mut records: Vec<_> = guard
            .values()
            .filter(|record| record.current_stage == stage)
            .cloned()
            .collect();
        records.sort_by(|left, right| left.id.cmp(&right.id));
        records.truncate(limit);
        Ok(records)
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryProvisioner {
    requests: Arc<Mutex<Vec<EmployeeAccountRequest>>>,
}

impl MemoryProvisioner {
    pub(super) fn requests(&self) -> Vec<EmployeeAccountRequest> {
        self.requests
            .lock()
            .expect("provisioner mutex poisoned")
            .clone()
    }
}

impl EmployeeProvisioner for MemoryProvisioner {
    fn provision(
        &self,
        request: EmployeeAccountRequest,
    ) -> Result<EmployeeAccount, ProvisioningError> {
        let mut guard = self.requests.lock().expect("provisioner mutex poisoned");
        guard.push(request.clone());
        Ok(EmployeeAccount {
            employee_code: format!("emp-{:04}", guard.len()),
            candidate_id: request.candidate_id,
            login: request.login,
            must_reset_password: request.credential == InitialCredential::ResetRequired,
        })
    }
}

pub(super) struct UnavailableRepository;

impl CandidateRepository for UnavailableRepository {
    fn insert(&self, _record: CandidateRecord) -> Result<CandidateRecord, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn update(&self, _record: CandidateRecord) -> Result<CandidateRecord, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch(&self, _id: &CandidateId) -> Result<Option<CandidateRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn by_stage(
        &self,
        _stage: PipelineStage,
        _limit: usize,
    ) -> Result<Vec<CandidateRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

pub(super) fn router_with_service(
    service: RecruitmentService<MemoryRepository, MemoryProvisioner>,
) -> axum::Router {
    recruitment_router(Arc::new(service))
}
