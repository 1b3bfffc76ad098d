use chrono::NaiveDate;
use metrics_exporter_prometheus::PrometheusHandle;
use recruit_ai::workflows::recruitment::{
    CandidateId, CandidateRecord, CandidateRepository, EmployeeAccount, EmployeeAccountRequest,
    EmployeeProvisioner, InitialCredential, PipelineStage, ProvisioningError, RepositoryError,
    ShortlistPolicy,
};
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
    pub(crate) shortlist: ShortlistPolicy,
}

/// Process-local candidate store with per-record version checks.
#[derive(Default, Clone)]
pub(crate) struct InMemoryCandidateRepository {
    records: Arc<Mutex<HashMap<CandidateId, CandidateRecord>>>,
}

fn poisoned<T>(_: std::sync::PoisonError<T>) -> RepositoryError {
    RepositoryError::Unavailable("candidate store lock poisoned".to_string())
}

impl CandidateRepository for InMemoryCandidateRepository {
    fn insert(&self, record: CandidateRecord) -> Result<CandidateRecord, RepositoryError> {
        let mut guard = self.records.lock().map_err(poisoned)?;
        if guard.contains_key(&record.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(record.id.clone(), record.clone());
        Ok(record)
    }

    fn update(&self, mut record: CandidateRecord) -> Result<CandidateRecord, RepositoryError> {
        let mut guard = self.records.lock().map_err(poisoned)?;
        let found = guard
            .get(&record.id)
            .map(|stored| stored.version)
            .ok_or(RepositoryError::NotFound)?;
        if found != record.version {
            return Err(RepositoryError::StaleVersion {
                expected: record.version,
                found,
            });
        }

        record.version += 1;
        guard.insert(record.id.clone(), record.clone());
        Ok(record)
    }

    fn fetch(&self, id: &CandidateId) -> Result<Option<CandidateRecord>, RepositoryError> {
        let guard = self.records.lock().map_err(poisoned)?;
        Ok(guard.get(id).cloned())
    }

    fn by_stage(
        &self,
        stage: PipelineStage,
        limit: usize,
    ) -> Result<Vec<CandidateRecord>, RepositoryError> {
        let guard = self.records.lock().map_err(poisoned)?;
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

#[derive(Default)]
struct DirectoryState {
    by_candidate: HashMap<CandidateId, EmployeeAccount>,
    by_login: HashMap<String, CandidateId>,
}

/// Employee directory stand-in. Provisioning the same candidate twice returns the first account.
#[derive(Default, Clone)]
pub(crate) struct InMemoryEmployeeDirectory {
    state: Arc<Mutex<DirectoryState>>,
}

impl InMemoryEmployeeDirectory {
    pub(crate) fn accounts(&self) -> Vec<EmployeeAccount> {
        self.state
            .lock()
            .map(|state| {
                let mut accounts: Vec<_> = state.by_candidate.values().cloned().collect();
                accounts.sort_by(|left, right| left.employee_code.cmp(&right.employee_code));
                accounts
            })
            .unwrap_or_default()
    }
}

impl EmployeeProvisioner for InMemoryEmployeeDirectory {
    fn provision(
        &self,
        request: EmployeeAccountRequest,
    ) -> Result<EmployeeAccount, ProvisioningError> {
        let mut state = self
            .state
            .lock()
            .map_err(|_| ProvisioningError::Transport("directory lock poisoned".to_string()))?;

        if let Some(existing) = state.by_candidate.get(&request.candidate_id) {
            return Ok(existing.clone());
        }
        if state.by_login.contains_key(&request.login) {
            return Err(ProvisioningError::DuplicateLogin(request.login));
        }

        let account = EmployeeAccount {
            employee_code: format!("emp-{:06}", state.by_candidate.len() + 1),
            candidate_id: request.candidate_id.clone(),
            login: request.login.clone(),
            must_reset_password: request.credential == InitialCredential::ResetRequired,
        };
        state
            .by_login
            .insert(request.login, request.candidate_id.clone());
        state.by_candidate.insert(request.candidate_id, account.clone());
        Ok(account)
    }
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}
