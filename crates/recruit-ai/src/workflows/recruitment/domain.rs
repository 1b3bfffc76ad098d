use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::stage::PipelineStage;

/// Identifier wrapper for candidate records.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CandidateId(pub String);

/// Experience or operations rating, always within `0..=5`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "i64", into = "u8")]
pub struct SubScore(u8);

impl SubScore {
    pub const MAX: u8 = 5;

    /// Clamp any integer rating into the accepted range.
    pub fn clamped(raw: i64) -> Self {
        Self(raw.clamp(0, i64::from(Self::MAX)) as u8)
    }

    pub const fn value(self) -> u8 {
        self.0
    }
}

impl From<i64> for SubScore {
    fn from(raw: i64) -> Self {
        Self::clamped(raw)
    }
}

impl From<SubScore> for u8 {
    fn from(score: SubScore) -> Self {
        score.0
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Education {
    #[default]
    None,
    GraduateAny,
    GraduateMathsEconomics,
    MbaOrPgFinancial,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgeGroup {
    #[default]
    None,
    From20To25,
    From26To30,
    From31To45,
    Above45,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Location {
    HbRoad,
    AreraColony,
    Bhel,
    Mandideep,
    Others,
    #[default]
    Unspecified,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SalaryExpectation {
    From10To12K,
    From12To15K,
    From15To18K,
    From18To20K,
    From20To25K,
    Above25K,
    #[default]
    Unspecified,
}

/// Self-reported experience ratings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExperienceScores {
    #[serde(default)]
    pub administrative: SubScore,
    #[serde(default)]
    pub insurance_sales: SubScore,
    #[serde(default)]
    pub any_sales: SubScore,
    #[serde(default)]
    pub field_work: SubScore,
}

impl ExperienceScores {
    pub fn total(&self) -> u32 {
        [
            self.administrative,
            self.insurance_sales,
            self.any_sales,
            self.field_work,
        ]
        .iter()
        .map(|score| u32::from(score.value()))
        .sum()
    }
}

/// Self-reported back-office ratings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationsScores {
    #[serde(default)]
    pub data_management: SubScore,
    #[serde(default)]
    pub back_office: SubScore,
    #[serde(default)]
    pub mis: SubScore,
}

impl OperationsScores {
    pub fn total(&self) -> u32 {
        [self.data_management, self.back_office, self.mis]
            .iter()
            .map(|score| u32::from(score.value()))
            .sum()
    }
}

/// Immutable snapshot of the attributes used for scoring.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateProfile {
    #[serde(default)]
    pub education: Education,
    #[serde(default)]
    pub age_group: AgeGroup,
    #[serde(default)]
    pub has_vehicle: bool,
    #[serde(default)]
    pub location: Location,
    #[serde(default)]
    pub native_place: String,
    #[serde(default)]
    pub spoken_english: bool,
    #[serde(default)]
    pub salary_expectation: SalaryExpectation,
    #[serde(default)]
    pub experience: ExperienceScores,
    #[serde(default)]
    pub operations: OperationsScores,
}

/// One entry in a candidate's append-only stage history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageEvent {
    pub stage: PipelineStage,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OfferLetter {
    pub sent_at: DateTime<Utc>,
    pub accepted: bool,
    pub accepted_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoiningLetter {
    pub sent_at: DateTime<Utc>,
    pub received: bool,
    pub received_at: Option<DateTime<Utc>>,
    pub joining_date: Option<NaiveDate>,
}

/// Persisted candidate entity. Stage fields change only through the pipeline state machine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateRecord {
    pub id: CandidateId,
    pub full_name: String,
    #[serde(default)]
    pub vacancy: Option<String>,
    pub profile: CandidateProfile,
    pub current_stage: PipelineStage,
    pub stage_history: Vec<StageEvent>,
    #[serde(default)]
    pub interview_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub offer_letter: Option<OfferLetter>,
    #[serde(default)]
    pub joining_letter: Option<JoiningLetter>,
    #[serde(default)]
    pub version: u64,
}

impl CandidateRecord {
    /// Start a record at `CareerEnquiry`, as happens when a candidate applies to a vacancy.
    pub fn enquiry(
        id: CandidateId,
        full_name: impl Into<String>,
        vacancy: Option<String>,
        profile: CandidateProfile,
        received_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            full_name: full_name.into(),
            vacancy,
            profile,
            current_stage: PipelineStage::CareerEnquiry,
            stage_history: vec![StageEvent {
                stage: PipelineStage::CareerEnquiry,
                timestamp: received_at,
            }],
            interview_date: None,
            offer_letter: None,
            joining_letter: None,
            version: 0,
        }
    }

    pub fn is_closed(&self) -> bool {
        self.current_stage.is_terminal()
    }

    pub fn last_event(&self) -> Option<&StageEvent> {
        self.stage_history.last()
    }
}
