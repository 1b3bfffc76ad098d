use serde::{Deserialize, Serialize};

use super::domain::{CandidateProfile, ExperienceScores, OperationsScores, SubScore};

/// Candidate data as posted by the enquiry and candidate-update screens.
///
/// Category fields arrive as free-form labels ("26-30yr", "H.B Road", "10K-12K"), flags may be
/// booleans, 0/1 or "Yes"/"No", and ratings may be numbers or numeric strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateSubmission {
    #[serde(default, alias = "fullName", alias = "name")]
    pub full_name: String,
    #[serde(default, alias = "vacancyId")]
    pub vacancy: Option<String>,
    #[serde(default)]
    pub education: Option<String>,
    #[serde(default, alias = "ageGroup")]
    pub age_group: Option<String>,
    #[serde(default, alias = "hasVehicle", deserialize_with = "deserialize_flag")]
    pub has_vehicle: bool,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default, alias = "nativePlace")]
    pub native_place: Option<String>,
    #[serde(default, alias = "spokenEnglish", deserialize_with = "deserialize_flag")]
    pub spoken_english: bool,
    #[serde(default, alias = "salaryExpectation")]
    pub salary_expectation: Option<String>,
    #[serde(default)]
    pub experience: RawExperience,
    #[serde(default)]
    pub operations: RawOperations,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawExperience {
    #[serde(default)]
    pub administrative: Option<RawRating>,
    #[serde(default, alias = "insuranceSales")]
    pub insurance_sales: Option<RawRating>,
    #[serde(default, alias = "anySales")]
    pub any_sales: Option<RawRating>,
    #[serde(default, alias = "fieldWork")]
    pub field_work: Option<RawRating>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawOperations {
    #[serde(default, alias = "dataManagement")]
    pub data_management: Option<RawRating>,
    #[serde(default, alias = "backOffice")]
    pub back_office: Option<RawRating>,
    #[serde(default)]
    pub mis: Option<RawRating>,
}

/// A rating exactly as submitted, before it is parsed and clamped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawRating {
    Number(i64),
    Text(String),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum LooseFlag {
    Bool(bool),
    Number(i64),
    Text(String),
}

fn deserialize_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let flag = Option::<LooseFlag>::deserialize(deserializer)?;
    match flag {
        Some(LooseFlag::Bool(value)) => Ok(value),
        Some(LooseFlag::Number(0)) => Ok(false),
        Some(LooseFlag::Number(1)) => Ok(true),
        Some(LooseFlag::Number(other)) => Err(serde::de::Error::custom(format!(
            "flag must be 0 or 1, got {other}"
        ))),
        Some(LooseFlag::Text(text)) => Ok(matches!(
            text.trim().to_ascii_lowercase().as_str(),
            "yes" | "y" | "true" | "1"
        )),
        None => Ok(false),
    }
}

/// Correction made while coercing a submission into a typed profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum IntakeAdjustment {
    ClampedSubScore {
        field: &'static str,
        submitted: i64,
        applied: u8,
    },
    UnrecognizedLabel {
        field: &'static str,
        submitted: String,
    },
    UnparseableRating {
        field: &'static str,
        submitted: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IntakeError {
    #[error("candidate name is required")]
    MissingName,
}

/// Typed profile plus the corrections applied on the way in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileIntake {
    pub profile: CandidateProfile,
    pub adjustments: Vec<IntakeAdjustment>,
}

/// Everything needed to open a new candidate record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntakeOutcome {
    pub full_name: String,
    pub vacancy: Option<String>,
    pub profile: CandidateProfile,
    pub adjustments: Vec<IntakeAdjustment>,
}

/// Boundary adapter normalizing loose submissions exactly once.
#[derive(Debug, Clone, Copy, Default)]
pub struct CandidateIntake;

impl CandidateIntake {
    pub fn new() -> Self {
        Self
    }

    /// Validate identity fields and build the typed profile for a new enquiry.
    pub fn admit(&self, submission: CandidateSubmission) -> Result<IntakeOutcome, IntakeError> {
        let full_name = submission.full_name.trim().to_string();
        if full_name.is_empty() {
            return Err(IntakeError::MissingName);
        }

        let vacancy = submission
            .vacancy
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::to_string);

        let ProfileIntake {
            profile,
            adjustments,
        } = self.profile_from_submission(&submission);

        Ok(IntakeOutcome {
            full_name,
            vacancy,
            profile,
            adjustments,
        })
    }

    /// Coerce the scoring attributes. Never fails: unknown labels fall back to the zero-point
    /// category, unparseable ratings count as 0 and out-of-range ratings are clamped, each noted
    /// as an adjustment.
    pub fn profile_from_submission(&self, submission: &CandidateSubmission) -> ProfileIntake {
        let mut adjustments = Vec::new();

        let education = category(
            "education",
            submission.education.as_deref(),
            labels::education,
            &mut adjustments,
        );
        let age_group = category(
            "age_group",
            submission.age_group.as_deref(),
            labels::age_group,
            &mut adjustments,
        );
        let location = category(
            "location",
            submission.location.as_deref(),
            labels::location,
            &mut adjustments,
        );
        let salary_expectation = category(
            "salary_expectation",
            submission.salary_expectation.as_deref(),
            labels::salary,
            &mut adjustments,
        );

        let raw = &submission.experience;
        let experience = ExperienceScores {
            administrative: rating(
                "experience.administrative",
                raw.administrative.as_ref(),
                &mut adjustments,
            ),
            insurance_sales: rating(
                "experience.insurance_sales",
                raw.insurance_sales.as_ref(),
                &mut adjustments,
            ),
            any_sales: rating(
                "experience.any_sales",
                raw.any_sales.as_ref(),
                &mut adjustments,
            ),
            field_work: rating(
                "experience.field_work",
                raw.field_work.as_ref(),
                &mut adjustments,
            ),
        };

        let raw = &submission.operations;
        let operations = OperationsScores {
            data_management: rating(
                "operations.data_management",
                raw.data_management.as_ref(),
                &mut adjustments,
            ),
            back_office: rating(
                "operations.back_office",
                raw.back_office.as_ref(),
                &mut adjustments,
            ),
            mis: rating("operations.mis", raw.mis.as_ref(), &mut adjustments),
        };

        let profile = CandidateProfile {
            education,
            age_group,
            has_vehicle: submission.has_vehicle,
            location,
            native_place: submission
                .native_place
                .as_deref()
                .map(str::trim)
                .unwrap_or_default()
                .to_string(),
            spoken_english: submission.spoken_english,
            salary_expectation,
            experience,
            operations,
        };

        ProfileIntake {
            profile,
            adjustments,
        }
    }
}

fn category<T: Default>(
    field: &'static str,
    raw: Option<&str>,
    parse: fn(&str) -> Option<T>,
    adjustments: &mut Vec<IntakeAdjustment>,
) -> T {
    let raw = match raw {
        Some(value) if !value.trim().is_empty() => value,
        _ => return T::default(),
    };

    match parse(raw) {
        Some(value) => value,
        None => {
            adjustments.push(IntakeAdjustment::UnrecognizedLabel {
                field,
                submitted: raw.to_string(),
            });
            T::default()
        }
    }
}

fn rating(
    field: &'static str,
    raw: Option<&RawRating>,
    adjustments: &mut Vec<IntakeAdjustment>,
) -> SubScore {
    let submitted = match raw {
        None => return SubScore::default(),
        Some(RawRating::Number(value)) => *value,
        Some(RawRating::Text(text)) => {
            let text = text.trim();
            if text.is_empty() {
                return SubScore::default();
            }
            match text.parse::<i64>() {
                Ok(value) => value,
                Err(_) => {
                    adjustments.push(IntakeAdjustment::UnparseableRating {
                        field,
                        submitted: text.to_string(),
                    });
                    return SubScore::default();
                }
            }
        }
    };

    let score = SubScore::clamped(submitted);
    if i64::from(score.value()) != submitted {
        adjustments.push(IntakeAdjustment::ClampedSubScore {
            field,
            submitted,
            applied: score.value(),
        });
    }
    score
}

/// Label tables for the legacy category spellings.
pub mod labels {
    use super::super::domain::{AgeGroup, Education, Location, SalaryExpectation};

    /// Lowercase and strip everything but letters and digits. A `+` is spelled out as "plus".
    pub fn squash(raw: &str) -> String {
        raw.replace('+', "plus")
            .chars()
            .filter(|ch| ch.is_alphanumeric())
            .flat_map(char::to_lowercase)
            .collect()
    }

    pub fn education(raw: &str) -> Option<Education> {
        match squash(raw).as_str() {
            "none" | "na" | "nil" => Some(Education::None),
            "graduate" | "graduateany" | "anygraduate" | "graduateanystream" => {
                Some(Education::GraduateAny)
            }
            "graduatemathseconomics"
            | "graduatemathsoreconomics"
            | "graduatemathsandeconomics"
            | "graduatemathematicseconomics"
            | "mathseconomicsgraduate" => Some(Education::GraduateMathsEconomics),
            "mbaorpgfinancial" | "mbapgfinancial" | "mbapgfinance" | "mbaorpgfinance"
            | "mbafinance" | "pgfinance" | "mbapg" => Some(Education::MbaOrPgFinancial),
            _ => None,
        }
    }

    pub fn age_group(raw: &str) -> Option<AgeGroup> {
        let squashed = squash(raw);
        let trimmed = squashed
            .trim_end_matches("years")
            .trim_end_matches("yrs")
            .trim_end_matches("yr");
        match trimmed {
            "none" | "na" => Some(AgeGroup::None),
            "2025" | "20to25" => Some(AgeGroup::From20To25),
            "2630" | "26to30" => Some(AgeGroup::From26To30),
            "3145" | "31to45" => Some(AgeGroup::From31To45),
            "above45" | "45above" | "45plus" | "over45" => Some(AgeGroup::Above45),
            _ => None,
        }
    }

    pub fn location(raw: &str) -> Option<Location> {
        match squash(raw).as_str() {
            "hbroad" => Some(Location::HbRoad),
            "areracolony" | "arera" => Some(Location::AreraColony),
            "bhel" => Some(Location::Bhel),
            "mandideep" => Some(Location::Mandideep),
            "others" | "other" => Some(Location::Others),
            "unspecified" | "none" => Some(Location::Unspecified),
            _ => None,
        }
    }

    pub fn salary(raw: &str) -> Option<SalaryExpectation> {
        match squash(raw).as_str() {
            "10k12k" | "10to12k" | "1012k" => Some(SalaryExpectation::From10To12K),
            "12k15k" | "12to15k" | "1215k" => Some(SalaryExpectation::From12To15K),
            "15k18k" | "15to18k" | "1518k" => Some(SalaryExpectation::From15To18K),
            "18k20k" | "18to20k" | "1820k" => Some(SalaryExpectation::From18To20K),
            "20k25k" | "20to25k" | "2025k" => Some(SalaryExpectation::From20To25K),
            "above25k" | "25kabove" | "25kplus" | "over25k" => Some(SalaryExpectation::Above25K),
            "unspecified" | "none" => Some(SalaryExpectation::Unspecified),
            _ => None,
        }
    }
}
