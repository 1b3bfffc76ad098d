use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Named point in the recruitment funnel.
///
/// Serialized with the literal labels already stored by the existing system so records
/// round-trip unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PipelineStage {
    CareerEnquiry,
    ResumeShortlisted,
    InterviewProcess,
    Selected,
    OfferLetterSent,
    JoiningLetterSent,
    AddedAsEmployee,
    Rejected,
}

impl PipelineStage {
    pub const fn ordered() -> [Self; 8] {
        [
            Self::CareerEnquiry,
            Self::ResumeShortlisted,
            Self::InterviewProcess,
            Self::Selected,
            Self::OfferLetterSent,
            Self::JoiningLetterSent,
            Self::AddedAsEmployee,
            Self::Rejected,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::CareerEnquiry => "Career Enquiry",
            Self::ResumeShortlisted => "Resume Shortlisted",
            Self::InterviewProcess => "Interview Process",
            Self::Selected => "Selected",
            Self::OfferLetterSent => "Offer Letter Sent",
            Self::JoiningLetterSent => "Joining Letter Sent",
            Self::AddedAsEmployee => "Added as Employee",
            Self::Rejected => "Rejected",
        }
    }

    /// Stages a record may move to from `self`. Empty for terminal stages.
    pub const fn successors(self) -> &'static [PipelineStage] {
        match self {
            Self::CareerEnquiry => &[Self::ResumeShortlisted, Self::Rejected],
            Self::ResumeShortlisted => &[Self::InterviewProcess, Self::Rejected],
            Self::InterviewProcess => &[Self::Selected, Self::Rejected],
            Self::Selected => &[Self::OfferLetterSent, Self::JoiningLetterSent],
            Self::OfferLetterSent => &[Self::JoiningLetterSent],
            Self::JoiningLetterSent => &[Self::AddedAsEmployee],
            Self::AddedAsEmployee | Self::Rejected => &[],
        }
    }

    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::AddedAsEmployee | Self::Rejected)
    }

    pub fn can_transition_to(self, target: PipelineStage) -> bool {
        self.successors().contains(&target)
    }
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Raised when a stored or submitted stage label matches no known stage.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown pipeline stage '{0}'")]
pub struct StageParseError(pub String);

fn squash(raw: &str) -> String {
    raw.chars()
        .filter(|ch| ch.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

impl FromStr for PipelineStage {
    type Err = StageParseError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let wanted = squash(raw);
        if wanted.is_empty() {
            return Err(StageParseError(raw.to_string()));
        }

        PipelineStage::ordered()
            .into_iter()
            .find(|stage| squash(stage.label()) == wanted)
            .ok_or_else(|| StageParseError(raw.to_string()))
    }
}

impl Serialize for PipelineStage {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

impl<'de> Deserialize<'de> for PipelineStage {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Stage fields as they appear on legacy candidate documents.
///
/// Older screens wrote the stage under `currentStage`, `currentStatus` or `status`; the first
/// one present wins, in that order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct LegacyStageFields {
    #[serde(default, rename = "currentStage")]
    pub current_stage: Option<String>,
    #[serde(default, rename = "currentStatus")]
    pub current_status: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

impl LegacyStageFields {
    /// Resolve the stage, defaulting to `CareerEnquiry` when no field is populated.
    pub fn resolve(&self) -> Result<PipelineStage, StageParseError> {
        let candidate = [&self.current_stage, &self.current_status, &self.status]
            .into_iter()
            .flatten()
            .find(|value| !value.trim().is_empty());

        match candidate {
            Some(value) => value.parse(),
            None => Ok(PipelineStage::CareerEnquiry),
        }
    }
}
