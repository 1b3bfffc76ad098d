mod policy;
mod rules;

pub use policy::ShortlistPolicy;

use super::domain::CandidateProfile;
use serde::{Deserialize, Serialize};

/// Stateless scorer applying the fixed weight tables to a profile.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScoringEngine;

impl ScoringEngine {
    pub fn new() -> Self {
        Self
    }

    pub fn score(&self, profile: &CandidateProfile) -> u32 {
        rules::score_components(profile)
            .iter()
            .map(|component| component.points)
            .sum()
    }

    pub fn breakdown(&self, profile: &CandidateProfile) -> ScoreBreakdown {
        let components = rules::score_components(profile);
        let total = components.iter().map(|component| component.points).sum();
        ScoreBreakdown { total, components }
    }
}

/// Profile attribute contributing to the fitness score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreFactor {
    Education,
    AgeGroup,
    Vehicle,
    Experience,
    Operations,
    Location,
    NativePlace,
    SpokenEnglish,
    SalaryExpectation,
}

/// Discrete contribution to a score, kept for audits and the candidate detail view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreComponent {
    pub factor: ScoreFactor,
    pub points: u32,
    pub notes: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub total: u32,
    pub components: Vec<ScoreComponent>,
}

impl ScoreBreakdown {
    pub fn points_for(&self, factor: ScoreFactor) -> u32 {
        self.components
            .iter()
            .filter(|component| component.factor == factor)
            .map(|component| component.points)
            .sum()
    }
}
