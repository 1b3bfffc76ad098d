//! Candidate evaluation and recruitment pipeline.
//!
//! `scoring` and `pipeline` are the pure core: the fixed fitness-score tables and the
//! one-directional stage funnel. `intake`, `repository`, `service` and `router` are the thin
//! boundary around them: they normalize loose submissions, persist records with optimistic
//! versioning and expose the HTTP surface.

pub mod domain;
pub mod intake;
pub mod pipeline;
pub mod repository;
pub mod router;
pub mod scoring;
pub mod service;
pub mod stage;

#[cfg(test)]
mod tests;

pub use domain::{
    AgeGroup, CandidateId, CandidateProfile, CandidateRecord, Education, ExperienceScores,
    JoiningLetter, Location, OfferLetter, OperationsScores, SalaryExpectation, StageEvent,
    SubScore,
};
pub use intake::{
    CandidateIntake, CandidateSubmission, IntakeAdjustment, IntakeError, IntakeOutcome,
    ProfileIntake, RawExperience, RawOperations, RawRating,
};
pub use pipeline::{
    Clock, FixedClock, LetterKind, PipelineAction, PipelineStateMachine, ScheduleIssue,
    SystemClock, TransitionError, TransitionPayload,
};
pub use repository::{
    CandidateRepository, CandidateView, EmployeeAccount, EmployeeAccountRequest,
    EmployeeProvisioner, InitialCredential, ProvisioningError, RepositoryError, ScoreView,
};
pub use router::{recruitment_router, JoiningConfirmation};
pub use scoring::{ScoreBreakdown, ScoreComponent, ScoreFactor, ScoringEngine, ShortlistPolicy};
pub use service::{
    RecruitmentService, RecruitmentServiceError, StageChangeOutcome, StageChangeRequest,
};
pub use stage::{LegacyStageFields, PipelineStage, StageParseError};
