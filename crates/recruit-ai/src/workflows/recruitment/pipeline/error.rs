use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::super::stage::PipelineStage;

/// Requested pipeline operation, carried by errors so callers can report the attempted edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "action", content = "target")]
pub enum PipelineAction {
    MoveTo(PipelineStage),
    AcceptOffer,
    ConfirmJoining,
}

impl fmt::Display for PipelineAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineAction::MoveTo(stage) => write!(f, "move to {stage}"),
            PipelineAction::AcceptOffer => f.write_str("accept offer letter"),
            PipelineAction::ConfirmJoining => f.write_str("confirm joining letter"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LetterKind {
    Offer,
    Joining,
}

impl fmt::Display for LetterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LetterKind::Offer => f.write_str("offer letter"),
            LetterKind::Joining => f.write_str("joining letter"),
        }
    }
}

/// Why an interview transition lacked a usable schedule.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScheduleIssue {
    #[error("no interview date supplied")]
    Absent,
    #[error("'{0}' is not an ISO-8601 date or date-time")]
    Unparseable(String),
    #[error("interview date {scheduled} is not after {now}")]
    NotInFuture {
        scheduled: DateTime<Utc>,
        now: DateTime<Utc>,
    },
}

/// Typed failures returned by the pipeline state machine. None are retried internally.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransitionError {
    #[error("cannot move candidate from {from} to {to}")]
    InvalidTransition {
        from: PipelineStage,
        to: PipelineStage,
    },
    #[error("interview requires a future date: {0}")]
    MissingSchedule(ScheduleIssue),
    #[error("candidate is closed at {stage}; cannot {action}")]
    TerminalState {
        stage: PipelineStage,
        action: PipelineAction,
    },
    #[error("no {letter} has been issued")]
    LetterNotIssued { letter: LetterKind },
    #[error("{letter} cannot be confirmed while the candidate is at {stage}")]
    LetterStageMismatch {
        letter: LetterKind,
        stage: PipelineStage,
    },
    #[error("{letter} was already confirmed")]
    LetterAlreadyConfirmed { letter: LetterKind },
}

impl From<ScheduleIssue> for TransitionError {
    fn from(issue: ScheduleIssue) -> Self {
        Self::MissingSchedule(issue)
    }
}

impl TransitionError {
    /// Stable machine-readable tag for API clients.
    pub const fn kind(&self) -> &'static str {
        match self {
            TransitionError::InvalidTransition { .. } => "invalid_transition",
            TransitionError::MissingSchedule(_) => "missing_schedule",
            TransitionError::TerminalState { .. } => "terminal_state",
            TransitionError::LetterNotIssued { .. } => "letter_not_issued",
            TransitionError::LetterStageMismatch { .. } => "letter_stage_mismatch",
            TransitionError::LetterAlreadyConfirmed { .. } => "letter_already_confirmed",
        }
    }
}
