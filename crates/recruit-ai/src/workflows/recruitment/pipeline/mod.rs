//! Recruitment funnel state machine.
//!
//! `PipelineStateMachine` is the only writer of a record's stage fields. It validates the
//! requested edge against [`PipelineStage::successors`], records stage metadata and appends to
//! the stage history. It performs no I/O; persisting the returned record is the caller's job.

mod error;
mod schedule;

pub use error::{LetterKind, PipelineAction, ScheduleIssue, TransitionError};
pub use schedule::parse_interview_date;

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::domain::{CandidateRecord, JoiningLetter, OfferLetter, StageEvent};
use super::stage::PipelineStage;

/// Source of "now" for stage timestamps and interview-date checks.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock pinned to a single instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Optional data accompanying a stage change.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionPayload {
    #[serde(default, alias = "interviewDate")]
    pub interview_date: Option<String>,
}

impl TransitionPayload {
    pub fn with_interview_date(raw: impl Into<String>) -> Self {
        Self {
            interview_date: Some(raw.into()),
        }
    }
}

#[derive(Clone)]
pub struct PipelineStateMachine {
    clock: Arc<dyn Clock>,
}

impl Default for PipelineStateMachine {
    fn default() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }
}

impl std::fmt::Debug for PipelineStateMachine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PipelineStateMachine").finish_non_exhaustive()
    }
}

impl PipelineStateMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self { clock }
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Validate and apply a stage change, returning the updated record.
    pub fn transition(
        &self,
        mut record: CandidateRecord,
        target: PipelineStage,
        payload: &TransitionPayload,
    ) -> Result<CandidateRecord, TransitionError> {
        self.apply_at(&mut record, target, payload, self.clock.now())?;
        Ok(record)
    }

    /// Apply a stage change in place. The record is left untouched when an error is returned.
    pub fn apply_at(
        &self,
        record: &mut CandidateRecord,
        target: PipelineStage,
        payload: &TransitionPayload,
        now: DateTime<Utc>,
    ) -> Result<(), TransitionError> {
        let from = record.current_stage;
        if from.is_terminal() {
            return Err(TransitionError::TerminalState {
                stage: from,
                action: PipelineAction::MoveTo(target),
            });
        }

        if !from.can_transition_to(target) {
            return Err(TransitionError::InvalidTransition { from, to: target });
        }

        match target {
            PipelineStage::InterviewProcess => {
                let scheduled = schedule::require_future(payload.interview_date.as_deref(), now)?;
                record.interview_date = Some(scheduled);
            }
            PipelineStage::OfferLetterSent => {
                record.offer_letter = Some(OfferLetter {
                    sent_at: now,
                    accepted: false,
                    accepted_at: None,
                });
            }
            PipelineStage::JoiningLetterSent => {
                record.joining_letter = Some(JoiningLetter {
                    sent_at: now,
                    received: false,
                    received_at: None,
                    joining_date: None,
                });
            }
            _ => {}
        }

        record.current_stage = target;
        record.stage_history.push(StageEvent {
            stage: target,
            timestamp: now,
        });
        Ok(())
    }

    /// Record the candidate's acceptance of an issued offer letter.
    pub fn accept_offer(
        &self,
        mut record: CandidateRecord,
    ) -> Result<CandidateRecord, TransitionError> {
        let now = self.clock.now();
        ensure_open(&record, PipelineAction::AcceptOffer)?;
        ensure_stage(&record, LetterKind::Offer, PipelineStage::OfferLetterSent)?;

        let letter = record
            .offer_letter
            .as_mut()
            .ok_or(TransitionError::LetterNotIssued {
                letter: LetterKind::Offer,
            })?;
        if letter.accepted {
            return Err(TransitionError::LetterAlreadyConfirmed {
                letter: LetterKind::Offer,
            });
        }

        letter.accepted = true;
        letter.accepted_at = Some(now);
        Ok(record)
    }

    /// Record receipt of the signed joining letter and the agreed joining date.
    pub fn confirm_joining(
        &self,
        mut record: CandidateRecord,
        joining_date: NaiveDate,
    ) -> Result<CandidateRecord, TransitionError> {
        let now = self.clock.now();
        ensure_open(&record, PipelineAction::ConfirmJoining)?;
        ensure_stage(&record, LetterKind::Joining, PipelineStage::JoiningLetterSent)?;

        let letter = record
            .joining_letter
            .as_mut()
            .ok_or(TransitionError::LetterNotIssued {
                letter: LetterKind::Joining,
            })?;
        if letter.received {
            return Err(TransitionError::LetterAlreadyConfirmed {
                letter: LetterKind::Joining,
            });
        }

        letter.received = true;
        letter.received_at = Some(now);
        letter.joining_date = Some(joining_date);
        Ok(record)
    }
}

fn ensure_open(record: &CandidateRecord, action: PipelineAction) -> Result<(), TransitionError> {
    if record.current_stage.is_terminal() {
        return Err(TransitionError::TerminalState {
            stage: record.current_stage,
            action,
        });
    }
    Ok(())
}

fn ensure_stage(
    record: &CandidateRecord,
    letter: LetterKind,
    expected: PipelineStage,
) -> Result<(), TransitionError> {
    if record.current_stage != expected {
        return Err(TransitionError::LetterStageMismatch {
            letter,
            stage: record.current_stage,
        });
    }
    Ok(())
}
