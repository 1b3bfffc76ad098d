use chrono::{Duration, NaiveDate};

use super::common::*;
use crate::workflows::recruitment::domain::StageEvent;
use crate::workflows::recruitment::pipeline::{
    LetterKind, PipelineAction, ScheduleIssue, TransitionError, TransitionPayload,
};
use crate::workflows::recruitment::stage::PipelineStage;

#[test]
fn every_edge_outside_the_table_is_rejected() {
    let machine = machine();
    for from in PipelineStage::ordered() {
        if from.is_terminal() {
            continue;
        }
        for to in PipelineStage::ordered() {
            let result = machine.transition(record_at(from), to, &interview_payload());
            if from.successors().contains(&to) {
                let record = result.unwrap_or_else(|error| panic!("{from} -> {to}: {error}"));
                assert_eq!(record.current_stage, to);
            } else {
                assert_eq!(
                    result.expect_err("edge should be rejected"),
                    TransitionError::InvalidTransition { from, to },
                    "{from} -> {to}"
                );
            }
        }
    }
}

#[test]
fn terminal_stages_refuse_every_move() {
    let machine = machine();
    for closed in [PipelineStage::Rejected, PipelineStage::AddedAsEmployee] {
        let record = record_at(closed);
        assert!(record.is_closed());
        for target in PipelineStage::ordered() {
            let error = machine
                .transition(record.clone(), target, &interview_payload())
                .expect_err("closed records cannot move");
            assert_eq!(
                error,
                TransitionError::TerminalState {
                    stage: closed,
                    action: PipelineAction::MoveTo(target),
                }
            );
        }
    }
}

#[test]
fn successful_moves_append_one_history_entry() {
    let machine = machine();
    let mut record = enquiry_record();
    for target in path_to(PipelineStage::AddedAsEmployee) {
        let before = record.stage_history.clone();
        record = machine
            .transition(record, target, &interview_payload())
            .expect("funnel step succeeds");

        assert_eq!(record.stage_history.len(), before.len() + 1);
        assert_eq!(&record.stage_history[..before.len()], before.as_slice());
        assert_eq!(
            record.last_event(),
            Some(&StageEvent {
                stage: target,
                timestamp: now(),
            })
        );
        assert_eq!(record.current_stage, target);
    }
}

#[test]
fn enquiry_cannot_jump_to_interview() {
    let error = machine()
        .transition(
            enquiry_record(),
            PipelineStage::InterviewProcess,
            &interview_payload(),
        )
        .expect_err("shortlisting comes first");
    assert_eq!(
        error,
        TransitionError::InvalidTransition {
            from: PipelineStage::CareerEnquiry,
            to: PipelineStage::InterviewProcess,
        }
    );
}

#[test]
fn interview_requires_a_future_date() {
    let machine = machine();
    let shortlisted = record_at(PipelineStage::ResumeShortlisted);

    let past = (now() - Duration::days(1)).to_rfc3339();
    let error = machine
        .transition(
            shortlisted.clone(),
            PipelineStage::InterviewProcess,
            &TransitionPayload::with_interview_date(past),
        )
        .expect_err("past date rejected");
    assert!(matches!(
        error,
        TransitionError::MissingSchedule(ScheduleIssue::NotInFuture { .. })
    ));

    let exactly_now = machine
        .transition(
            shortlisted.clone(),
            PipelineStage::InterviewProcess,
            &TransitionPayload::with_interview_date(now().to_rfc3339()),
        )
        .expect_err("the current instant is not in the future");
    assert!(matches!(
        exactly_now,
        TransitionError::MissingSchedule(ScheduleIssue::NotInFuture { .. })
    ));

    let absent = machine
        .transition(
            shortlisted.clone(),
            PipelineStage::InterviewProcess,
            &TransitionPayload::default(),
        )
        .expect_err("date required");
    assert_eq!(absent, TransitionError::MissingSchedule(ScheduleIssue::Absent));

    let garbled = machine
        .transition(
            shortlisted,
            PipelineStage::InterviewProcess,
            &TransitionPayload::with_interview_date("next tuesday"),
        )
        .expect_err("date must parse");
    assert_eq!(
        garbled,
        TransitionError::MissingSchedule(ScheduleIssue::Unparseable("next tuesday".to_string()))
    );
}

#[test]
fn failed_moves_leave_the_record_untouched() {
    let machine = machine();
    let mut record = record_at(PipelineStage::ResumeShortlisted);
    let snapshot = record.clone();

    machine
        .apply_at(
            &mut record,
            PipelineStage::InterviewProcess,
            &TransitionPayload::default(),
            now(),
        )
        .expect_err("missing schedule");
    assert_eq!(record, snapshot);

    machine
        .apply_at(&mut record, PipelineStage::AddedAsEmployee, &interview_payload(), now())
        .expect_err("invalid edge");
    assert_eq!(record, snapshot);
}

#[test]
fn interview_date_is_recorded() {
    let record = record_at(PipelineStage::InterviewProcess);
    let expected = chrono::DateTime::parse_from_rfc3339(INTERVIEW_AT)
        .expect("valid date")
        .with_timezone(&chrono::Utc);
    assert_eq!(record.interview_date, Some(expected));
}

#[test]
fn selected_candidates_may_skip_the_offer_letter() {
    let record = machine()
        .transition(
            record_at(PipelineStage::Selected),
            PipelineStage::JoiningLetterSent,
            &TransitionPayload::default(),
        )
        .expect("offer letter is optional");

    assert_eq!(record.current_stage, PipelineStage::JoiningLetterSent);
    assert!(record.offer_letter.is_none());
    let letter = record.joining_letter.expect("joining letter issued");
    assert_eq!(letter.sent_at, now());
    assert!(!letter.received);
}

#[test]
fn rejection_keeps_earlier_history() {
    let interviewing = record_at(PipelineStage::InterviewProcess);
    let rejected = machine()
        .transition(
            interviewing.clone(),
            PipelineStage::Rejected,
            &TransitionPayload::default(),
        )
        .expect("interviewed candidates can be rejected");

    assert!(rejected.is_closed());
    assert_eq!(rejected.interview_date, interviewing.interview_date);
    assert_eq!(
        &rejected.stage_history[..interviewing.stage_history.len()],
        interviewing.stage_history.as_slice()
    );
}

#[test]
fn rejection_closes_only_pre_selection_stages() {
    let machine = machine();
    for from in [
        PipelineStage::CareerEnquiry,
        PipelineStage::ResumeShortlisted,
        PipelineStage::InterviewProcess,
    ] {
        let record = machine
            .transition(record_at(from), PipelineStage::Rejected, &TransitionPayload::default())
            .unwrap_or_else(|error| panic!("{from} -> Rejected: {error}"));
        assert_eq!(record.current_stage, PipelineStage::Rejected);
    }

    for from in [
        PipelineStage::Selected,
        PipelineStage::OfferLetterSent,
        PipelineStage::JoiningLetterSent,
    ] {
        let error = machine
            .transition(record_at(from), PipelineStage::Rejected, &TransitionPayload::default())
            .expect_err("selected candidates are not rejected");
        assert_eq!(
            error,
            TransitionError::InvalidTransition {
                from,
                to: PipelineStage::Rejected,
            }
        );
    }
}

#[test]
fn offers_are_accepted_once_while_the_letter_is_out() {
    let machine = machine();
    let offered = record_at(PipelineStage::OfferLetterSent);
    assert!(offered.offer_letter.is_some());

    let accepted = machine
        .accept_offer(offered)
        .expect("offer accepted");
    let letter = accepted.offer_letter.clone().expect("letter present");
    assert!(letter.accepted);
    assert_eq!(letter.accepted_at, Some(now()));
    assert_eq!(accepted.current_stage, PipelineStage::OfferLetterSent);

    assert_eq!(
        machine.accept_offer(accepted).expect_err("already accepted"),
        TransitionError::LetterAlreadyConfirmed {
            letter: LetterKind::Offer
        }
    );

    assert_eq!(
        machine
            .accept_offer(record_at(PipelineStage::Selected))
            .expect_err("no offer yet"),
        TransitionError::LetterStageMismatch {
            letter: LetterKind::Offer,
            stage: PipelineStage::Selected,
        }
    );

    assert_eq!(
        machine
            .accept_offer(record_at(PipelineStage::Rejected))
            .expect_err("closed"),
        TransitionError::TerminalState {
            stage: PipelineStage::Rejected,
            action: PipelineAction::AcceptOffer,
        }
    );
}

#[test]
fn joining_confirmation_records_the_date() {
    let machine = machine();
    let joining = NaiveDate::from_ymd_opt(2026, 11, 2).expect("valid date");

    let confirmed = machine
        .confirm_joining(record_at(PipelineStage::JoiningLetterSent), joining)
        .expect("joining confirmed");
    let letter = confirmed.joining_letter.clone().expect("letter present");
    assert!(letter.received);
    assert_eq!(letter.joining_date, Some(joining));
    assert_eq!(letter.received_at, Some(now()));

    assert_eq!(
        machine
            .confirm_joining(confirmed, joining)
            .expect_err("already received"),
        TransitionError::LetterAlreadyConfirmed {
            letter: LetterKind::Joining
        }
    );

    assert_eq!(
        machine
            .confirm_joining(record_at(PipelineStage::OfferLetterSent), joining)
            .expect_err("joining letter not yet sent"),
        TransitionError::LetterStageMismatch {
            letter: LetterKind::Joining,
            stage: PipelineStage::OfferLetterSent,
        }
    );
}

#[test]
fn transition_errors_carry_stable_kinds() {
    let error = TransitionError::InvalidTransition {
        from: PipelineStage::Selected,
        to: PipelineStage::Rejected,
    };
    assert_eq!(error.kind(), "invalid_transition");
    assert_eq!(
        error.to_string(),
        "cannot move candidate from Selected to Rejected"
    );
    assert_eq!(
        TransitionError::MissingSchedule(ScheduleIssue::Absent).kind(),
        "missing_schedule"
    );
}
