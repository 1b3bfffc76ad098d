use crate::infra::{InMemoryCandidateRepository, InMemoryEmployeeDirectory};
use crate::routes::{preview_score, ScorePreviewResponse};
use chrono::{Duration, Local, NaiveDate, Utc};
use clap::Args;
use recruit_ai::config::{AppConfig, RecruitmentConfig};
use recruit_ai::error::AppError;
use recruit_ai::workflows::recruitment::{
    CandidateRecord, CandidateSubmission, PipelineStage, RecruitmentService, StageChangeRequest,
};
use serde_json::json;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct ScoreArgs {
    /// Path to a candidate profile in enquiry-form JSON
    #[arg(long)]
    pub(crate) profile: PathBuf,
    /// Print the full breakdown as JSON instead of a table
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct DemoArgs {
    /// Days from now until the sample interview
    #[arg(long, default_value_t = 3, value_parser = clap::value_parser!(u32).range(1..))]
    pub(crate) interview_in_days: u32,
    /// Agreed joining date (YYYY-MM-DD). Defaults to two weeks from today.
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) joining_date: Option<NaiveDate>,
    /// Print each candidate's stage history at the end
    #[arg(long)]
    pub(crate) show_history: bool,
}

impl Default for DemoArgs {
    fn default() -> Self {
        Self {
            interview_in_days: 3,
            joining_date: None,
            show_history: false,
        }
    }
}

pub(crate) fn run_score(args: ScoreArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let raw = std::fs::read_to_string(&args.profile)?;
    let submission: CandidateSubmission = serde_json::from_str(&raw)?;
    let preview = preview_score(&submission, &config.recruitment.shortlist);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&preview)?);
    } else {
        render_score(&submission.full_name, &preview);
    }
    Ok(())
}

fn render_score(name: &str, preview: &ScorePreviewResponse) {
    let name = if name.trim().is_empty() {
        "(unnamed candidate)"
    } else {
        name.trim()
    };
    println!("Fitness score for {name}: {}", preview.breakdown.total);
    for component in &preview.breakdown.components {
        println!(
            "  - {:<20} {:>3}  {}",
            format!("{:?}", component.factor),
            component.points,
            component.notes
        );
    }
    let verdict = if preview.shortlist_eligible {
        "eligible"
    } else {
        "below threshold"
    };
    println!("  Shortlisting: {verdict} ({})", preview.shortlist_hint);
    for adjustment in &preview.adjustments {
        println!("  Adjusted at intake: {adjustment:?}");
    }
}

type DemoService = RecruitmentService<InMemoryCandidateRepository, InMemoryEmployeeDirectory>;

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        interview_in_days,
        joining_date,
        show_history,
    } = args;

    let joining_date =
        joining_date.unwrap_or_else(|| Local::now().date_naive() + Duration::days(14));
    let interview_at = (Utc::now() + Duration::days(i64::from(interview_in_days))).to_rfc3339();

    let directory = Arc::new(InMemoryEmployeeDirectory::default());
    let service: DemoService = RecruitmentService::new(
        Arc::new(InMemoryCandidateRepository::default()),
        directory.clone(),
        RecruitmentConfig::default(),
    );

    println!("Recruitment pipeline demo");
    let strong = apply(&service, strong_submission()?)?;
    let weak = apply(&service, weak_submission()?)?;

    println!("\nHiring {}", strong.full_name);
    let funnel = [
        PipelineStage::ResumeShortlisted,
        PipelineStage::InterviewProcess,
        PipelineStage::Selected,
        PipelineStage::OfferLetterSent,
    ];
    for target in funnel {
        advance(
            &service,
            &strong,
            StageChangeRequest::to(target).with_interview_date(interview_at.as_str()),
        )?;
    }
    service.accept_offer(&strong.id)?;
    println!("  - offer letter accepted");
    advance(
        &service,
        &strong,
        StageChangeRequest::to(PipelineStage::JoiningLetterSent),
    )?;
    service.confirm_joining(&strong.id, joining_date)?;
    println!("  - joining letter received, joining on {joining_date}");
    advance(
        &service,
        &strong,
        StageChangeRequest::to(PipelineStage::AddedAsEmployee),
    )?;

    println!("\nClosing {}", weak.full_name);
    let skipped = service.advance(
        &weak.id,
        StageChangeRequest::to(PipelineStage::InterviewProcess).with_interview_date(interview_at),
    );
    if let Err(err) = skipped {
        println!("  - refused: {err}");
    }
    advance(
        &service,
        &weak,
        StageChangeRequest::to(PipelineStage::Rejected),
    )?;

    println!("\nPipeline snapshot");
    for stage in PipelineStage::ordered() {
        let count = service.list_stage(stage, usize::MAX)?.len();
        if count > 0 {
            println!("  - {stage}: {count}");
        }
    }

    println!("\nEmployee directory");
    for account in directory.accounts() {
        println!(
            "  - {} {} (candidate {}, password reset required: {})",
            account.employee_code,
            account.login,
            account.candidate_id.0,
            account.must_reset_password
        );
    }

    if show_history {
        for candidate in [&strong, &weak] {
            let record = service.get(&candidate.id)?;
            let history: Vec<_> = record
                .stage_history
                .iter()
                .map(|event| json!({ "stage": event.stage, "at": event.timestamp }))
                .collect();
            println!(
                "\nStage history for {}:\n{}",
                record.full_name,
                serde_json::to_string_pretty(&history)?
            );
        }
    }

    Ok(())
}

fn apply(
    service: &DemoService,
    submission: CandidateSubmission,
) -> Result<CandidateRecord, AppError> {
    let record = service.apply(submission)?;
    let view = service.view(&record);
    println!(
        "- {} ({}) scored {} | {}",
        record.full_name,
        record.id.0,
        view.score,
        if view.shortlist_eligible {
            "eligible for shortlisting"
        } else {
            "below shortlisting threshold"
        }
    );
    Ok(record)
}

fn advance(
    service: &DemoService,
    candidate: &CandidateRecord,
    request: StageChangeRequest,
) -> Result<(), AppError> {
    let outcome = service.advance(&candidate.id, request)?;
    println!("  - moved to {}", outcome.record.current_stage);
    if let Some(account) = outcome.employee {
        println!(
            "  - employee login {} issued as {}",
            account.login, account.employee_code
        );
    }
    Ok(())
}

fn strong_submission() -> Result<CandidateSubmission, serde_json::Error> {
    serde_json::from_value(json!({
        "fullName": "Asha Verma",
        "vacancyId": "vac-ops-07",
        "education": "Graduate (Maths/Economics)",
        "ageGroup": "26-30yr",
        "hasVehicle": "Yes",
        "location": "H.B Road",
        "nativePlace": "Bhopal",
        "spokenEnglish": "Yes",
        "salaryExpectation": "10K-12K",
        "experience": { "administrative": 2, "insuranceSales": 1, "anySales": 0, "fieldWork": 3 },
        "operations": { "dataManagement": 1, "backOffice": 0, "mis": 2 }
    }))
}

fn weak_submission() -> Result<CandidateSubmission, serde_json::Error> {
    serde_json::from_value(json!({
        "fullName": "Rohit Mehra",
        "vacancyId": "vac-ops-07",
        "education": "Graduate",
        "ageGroup": "20-25yr",
        "hasVehicle": "No",
        "location": "Others",
        "nativePlace": "Indore",
        "spokenEnglish": "No",
        "salaryExpectation": "Above 25K",
        "experience": { "anySales": 1 },
        "operations": {}
    }))
}
