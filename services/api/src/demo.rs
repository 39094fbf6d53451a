use crate::infra::{build_pipeline, ServicePipeline};
use clap::Args;
use loan_sanction::config::AppConfig;
use loan_sanction::error::AppError;
use loan_sanction::workflows::loan::{
    ApplicationId, ApplicationImporter, ApplicationState, ApplicationStatus, EvaluationRequest,
    LoanApplication, PipelineResultView,
};
use serde::Serialize;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub(crate) struct EvaluateArgs {
    /// JSON file holding `application_id` plus the applicant fields
    #[arg(long)]
    pub(crate) input: PathBuf,
    /// Pretty-print the result
    #[arg(long)]
    pub(crate) pretty: bool,
}

#[derive(Args, Debug)]
pub(crate) struct BatchArgs {
    /// CSV export with one application per row
    #[arg(long)]
    pub(crate) csv: PathBuf,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Directory for generated sanction letters (defaults to ARTIFACT_DIR)
    #[arg(long)]
    pub(crate) letters_dir: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct BatchSummary {
    total: usize,
    sanctioned: usize,
    failed: usize,
    retryable: usize,
    results: Vec<PipelineResultView>,
}

impl BatchSummary {
    fn from_states(states: &[ApplicationState]) -> Self {
        let count = |status: ApplicationStatus| {
            states
                .iter()
                .filter(|state| state.status() == status)
                .count()
        };

        Self {
            total: states.len(),
            sanctioned: count(ApplicationStatus::Sanctioned),
            failed: count(ApplicationStatus::Failed),
            retryable: states.iter().filter(|state| state.is_retryable()).count(),
            results: states.iter().map(ApplicationState::result_view).collect(),
        }
    }
}

pub(crate) fn run_evaluate(args: EvaluateArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let pipeline = build_pipeline(&config)?;

    let raw = std::fs::read_to_string(&args.input)?;
    let request: EvaluationRequest = serde_json::from_str(&raw)?;
    let state = ApplicationState::new(ApplicationId(request.application_id), request.application);

    let finished = pipeline.run(state)?;
    let view = finished.result_view();
    let rendered = if args.pretty {
        serde_json::to_string_pretty(&view)?
    } else {
        serde_json::to_string(&view)?
    };
    println!("{rendered}");
    Ok(())
}

pub(crate) fn run_batch(args: BatchArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let pipeline = build_pipeline(&config)?;
    let states = ApplicationImporter::from_path(&args.csv)?;

    let summary = evaluate_all(&pipeline, states)?;
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

fn evaluate_all(
    pipeline: &ServicePipeline,
    states: Vec<ApplicationState>,
) -> Result<BatchSummary, AppError> {
    let finished = states
        .into_iter()
        .map(|state| pipeline.run(state))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(BatchSummary::from_states(&finished))
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;
    if let Some(dir) = args.letters_dir {
        config.artifacts.output_dir = dir;
    }
    let pipeline = build_pipeline(&config)?;

    println!("Loan Sanction Pipeline Demo");
    println!("===========================");
    println!(
        "Policy: amount >= {}, tenure {}-{} months, credit score >= {}, rate {:.2}% p.a.",
        config.policy.minimum_loan_amount,
        config.policy.minimum_tenure_months,
        config.policy.maximum_tenure_months,
        config.policy.minimum_credit_score,
        config.policy.annual_interest_rate_percent
    );

    for (label, state) in demo_scenarios() {
        let finished = pipeline.run(state)?;
        print_trail(label, &finished);
    }

    Ok(())
}

fn demo_scenarios() -> Vec<(&'static str, ApplicationState)> {
    let base = LoanApplication {
        customer_name: "Asha Rao".to_string(),
        mobile: "9876543210".to_string(),
        pan: "ABCDE1234F".to_string(),
        aadhaar: "123412341234".to_string(),
        loan_amount: 150_000,
        tenure_months: 24,
        monthly_income: 30_000,
    };

    let long_tenure = LoanApplication {
        tenure_months: 400,
        ..base.clone()
    };
    let short_aadhaar = LoanApplication {
        aadhaar: "12341234".to_string(),
        ..base.clone()
    };
    let stretched = LoanApplication {
        loan_amount: 900_000,
        monthly_income: 15_000,
        ..base.clone()
    };

    vec![
        ("Standard request", ApplicationState::new(ApplicationId(1001), base)),
        ("Tenure beyond limit", ApplicationState::new(ApplicationId(1002), long_tenure)),
        ("Malformed Aadhaar", ApplicationState::new(ApplicationId(1003), short_aadhaar)),
        ("Income too low for amount", ApplicationState::new(ApplicationId(1004), stretched)),
    ]
}

fn print_trail(label: &str, state: &ApplicationState) {
    let application = state.application();
    println!();
    println!("{label} (APP-{})", state.application_id());
    println!(
        "  Request: {} over {} months on income {}",
        application.loan_amount, application.tenure_months, application.monthly_income
    );

    for step in state.steps() {
        println!(
            "  [{:<11}] {:<7} {}",
            step.stage.as_str(),
            if step.is_success() { "SUCCESS" } else { "FAIL" },
            step.message
        );
    }

    println!("  Outcome: {}", state.status().label());
    if let Some(score) = state.credit_score() {
        println!("  Credit score: {score}");
    }
    if let Some(reference) = state.artifact_reference() {
        println!("  Sanction letter: {reference}");
    }
    if let Some(kind) = state.failure_kind() {
        println!(
            "  Failure kind: {kind:?}{}",
            if kind.is_retryable() { " (retryable)" } else { "" }
        );
    }
}
