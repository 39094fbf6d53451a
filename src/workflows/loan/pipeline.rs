use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::artifacts::ArtifactRequestor;
use super::domain::{ApplicationState, ApplicationStatus, FailureKind};
use super::policy::{PolicyError, UnderwritingPolicy};
use super::stages::{
    CreditAssessmentStage, EligibilityStage, IdentityVerificationStage, SanctionStage, Stage,
};
use super::verifier::Verifier;

/// Runs eligibility, identity, credit, and sanction in that fixed order,
/// halting at the first stage that fails.
pub struct DecisionPipeline<V, A> {
    eligibility: EligibilityStage,
    identity: IdentityVerificationStage<V>,
    credit: CreditAssessmentStage<V>,
    sanction: SanctionStage<A>,
}

impl<V, A> DecisionPipeline<V, A>
where
    V: Verifier,
    A: ArtifactRequestor,
{
    pub fn new(
        policy: UnderwritingPolicy,
        verifier: Arc<V>,
        renderer: Arc<A>,
    ) -> Result<Self, PipelineError> {
        policy.validate()?;

        Ok(Self {
            eligibility: EligibilityStage::new(policy.clone()),
            identity: IdentityVerificationStage::new(verifier.clone()),
            credit: CreditAssessmentStage::new(verifier, policy.clone()),
            sanction: SanctionStage::new(renderer, policy),
        })
    }

    /// Overrides the timestamp source used for sanction letters.
    pub fn with_clock(mut self, clock: fn() -> DateTime<Utc>) -> Self {
        self.sanction = self.sanction.with_clock(clock);
        self
    }

    fn stages(&self) -> [&dyn Stage; 4] {
        [
            &self.eligibility,
            &self.identity,
            &self.credit,
            &self.sanction,
        ]
    }

    /// Evaluate an application from CREATED to a terminal status.
    ///
    /// Stage rejections and collaborator faults end the run with status FAILED;
    /// only malformed input is returned as an error.
    pub fn run(&self, mut state: ApplicationState) -> Result<ApplicationState, PipelineError> {
        validate_input(&state)?;

        let application_id = state.application_id();
        state.begin_processing();
        debug!(%application_id, "loan pipeline started");

        let mut artifact_reference = None;
        for stage in self.stages() {
            let name = stage.name();
            let report = stage.evaluate(&state);
            let outcome = report.outcome(name);

            if let Some(score) = report.credit_score {
                state.set_credit_score(score);
            }

            if let Some(kind) = report.failure {
                match kind {
                    FailureKind::BusinessRejection => {
                        warn!(%application_id, stage = %name, reason = %outcome.message, "application rejected")
                    }
                    FailureKind::ServiceUnavailable | FailureKind::RenderingFailure => {
                        warn!(%application_id, stage = %name, ?kind, reason = %outcome.message, "stage could not complete")
                    }
                }
                state.record_failure(outcome, kind);
                return Ok(state);
            }

            debug!(%application_id, stage = %name, "stage passed");
            state.record_success(outcome);
            if report.artifact_reference.is_some() {
                artifact_reference = report.artifact_reference;
            }
        }

        let Some(reference) = artifact_reference else {
            return Err(PipelineError::MissingArtifact { application_id: application_id.0 });
        };
        state.sanction(reference);
        info!(
            %application_id,
            credit_score = state.credit_score(),
            artifact = state.artifact_reference(),
            "loan sanctioned"
        );

        Ok(state)
    }
}

fn validate_input(state: &ApplicationState) -> Result<(), InputViolation> {
    if state.status() != ApplicationStatus::Created {
        return Err(InputViolation::NotCreated(state.status()));
    }

    let decided = [
        ("steps", !state.steps().is_empty()),
        ("credit_score", state.credit_score().is_some()),
        ("artifact_reference", state.artifact_reference().is_some()),
        ("error_message", state.error_message().is_some()),
        ("failure_kind", state.failure_kind().is_some()),
    ];
    if let Some((field, _)) = decided.iter().find(|(_, present)| *present) {
        return Err(InputViolation::DecisionFieldsPresent(*field));
    }

    let application = state.application();
    let required: [(&'static str, &str); 4] = [
        ("customer_name", application.customer_name.as_str()),
        ("mobile", application.mobile.as_str()),
        ("pan", application.pan.as_str()),
        ("aadhaar", application.aadhaar.as_str()),
    ];
    if let Some((field, _)) = required.iter().find(|(_, value)| value.trim().is_empty()) {
        return Err(InputViolation::MissingField(*field));
    }

    if application.monthly_income == 0 {
        return Err(InputViolation::MissingField("monthly_income"));
    }

    Ok(())
}

/// Input that cannot be evaluated at all.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InputViolation {
    #[error("application must be in CREATED status, found {}", .0.label())]
    NotCreated(ApplicationStatus),
    #[error("required field `{0}` is missing")]
    MissingField(&'static str),
    #[error("CREATED application already carries decision field `{0}`")]
    DecisionFieldsPresent(&'static str),
}

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("invalid application input: {0}")]
    InvalidInput(#[from] InputViolation),
    #[error("invalid underwriting policy: {0}")]
    Policy(#[from] PolicyError),
    #[error("sanction stage for application {application_id} returned no artifact reference")]
    MissingArtifact { application_id: u64 },
}
