mod credit;
mod eligibility;
mod sanction;
mod verification;

pub use credit::{CreditAssessmentStage, CreditRating};
pub use eligibility::EligibilityStage;
pub use sanction::SanctionStage;
pub use verification::IdentityVerificationStage;

use serde_json::Value;

use super::domain::{ApplicationState, FailureKind, StageName, StageOutcome, StageResult};

/// One ordered unit of the decision pipeline.
pub trait Stage {
    fn name(&self) -> StageName;

    /// Evaluates the running state. Stages never mutate the state directly; the
    /// pipeline applies the returned report.
    fn evaluate(&self, state: &ApplicationState) -> StageReport;
}

/// What a stage concluded, plus any values it wants stored on the state.
#[derive(Debug, Clone, PartialEq)]
pub struct StageReport {
    pub failure: Option<FailureKind>,
    pub message: String,
    pub data: Option<Value>,
    pub credit_score: Option<u16>,
    pub artifact_reference: Option<String>,
}

impl StageReport {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            failure: None,
            message: message.into(),
            data: None,
            credit_score: None,
            artifact_reference: None,
        }
    }

    pub fn rejected(message: impl Into<String>) -> Self {
        Self::failed(FailureKind::BusinessRejection, message)
    }

    pub fn failed(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            failure: Some(kind),
            ..Self::success(message)
        }
    }

    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    pub fn with_credit_score(mut self, score: u16) -> Self {
        self.credit_score = Some(score);
        self
    }

    pub fn with_artifact_reference(mut self, reference: String) -> Self {
        self.artifact_reference = Some(reference);
        self
    }

    pub fn is_success(&self) -> bool {
        self.failure.is_none()
    }

    pub(crate) fn outcome(&self, stage: StageName) -> StageOutcome {
        let message = if self.message.trim().is_empty() {
            match self.failure {
                Some(_) => format!("{stage} stage failed"),
                None => format!("{stage} stage passed"),
            }
        } else {
            self.message.clone()
        };

        StageOutcome {
            stage,
            result: if self.is_success() {
                StageResult::Success
            } else {
                StageResult::Fail
            },
            message,
            data: self.data.clone(),
        }
    }
}

pub(crate) const SERVICE_UNAVAILABLE_PREFIX: &str = "verification service unavailable";
pub(crate) const RENDERING_FAILURE_PREFIX: &str = "rendering failure";
