use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Caller-assigned identifier for a loan application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ApplicationId(pub u64);

impl fmt::Display for ApplicationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Immutable applicant inputs supplied by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanApplication {
    pub customer_name: String,
    pub mobile: String,
    pub pan: String,
    pub aadhaar: String,
    pub loan_amount: u64,
    #[serde(alias = "tenure")]
    pub tenure_months: u32,
    #[serde(alias = "income")]
    pub monthly_income: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ApplicationStatus {
    Created,
    Processing,
    Sanctioned,
    Failed,
}

impl ApplicationStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Created => "CREATED",
            Self::Processing => "PROCESSING",
            Self::Sanctioned => "SANCTIONED",
            Self::Failed => "FAILED",
        }
    }

    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Sanctioned | Self::Failed)
    }
}

/// Closed set of stage names recorded in the audit trail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageName {
    Eligibility,
    Identity,
    Credit,
    Sanction,
}

impl StageName {
    pub const fn ordered() -> [Self; 4] {
        [Self::Eligibility, Self::Identity, Self::Credit, Self::Sanction]
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Eligibility => "eligibility",
            Self::Identity => "identity",
            Self::Credit => "credit",
            Self::Sanction => "sanction",
        }
    }
}

impl fmt::Display for StageName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StageResult {
    Success,
    Fail,
}

/// Classifies why a run ended in FAILED so callers can decide on retries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    BusinessRejection,
    ServiceUnavailable,
    RenderingFailure,
}

impl FailureKind {
    pub const fn is_retryable(self) -> bool {
        !matches!(self, Self::BusinessRejection)
    }
}

/// One audit-trail entry, appended once per executed stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageOutcome {
    pub stage: StageName,
    pub result: StageResult,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl StageOutcome {
    pub fn is_success(&self) -> bool {
        self.result == StageResult::Success
    }
}

/// The record threaded through the decision pipeline.
///
/// Inputs are fixed at construction; the decision fields can only be changed by
/// the pipeline, which keeps the audit trail and terminal status consistent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicationState {
    application_id: ApplicationId,
    #[serde(flatten)]
    application: LoanApplication,
    status: ApplicationStatus,
    #[serde(default)]
    credit_score: Option<u16>,
    #[serde(default)]
    steps: Vec<StageOutcome>,
    #[serde(default)]
    artifact_reference: Option<String>,
    #[serde(default)]
    error_message: Option<String>,
    #[serde(default)]
    failure_kind: Option<FailureKind>,
}

impl ApplicationState {
    pub fn new(application_id: ApplicationId, application: LoanApplication) -> Self {
        Self {
            application_id,
            application,
            status: ApplicationStatus::Created,
            credit_score: None,
            steps: Vec::new(),
            artifact_reference: None,
            error_message: None,
            failure_kind: None,
        }
    }

    pub fn application_id(&self) -> ApplicationId {
        self.application_id
    }

    pub fn application(&self) -> &LoanApplication {
        &self.application
    }

    pub fn status(&self) -> ApplicationStatus {
        self.status
    }

    pub fn credit_score(&self) -> Option<u16> {
        self.credit_score
    }

    pub fn steps(&self) -> &[StageOutcome] {
        &self.steps
    }

    pub fn artifact_reference(&self) -> Option<&str> {
        self.artifact_reference.as_deref()
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    pub fn failure_kind(&self) -> Option<FailureKind> {
        self.failure_kind
    }

    pub fn is_retryable(&self) -> bool {
        self.failure_kind
            .map(FailureKind::is_retryable)
            .unwrap_or(false)
    }

    pub(crate) fn begin_processing(&mut self) {
        self.status = ApplicationStatus::Processing;
    }

    /// Stores the credit score unless one is already present.
    pub(crate) fn set_credit_score(&mut self, score: u16) {
        if self.credit_score.is_none() {
            self.credit_score = Some(score);
        }
    }

    pub(crate) fn record_success(&mut self, outcome: StageOutcome) {
        debug_assert!(outcome.is_success());
        self.steps.push(outcome);
    }

    pub(crate) fn record_failure(&mut self, outcome: StageOutcome, kind: FailureKind) {
        self.error_message = Some(outcome.message.clone());
        self.failure_kind = Some(kind);
        self.status = ApplicationStatus::Failed;
        self.steps.push(outcome);
    }

    pub(crate) fn sanction(&mut self, artifact_reference: String) {
        self.artifact_reference = Some(artifact_reference);
        self.status = ApplicationStatus::Sanctioned;
    }

    pub fn result_view(&self) -> PipelineResultView {
        PipelineResultView {
            application_id: self.application_id,
            status: self.status,
            steps: self.steps.clone(),
            credit_score: self.credit_score,
            artifact_reference: self.artifact_reference.clone(),
            error_message: self.error_message.clone(),
            failure_kind: self.failure_kind,
            retryable: self.is_retryable(),
        }
    }
}

/// Externally visible shape of a finished run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineResultView {
    pub application_id: ApplicationId,
    pub status: ApplicationStatus,
    pub steps: Vec<StageOutcome>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credit_score: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artifact_reference: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure_kind: Option<FailureKind>,
    #[serde(default)]
    pub retryable: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn application() -> LoanApplication {
        LoanApplication {
            customer_name: "Asha Rao".to_string(),
            mobile: "9876543210".to_string(),
            pan: "ABCDE1234F".to_string(),
            aadhaar: "123412341234".to_string(),
            loan_amount: 150_000,
            tenure_months: 24,
            monthly_income: 30_000,
        }
    }

    #[test]
    fn new_state_starts_created_without_decision_fields() {
        let state = ApplicationState::new(ApplicationId(7), application());
        assert_eq!(state.status(), ApplicationStatus::Created);
        assert!(state.steps().is_empty());
        assert!(state.credit_score().is_none());
        assert!(state.artifact_reference().is_none());
        assert!(state.error_message().is_none());
        assert!(!state.is_retryable());
    }

    #[test]
    fn credit_score_is_never_overwritten() {
        let mut state = ApplicationState::new(ApplicationId(7), application());
        state.set_credit_score(720);
        state.set_credit_score(610);
        assert_eq!(state.credit_score(), Some(720));
    }

    #[test]
    fn failure_records_message_and_kind() {
        let mut state = ApplicationState::new(ApplicationId(7), application());
        state.begin_processing();
        state.record_failure(
            StageOutcome {
                stage: StageName::Eligibility,
                result: StageResult::Fail,
                message: "tenure out of range".to_string(),
                data: None,
            },
            FailureKind::BusinessRejection,
        );

        assert_eq!(state.status(), ApplicationStatus::Failed);
        assert_eq!(state.error_message(), Some("tenure out of range"));
        assert!(!state.is_retryable());
    }

    #[test]
    fn result_view_serializes_wire_shape() {
        let mut state = ApplicationState::new(ApplicationId(3), application());
        state.begin_processing();
        state.record_success(StageOutcome {
            stage: StageName::Eligibility,
            result: StageResult::Success,
            message: "eligibility checks passed".to_string(),
            data: None,
        });

        let value = serde_json::to_value(state.result_view()).expect("serializes");
        assert_eq!(
            value,
            json!({
                "application_id": 3,
                "status": "PROCESSING",
                "steps": [{
                    "stage": "eligibility",
                    "result": "SUCCESS",
                    "message": "eligibility checks passed"
                }],
                "retryable": false
            })
        );
    }

    #[test]
    fn application_accepts_short_field_aliases() {
        let parsed: LoanApplication = serde_json::from_value(json!({
            "customer_name": "Asha Rao",
            "mobile": "9876543210",
            "pan": "ABCDE1234F",
            "aadhaar": "123412341234",
            "loan_amount": 150000,
            "tenure": 24,
            "income": 30000
        }))
        .expect("aliases deserialize");
        assert_eq!(parsed, application());
    }
}
