use super::common::*;
use std::sync::Arc;

use crate::workflows::loan::domain::{ApplicationStatus, FailureKind, StageName, StageResult};
use crate::workflows::loan::pipeline::DecisionPipeline;
use crate::workflows::loan::policy::UnderwritingPolicy;
use crate::workflows::loan::stages::{SanctionStage, Stage};

#[test]
fn payload_carries_finalized_terms() {
    let (pipeline, _, renderer) = build_pipeline();
    pipeline
        .run(state_with(60, |app| app.pan = "abcde1234f".to_string()))
        .expect("runs");

    let issued = renderer.issued();
    let payload = issued.first().expect("letter requested");
    assert_eq!(payload.application_id.0, 60);
    assert_eq!(payload.customer_name, "Asha Rao");
    assert_eq!(payload.pan, "ABCDE1234F");
    assert_eq!(payload.loan_amount, 150_000);
    assert_eq!(payload.tenure_months, 24);
    assert_eq!(payload.credit_score, 750);
    assert_eq!(payload.annual_interest_rate_percent, 12.0);
}

#[test]
fn rendering_failure_is_reported_as_retryable() {
    let pipeline = DecisionPipeline::new(
        UnderwritingPolicy::default(),
        Arc::new(CountingVerifier::default()),
        Arc::new(BrokenRenderer),
    )
    .expect("valid policy");

    let state = pipeline.run(state_with(61, |_| {})).expect("runs");

    assert_eq!(state.status(), ApplicationStatus::Failed);
    assert_eq!(state.steps().len(), 4);
    let last = state.steps().last().expect("sanction step recorded");
    assert_eq!(last.stage, StageName::Sanction);
    assert_eq!(last.result, StageResult::Fail);
    assert!(last.message.starts_with("rendering failure"), "{}", last.message);
    assert_eq!(state.failure_kind(), Some(FailureKind::RenderingFailure));
    assert!(state.is_retryable());
    assert!(state.artifact_reference().is_none());
    assert_eq!(state.credit_score(), Some(750));
}

#[test]
fn sanction_without_credit_score_is_refused() {
    let stage = SanctionStage::new(
        Arc::new(MemoryRenderer::default()),
        UnderwritingPolicy::default(),
    );
    let report = stage.evaluate(&state_with(62, |_| {}));

    assert_eq!(report.failure, Some(FailureKind::BusinessRejection));
    assert!(report.artifact_reference.is_none());
}
