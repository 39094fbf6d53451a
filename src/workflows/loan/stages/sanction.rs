use chrono::{DateTime, Utc};
use serde_json::json;
use std::sync::Arc;

use super::{Stage, StageReport, RENDERING_FAILURE_PREFIX};
use crate::workflows::loan::amortization::monthly_installment;
use crate::workflows::loan::artifacts::{ArtifactRequestor, SanctionPayload};
use crate::workflows::loan::domain::{ApplicationState, FailureKind, StageName};
use crate::workflows::loan::identity::normalize_pan;
use crate::workflows::loan::policy::UnderwritingPolicy;

/// Terminal stage: assembles the sanction payload and requests the letter.
pub struct SanctionStage<A> {
    renderer: Arc<A>,
    policy: UnderwritingPolicy,
    clock: fn() -> DateTime<Utc>,
}

impl<A: ArtifactRequestor> SanctionStage<A> {
    pub fn new(renderer: Arc<A>, policy: UnderwritingPolicy) -> Self {
        Self {
            renderer,
            policy,
            clock: Utc::now,
        }
    }

    pub fn with_clock(mut self, clock: fn() -> DateTime<Utc>) -> Self {
        self.clock = clock;
        self
    }

    fn payload(&self, state: &ApplicationState, credit_score: u16) -> SanctionPayload {
        let application = state.application();
        SanctionPayload {
            application_id: state.application_id(),
            customer_name: application.customer_name.clone(),
            mobile: application.mobile.clone(),
            pan: normalize_pan(&application.pan),
            loan_amount: application.loan_amount,
            tenure_months: application.tenure_months,
            monthly_income: application.monthly_income,
            annual_interest_rate_percent: self.policy.annual_interest_rate_percent,
            emi: monthly_installment(
                application.loan_amount,
                application.tenure_months,
                self.policy.annual_interest_rate_percent,
            ),
            credit_score,
            issued_at: (self.clock)(),
        }
    }
}

impl<A: ArtifactRequestor> Stage for SanctionStage<A> {
    fn name(&self) -> StageName {
        StageName::Sanction
    }

    fn evaluate(&self, state: &ApplicationState) -> StageReport {
        let Some(credit_score) = state.credit_score() else {
            return StageReport::rejected("cannot sanction without a recorded credit score");
        };

        let payload = self.payload(state, credit_score);
        match self.renderer.issue(&payload) {
            Ok(reference) => StageReport::success("sanction letter issued")
                .with_data(json!({ "artifact_reference": reference }))
                .with_artifact_reference(reference),
            Err(err) => StageReport::failed(
                FailureKind::RenderingFailure,
                format!("{RENDERING_FAILURE_PREFIX}: sanction letter could not be generated: {err}"),
            ),
        }
    }
}
