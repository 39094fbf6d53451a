use super::{Stage, StageReport};
use crate::workflows::loan::domain::{ApplicationState, StageName};
use crate::workflows::loan::identity::is_valid_mobile;
use crate::workflows::loan::policy::UnderwritingPolicy;

/// Structural checks on the raw request, run before any external call.
pub struct EligibilityStage {
    policy: UnderwritingPolicy,
}

impl EligibilityStage {
    pub fn new(policy: UnderwritingPolicy) -> Self {
        Self { policy }
    }
}

impl Stage for EligibilityStage {
    fn name(&self) -> StageName {
        StageName::Eligibility
    }

    fn evaluate(&self, state: &ApplicationState) -> StageReport {
        let application = state.application();
        let policy = &self.policy;

        if !is_valid_mobile(&application.mobile) {
            return StageReport::rejected("mobile number must be exactly 10 digits");
        }

        if application.loan_amount < policy.minimum_loan_amount {
            return StageReport::rejected(format!(
                "loan amount {} is below the minimum of {}",
                application.loan_amount, policy.minimum_loan_amount
            ));
        }

        let tenure = application.tenure_months;
        if tenure < policy.minimum_tenure_months || tenure > policy.maximum_tenure_months {
            return StageReport::rejected(format!(
                "tenure of {} months is outside the allowed range of {}-{} months",
                tenure, policy.minimum_tenure_months, policy.maximum_tenure_months
            ));
        }

        let income = application.monthly_income as f64;
        let ratio = application.loan_amount as f64 / income;
        if ratio > policy.eligibility_income_multiple {
            return StageReport::rejected(format!(
                "loan-to-income ratio {:.2}x monthly income exceeds the eligibility limit of {:.2}x",
                ratio, policy.eligibility_income_multiple
            ));
        }

        StageReport::success("eligibility checks passed")
    }
}
