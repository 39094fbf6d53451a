use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;

use super::{Stage, StageReport, SERVICE_UNAVAILABLE_PREFIX};
use crate::workflows::loan::amortization::{monthly_installment, round_currency};
use crate::workflows::loan::domain::{ApplicationState, FailureKind, StageName};
use crate::workflows::loan::identity::normalize_pan;
use crate::workflows::loan::policy::UnderwritingPolicy;
use crate::workflows::loan::verifier::Verifier;

/// Bureau band attached to the credit stage's audit record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CreditRating {
    Excellent,
    Good,
    Fair,
    Poor,
    VeryPoor,
}

impl CreditRating {
    pub fn from_score(score: u16) -> Self {
        match score {
            750..=u16::MAX => Self::Excellent,
            700..=749 => Self::Good,
            650..=699 => Self::Fair,
            600..=649 => Self::Poor,
            _ => Self::VeryPoor,
        }
    }
}

/// Underwriting: bureau score, EMI affordability, and the sanction cap.
pub struct CreditAssessmentStage<V> {
    verifier: Arc<V>,
    policy: UnderwritingPolicy,
}

impl<V: Verifier> CreditAssessmentStage<V> {
    pub fn new(verifier: Arc<V>, policy: UnderwritingPolicy) -> Self {
        Self { verifier, policy }
    }
}

impl<V: Verifier> Stage for CreditAssessmentStage<V> {
    fn name(&self) -> StageName {
        StageName::Credit
    }

    fn evaluate(&self, state: &ApplicationState) -> StageReport {
        let application = state.application();
        let policy = &self.policy;

        let credit_score = match self.verifier.credit_score(&normalize_pan(&application.pan)) {
            Ok(score) => score,
            Err(err) => {
                return StageReport::failed(
                    FailureKind::ServiceUnavailable,
                    format!("{SERVICE_UNAVAILABLE_PREFIX}: credit score lookup failed: {err}"),
                )
            }
        };

        let income = application.monthly_income as f64;
        let emi = monthly_installment(
            application.loan_amount,
            application.tenure_months,
            policy.annual_interest_rate_percent,
        );
        let max_emi_allowed = round_currency(income * policy.maximum_emi_to_income);
        let max_loan_allowed = round_currency(income * policy.credit_income_multiple);
        let dti_ratio = if income > 0.0 {
            round_currency(emi / income * 100.0)
        } else {
            0.0
        };

        let data = json!({
            "credit_score": credit_score,
            "credit_rating": CreditRating::from_score(credit_score),
            "emi_calculated": emi,
            "max_emi_allowed": max_emi_allowed,
            "max_loan_allowed": max_loan_allowed,
            "dti_ratio": dti_ratio,
            "annual_interest_rate": policy.annual_interest_rate_percent,
        });

        let rejection = if credit_score < policy.minimum_credit_score {
            Some(format!(
                "credit score {} is below the minimum of {}",
                credit_score, policy.minimum_credit_score
            ))
        } else if emi > max_emi_allowed {
            Some(format!(
                "EMI of {:.2} exceeds {:.0}% of monthly income (maximum {:.2})",
                emi,
                policy.maximum_emi_to_income * 100.0,
                max_emi_allowed
            ))
        } else if application.loan_amount as f64 > max_loan_allowed {
            Some(format!(
                "loan amount {} exceeds the credit limit of {:.0}x monthly income ({:.0})",
                application.loan_amount, policy.credit_income_multiple, max_loan_allowed
            ))
        } else {
            None
        };

        let report = match rejection {
            Some(message) => StageReport::rejected(message),
            None => StageReport::success("credit assessment approved"),
        };
        report.with_data(data).with_credit_score(credit_score)
    }
}
