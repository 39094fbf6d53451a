use serde::{Deserialize, Serialize};

/// Underwriting thresholds consulted by the eligibility and credit stages.
///
/// Both loan-to-income bounds are expressed as multiples of *monthly* income and
/// are enforced independently: the eligibility multiple screens the raw request,
/// the credit multiple caps the amount that can be sanctioned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnderwritingPolicy {
    pub minimum_loan_amount: u64,
    pub minimum_tenure_months: u32,
    pub maximum_tenure_months: u32,
    pub eligibility_income_multiple: f64,
    pub minimum_credit_score: u16,
    pub annual_interest_rate_percent: f64,
    pub maximum_emi_to_income: f64,
    pub credit_income_multiple: f64,
}

impl Default for UnderwritingPolicy {
    fn default() -> Self {
        Self {
            minimum_loan_amount: 10_000,
            minimum_tenure_months: 6,
            maximum_tenure_months: 360,
            eligibility_income_multiple: 60.0,
            minimum_credit_score: 600,
            annual_interest_rate_percent: 12.0,
            maximum_emi_to_income: 0.5,
            credit_income_multiple: 50.0,
        }
    }
}

/// Longest tenure any policy may allow (100 years).
pub const TENURE_CEILING_MONTHS: u32 = 1_200;

impl UnderwritingPolicy {
    pub fn validate(&self) -> Result<(), PolicyError> {
        if self.maximum_tenure_months > TENURE_CEILING_MONTHS {
            return Err(PolicyError::TenureCeiling(self.maximum_tenure_months));
        }
        if self.minimum_tenure_months > self.maximum_tenure_months {
            return Err(PolicyError::TenureRange {
                minimum: self.minimum_tenure_months,
                maximum: self.maximum_tenure_months,
            });
        }
        if !(self.eligibility_income_multiple > 0.0) {
            return Err(PolicyError::NonPositive("eligibility_income_multiple"));
        }
        if !(self.credit_income_multiple > 0.0) {
            return Err(PolicyError::NonPositive("credit_income_multiple"));
        }
        if !(self.annual_interest_rate_percent >= 0.0) {
            return Err(PolicyError::NonPositive("annual_interest_rate_percent"));
        }
        if !(self.maximum_emi_to_income > 0.0 && self.maximum_emi_to_income <= 1.0) {
            return Err(PolicyError::EmiFraction(self.maximum_emi_to_income));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PolicyError {
    #[error("minimum tenure {minimum} exceeds maximum tenure {maximum}")]
    TenureRange { minimum: u32, maximum: u32 },
    #[error("{0} must be a positive number")]
    NonPositive(&'static str),
    #[error("maximum EMI-to-income fraction {0} must be within (0, 1]")]
    EmiFraction(f64),
    #[error("maximum tenure of {0} months exceeds the ceiling of {TENURE_CEILING_MONTHS} months")]
    TenureCeiling(u32),
}
