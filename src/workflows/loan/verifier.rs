use serde::{Deserialize, Serialize};

use super::identity::{is_valid_aadhaar, is_valid_pan};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VerificationStatus {
    Verified,
    Invalid,
}

impl VerificationStatus {
    pub fn is_verified(self) -> bool {
        self == Self::Verified
    }
}

/// Per-identifier verdict returned by a verification service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityVerification {
    pub primary: VerificationStatus,
    pub secondary: VerificationStatus,
}

/// Identity and credit bureau boundary consulted by the pipeline stages.
///
/// Implementations must be idempotent and free of side effects observable by
/// the pipeline.
pub trait Verifier: Send + Sync {
    fn verify_identity(
        &self,
        primary_id: &str,
        secondary_id: &str,
    ) -> Result<IdentityVerification, VerificationError>;

    fn credit_score(&self, primary_id: &str) -> Result<u16, VerificationError>;
}

/// Operational failure talking to a verification service.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VerificationError {
    #[error("service unreachable: {0}")]
    Unavailable(String),
    #[error("malformed response: {0}")]
    Malformed(String),
}

/// Offline verifier: identifiers verify when well formed and every PAN maps
/// to the same configured score.
#[derive(Debug, Clone)]
pub struct DeterministicVerifier {
    credit_score: u16,
}

impl DeterministicVerifier {
    pub const DEFAULT_CREDIT_SCORE: u16 = 750;

    pub fn new(credit_score: u16) -> Self {
        Self { credit_score }
    }
}

impl Default for DeterministicVerifier {
    fn default() -> Self {
        Self::new(Self::DEFAULT_CREDIT_SCORE)
    }
}

impl Verifier for DeterministicVerifier {
    fn verify_identity(
        &self,
        primary_id: &str,
        secondary_id: &str,
    ) -> Result<IdentityVerification, VerificationError> {
        let status = |valid: bool| {
            if valid {
                VerificationStatus::Verified
            } else {
                VerificationStatus::Invalid
            }
        };

        Ok(IdentityVerification {
            primary: status(is_valid_pan(primary_id)),
            secondary: status(is_valid_aadhaar(secondary_id)),
        })
    }

    fn credit_score(&self, _primary_id: &str) -> Result<u16, VerificationError> {
        Ok(self.credit_score)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deterministic_verifier_checks_formats() {
        let verifier = DeterministicVerifier::default();
        let verdict = verifier
            .verify_identity("ABCDE1234F", "12341234")
            .expect("offline verifier never fails");
        assert_eq!(verdict.primary, VerificationStatus::Verified);
        assert_eq!(verdict.secondary, VerificationStatus::Invalid);
    }

    #[test]
    fn deterministic_verifier_returns_configured_score() {
        let verifier = DeterministicVerifier::new(640);
        assert_eq!(verifier.credit_score("ABCDE1234F"), Ok(640));
        assert_eq!(verifier.credit_score("ZZZZZ9999Z"), Ok(640));
    }
}
