use serde_json::json;
use std::sync::Arc;

use super::{Stage, StageReport, SERVICE_UNAVAILABLE_PREFIX};
use crate::workflows::loan::domain::{ApplicationState, FailureKind, StageName};
use crate::workflows::loan::identity::{
    is_valid_aadhaar, is_valid_mobile, is_valid_pan, mask_aadhaar, mask_mobile, normalize_pan,
};
use crate::workflows::loan::verifier::Verifier;

/// KYC check of the PAN and Aadhaar numbers.
///
/// Malformed numbers are rejected locally; well-formed ones are confirmed with
/// the verifier.
pub struct IdentityVerificationStage<V> {
    verifier: Arc<V>,
}

impl<V: Verifier> IdentityVerificationStage<V> {
    pub fn new(verifier: Arc<V>) -> Self {
        Self { verifier }
    }
}

impl<V: Verifier> Stage for IdentityVerificationStage<V> {
    fn name(&self) -> StageName {
        StageName::Identity
    }

    fn evaluate(&self, state: &ApplicationState) -> StageReport {
        let application = state.application();
        let pan = normalize_pan(&application.pan);
        let aadhaar = application.aadhaar.trim();

        let mut problems = Vec::new();
        if !is_valid_pan(&pan) {
            problems.push("primary identifier (PAN) must be 5 letters, 4 digits, 1 letter");
        }
        if !is_valid_aadhaar(aadhaar) {
            problems.push("secondary identifier (Aadhaar) must be exactly 12 digits");
        }
        if !problems.is_empty() {
            return StageReport::rejected(problems.join("; "));
        }

        let verdict = match self.verifier.verify_identity(&pan, aadhaar) {
            Ok(verdict) => verdict,
            Err(err) => {
                return StageReport::failed(
                    FailureKind::ServiceUnavailable,
                    format!("{SERVICE_UNAVAILABLE_PREFIX}: identity check failed: {err}"),
                )
            }
        };

        let data = json!({
            "pan_verified": verdict.primary.is_verified(),
            "aadhaar_verified": verdict.secondary.is_verified(),
            "aadhaar_masked": mask_aadhaar(aadhaar),
            "mobile_verified": is_valid_mobile(&application.mobile),
            "mobile_masked": mask_mobile(&application.mobile),
        });

        let mut rejected = Vec::new();
        if !verdict.primary.is_verified() {
            rejected.push("primary identifier (PAN) could not be verified");
        }
        if !verdict.secondary.is_verified() {
            rejected.push("secondary identifier (Aadhaar) could not be verified");
        }
        if !rejected.is_empty() {
            return StageReport::rejected(rejected.join("; ")).with_data(data);
        }

        StageReport::success("identity verified").with_data(data)
    }
}
