use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::{DateTime, TimeZone, Utc};
use serde_json::Value;

use crate::workflows::loan::artifacts::{ArtifactRequestor, RenderError, SanctionPayload};
use crate::workflows::loan::domain::{ApplicationId, ApplicationState, LoanApplication};
use crate::workflows::loan::pipeline::DecisionPipeline;
use crate::workflows::loan::policy::UnderwritingPolicy;
use crate::workflows::loan::verifier::{
    DeterministicVerifier, IdentityVerification, VerificationError, Verifier,
};

pub(super) fn application() -> LoanApplication {
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

pub(super) fn state_with(id: u64, edit: impl FnOnce(&mut LoanApplication)) -> ApplicationState {
    let mut application = application();
    edit(&mut application);
    ApplicationState::new(ApplicationId(id), application)
}

pub(super) fn fixed_clock() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 1, 10, 0, 0)
        .single()
        .expect("valid timestamp")
}

/// Renderer double that remembers every payload it was asked to issue.
#[derive(Default)]
pub(super) struct MemoryRenderer {
    issued: Mutex<Vec<SanctionPayload>>,
}

impl MemoryRenderer {
    pub(super) fn issued(&self) -> Vec<SanctionPayload> {
        self.issued.lock().expect("renderer mutex poisoned").clone()
    }
}

impl ArtifactRequestor for MemoryRenderer {
    fn issue(&self, payload: &SanctionPayload) -> Result<String, RenderError> {
        self.issued
            .lock()
            .expect("renderer mutex poisoned")
            .push(payload.clone());
        Ok(format!("/letters/{}.pdf", payload.application_id))
    }
}

pub(super) struct BrokenRenderer;

impl ArtifactRequestor for BrokenRenderer {
    fn issue(&self, _payload: &SanctionPayload) -> Result<String, RenderError> {
        Err(RenderError::Rejected("template engine crashed".to_string()))
    }
}

/// Verifier double that delegates to the deterministic verifier and counts calls.
#[derive(Default)]
pub(super) struct CountingVerifier {
    inner: DeterministicVerifier,
    identity_calls: AtomicUsize,
    score_calls: AtomicUsize,
}

impl CountingVerifier {
    pub(super) fn identity_calls(&self) -> usize {
        self.identity_calls.load(Ordering::SeqCst)
    }

    pub(super) fn score_calls(&self) -> usize {
        self.score_calls.load(Ordering::SeqCst)
    }
}

impl Verifier for CountingVerifier {
    fn verify_identity(
        &self,
        primary_id: &str,
        secondary_id: &str,
    ) -> Result<IdentityVerification, VerificationError> {
        self.identity_calls.fetch_add(1, Ordering::SeqCst);
        self.inner.verify_identity(primary_id, secondary_id)
    }

    fn credit_score(&self, primary_id: &str) -> Result<u16, VerificationError> {
        self.score_calls.fetch_add(1, Ordering::SeqCst);
        self.inner.credit_score(primary_id)
    }
}

/// Identity lookups succeed, the credit bureau is down.
pub(super) struct BureauOutageVerifier;

impl Verifier for BureauOutageVerifier {
    fn verify_identity(
        &self,
        primary_id: &str,
        secondary_id: &str,
    ) -> Result<IdentityVerification, VerificationError> {
        DeterministicVerifier::default().verify_identity(primary_id, secondary_id)
    }

    fn credit_score(&self, _primary_id: &str) -> Result<u16, VerificationError> {
        Err(VerificationError::Unavailable("bureau timeout".to_string()))
    }
}

pub(super) type TestPipeline = DecisionPipeline<CountingVerifier, MemoryRenderer>;

pub(super) fn build_pipeline() -> (TestPipeline, Arc<CountingVerifier>, Arc<MemoryRenderer>) {
    let verifier = Arc::new(CountingVerifier::default());
    let renderer = Arc::new(MemoryRenderer::default());
    let pipeline = DecisionPipeline::new(
        UnderwritingPolicy::default(),
        verifier.clone(),
        renderer.clone(),
    )
    .expect("default policy is valid")
    .with_clock(fixed_clock);
    (pipeline, verifier, renderer)
}

pub(super) async fn response_json(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body collects");
    serde_json::from_slice(&bytes).expect("body is json")
}
