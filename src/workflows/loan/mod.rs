//! Loan application decision pipeline.
//!
//! An application moves through eligibility, identity verification, credit
//! assessment, and sanction. Each stage appends one outcome to the audit trail;
//! the first failing stage ends the run.

pub mod amortization;
pub mod artifacts;
pub mod domain;
pub mod identity;
pub mod intake;
pub mod pipeline;
pub mod policy;
pub mod router;
pub mod stages;
pub mod verifier;

#[cfg(test)]
mod tests;

pub use artifacts::{ArtifactRequestor, RenderError, SanctionPayload, TextLetterRenderer};
pub use domain::{
    ApplicationId, ApplicationState, ApplicationStatus, FailureKind, LoanApplication,
    PipelineResultView, StageName, StageOutcome, StageResult,
};
pub use intake::{ApplicationImportError, ApplicationImporter};
pub use pipeline::{DecisionPipeline, InputViolation, PipelineError};
pub use policy::{PolicyError, UnderwritingPolicy};
pub use router::{pipeline_router, EvaluationRequest};
pub use verifier::{
    DeterministicVerifier, IdentityVerification, VerificationError, VerificationStatus, Verifier,
};
