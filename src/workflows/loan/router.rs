use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use serde::Deserialize;
use serde_json::json;

use super::artifacts::ArtifactRequestor;
use super::domain::{ApplicationId, ApplicationState, LoanApplication};
use super::pipeline::{DecisionPipeline, PipelineError};
use super::verifier::Verifier;

/// Request body: the caller-assigned id plus the applicant inputs.
#[derive(Debug, Clone, Deserialize)]
pub struct EvaluationRequest {
    pub application_id: u64,
    #[serde(flatten)]
    pub application: LoanApplication,
}

/// Router exposing a single synchronous evaluation endpoint.
pub fn pipeline_router<V, A>(pipeline: Arc<DecisionPipeline<V, A>>) -> Router
where
    V: Verifier + 'static,
    A: ArtifactRequestor + 'static,
{
    Router::new()
        .route("/api/v1/loans/evaluate", post(evaluate_handler::<V, A>))
        .with_state(pipeline)
}

pub(crate) async fn evaluate_handler<V, A>(
    State(pipeline): State<Arc<DecisionPipeline<V, A>>>,
    axum::Json(request): axum::Json<EvaluationRequest>,
) -> Response
where
    V: Verifier + 'static,
    A: ArtifactRequestor + 'static,
{
    let state = ApplicationState::new(ApplicationId(request.application_id), request.application);

    match pipeline.run(state) {
        Ok(finished) => (StatusCode::OK, axum::Json(finished.result_view())).into_response(),
        Err(PipelineError::InvalidInput(violation)) => {
            let payload = json!({
                "application_id": request.application_id,
                "error": violation.to_string(),
            });
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
        }
        Err(other) => {
            let payload = json!({
                "error": other.to_string(),
            });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}
