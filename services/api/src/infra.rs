use loan_sanction::config::AppConfig;
use loan_sanction::error::AppError;
use loan_sanction::workflows::loan::{
    DecisionPipeline, DeterministicVerifier, TextLetterRenderer,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

pub(crate) type ServicePipeline = DecisionPipeline<DeterministicVerifier, TextLetterRenderer>;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Wires the offline verifier and the on-disk letter renderer under the configured policy.
pub(crate) fn build_pipeline(config: &AppConfig) -> Result<ServicePipeline, AppError> {
    let verifier = Arc::new(DeterministicVerifier::new(config.verifier.credit_score));
    let renderer = Arc::new(TextLetterRenderer::new(
        config.artifacts.output_dir.clone(),
        config.artifacts.url_prefix.clone(),
    ));

    Ok(DecisionPipeline::new(
        config.policy.clone(),
        verifier,
        renderer,
    )?)
}
