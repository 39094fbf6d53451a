use crate::cli::ServeArgs;
use crate::infra::{build_pipeline, AppState};
use crate::routes::with_pipeline_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use loan_sanction::config::AppConfig;
use loan_sanction::error::AppError;
use loan_sanction::telemetry;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let pipeline = Arc::new(build_pipeline(&config)?);

    let app = with_pipeline_routes(pipeline)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        min_credit_score = config.policy.minimum_credit_score,
        annual_rate = config.policy.annual_interest_rate_percent,
        "loan decision service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
