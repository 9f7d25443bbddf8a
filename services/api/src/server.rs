use crate::cli::ServeArgs;
use crate::infra::{effective_policy, AppState};
use crate::routes::router;
use axum_prometheus::PrometheusMetricLayer;
use dcm_advisor::config::AppConfig;
use dcm_advisor::error::AppError;
use dcm_advisor::telemetry::{self, LogSink};
use std::sync::atomic::Ordering;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry, LogSink::Stdout)?;

    let engine = config.engine.build_engine()?;
    let policy = effective_policy(&config.engine, args.strict);

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let app_state = AppState::new(engine, policy, prometheus_handle);
    let readiness_flag = app_state.readiness.clone();

    let app = router(app_state).layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, ?policy, "dcm advisor ready");

    axum::serve(listener, app).await?;
    Ok(())
}
