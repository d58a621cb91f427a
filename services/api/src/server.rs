use crate::cli::ServeArgs;
use crate::infra::{build_service, AppState};
use crate::routes::with_recruitment_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use swifthire::config::AppConfig;
use swifthire::error::AppError;
use swifthire::telemetry;
use tracing::{info, warn, Instrument};

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry, config.environment)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    if config.assistant.api_key.is_none() {
        warn!("ASSISTANT_API_KEY not set; assistant endpoints will return fallback payloads");
    }
    let service = build_service(&config);

    let app = with_recruitment_routes(service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|source| AppError::Bind { addr, source })?;
    readiness_flag.store(true, Ordering::Release);

    let span = telemetry::service_span(config.environment, addr);
    async move {
        info!("swifthire api ready");
        axum::serve(listener, app).await.map_err(AppError::Serve)
    }
    .instrument(span)
    .await
}
