use crate::cli::ServeArgs;
use crate::infra::{seeded_sources, AppState};
use crate::routes::with_tracking_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use placement_hub::config::AppConfig;
use placement_hub::error::AppError;
use placement_hub::telemetry;
use placement_hub::tracking::ApplicationTracker;
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

    let (directs, internships) = seeded_sources();
    let tracker = Arc::new(ApplicationTracker::new(directs, internships));

    let app = with_tracking_routes(tracker)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "application tracking service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
