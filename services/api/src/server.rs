use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemoryManualReviewRepository};
use crate::routes::with_review_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use review_insights::config::AppConfig;
use review_insights::error::AppError;
use review_insights::telemetry;
use review_insights::workflows::notes::NoteReviewService;
use review_insights::workflows::performance::ReviewProvider;
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

    let provider = ReviewProvider::from_config(&config.review)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
        provider: provider.clone(),
    };

    let repository = Arc::new(InMemoryManualReviewRepository::default());
    let note_service = Arc::new(NoteReviewService::new(repository));

    let app = with_review_routes(note_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        provider = provider.name(),
        "review insights service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
