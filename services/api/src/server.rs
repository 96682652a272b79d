use crate::cli::ServeArgs;
use crate::infra::{sharepoint_client, AppState, InMemoryListStore};
use crate::routes::with_service_routes;
use applications_form::config::AppConfig;
use applications_form::error::AppError;
use applications_form::forms::applications::{ApplicationFormController, ListStore, LoadOutcome};
use applications_form::telemetry;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::{info, warn};

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    if args.store.in_memory {
        info!("using in-memory applications list");
        serve(config, Arc::new(InMemoryListStore::default())).await
    } else {
        let client = sharepoint_client(&config.store)?;
        info!(list = client.list_name(), "using SharePoint applications list");
        serve(config, Arc::new(client)).await
    }
}

async fn serve<S>(config: AppConfig, store: Arc<S>) -> Result<(), AppError>
where
    S: ListStore + 'static,
{
    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let controller = Arc::new(ApplicationFormController::new(store, config.form));
    match controller.load_items().await {
        LoadOutcome::Loaded { count } => info!(count, "initial applications list loaded"),
        LoadOutcome::Failed(_) => warn!("starting with an empty applications list"),
    }

    let app = with_service_routes(controller)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "applications form ready");

    axum::serve(listener, app).await?;
    Ok(())
}
