use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemoryNotifier, InMemoryRecordStore};
use crate::routes::with_marketplace_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use farmrent::config::AppConfig;
use farmrent::error::AppError;
use farmrent::telemetry;
use farmrent::workflows::marketplace::{AdminService, AdminTokens, MarketplaceService};
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::{error, info};

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

    let store = Arc::new(InMemoryRecordStore::default());
    let notifier = Arc::new(InMemoryNotifier::default());
    let marketplace = Arc::new(MarketplaceService::new(
        store.clone(),
        notifier,
        config.mail.from_address.clone(),
    ));
    let admin = Arc::new(AdminService::new(
        store,
        AdminTokens::new(&config.admin.token_secret),
    ));

    // Mirror of the deployment bootstrap: make sure the default admin exists
    // before the listener opens. Failure is logged, not fatal.
    if let Err(err) = admin
        .ensure_super_admin(&config.admin.email, &config.admin.password)
        .await
    {
        error!(error = %err, "super admin bootstrap failed");
    }

    let app = with_marketplace_routes(marketplace, admin)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "marketplace API ready");

    axum::serve(listener, app).await?;
    Ok(())
}
