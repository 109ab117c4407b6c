use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use farmrent::workflows::marketplace::{
    admin_router, marketplace_router, AdminService, MarketplaceService, Notifier, RecordStore,
};
use serde_json::json;
use std::sync::Arc;

pub(crate) fn with_marketplace_routes<S, N>(
    service: Arc<MarketplaceService<S, N>>,
    admin: Arc<AdminService<S>>,
) -> axum::Router
where
    S: RecordStore + 'static,
    N: Notifier + 'static,
{
    marketplace_router(service)
        .merge(admin_router(admin))
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok", "message": "FarmRent API is running" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}
