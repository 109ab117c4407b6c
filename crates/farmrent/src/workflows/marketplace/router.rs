use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;

use super::admin::{AdminError, AdminService};
use super::domain::{InterestSubmission, LandlordSubmission, SignupRequest};
use super::notifier::Notifier;
use super::pagination::PageRequest;
use super::service::{MarketplaceError, MarketplaceService};
use super::store::{RecordStore, StoreError};

/// Router builder exposing the public endpoints: the health probe and the
/// three submission routes.
pub fn marketplace_router<S, N>(service: Arc<MarketplaceService<S, N>>) -> Router
where
    S: RecordStore + 'static,
    N: Notifier + 'static,
{
    Router::new()
        .route("/api/health", get(health_handler))
        .route("/api/farmer", post(submit_interest_handler::<S, N>))
        .route("/api/landlord", post(post_land_handler::<S, N>))
        .route("/api/signup", post(sign_up_handler::<S, N>))
        .with_state(service)
}

pub(crate) async fn health_handler() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok", "message": "FarmRent API is running" }))
}

/// Router builder for the admin surface. Every route except `login` expects
/// an `Authorization: Bearer <token>` header.
pub fn admin_router<S>(admin: Arc<AdminService<S>>) -> Router
where
    S: RecordStore + 'static,
{
    Router::new()
        .route("/api/admin/login", post(login_handler::<S>))
        .route("/api/admin/landlords", get(landlords_handler::<S>))
        .route("/api/admin/farmers", get(farmers_handler::<S>))
        .route("/api/admin/signups", get(signups_handler::<S>))
        .route("/api/admin/stats", get(stats_handler::<S>))
        .with_state(admin)
}

pub(crate) async fn submit_interest_handler<S, N>(
    State(service): State<Arc<MarketplaceService<S, N>>>,
    Json(submission): Json<InterestSubmission>,
) -> Response
where
    S: RecordStore + 'static,
    N: Notifier + 'static,
{
    match service.submit_interest(submission).await {
        Ok(outcome) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "message": "Farmer interest submitted successfully",
                "matches": outcome.matches,
            })),
        )
            .into_response(),
        Err(err) => marketplace_error_response(err),
    }
}

pub(crate) async fn post_land_handler<S, N>(
    State(service): State<Arc<MarketplaceService<S, N>>>,
    Json(submission): Json<LandlordSubmission>,
) -> Response
where
    S: RecordStore + 'static,
    N: Notifier + 'static,
{
    match service.post_land(submission).await {
        Ok(stored) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "message": "Landlord post created successfully",
                "id": stored.id,
            })),
        )
            .into_response(),
        Err(err) => marketplace_error_response(err),
    }
}

pub(crate) async fn sign_up_handler<S, N>(
    State(service): State<Arc<MarketplaceService<S, N>>>,
    Json(request): Json<SignupRequest>,
) -> Response
where
    S: RecordStore + 'static,
    N: Notifier + 'static,
{
    match service.sign_up(request).await {
        Ok(_) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "message": "Thank you for signing up!",
            })),
        )
            .into_response(),
        Err(err) => marketplace_error_response(err),
    }
}

fn marketplace_error_response(error: MarketplaceError) -> Response {
    match error {
        MarketplaceError::Validation(err) => (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": err.to_string() })),
        )
            .into_response(),
        MarketplaceError::Store(StoreError::Unavailable(_)) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "error": "Record store unavailable. Please try again later." })),
        )
            .into_response(),
        MarketplaceError::Store(other) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": other.to_string() })),
        )
            .into_response(),
    }
}

#[derive(Debug, Deserialize)]
struct LoginRequest {
    #[serde(default)]
    email: String,
    #[serde(default)]
    password: String,
}

pub(crate) async fn login_handler<S>(
    State(admin): State<Arc<AdminService<S>>>,
    Json(request): Json<LoginRequest>,
) -> Response
where
    S: RecordStore + 'static,
{
    if request.email.is_empty() || request.password.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "success": false,
                "error": "Email and password are required",
            })),
        )
            .into_response();
    }

    match admin.login(&request.email, &request.password).await {
        Ok(outcome) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "token": outcome.token,
                "admin": outcome.admin,
            })),
        )
            .into_response(),
        Err(AdminError::InvalidCredentials) => (
            StatusCode::UNAUTHORIZED,
            Json(json!({
                "success": false,
                "error": "Invalid credentials",
            })),
        )
            .into_response(),
        Err(err) => admin_error_response(err),
    }
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({ "error": "Unauthorized" })),
    )
        .into_response()
}

fn admin_error_response(error: AdminError) -> Response {
    match error {
        AdminError::Store(StoreError::Unavailable(_)) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "error": "Record store unavailable. Please try again later." })),
        )
            .into_response(),
        _ => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": "Internal server error" })),
        )
            .into_response(),
    }
}

pub(crate) async fn landlords_handler<S>(
    State(admin): State<Arc<AdminService<S>>>,
    headers: HeaderMap,
    Query(page): Query<PageRequest>,
) -> Response
where
    S: RecordStore + 'static,
{
    let Some(token) = bearer_token(&headers) else {
        return unauthorized();
    };
    if admin.authorize(token).is_err() {
        return unauthorized();
    }

    match admin.landlords(&page).await {
        Ok(page) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "data": page.data,
                "pagination": page.pagination,
            })),
        )
            .into_response(),
        Err(err) => admin_error_response(err),
    }
}

pub(crate) async fn farmers_handler<S>(
    State(admin): State<Arc<AdminService<S>>>,
    headers: HeaderMap,
    Query(page): Query<PageRequest>,
) -> Response
where
    S: RecordStore + 'static,
{
    let Some(token) = bearer_token(&headers) else {
        return unauthorized();
    };
    if admin.authorize(token).is_err() {
        return unauthorized();
    }

    match admin.farmers(&page).await {
        Ok(page) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "data": page.data,
                "pagination": page.pagination,
            })),
        )
            .into_response(),
        Err(err) => admin_error_response(err),
    }
}

pub(crate) async fn signups_handler<S>(
    State(admin): State<Arc<AdminService<S>>>,
    headers: HeaderMap,
    Query(page): Query<PageRequest>,
) -> Response
where
    S: RecordStore + 'static,
{
    let Some(token) = bearer_token(&headers) else {
        return unauthorized();
    };
    if admin.authorize(token).is_err() {
        return unauthorized();
    }

    match admin.signups(&page).await {
        Ok(page) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "data": page.data,
                "pagination": page.pagination,
            })),
        )
            .into_response(),
        Err(err) => admin_error_response(err),
    }
}

pub(crate) async fn stats_handler<S>(
    State(admin): State<Arc<AdminService<S>>>,
    headers: HeaderMap,
) -> Response
where
    S: RecordStore + 'static,
{
    let Some(token) = bearer_token(&headers) else {
        return unauthorized();
    };
    if admin.authorize(token).is_err() {
        return unauthorized();
    }

    match admin.stats().await {
        Ok(stats) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "data": stats,
            })),
        )
            .into_response(),
        Err(err) => admin_error_response(err),
    }
}
