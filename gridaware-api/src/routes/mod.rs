//! Route registration and cross-cutting response policy.

pub mod intensity;
pub mod settings;

use std::sync::Arc;

use axum::{
    extract::Request,
    http::header::{HeaderValue, CACHE_CONTROL},
    middleware::{self, Next},
    response::Response,
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::state::ApiState;

/// Build the full API router.
pub fn create_api_router(state: Arc<ApiState>) -> Router {
    Router::new()
        .route(
            "/v1/settings",
            get(settings::get_settings).post(settings::update_settings),
        )
        .route("/v1/intensity", get(intensity::get_current_intensity))
        .route("/v1/test-api", post(intensity::test_api_connection))
        .layer(middleware::from_fn(no_store_on_override))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Responses to requests carrying a manual intensity override must never
/// be cached: the override is per-visitor, the page output varies with it.
async fn no_store_on_override(request: Request, next: Next) -> Response {
    let has_override = request
        .uri()
        .query()
        .map(|q| q.split('&').any(|p| p.starts_with("grid_intensity=")))
        .unwrap_or(false);

    let mut response = next.run(request).await;
    if has_override {
        response.headers_mut().insert(
            CACHE_CONTROL,
            HeaderValue::from_static("no-store, no-cache, must-revalidate, max-age=0"),
        );
    }
    response
}
