//! Intensity endpoints
//!
//! `GET /v1/intensity` is public: it serves the reading the frontend
//! info bar polls. `POST /v1/test-api` is the admin credential check.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::HeaderMap,
    Json,
};
use gridaware_core::ProviderReading;
use gridaware_provider::VisitorRequest;
use serde::{Deserialize, Serialize};

use crate::error::{ApiError, ApiResult};
use crate::state::ApiState;

#[derive(Debug, Deserialize)]
pub struct IntensityQuery {
    pub zone: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct TestApiRequest {
    pub api_key: String,
    pub zone: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct TestApiResponse {
    pub success: bool,
    pub message: String,
    pub data: ProviderReading,
}

/// Rebuild the visitor's identity from the forwarding headers the host
/// proxy sets.
fn visitor_request(headers: &HeaderMap) -> VisitorRequest {
    let mut request = VisitorRequest::new(None);
    for name in ["client-ip", "x-forwarded-for"] {
        if let Some(value) = headers.get(name).and_then(|v| v.to_str().ok()) {
            request = request.with_header(name, value);
        }
    }
    request
}

/// GET /v1/intensity
pub async fn get_current_intensity(
    State(state): State<Arc<ApiState>>,
    Query(query): Query<IntensityQuery>,
    headers: HeaderMap,
) -> ApiResult<Json<ProviderReading>> {
    let reading = match query.zone.as_deref().filter(|z| !z.trim().is_empty()) {
        Some(zone) => state.provider.fetch_zone(zone.trim(), None).await?,
        None => {
            state
                .provider
                .fetch_current(&visitor_request(&headers), None)
                .await?
        }
    };
    Ok(Json(reading))
}

/// POST /v1/test-api
pub async fn test_api_connection(
    State(state): State<Arc<ApiState>>,
    Json(request): Json<TestApiRequest>,
) -> ApiResult<Json<TestApiResponse>> {
    let api_key = request.api_key.trim();
    if api_key.is_empty() {
        return Err(ApiError::missing_field("api_key"));
    }

    let zone = request.zone.as_deref().map(str::trim).filter(|z| !z.is_empty());
    let reading = state.provider.verify_credentials(api_key, zone).await?;

    Ok(Json(TestApiResponse {
        success: true,
        message: "API connection successful.".to_string(),
        data: reading,
    }))
}
