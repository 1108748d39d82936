//! Settings endpoints
//!
//! Reads return the stored ("0"/"1"-shaped) settings; page reads merge
//! the page override over the global value key by key. Writes sanitize
//! against the existing value at the addressed scope, so a malformed
//! payload can never corrupt stored state.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};
use gridaware_core::{PostId, SettingsScope, StoredSettings};
use serde::Deserialize;

use crate::error::ApiResult;
use crate::state::ApiState;

#[derive(Debug, Deserialize)]
pub struct SettingsQuery {
    pub post_id: Option<PostId>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateSettingsRequest {
    pub options: StoredSettings,
    pub post_id: Option<PostId>,
}

/// GET /v1/settings
pub async fn get_settings(
    State(state): State<Arc<ApiState>>,
    Query(query): Query<SettingsQuery>,
) -> ApiResult<Json<StoredSettings>> {
    let global = state.settings.global_or_default();

    if let Some(post_id) = query.post_id {
        if let Some(page) = state.settings.get(SettingsScope::Page(post_id)) {
            return Ok(Json(StoredSettings::merged(&global, Some(&page))));
        }
    }
    Ok(Json(global))
}

/// POST /v1/settings
pub async fn update_settings(
    State(state): State<Arc<ApiState>>,
    Json(request): Json<UpdateSettingsRequest>,
) -> ApiResult<Json<StoredSettings>> {
    let scope = match request.post_id {
        Some(post_id) => SettingsScope::Page(post_id),
        None => SettingsScope::Global,
    };

    // Page writes sanitize against the page's effective value (page over
    // global), so a partial payload inherits what the page currently
    // renders with rather than the site defaults.
    let baseline = match scope {
        SettingsScope::Global => state.settings.get(scope),
        SettingsScope::Page(_) => Some(StoredSettings::merged(
            &state.settings.global_or_default(),
            state.settings.get(scope).as_ref(),
        )),
    };
    let sanitized = StoredSettings::sanitize(&request.options, baseline.as_ref());

    tracing::info!(?scope, "settings updated");
    state.settings.set(scope, sanitized.clone());
    Ok(Json(sanitized))
}
