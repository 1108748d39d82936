//! Shared application state for the Axum router.

use std::sync::Arc;

use gridaware_provider::GridIntensityProvider;

use crate::settings_store::SettingsStore;

/// Application-wide state shared across all routes.
pub struct ApiState {
    /// Cached access to the upstream carbon-intensity API.
    pub provider: GridIntensityProvider,
    /// Settings persistence, global and per-page.
    pub settings: Arc<dyn SettingsStore>,
}

impl ApiState {
    pub fn new(provider: GridIntensityProvider, settings: Arc<dyn SettingsStore>) -> Arc<Self> {
        Arc::new(Self { provider, settings })
    }
}

impl std::fmt::Debug for ApiState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiState")
            .field("provider", &self.provider)
            .finish()
    }
}
