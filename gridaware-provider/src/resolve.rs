//! Per-request effective-intensity resolution
//!
//! Combines the explicit override parameter with the provider's live
//! reading. Resolved exactly once per request; the result travels in the
//! `RequestContext` so every transformer sees the same tier.

use crate::ip::VisitorRequest;
use crate::provider::GridIntensityProvider;
use gridaware_core::{EffectiveIntensity, IntensityTier};

/// Resolves one effective tier per request.
pub struct IntensityResolver<'a> {
    provider: &'a GridIntensityProvider,
}

impl<'a> IntensityResolver<'a> {
    pub fn new(provider: &'a GridIntensityProvider) -> Self {
        Self { provider }
    }

    /// Resolve the effective tier for one request.
    ///
    /// A pinned override wins without touching the provider. Otherwise the
    /// provider is asked once; any provider error degrades to `Low` — a
    /// failing third-party signal must never break page rendering.
    pub async fn resolve(
        &self,
        override_param: Option<&str>,
        request: &VisitorRequest,
    ) -> IntensityTier {
        match EffectiveIntensity::from_override(override_param) {
            EffectiveIntensity::Pinned(tier) => tier,
            EffectiveIntensity::Live => match self.provider.fetch_current(request, None).await {
                Ok(reading) => reading.intensity_level,
                Err(err) => {
                    tracing::warn!(error = %err, "intensity resolution failed, defaulting to low");
                    IntensityTier::Low
                }
            },
        }
    }
}

// ============================================================================
// UNIT TESTS
// ============================================================================
