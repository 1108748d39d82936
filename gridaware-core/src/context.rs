//! Per-request context passed explicitly to every transformer
//!
//! Replaces ambient request-global state: the effective intensity is
//! resolved once, then travels read-only through the render pipeline.

use crate::{FeatureSettings, IntensityTier};
use serde::{Deserialize, Serialize};

/// Presentation variant for medium-tier image treatment.
///
/// Both historical designs are supported; `Overlay` keeps the image visible
/// under an always-visible notice, `Blur` reproduces the earlier blurred
/// wrapper styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MediumImageStyle {
    #[default]
    Overlay,
    Blur,
}

/// Toggles for presentation variants that evolved across revisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransformOptions {
    /// Medium-tier image presentation
    pub medium_image_style: MediumImageStyle,
    /// Emit the deferred custom-element video embed at low/live tiers
    pub lite_embed: bool,
}

impl Default for TransformOptions {
    fn default() -> Self {
        Self {
            medium_image_style: MediumImageStyle::Overlay,
            lite_embed: true,
        }
    }
}

/// Immutable per-request state: the resolved tier plus the merged settings.
///
/// Built exactly once per incoming request; every transformer reads the same
/// resolved value, so a cache lapse mid-render cannot split the page across
/// tiers.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestContext {
    pub intensity: IntensityTier,
    pub settings: FeatureSettings,
    pub options: TransformOptions,
}

impl RequestContext {
    pub fn new(intensity: IntensityTier, settings: FeatureSettings) -> Self {
        Self {
            intensity,
            settings,
            options: TransformOptions::default(),
        }
    }

    pub fn with_options(mut self, options: TransformOptions) -> Self {
        self.options = options;
        self
    }
}
