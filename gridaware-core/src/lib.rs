//! GRIDAWARE CORE - Shared data types
//!
//! Intensity tiers, the carbon-intensity classifier, provider readings,
//! two-scope feature settings, the per-request context, and the error
//! taxonomy shared by every Gridaware crate.

mod context;
mod error;
mod reading;
mod settings;
mod tier;

pub use context::{MediumImageStyle, RequestContext, TransformOptions};
pub use error::{GridError, GridResult, ProviderError};
pub use reading::ProviderReading;
pub use settings::{FeatureSettings, PostId, SettingsScope, StoredSettings};
pub use tier::{classify, EffectiveIntensity, IntensityTier, TierParseError};
