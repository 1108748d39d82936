//! Provider readings: one normalized carbon-intensity sample

use crate::IntensityTier;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One carbon-intensity sample for a zone, normalized across backends.
///
/// Produced by an upstream API call or read back from cache; immutable once
/// produced. The numeric value is absent for backends that only report a
/// categorical level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderReading {
    /// Grid zone code (e.g. "FR", "DE", "US-CA")
    pub zone: String,
    /// Raw intensity in gCO2eq/kWh, when the backend reports one
    #[serde(rename = "carbonIntensity", skip_serializing_if = "Option::is_none")]
    pub carbon_intensity: Option<f64>,
    /// Normalized three-tier level
    pub intensity_level: IntensityTier,
    /// When the sample was produced upstream (or fetched, if unreported)
    pub timestamp: DateTime<Utc>,
}

impl ProviderReading {
    /// Build a reading from a numeric sample, classifying it locally.
    pub fn from_numeric(zone: impl Into<String>, carbon_intensity: f64, timestamp: DateTime<Utc>) -> Self {
        Self {
            zone: zone.into(),
            carbon_intensity: Some(carbon_intensity),
            intensity_level: crate::classify(carbon_intensity),
            timestamp,
        }
    }

    /// Build a reading from a pre-categorized level.
    pub fn from_level(zone: impl Into<String>, level: IntensityTier, timestamp: DateTime<Utc>) -> Self {
        Self {
            zone: zone.into(),
            carbon_intensity: None,
            intensity_level: level,
            timestamp,
        }
    }
}
