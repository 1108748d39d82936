//! Error types for Gridaware operations

use thiserror::Error;

/// Upstream carbon-intensity provider errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProviderError {
    #[error("carbon-intensity API key is required")]
    MissingCredential,

    #[error("carbon-intensity API error ({status}): {message}")]
    UpstreamApi {
        status: u16,
        message: String,
        /// Raw response body, kept for diagnostics
        body: String,
    },

    #[error("invalid response from carbon-intensity API: {reason}")]
    InvalidResponse { reason: String },

    #[error("transport failure reaching carbon-intensity API: {reason}")]
    Transport { reason: String },

    #[error("no carbon intensity data available in the API response")]
    NoIntensityData,
}

/// Master error type for all Gridaware errors.
///
/// Settings sanitization never fails (invalid input coerces to defaults),
/// so the only fallible paths are the provider and tier-name parsing.
#[derive(Debug, Clone, Error)]
pub enum GridError {
    #[error("provider error: {0}")]
    Provider(#[from] ProviderError),

    #[error("intensity override error: {0}")]
    Tier(#[from] crate::tier::TierParseError),
}

/// Result type alias for Gridaware operations.
pub type GridResult<T> = Result<T, GridError>;

// =============================================================================
// TESTS
// =============================================================================
