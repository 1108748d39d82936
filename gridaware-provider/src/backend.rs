//! Upstream API backends
//!
//! Two historical response shapes exist: a numeric-intensity endpoint
//! (classified locally) and a pre-categorized level endpoint (vendor
//! vocabulary mapped to ours). Both sit behind `IntensityBackend` and
//! produce the same normalized `ProviderReading`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use gridaware_core::{classify, IntensityTier, ProviderError, ProviderReading};
use reqwest::Client;
use serde_json::Value;
use std::net::IpAddr;
use std::time::Duration;

/// Upstream request timeout.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// One upstream lookup: credential plus either an explicit zone or the
/// visitor IP forwarded for server-side geolocation.
#[derive(Debug, Clone)]
pub struct BackendQuery {
    pub api_key: String,
    pub zone: Option<String>,
    pub forwarded_ip: Option<IpAddr>,
}

/// A carbon-intensity API backend.
///
/// Implementations must be thread-safe (Send + Sync) and must normalize
/// vendor vocabulary into the three-tier `IntensityTier`.
#[async_trait]
pub trait IntensityBackend: Send + Sync {
    async fn fetch(&self, query: &BackendQuery) -> Result<ProviderReading, ProviderError>;
}

// ============================================================================
// SHARED HTTP SKELETON
// ============================================================================

/// GET the endpoint and return the parsed JSON body.
///
/// The API key travels in the `auth-token` header; an explicit zone as a
/// query parameter; the visitor IP, when present, in `X-Forwarded-For` so
/// the upstream geolocates server-side. The raw IP never enters the URL.
async fn get_json(client: &Client, url: &str, query: &BackendQuery) -> Result<Value, ProviderError> {
    let mut request = client
        .get(url)
        .header("auth-token", &query.api_key)
        .timeout(REQUEST_TIMEOUT);

    if let Some(zone) = &query.zone {
        request = request.query(&[("zone", zone.as_str())]);
    } else if let Some(ip) = &query.forwarded_ip {
        request = request.header("X-Forwarded-For", ip.to_string());
    }

    let response = request.send().await.map_err(|e| ProviderError::Transport {
        reason: e.to_string(),
    })?;

    let status = response.status();
    let body = response.text().await.map_err(|e| ProviderError::Transport {
        reason: e.to_string(),
    })?;

    if !status.is_success() {
        return Err(ProviderError::UpstreamApi {
            status: status.as_u16(),
            message: extract_error_message(&body, status.canonical_reason()),
            body,
        });
    }

    serde_json::from_str(&body).map_err(|_| ProviderError::InvalidResponse {
        reason: "response body is not valid JSON".to_string(),
    })
}

/// Pull a human-readable message out of a JSON error body, preferring the
/// `message` then `error` fields, else the transport-level status text.
fn extract_error_message(body: &str, status_text: Option<&str>) -> String {
    if let Ok(parsed) = serde_json::from_str::<Value>(body) {
        for field in ["message", "error"] {
            if let Some(msg) = parsed.get(field).and_then(Value::as_str) {
                if !msg.is_empty() {
                    return msg.to_string();
                }
            }
        }
    }
    status_text.unwrap_or("unknown error").to_string()
}

/// Parse the upstream `datetime` field when present, else stamp with now.
fn reading_timestamp(data: &Value) -> DateTime<Utc> {
    data.get("datetime")
        .and_then(Value::as_str)
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(Utc::now)
}

fn zone_from(data: &Value, query: &BackendQuery) -> String {
    data.get("zone")
        .and_then(Value::as_str)
        .map(String::from)
        .or_else(|| query.zone.clone())
        .unwrap_or_else(|| "??".to_string())
}

// ============================================================================
// NUMERIC BACKEND
// ============================================================================

/// Backend for the numeric-intensity endpoint.
///
/// Reads `carbonIntensity` (gCO2eq/kWh) and classifies it locally with the
/// shared thresholds.
pub struct CarbonIntensityBackend {
    client: Client,
    base_url: String,
}

impl CarbonIntensityBackend {
    pub const DEFAULT_BASE_URL: &'static str = "https://api.electricitymap.org/v3";

    pub fn new() -> Self {
        Self::with_base_url(Self::DEFAULT_BASE_URL)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
        }
    }
}

impl Default for CarbonIntensityBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl IntensityBackend for CarbonIntensityBackend {
    async fn fetch(&self, query: &BackendQuery) -> Result<ProviderReading, ProviderError> {
        let url = format!("{}/carbon-intensity/latest", self.base_url);
        let data = get_json(&self.client, &url, query).await?;

        let carbon_intensity = data
            .get("carbonIntensity")
            .and_then(Value::as_f64)
            .ok_or(ProviderError::NoIntensityData)?;

        Ok(ProviderReading {
            zone: zone_from(&data, query),
            carbon_intensity: Some(carbon_intensity),
            intensity_level: classify(carbon_intensity),
            timestamp: reading_timestamp(&data),
        })
    }
}

impl std::fmt::Debug for CarbonIntensityBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CarbonIntensityBackend")
            .field("base_url", &self.base_url)
            .finish()
    }
}

// ============================================================================
// CATEGORICAL BACKEND
// ============================================================================

/// Backend for the pre-categorized level endpoint.
///
/// Reads `data[0].level` with vendor vocabulary `low | moderate | high`;
/// `moderate` maps to `Medium`, the others pass through.
pub struct SignalLevelBackend {
    client: Client,
    base_url: String,
}

impl SignalLevelBackend {
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
        }
    }

    fn map_level(level: &str) -> Result<IntensityTier, ProviderError> {
        match level.to_lowercase().as_str() {
            "low" => Ok(IntensityTier::Low),
            "moderate" => Ok(IntensityTier::Medium),
            "high" => Ok(IntensityTier::High),
            other => Err(ProviderError::InvalidResponse {
                reason: format!("unknown intensity level: {}", other),
            }),
        }
    }
}

#[async_trait]
impl IntensityBackend for SignalLevelBackend {
    async fn fetch(&self, query: &BackendQuery) -> Result<ProviderReading, ProviderError> {
        let url = format!("{}/signal/latest", self.base_url);
        let body = get_json(&self.client, &url, query).await?;

        let entry = body
            .get("data")
            .and_then(Value::as_array)
            .and_then(|a| a.first())
            .ok_or(ProviderError::NoIntensityData)?;

        let level = entry
            .get("level")
            .and_then(Value::as_str)
            .ok_or(ProviderError::NoIntensityData)?;

        Ok(ProviderReading {
            zone: zone_from(entry, query),
            carbon_intensity: entry.get("carbonIntensity").and_then(Value::as_f64),
            intensity_level: Self::map_level(level)?,
            timestamp: reading_timestamp(entry),
        })
    }
}

impl std::fmt::Debug for SignalLevelBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignalLevelBackend")
            .field("base_url", &self.base_url)
            .finish()
    }
}

// ============================================================================
// UNIT TESTS
// ============================================================================
