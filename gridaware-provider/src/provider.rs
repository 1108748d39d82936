//! Grid intensity provider: cache-aside lookup over a pluggable backend

use crate::backend::{BackendQuery, IntensityBackend};
use crate::cache::{cache_ttl, IntensityCache};
use crate::ip::{cache_key_for_ip, cache_key_for_zone, is_local_ip, VisitorRequest};
use gridaware_core::{ProviderError, ProviderReading};
use std::sync::Arc;

/// Provider configuration.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    /// Configured API credential; may be overridden per call
    pub api_key: String,
    /// Zone substituted for local/private visitors
    pub fallback_zone: String,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            fallback_zone: "ES".to_string(),
        }
    }
}

/// Fetches the current carbon intensity for a visitor or explicit zone.
///
/// Cache lookup precedes any network call; a hit short-circuits. Misses go
/// to the backend and are stored for the cache TTL. Local/private visitors
/// resolve against the configured fallback zone under a static cache key;
/// public visitors are keyed by a hash of their IP, never the raw address.
pub struct GridIntensityProvider {
    backend: Arc<dyn IntensityBackend>,
    cache: Arc<dyn IntensityCache>,
    config: ProviderConfig,
}

impl GridIntensityProvider {
    pub fn new(
        backend: Arc<dyn IntensityBackend>,
        cache: Arc<dyn IntensityCache>,
        config: ProviderConfig,
    ) -> Self {
        Self {
            backend,
            cache,
            config,
        }
    }

    /// Resolve the API key for one call: override beats configuration.
    fn api_key(&self, override_key: Option<&str>) -> Result<String, ProviderError> {
        let key = override_key.unwrap_or(&self.config.api_key).trim();
        if key.is_empty() {
            return Err(ProviderError::MissingCredential);
        }
        Ok(key.to_string())
    }

    /// Current intensity for the visitor behind `request`.
    ///
    /// Local visitors use the fallback zone; public visitors are geolocated
    /// upstream via the forwarded IP header.
    pub async fn fetch_current(
        &self,
        request: &VisitorRequest,
        api_key_override: Option<&str>,
    ) -> Result<ProviderReading, ProviderError> {
        let api_key = self.api_key(api_key_override)?;

        let ip = request.visitor_ip();
        let local = is_local_ip(&ip);

        let (cache_key, query) = if local {
            (
                cache_key_for_zone(&self.config.fallback_zone),
                BackendQuery {
                    api_key,
                    zone: Some(self.config.fallback_zone.clone()),
                    forwarded_ip: None,
                },
            )
        } else {
            (
                cache_key_for_ip(&ip),
                BackendQuery {
                    api_key,
                    zone: None,
                    forwarded_ip: Some(ip),
                },
            )
        };

        self.fetch_cached(&cache_key, &query, local).await
    }

    /// Current intensity for an explicit zone code.
    pub async fn fetch_zone(
        &self,
        zone: &str,
        api_key_override: Option<&str>,
    ) -> Result<ProviderReading, ProviderError> {
        let api_key = self.api_key(api_key_override)?;
        let query = BackendQuery {
            api_key,
            zone: Some(zone.to_string()),
            forwarded_ip: None,
        };
        self.fetch_cached(&cache_key_for_zone(zone), &query, false)
            .await
    }

    /// Credential check against the upstream API.
    ///
    /// Never reads or writes the cache: a cached reading fetched with a
    /// previous key would report a bad credential as working.
    pub async fn verify_credentials(
        &self,
        api_key: &str,
        zone: Option<&str>,
    ) -> Result<ProviderReading, ProviderError> {
        let api_key = self.api_key(Some(api_key))?;
        let zone = zone.unwrap_or(&self.config.fallback_zone);
        let query = BackendQuery {
            api_key,
            zone: Some(zone.to_string()),
            forwarded_ip: None,
        };
        self.backend.fetch(&query).await
    }

    async fn fetch_cached(
        &self,
        cache_key: &str,
        query: &BackendQuery,
        local_fallback: bool,
    ) -> Result<ProviderReading, ProviderError> {
        if let Some(reading) = self.cache.get(cache_key) {
            tracing::debug!(key = cache_key, zone = %reading.zone, "intensity cache hit");
            return Ok(reading);
        }

        tracing::debug!(key = cache_key, "intensity cache miss, calling upstream");
        let mut reading = match self.backend.fetch(query).await {
            Ok(reading) => reading,
            Err(err) => {
                tracing::warn!(error = %err, "upstream carbon-intensity call failed");
                return Err(err);
            }
        };

        // The fallback path must always report the fallback zone, even when
        // the upstream omits it.
        if local_fallback && reading.zone == "??" {
            reading.zone = self.config.fallback_zone.clone();
        }

        self.cache.set(cache_key, reading.clone(), cache_ttl());
        Ok(reading)
    }
}

impl std::fmt::Debug for GridIntensityProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GridIntensityProvider")
            .field("fallback_zone", &self.config.fallback_zone)
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}

// ============================================================================
// UNIT TESTS
// ============================================================================
