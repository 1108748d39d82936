//! Scriptable intensity backend.

use async_trait::async_trait;
use chrono::Utc;
use gridaware_core::{IntensityTier, ProviderError, ProviderReading};
use gridaware_provider::{BackendQuery, IntensityBackend};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// An `IntensityBackend` that replays scripted responses and records
/// every query it receives.
///
/// Scripted responses are consumed in order; once the script is empty,
/// the fallback response repeats.
pub struct MockBackend {
    script: Mutex<VecDeque<Result<ProviderReading, ProviderError>>>,
    fallback: Result<ProviderReading, ProviderError>,
    calls: AtomicUsize,
    queries: Mutex<Vec<BackendQuery>>,
}

impl MockBackend {
    /// Backend that always returns the given reading.
    pub fn returning(reading: ProviderReading) -> Self {
        Self::with_fallback(Ok(reading))
    }

    /// Backend that always fails with the given error.
    pub fn failing(error: ProviderError) -> Self {
        Self::with_fallback(Err(error))
    }

    fn with_fallback(fallback: Result<ProviderReading, ProviderError>) -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            fallback,
            calls: AtomicUsize::new(0),
            queries: Mutex::new(Vec::new()),
        }
    }

    /// Queue a response to be returned before the fallback kicks in.
    pub fn push(&self, response: Result<ProviderReading, ProviderError>) {
        if let Ok(mut script) = self.script.lock() {
            script.push_back(response);
        }
    }

    /// Number of fetches performed so far.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Every query received, in order.
    pub fn queries(&self) -> Vec<BackendQuery> {
        self.queries.lock().map(|q| q.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl IntensityBackend for MockBackend {
    async fn fetch(&self, query: &BackendQuery) -> Result<ProviderReading, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut queries) = self.queries.lock() {
            queries.push(query.clone());
        }
        let scripted = self.script.lock().ok().and_then(|mut s| s.pop_front());
        scripted.unwrap_or_else(|| self.fallback.clone())
    }
}

/// Reading fixture classified from a numeric intensity.
pub fn reading(zone: &str, carbon_intensity: f64) -> ProviderReading {
    ProviderReading::from_numeric(zone, carbon_intensity, Utc::now())
}

/// Reading fixture pinned to a tier without a numeric value.
pub fn reading_at(zone: &str, tier: IntensityTier) -> ProviderReading {
    ProviderReading::from_level(zone, tier, Utc::now())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_script_then_fallback() {
        let backend = MockBackend::returning(reading("ES", 100.0));
        backend.push(Ok(reading("PL", 700.0)));

        let query = BackendQuery {
            api_key: "k".to_string(),
            zone: Some("ES".to_string()),
            forwarded_ip: None,
        };
        let first = backend.fetch(&query).await.unwrap();
        assert_eq!(first.zone, "PL");
        let second = backend.fetch(&query).await.unwrap();
        assert_eq!(second.zone, "ES");
        assert_eq!(backend.call_count(), 2);
    }

    #[tokio::test]
    async fn test_records_queries() {
        let backend = MockBackend::failing(ProviderError::NoIntensityData);
        let query = BackendQuery {
            api_key: "k".to_string(),
            zone: None,
            forwarded_ip: Some("203.0.113.9".parse().unwrap()),
        };
        let _ = backend.fetch(&query).await;
        let queries = backend.queries();
        assert_eq!(queries.len(), 1);
        assert_eq!(queries[0].forwarded_ip, query.forwarded_ip);
    }
}
