//! Injected cache abstraction with TTL
//!
//! The provider core knows nothing about the host's storage mechanism; it
//! talks to `IntensityCache`, and expiry is measured through an injectable
//! `Clock` so TTL behavior is testable without real waiting.

use chrono::{DateTime, Duration, Utc};
use gridaware_core::ProviderReading;
use std::collections::HashMap;
use std::sync::RwLock;

/// Cache retention for provider readings, in seconds (10 minutes).
pub const CACHE_TTL_SECS: i64 = 600;

/// Cache retention as a `Duration`.
pub fn cache_ttl() -> Duration {
    Duration::seconds(CACHE_TTL_SECS)
}

/// Time source for cache expiry.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

impl<C: Clock + ?Sized> Clock for std::sync::Arc<C> {
    fn now(&self) -> DateTime<Utc> {
        (**self).now()
    }
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Cache for provider readings keyed by hashed visitor identity or zone.
///
/// Implementations must be thread-safe. Concurrent writers for the same key
/// are benign: both computed the same upstream value and the TTL bounds
/// staleness either way.
pub trait IntensityCache: Send + Sync {
    /// Look up an unexpired reading.
    fn get(&self, key: &str) -> Option<ProviderReading>;

    /// Store a reading with the given time-to-live.
    fn set(&self, key: &str, reading: ProviderReading, ttl: Duration);
}

/// In-memory cache with per-entry expiry.
pub struct MemoryCache<C: Clock> {
    entries: RwLock<HashMap<String, (ProviderReading, DateTime<Utc>)>>,
    clock: C,
}

impl<C: Clock> MemoryCache<C> {
    pub fn new(clock: C) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            clock,
        }
    }

    /// Number of stored entries, expired ones included.
    pub fn len(&self) -> usize {
        self.entries.read().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for MemoryCache<SystemClock> {
    fn default() -> Self {
        Self::new(SystemClock)
    }
}

impl<C: Clock> IntensityCache for MemoryCache<C> {
    fn get(&self, key: &str) -> Option<ProviderReading> {
        let entries = self.entries.read().ok()?;
        let (reading, expires_at) = entries.get(key)?;
        if self.clock.now() < *expires_at {
            Some(reading.clone())
        } else {
            None
        }
    }

    fn set(&self, key: &str, reading: ProviderReading, ttl: Duration) {
        if let Ok(mut entries) = self.entries.write() {
            entries.insert(key.to_string(), (reading, self.clock.now() + ttl));
        }
    }
}

impl<C: Clock> std::fmt::Debug for MemoryCache<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryCache")
            .field("entries", &self.len())
            .finish()
    }
}

// ============================================================================
// UNIT TESTS
// ============================================================================
