//! GRIDAWARE PROVIDER - Upstream carbon-intensity access
//!
//! Pluggable API backends (numeric and pre-categorized response shapes),
//! visitor-IP derivation with privacy hashing, an injected TTL cache, and
//! the per-request intensity resolver.

mod backend;
mod cache;
mod ip;
mod provider;
mod resolve;

pub use backend::{BackendQuery, CarbonIntensityBackend, IntensityBackend, SignalLevelBackend};
pub use cache::{cache_ttl, Clock, IntensityCache, MemoryCache, SystemClock, CACHE_TTL_SECS};
pub use ip::{cache_key_for_ip, cache_key_for_zone, is_local_ip, VisitorRequest};
pub use provider::{GridIntensityProvider, ProviderConfig};
pub use resolve::IntensityResolver;
