//! # gridaware-test-utils
//!
//! Shared test doubles and fixtures: a scriptable intensity backend, a
//! manually advanced clock for TTL tests, HTML block fixtures, and
//! proptest generators.

pub mod clock;
pub mod fixtures;
pub mod generators;
pub mod mock_backend;

pub use clock::ManualClock;
pub use mock_backend::MockBackend;
