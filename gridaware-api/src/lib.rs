//! # gridaware-api
//!
//! REST surface for the Gridaware admin and frontend: settings at global
//! and per-page scope, the public live-intensity endpoint, and the
//! credential check the settings screen uses.

pub mod config;
pub mod error;
pub mod routes;
pub mod settings_store;
pub mod state;

pub use config::ApiConfig;
pub use error::{ApiError, ApiResult, ErrorCode};
pub use routes::create_api_router;
pub use settings_store::{MemorySettingsStore, SettingsStore};
pub use state::ApiState;
