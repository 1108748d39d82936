//! Settings persistence seam
//!
//! The host platform owns durable storage; the API talks to this trait.
//! The in-memory implementation backs tests and standalone deployments.

use gridaware_core::{SettingsScope, StoredSettings};
use std::collections::HashMap;
use std::sync::RwLock;

/// Storage for the stored ("0"/"1"-shaped) settings at both scopes.
pub trait SettingsStore: Send + Sync {
    /// Read the settings stored at a scope, if any were ever written.
    fn get(&self, scope: SettingsScope) -> Option<StoredSettings>;

    /// Persist settings at a scope, replacing any previous value.
    fn set(&self, scope: SettingsScope, settings: StoredSettings);

    /// Global settings with defaults applied when nothing is stored.
    fn global_or_default(&self) -> StoredSettings {
        self.get(SettingsScope::Global)
            .unwrap_or_else(StoredSettings::defaults)
    }
}

/// In-memory store.
#[derive(Default)]
pub struct MemorySettingsStore {
    entries: RwLock<HashMap<SettingsScope, StoredSettings>>,
}

impl MemorySettingsStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SettingsStore for MemorySettingsStore {
    fn get(&self, scope: SettingsScope) -> Option<StoredSettings> {
        self.entries.read().ok()?.get(&scope).cloned()
    }

    fn set(&self, scope: SettingsScope, settings: StoredSettings) {
        if let Ok(mut entries) = self.entries.write() {
            entries.insert(scope, settings);
        }
    }
}
