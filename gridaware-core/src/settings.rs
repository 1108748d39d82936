//! Two-scope feature settings: global defaults and per-page overrides
//!
//! The persisted shape uses string-valued booleans ("0"/"1") for storage
//! compatibility with the host platform; the runtime shape is plain bools.

use serde::{Deserialize, Serialize};

/// Host-assigned content item identifier.
pub type PostId = u64;

/// Which scope a settings read/write addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SettingsScope {
    Global,
    Page(PostId),
}

// ============================================================================
// STORED SHAPE
// ============================================================================

/// Persisted/wire settings shape.
///
/// Feature flags are `"0"`/`"1"` strings; any field may be absent in a page
/// override, in which case the global value applies for that key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct StoredSettings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub images: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub videos: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub typography: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}

impl StoredSettings {
    /// Site-wide defaults: every feature enabled, no credential.
    pub fn defaults() -> Self {
        Self {
            images: Some("1".to_string()),
            videos: Some("1".to_string()),
            typography: Some("1".to_string()),
            api_key: Some(String::new()),
        }
    }

    /// Sanitize an incoming write against the currently stored value.
    ///
    /// Never fails: a flag that is not exactly "0" or "1" keeps its old
    /// value (or the default when there is no old value); the API key is
    /// trimmed. The result always has every field populated.
    pub fn sanitize(new: &StoredSettings, old: Option<&StoredSettings>) -> StoredSettings {
        let defaults = StoredSettings::defaults();
        let old = old.unwrap_or(&defaults);

        let keep_flag = |incoming: &Option<String>, prior: &Option<String>, default: &str| {
            match incoming.as_deref() {
                Some("0") => Some("0".to_string()),
                Some("1") => Some("1".to_string()),
                _ => Some(prior.clone().unwrap_or_else(|| default.to_string())),
            }
        };

        StoredSettings {
            images: keep_flag(&new.images, &old.images, "1"),
            videos: keep_flag(&new.videos, &old.videos, "1"),
            typography: keep_flag(&new.typography, &old.typography, "1"),
            api_key: Some(
                new.api_key
                    .as_deref()
                    .map(|k| k.trim().to_string())
                    .or_else(|| old.api_key.clone())
                    .unwrap_or_default(),
            ),
        }
    }

    /// Overlay a page override on a global base, key by key.
    ///
    /// A key the override leaves unset inherits the global value; an absent
    /// override therefore merges to the global settings unchanged. This is
    /// the unified two-scope policy (see DESIGN.md).
    pub fn merged(global: &StoredSettings, page: Option<&StoredSettings>) -> StoredSettings {
        let Some(page) = page else {
            return global.clone();
        };
        StoredSettings {
            images: page.images.clone().or_else(|| global.images.clone()),
            videos: page.videos.clone().or_else(|| global.videos.clone()),
            typography: page.typography.clone().or_else(|| global.typography.clone()),
            api_key: page.api_key.clone().or_else(|| global.api_key.clone()),
        }
    }
}

// ============================================================================
// RUNTIME SHAPE
// ============================================================================

/// Runtime feature settings consumed by the transformers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureSettings {
    pub images: bool,
    pub videos: bool,
    pub typography: bool,
    pub api_key: String,
}

impl Default for FeatureSettings {
    fn default() -> Self {
        Self {
            images: true,
            videos: true,
            typography: true,
            api_key: String::new(),
        }
    }
}

impl From<&StoredSettings> for FeatureSettings {
    fn from(stored: &StoredSettings) -> Self {
        // Missing flags read as enabled, matching the stored defaults
        let flag = |v: &Option<String>| v.as_deref() != Some("0");
        Self {
            images: flag(&stored.images),
            videos: flag(&stored.videos),
            typography: flag(&stored.typography),
            api_key: stored.api_key.clone().unwrap_or_default(),
        }
    }
}

impl From<&FeatureSettings> for StoredSettings {
    fn from(settings: &FeatureSettings) -> Self {
        let flag = |v: bool| Some(if v { "1" } else { "0" }.to_string());
        Self {
            images: flag(settings.images),
            videos: flag(settings.videos),
            typography: flag(settings.typography),
            api_key: Some(settings.api_key.clone()),
        }
    }
}

// ============================================================================
// UNIT TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn stored(images: Option<&str>, videos: Option<&str>, typography: Option<&str>) -> StoredSettings {
        StoredSettings {
            images: images.map(String::from),
            videos: videos.map(String::from),
            typography: typography.map(String::from),
            api_key: None,
        }
    }

    #[test]
    fn test_sanitize_accepts_valid_flags() {
        let new = stored(Some("0"), Some("1"), Some("0"));
        let out = StoredSettings::sanitize(&new, None);
        assert_eq!(out.images.as_deref(), Some("0"));
        assert_eq!(out.videos.as_deref(), Some("1"));
        assert_eq!(out.typography.as_deref(), Some("0"));
    }

    #[test]
    fn test_sanitize_rejects_garbage_keeps_old() {
        let old = stored(Some("0"), Some("0"), Some("1"));
        let new = stored(Some("yes"), None, Some("2"));
        let out = StoredSettings::sanitize(&new, Some(&old));
        assert_eq!(out.images.as_deref(), Some("0"));
        assert_eq!(out.videos.as_deref(), Some("0"));
        assert_eq!(out.typography.as_deref(), Some("1"));
    }

    #[test]
    fn test_sanitize_falls_back_to_defaults() {
        let new = StoredSettings::default();
        let out = StoredSettings::sanitize(&new, None);
        assert_eq!(out, StoredSettings::defaults());
    }

    #[test]
    fn test_sanitize_trims_api_key() {
        let new = StoredSettings {
            api_key: Some("  key-123  ".to_string()),
            ..Default::default()
        };
        let out = StoredSettings::sanitize(&new, None);
        assert_eq!(out.api_key.as_deref(), Some("key-123"));
    }

    #[test]
    fn test_merged_key_by_key_fallback() {
        let global = StoredSettings::defaults();
        // Page override only touches images; videos/typography inherit
        let page = stored(Some("0"), None, None);
        let merged = StoredSettings::merged(&global, Some(&page));
        assert_eq!(merged.images.as_deref(), Some("0"));
        assert_eq!(merged.videos.as_deref(), Some("1"));
        assert_eq!(merged.typography.as_deref(), Some("1"));
    }

    #[test]
    fn test_merged_absent_override_is_global() {
        let global = stored(Some("0"), Some("1"), Some("0"));
        assert_eq!(StoredSettings::merged(&global, None), global);
    }

    #[test]
    fn test_feature_settings_roundtrip() {
        let settings = FeatureSettings {
            images: false,
            videos: true,
            typography: false,
            api_key: "k".to_string(),
        };
        let stored = StoredSettings::from(&settings);
        assert_eq!(stored.images.as_deref(), Some("0"));
        assert_eq!(FeatureSettings::from(&stored), settings);
    }

    #[test]
    fn test_missing_flags_read_enabled() {
        let stored = StoredSettings::default();
        let settings = FeatureSettings::from(&stored);
        assert!(settings.images && settings.videos && settings.typography);
    }
}
