//! Typography transformer
//!
//! Operates on the theme's typography document (a `theme.json`-shaped
//! JSON value) rather than on markup. High intensity replaces every
//! declared font family with a single system stack so no webfont is ever
//! fetched; every other tier passes the document through untouched.

use gridaware_core::{IntensityTier, RequestContext};
use serde_json::{json, Value};

/// The fixed system stack substituted at high intensity.
pub const SYSTEM_FONT_STACK: &str = "Helvetica, -apple-system, BlinkMacSystemFont, \"Segoe UI\", Roboto, Oxygen-Sans, Ubuntu, Cantarell, \"Helvetica Neue\", sans-serif";

/// Reference that applied styles use to point at the system font preset.
pub const SYSTEM_FONT_REF: &str = "var:preset|font-family|system";

/// The overriding document merged over the theme data at high intensity:
/// one font definition and one applied style, both resolving to the
/// system stack.
fn system_font_data() -> Value {
    json!({
        "version": 2,
        "settings": {
            "typography": {
                "fontFamilies": [
                    {
                        "fontFamily": SYSTEM_FONT_STACK,
                        "name": "System Font",
                        "slug": "system",
                    }
                ]
            }
        },
        "styles": {
            "typography": {
                "fontFamily": SYSTEM_FONT_REF,
            }
        }
    })
}

/// Transform the theme typography document for the request's tier.
///
/// The replacement is overriding, not additive: custom webfonts declared
/// by the theme are fully suppressed at high intensity.
pub fn transform(theme_data: &Value, ctx: &RequestContext) -> Value {
    if !ctx.settings.typography || ctx.intensity != IntensityTier::High {
        return theme_data.clone();
    }
    let mut out = theme_data.clone();
    merge_over(&mut out, &system_font_data());
    out
}

/// Deep-merge `overlay` into `base`. Objects merge key-by-key; any other
/// value (arrays included) replaces the base wholesale, so the single
/// system entry displaces the theme's whole `fontFamilies` list.
fn merge_over(base: &mut Value, overlay: &Value) {
    match (base, overlay) {
        (Value::Object(base_map), Value::Object(overlay_map)) => {
            for (key, value) in overlay_map {
                match base_map.get_mut(key) {
                    Some(existing) => merge_over(existing, value),
                    None => {
                        base_map.insert(key.clone(), value.clone());
                    }
                }
            }
        }
        (base, overlay) => *base = overlay.clone(),
    }
}

// ============================================================================
// UNIT TESTS
// ============================================================================
