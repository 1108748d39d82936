//! Page runtime surface
//!
//! The non-content chrome a host injects around a transformed page: the
//! body class, the grid-info bar with its manual intensity switcher, the
//! bootstrap state script, and the click-to-load handlers the High/Medium
//! placeholders invoke.

use crate::html;
use gridaware_core::{IntensityTier, RequestContext};

/// Body class for the resolved tier, e.g. `grid-intensity-high`.
pub fn body_class(tier: IntensityTier) -> String {
    tier.body_class()
}

/// Live grid data shown in the info bar. Built from a provider reading
/// when one is available; `unknown()` when the provider failed.
#[derive(Debug, Clone)]
pub struct GridStatus {
    pub zone: String,
    pub live_tier: Option<IntensityTier>,
}

impl GridStatus {
    pub fn new(zone: &str, live_tier: IntensityTier) -> Self {
        Self {
            zone: zone.to_uppercase(),
            live_tier: Some(live_tier),
        }
    }

    /// Status when no reading could be obtained.
    pub fn unknown() -> Self {
        Self {
            zone: "??".to_string(),
            live_tier: None,
        }
    }

    fn intensity_label(&self) -> String {
        match self.live_tier {
            Some(tier) => tier.as_str().to_uppercase(),
            None => "UNKNOWN".to_string(),
        }
    }
}

/// Render the info bar plus the manual intensity switcher.
///
/// `selected` is the visitor's pinned override, if any; the matching
/// switcher toggle renders active. The live tier from the provider is
/// shown regardless of the override so the visitor sees what the grid is
/// actually doing.
pub fn info_bar(status: &GridStatus, selected: Option<IntensityTier>) -> String {
    let mut toggles = String::new();
    for tier in [
        IntensityTier::Low,
        IntensityTier::Medium,
        IntensityTier::High,
    ] {
        let label = tier.as_str().to_uppercase();
        let (active_class, checked) = if selected == Some(tier) {
            (" active", r#" checked="checked""#)
        } else {
            ("", "")
        };
        toggles.push_str(&format!(
            concat!(
                r#"<label class="grid-intensity-toggle{active}">"#,
                r#"<input type="checkbox" name="grid_intensity" value="{value}"{checked} hidden />"#,
                "<span>{label}</span></label>"
            ),
            active = active_class,
            value = tier.as_str(),
            checked = checked,
            label = label,
        ));
    }

    format!(
        concat!(
            r#"<div class="grid-intensity-info-bar">"#,
            r#"<div class="grid-info-left">"#,
            r#"<span class="grid-info-title">YOUR GRID INFO"#,
            r#"<span class="info-tooltip" tabindex="0" data-tooltip="Indicates how polluting power generation is at your location.">&#8505;</span>"#,
            "</span>",
            r#"<span class="grid-info-country">{zone}</span>"#,
            r#"<span class="grid-info-intensity-label"><strong>{label} INTENSITY</strong></span>"#,
            "</div>",
            r#"<div class="grid-info-right">"#,
            r#"<span class="grid-design-title">GRID-AWARE DESIGN"#,
            r#"<span class="info-tooltip" tabindex="0" data-tooltip="The layout adapts based on the grid intensity detected at your location. You can also manually select the consumption mode.">&#8505;</span>"#,
            "</span>",
            r#"<span class="grid-intensity-toggle-bar">"#,
            r#"<div class="grid-intensity-toggle-group" role="group" aria-label="Select grid intensity">{toggles}</div>"#,
            "</span></div></div>"
        ),
        zone = html::escape_attr(&status.zone),
        label = html::escape_attr(&status.intensity_label()),
        toggles = toggles,
    )
}

/// Inline script exposing the live tier to frontend scripts.
pub fn live_intensity_script(status: &GridStatus) -> String {
    let value = match status.live_tier {
        Some(tier) => tier.as_str(),
        None => "unknown",
    };
    format!("<script>window.gridAwareLiveIntensity = '{value}';</script>")
}

/// Inline bootstrap state: the effective settings and the tier the page
/// was rendered with.
pub fn bootstrap_script(ctx: &RequestContext) -> String {
    format!(
        concat!(
            "<script>window.gridAwareSettings = ",
            r#"{{"images":{images},"videos":{videos},"typography":{typography}}}"#,
            "; window.gridAwareInitialIntensity = \"{tier}\";</script>"
        ),
        images = ctx.settings.images,
        videos = ctx.settings.videos,
        typography = ctx.settings.typography,
        tier = ctx.intensity.as_str(),
    )
}

const LOAD_VIDEO_SCRIPT: &str = r#"<script>
window.gridAwareLoadVideo = function(element) {
	var originalVideo = element.getAttribute("data-original-video");
	if (originalVideo) {
		element.innerHTML = originalVideo;
		element.classList.remove("grid-aware-video-placeholder", "grid-aware-video-thumbnail");
		element.classList.add("grid-aware-video-loaded");
	}
};
</script>"#;

const LOAD_IMAGE_SCRIPT: &str = r#"<script>
window.gridAwareLoadImage = function(element) {
	var originalImage = element.getAttribute("data-original-image");
	if (originalImage) {
		element.innerHTML = originalImage;
		element.classList.remove("grid-aware-image-placeholder", "grid-aware-image-overlay", "grid-aware-image-blurred");
		element.classList.add("grid-aware-image-loaded");
		var img = element.querySelector("img");
		if (img) {
			img.style.filter = "none";
		}
	}
};
</script>"#;

fn page_has_video(page_content: &str) -> bool {
    page_content.contains("youtube.com") || page_content.contains("youtu.be")
}

fn page_has_image(page_content: &str) -> bool {
    page_content.contains("<img") || page_content.contains("<!-- wp:image")
}

/// Click-to-load handlers for the High/Medium placeholders.
///
/// Emitted only when the placeholders can actually exist on the page:
/// feature enabled, tier at Medium or above, and the page content
/// containing the matching media. Returns an empty string otherwise.
pub fn loader_scripts(ctx: &RequestContext, page_content: &str) -> String {
    if ctx.intensity < IntensityTier::Medium {
        return String::new();
    }
    let mut out = String::new();
    if ctx.settings.videos && page_has_video(page_content) {
        out.push_str(LOAD_VIDEO_SCRIPT);
    }
    if ctx.settings.images && page_has_image(page_content) {
        out.push_str(LOAD_IMAGE_SCRIPT);
    }
    out
}

// ============================================================================
// UNIT TESTS
// ============================================================================
