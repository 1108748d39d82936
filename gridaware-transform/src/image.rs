//! Image block transformer
//!
//! High intensity replaces the image with a click-to-load placeholder that
//! carries the escaped original markup for client-side restoration; medium
//! keeps the image visible under an always-visible overlay (or the legacy
//! blur wrapper); low and live pass through with at most a lazy-loading
//! hint.

use crate::html;
use gridaware_core::{IntensityTier, MediumImageStyle, RequestContext};
use once_cell::sync::Lazy;
use regex::Regex;

/// Placeholder wrapper classes; their presence marks an already-transformed
/// fragment, making the transform a no-op on its own output.
const PLACEHOLDER_CLASS: &str = "grid-aware-image-placeholder";
const OVERLAY_CLASS: &str = "grid-aware-image-overlay";
const BLURRED_CLASS: &str = "grid-aware-image-blurred";

static ATTACHMENT_ID_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"wp-image-(\d+)").expect("valid regex"));
static FIGCAPTION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<figcaption[^>]*>(.*?)</figcaption>").expect("valid regex"));
static IMG_TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)<img[^>]+>").expect("valid regex"));

const IMAGE_ICON_SVG: &str = r##"<svg width="78" height="67" viewBox="0 0 78 67" fill="none" xmlns="http://www.w3.org/2000/svg"><path d="M72 0.5H6C2.7 0.5 0 3.2 0 6.5V60.5C0 63.8 2.7 66.5 6 66.5H72C75.3 66.5 78 63.8 78 60.5V6.5C78 3.2 75.3 0.5 72 0.5ZM49.5 18.5C52 18.5 54 20.5 54 23C54 25.5 52 27.5 49.5 27.5C47 27.5 45 25.5 45 23C45 20.5 47 18.5 49.5 18.5ZM72 60.5H6V45.8L23.4 28.4C24.6 27.2 26.4 27.2 27.6 28.4L52.9 53.6C54 54.8 55.9 54.8 57.1 53.6C58.3 52.5 58.3 50.5 57.1 49.4L50.5 42.8L55.9 37.4C57 36.3 58.9 36.3 60.1 37.4L72 49.3V60.5Z" fill="#E3E3E3"/></svg>"##;

/// Host-resolved facts about the image that the markup alone cannot supply.
///
/// The attachment lookup (real file dimensions) belongs to the host
/// platform; the transformer only consumes the result.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageMeta {
    /// Real on-disk pixel dimensions, when the host resolved them
    pub file_dimensions: Option<(u32, u32)>,
}

/// Attachment identifier embedded in the markup (`wp-image-<id>` class).
pub fn attachment_id(fragment: &str) -> Option<u64> {
    ATTACHMENT_ID_RE
        .captures(fragment)?
        .get(1)?
        .as_str()
        .parse()
        .ok()
}

/// Transform one rendered image block for the request's intensity tier.
pub fn transform(fragment: &str, ctx: &RequestContext, meta: &ImageMeta) -> String {
    if !ctx.settings.images {
        return fragment.to_string();
    }
    if is_transformed(fragment) {
        return fragment.to_string();
    }

    match ctx.intensity {
        IntensityTier::High => render_placeholder(fragment, meta),
        IntensityTier::Medium => render_medium(fragment, ctx.options.medium_image_style),
        IntensityTier::Low => inject_lazy(fragment),
    }
}

fn is_transformed(fragment: &str) -> bool {
    [PLACEHOLDER_CLASS, OVERLAY_CLASS, BLURRED_CLASS]
        .iter()
        .any(|marker| fragment.contains(marker))
}

// ============================================================================
// EXTRACTION
// ============================================================================

/// Layout hints extracted for the placeholder style, so deferred content
/// reserves its space and the page does not shift when it loads.
fn placeholder_style(fragment: &str, meta: &ImageMeta) -> String {
    let displayed_width = html::get_attr(fragment, "img", "width")
        .filter(|w| w.chars().all(|c| c.is_ascii_digit()) && !w.is_empty())
        .map(|w| format!("{}px", w))
        .unwrap_or_else(|| "100%".to_string());

    let aspect_ratio = meta
        .file_dimensions
        .map(|(w, h)| format!("{} / {}", w, h))
        .or_else(|| {
            let w = html::get_attr(fragment, "img", "width")?;
            let h = html::get_attr(fragment, "img", "height")?;
            (w.chars().all(|c| c.is_ascii_digit())
                && h.chars().all(|c| c.is_ascii_digit())
                && !w.is_empty()
                && !h.is_empty())
            .then(|| format!("{} / {}", w, h))
        });

    let mut style = format!("--image-width: {}; ", displayed_width);
    if let Some(ratio) = aspect_ratio {
        style.push_str(&format!("--aspect-ratio: {}; ", ratio));
    }
    style
}

fn alt_text(fragment: &str) -> Option<String> {
    html::get_attr(fragment, "img", "alt").filter(|alt| !alt.trim().is_empty())
}

fn caption(fragment: &str) -> Option<String> {
    FIGCAPTION_RE
        .captures(fragment)
        .map(|c| c[1].to_string())
        .filter(|c| !c.trim().is_empty())
}

fn strip_caption(fragment: &str) -> String {
    FIGCAPTION_RE.replace_all(fragment, "").into_owned()
}

// ============================================================================
// TIER RENDERINGS
// ============================================================================

/// High tier: the original image travels only inside the escaped
/// `data-original-image` attribute.
fn render_placeholder(fragment: &str, meta: &ImageMeta) -> String {
    let alt_html = match alt_text(fragment) {
        Some(alt) => format!(
            r#"<div class="placeholder-alt">{}</div>"#,
            html::escape_attr(&alt)
        ),
        None => r#"<div class="placeholder-alt">No ALT text was provided</div>"#.to_string(),
    };
    let caption_html = caption(fragment)
        .map(|c| format!(r#"<div class="placeholder-caption">{}</div>"#, c))
        .unwrap_or_default();

    let placeholder = format!(
        concat!(
            r#"<div class="{class}" data-original-image="{original}" onclick="gridAwareLoadImage(this)" style="{style}">"#,
            r#"<div class="placeholder-content">"#,
            r#"<div class="placeholder-icon">{icon}</div>"#,
            "{alt}{caption}",
            r#"<div class="placeholder-description">This image hasn&#039;t been loaded due to the <strong>high grid intensity.</strong></div>"#,
            r#"<button class="placeholder-load-btn" type="button">LOAD IMAGE</button>"#,
            "</div></div>"
        ),
        class = PLACEHOLDER_CLASS,
        original = html::escape_attr(fragment),
        style = html::escape_attr(placeholder_style(fragment, meta).trim_end()),
        icon = IMAGE_ICON_SVG,
        alt = alt_html,
        caption = caption_html,
    );

    // The caption moves into the placeholder; the visible body must not
    // duplicate it. The original (with caption) is what gets restored.
    let body = strip_caption(fragment);
    IMG_TAG_RE
        .replace(&body, regex::NoExpand(placeholder.as_str()))
        .into_owned()
}

/// Medium tier: image stays visible, flagged by an always-visible overlay.
fn render_medium(fragment: &str, style: MediumImageStyle) -> String {
    let wrapper_class = match style {
        MediumImageStyle::Overlay => OVERLAY_CLASS,
        MediumImageStyle::Blur => BLURRED_CLASS,
    };
    let alt_html = alt_text(fragment)
        .map(|alt| {
            format!(
                r#"<div class="placeholder-alt">{}</div>"#,
                html::escape_attr(&alt)
            )
        })
        .unwrap_or_default();

    format!(
        concat!(
            r#"<div class="{class}" data-original-image="{original}" onclick="gridAwareLoadImage(this)">"#,
            "{body}",
            r#"<div class="medium-overlay">"#,
            "{alt}",
            r#"<div class="placeholder-description">This image has been loaded in low quality due to the <strong>medium grid intensity.</strong></div>"#,
            r#"<button class="placeholder-load-btn" type="button">Load full quality image</button>"#,
            "</div></div>"
        ),
        class = wrapper_class,
        original = html::escape_attr(fragment),
        body = fragment,
        alt = alt_html,
    )
}

/// Low/live tier: untouched except a lazy-loading hint on bare `<img>` tags.
fn inject_lazy(fragment: &str) -> String {
    html::inject_attr_if_absent(fragment, "img", "loading", "lazy")
}

// ============================================================================
// UNIT TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use gridaware_core::{FeatureSettings, TransformOptions};

    const FRAGMENT: &str = concat!(
        r#"<figure class="wp-block-image size-large">"#,
        r#"<img src="https://example.org/photo.jpg" alt="A windmill" class="wp-image-42" width="640" height="480">"#,
        r#"<figcaption>Wind power</figcaption>"#,
        "</figure>"
    );

    fn ctx(tier: IntensityTier) -> RequestContext {
        RequestContext::new(tier, FeatureSettings::default())
    }

    fn ctx_disabled(tier: IntensityTier) -> RequestContext {
        RequestContext::new(
            tier,
            FeatureSettings {
                images: false,
                ..FeatureSettings::default()
            },
        )
    }

    #[test]
    fn test_disabled_is_identity_every_tier() {
        for tier in [
            IntensityTier::Low,
            IntensityTier::Medium,
            IntensityTier::High,
        ] {
            assert_eq!(
                transform(FRAGMENT, &ctx_disabled(tier), &ImageMeta::default()),
                FRAGMENT
            );
        }
    }

    #[test]
    fn test_shared_image_fixtures() {
        use gridaware_test_utils::fixtures;

        let high = transform(
            fixtures::IMAGE_BLOCK,
            &ctx(IntensityTier::High),
            &ImageMeta::default(),
        );
        assert!(high.contains(r#"<div class="placeholder-alt">A forest</div>"#));
        assert!(high.contains("A forest in autumn"));

        let bare = transform(
            fixtures::IMAGE_BLOCK_BARE,
            &ctx(IntensityTier::High),
            &ImageMeta::default(),
        );
        assert!(bare.contains("No ALT text was provided"));
    }

    #[test]
    fn test_high_embeds_original_escaped() {
        let out = transform(FRAGMENT, &ctx(IntensityTier::High), &ImageMeta::default());
        let original = html::get_attr(&out, "div", "data-original-image").unwrap();
        assert_eq!(original, FRAGMENT);
    }

    #[test]
    fn test_high_no_literal_img_outside_attribute() {
        let out = transform(FRAGMENT, &ctx(IntensityTier::High), &ImageMeta::default());
        // The only "<img" bytes must be entity-escaped inside the attribute
        assert!(!out.contains("<img"));
        assert!(out.contains("&lt;img"));
    }

    #[test]
    fn test_high_shows_alt_and_caption() {
        let out = transform(FRAGMENT, &ctx(IntensityTier::High), &ImageMeta::default());
        assert!(out.contains(r#"<div class="placeholder-alt">A windmill</div>"#));
        assert!(out.contains(r#"<div class="placeholder-caption">Wind power</div>"#));
        // Caption must not appear twice in the visible body
        assert_eq!(out.matches("Wind power").count(), 2); // escaped original + placeholder
        assert!(!out.contains("<figcaption>Wind power"));
    }

    #[test]
    fn test_high_placeholder_icon_intact() {
        let out = transform(FRAGMENT, &ctx(IntensityTier::High), &ImageMeta::default());
        assert!(out.contains(r#"<div class="placeholder-icon"><svg"#));
        assert!(out.contains(r##"fill="#E3E3E3""##));
        assert!(out.contains("</svg>"));
    }

    #[test]
    fn test_high_missing_alt_notice() {
        let fragment = r#"<figure><img src="a.jpg" class="wp-image-1"></figure>"#;
        let out = transform(fragment, &ctx(IntensityTier::High), &ImageMeta::default());
        assert!(out.contains("No ALT text was provided"));
    }

    #[test]
    fn test_high_layout_hints_from_attributes() {
        let out = transform(FRAGMENT, &ctx(IntensityTier::High), &ImageMeta::default());
        assert!(out.contains("--image-width: 640px;"));
        assert!(out.contains("--aspect-ratio: 640 / 480;"));
    }

    #[test]
    fn test_high_layout_hints_prefer_file_dimensions() {
        let meta = ImageMeta {
            file_dimensions: Some((1920, 1080)),
        };
        let out = transform(FRAGMENT, &ctx(IntensityTier::High), &meta);
        assert!(out.contains("--aspect-ratio: 1920 / 1080;"));
    }

    #[test]
    fn test_high_width_defaults_to_full() {
        let fragment = r#"<figure><img src="a.jpg" alt="x"></figure>"#;
        let out = transform(fragment, &ctx(IntensityTier::High), &ImageMeta::default());
        assert!(out.contains("--image-width: 100%;"));
    }

    #[test]
    fn test_high_idempotent() {
        let once = transform(FRAGMENT, &ctx(IntensityTier::High), &ImageMeta::default());
        let twice = transform(&once, &ctx(IntensityTier::High), &ImageMeta::default());
        assert_eq!(once, twice);
    }

    #[test]
    fn test_medium_keeps_image_visible() {
        let out = transform(FRAGMENT, &ctx(IntensityTier::Medium), &ImageMeta::default());
        assert!(out.contains(r#"class="grid-aware-image-overlay""#));
        assert!(out.contains("<img src=")); // still visible
        assert!(out.contains("medium-overlay"));
        assert!(out.contains("Load full quality image"));
    }

    #[test]
    fn test_medium_blur_variant() {
        let ctx = ctx(IntensityTier::Medium).with_options(TransformOptions {
            medium_image_style: gridaware_core::MediumImageStyle::Blur,
            lite_embed: true,
        });
        let out = transform(FRAGMENT, &ctx, &ImageMeta::default());
        assert!(out.contains(r#"class="grid-aware-image-blurred""#));
    }

    #[test]
    fn test_medium_idempotent() {
        let once = transform(FRAGMENT, &ctx(IntensityTier::Medium), &ImageMeta::default());
        let twice = transform(&once, &ctx(IntensityTier::Medium), &ImageMeta::default());
        assert_eq!(once, twice);
    }

    #[test]
    fn test_low_injects_lazy_only() {
        let out = transform(FRAGMENT, &ctx(IntensityTier::Low), &ImageMeta::default());
        assert!(out.contains(r#"loading="lazy""#));
        assert_eq!(out.replace(r#" loading="lazy""#, ""), FRAGMENT);
    }

    #[test]
    fn test_low_multibyte_text_around_tag() {
        let fragment = "<figure>çatal <çç <img src=\"über.jpg\" alt=\"çay\"></figure>";
        let out = transform(fragment, &ctx(IntensityTier::Low), &ImageMeta::default());
        assert!(out.contains(r#"loading="lazy""#));
        assert!(out.contains("çatal <çç"));
    }

    #[test]
    fn test_low_existing_lazy_untouched() {
        let fragment = r#"<figure><img src="a.jpg" loading="lazy"></figure>"#;
        assert_eq!(
            transform(fragment, &ctx(IntensityTier::Low), &ImageMeta::default()),
            fragment
        );
    }

    #[test]
    fn test_attachment_id_extraction() {
        assert_eq!(attachment_id(FRAGMENT), Some(42));
        assert_eq!(attachment_id("<img src='a.jpg'>"), None);
    }
}

#[cfg(test)]
mod prop_tests {
    use super::*;
    use gridaware_core::FeatureSettings;
    use gridaware_test_utils::{fixtures, generators::any_tier};
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn prop_disabled_images_identity_every_tier(tier in any_tier()) {
            let ctx = RequestContext::new(
                tier,
                FeatureSettings {
                    images: false,
                    ..FeatureSettings::default()
                },
            );
            let out = transform(fixtures::IMAGE_BLOCK, &ctx, &ImageMeta::default());
            prop_assert_eq!(out, fixtures::IMAGE_BLOCK);
        }
    }
}
