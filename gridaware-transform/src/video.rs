//! YouTube embed transformer
//!
//! Every emitted iframe goes through the privacy rewrite (cookie-less
//! playback host, related videos suppressed). High intensity defers the
//! player behind a click-to-load placeholder; medium shows a static
//! thumbnail; low and live lazy-load, optionally as a deferred
//! custom-element embed.

use crate::html;
use gridaware_core::{IntensityTier, RequestContext};
use once_cell::sync::Lazy;
use regex::Regex;

const PLACEHOLDER_CLASS: &str = "grid-aware-video-placeholder";
const THUMBNAIL_CLASS: &str = "grid-aware-video-thumbnail";

/// Video id extraction across the URL shapes YouTube serves:
/// `/embed/<id>`, `/v/<id>`, `/e/<id>`, `/shorts/<id>`, `watch?v=<id>`,
/// and the `youtu.be/<id>` short host. Ids are 11 chars of the standard
/// alphabet.
static VIDEO_ID_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?:youtube\.com/(?:[^/]+/.+/|(?:v|e(?:mbed)?|shorts)/|.*[?&]v=)|youtu\.be/)([A-Za-z0-9_-]{11})",
    )
    .expect("valid regex")
});

const VIDEO_ICON_SVG: &str = r##"<svg width="95" height="81" viewBox="0 0 95 81" fill="none" xmlns="http://www.w3.org/2000/svg"><path d="M94.6 76.8C94.6 78.8 93 80.4 91 80.4H4C2 80.4 0.4 78.8 0.4 76.8C0.4 74.8 2 73.1 4 73.1H91C93 73.1 94.6 74.8 94.6 76.8ZM94.6 7.9V58.6C94.6 62.6 91.4 65.9 87.4 65.9H7.6C3.6 65.9 0.4 62.6 0.4 58.6V7.9C0.4 3.9 3.6 0.6 7.6 0.6H87.4C91.4 0.6 94.6 3.9 94.6 7.9ZM63.8 33.3C63.8 32 63.2 30.9 62.3 30.3L44.1 17.6C42.2 16.3 38.4 17.2 38.4 20.6V45.9C38.4 49.3 42.2 50.2 44.1 48.9L62.3 36.2C63.2 35.6 63.8 34.5 63.8 33.3Z" fill="#E3E3E3"/></svg>"##;

/// Block-level metadata supplied by the host renderer alongside the
/// fragment (the embed URL and title the author entered).
#[derive(Debug, Clone, Default)]
pub struct EmbedMeta {
    pub url: Option<String>,
    pub title: Option<String>,
}

/// Whether a fragment (or its metadata) is a YouTube embed at all.
pub fn is_youtube(fragment: &str, meta: &EmbedMeta) -> bool {
    let in_meta = meta
        .url
        .as_deref()
        .map(|u| u.contains("youtube.com") || u.contains("youtu.be"))
        .unwrap_or(false);
    in_meta || fragment.contains("youtube.com") || fragment.contains("youtu.be")
}

/// Extract the 11-character video id from a URL.
pub fn extract_video_id(url: &str) -> Option<String> {
    VIDEO_ID_RE
        .captures(url)
        .map(|c| c[1].to_string())
}

/// Rewrite a playback URL onto the cookie-less host and suppress related
/// videos, handling the three query shapes (`?feature=oembed`, some other
/// `?query`, no query).
pub fn privacy_url(src: &str) -> String {
    if !src.contains("youtube.com") && !src.contains("youtu.be") {
        return src.to_string();
    }
    let mut url = src
        .replace("youtube-nocookie.com", "\u{0}nocookie\u{0}")
        .replace("youtube.com", "youtube-nocookie.com")
        .replace("youtu.be", "youtube-nocookie.com")
        .replace("\u{0}nocookie\u{0}", "youtube-nocookie.com");
    if url.contains("rel=0") {
        return url;
    }
    if url.contains("?feature=oembed") {
        url = url.replace("?feature=oembed", "?feature=oembed&rel=0");
    } else if url.contains('?') {
        url.push_str("&rel=0");
    } else {
        url.push_str("?rel=0");
    }
    url
}

/// Apply the privacy rewrite to every YouTube iframe in a fragment.
fn privacy_rewrite(fragment: &str) -> String {
    html::map_attr(fragment, "iframe", "src", |src| {
        if src.contains("youtube.com") || src.contains("youtu.be") {
            Some(privacy_url(src))
        } else {
            None
        }
    })
}

fn lazy_iframe(fragment: &str) -> String {
    html::inject_attr_if_absent(fragment, "iframe", "loading", "lazy")
}

/// Transform one rendered embed block for the request's intensity tier.
///
/// Non-YouTube embeds pass through untouched at every tier.
pub fn transform(fragment: &str, meta: &EmbedMeta, ctx: &RequestContext) -> String {
    if !is_youtube(fragment, meta) || !ctx.settings.videos {
        return fragment.to_string();
    }
    if is_transformed(fragment) {
        return fragment.to_string();
    }

    let video_id = meta
        .url
        .as_deref()
        .and_then(extract_video_id)
        .or_else(|| html::get_attr(fragment, "iframe", "src").and_then(|s| extract_video_id(&s)));
    let title = meta.title.clone().or_else(|| {
        html::get_attr(fragment, "iframe", "title").filter(|t| !t.trim().is_empty())
    });

    match ctx.intensity {
        IntensityTier::High => render_placeholder(fragment, title.as_deref()),
        IntensityTier::Medium => match &video_id {
            Some(id) => render_thumbnail(fragment, id, title.as_deref()),
            None => lazy_iframe(&privacy_rewrite(fragment)),
        },
        IntensityTier::Low => {
            if ctx.options.lite_embed {
                if let Some(id) = &video_id {
                    return lite_embed(id, title.as_deref());
                }
            }
            lazy_iframe(&privacy_rewrite(fragment))
        }
    }
}

fn is_transformed(fragment: &str) -> bool {
    fragment.contains(PLACEHOLDER_CLASS)
        || fragment.contains(THUMBNAIL_CLASS)
        || fragment.contains("<lite-youtube")
}

// ============================================================================
// TIER RENDERINGS
// ============================================================================

/// Layout hints extracted from the iframe for the placeholder style.
fn placeholder_style(fragment: &str) -> String {
    let mut style = String::new();
    if let Some(width) = html::get_attr(fragment, "iframe", "width") {
        if !width.is_empty() && width.chars().all(|c| c.is_ascii_digit()) {
            style.push_str(&format!("--video-width: {}px; ", width));
        }
    }
    if let Some(inline) = html::get_attr(fragment, "iframe", "style") {
        if !inline.trim().is_empty() {
            style.push_str(inline.trim());
            style.push_str("; ");
        }
    }
    style
}

/// High tier: the privacy-rewritten original travels only inside the
/// escaped `data-original-video` attribute.
fn render_placeholder(fragment: &str, title: Option<&str>) -> String {
    let title_html = title
        .map(|t| {
            format!(
                r#"<div class="placeholder-alt">{}</div>"#,
                html::escape_attr(t)
            )
        })
        .unwrap_or_default();
    let style = placeholder_style(fragment);
    let style_attr = if style.is_empty() {
        String::new()
    } else {
        format!(r#" style="{}""#, html::escape_attr(style.trim_end()))
    };

    format!(
        concat!(
            r#"<div class="{class}" data-original-video="{original}" onclick="gridAwareLoadVideo(this)"{style}>"#,
            r#"<div class="placeholder-content">"#,
            r#"<div class="placeholder-icon">{icon}</div>"#,
            "{title}",
            r#"<div class="placeholder-description">This video hasn&#039;t been loaded due to the <strong>high grid intensity.</strong></div>"#,
            r#"<button class="placeholder-load-btn" type="button">LOAD VIDEO</button>"#,
            "</div></div>"
        ),
        class = PLACEHOLDER_CLASS,
        original = html::escape_attr(&privacy_rewrite(fragment)),
        style = style_attr,
        icon = VIDEO_ICON_SVG,
        title = title_html,
    )
}

/// Medium tier with a known id: static thumbnail plus load-on-click.
fn render_thumbnail(fragment: &str, video_id: &str, title: Option<&str>) -> String {
    let thumbnail_url = format!("https://img.youtube.com/vi/{}/maxresdefault.jpg", video_id);
    let alt = title.unwrap_or("YouTube video thumbnail");
    let title_html = title
        .map(|t| {
            format!(
                r#"<div class="placeholder-alt">{}</div>"#,
                html::escape_attr(t)
            )
        })
        .unwrap_or_default();

    let mut style = "--video-width: 100%; ".to_string();
    if let Some(inline) = html::get_attr(fragment, "iframe", "style") {
        if !inline.trim().is_empty() {
            style.push_str(inline.trim());
            style.push_str("; ");
        }
    }

    format!(
        concat!(
            r#"<div class="{class}" data-original-video="{original}" onclick="gridAwareLoadVideo(this)" style="{style}">"#,
            r#"<img src="{thumbnail}" alt="{alt}" loading="lazy" />"#,
            r#"<div class="medium-overlay">"#,
            "{title}",
            r#"<div class="placeholder-description">This video has been loaded in low quality due to the <strong>medium grid intensity.</strong></div>"#,
            r#"<button class="placeholder-load-btn" type="button">Load video</button>"#,
            "</div></div>"
        ),
        class = THUMBNAIL_CLASS,
        original = html::escape_attr(&privacy_rewrite(fragment)),
        style = html::escape_attr(style.trim_end()),
        thumbnail = thumbnail_url,
        alt = html::escape_attr(alt),
        title = title_html,
    )
}

/// Low/live tier with an id: deferred custom-element embed.
fn lite_embed(video_id: &str, title: Option<&str>) -> String {
    format!(
        r#"<lite-youtube videoid="{}" style="width:100%;aspect-ratio:16/9;" title="{}"></lite-youtube>"#,
        html::escape_attr(video_id),
        html::escape_attr(title.unwrap_or("YouTube video")),
    )
}

// ============================================================================
// UNIT TESTS
// ============================================================================
