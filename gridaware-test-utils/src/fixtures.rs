//! HTML block fixtures shared by transformer tests.

/// A rendered image block with dimensions, alt text and a caption.
pub const IMAGE_BLOCK: &str = concat!(
    r#"<figure class="wp-block-image size-large">"#,
    r#"<img src="https://example.org/uploads/forest-1024x683.jpg" alt="A forest" class="wp-image-42" width="1024" height="683" />"#,
    r#"<figcaption class="wp-element-caption">A forest in autumn</figcaption>"#,
    "</figure>"
);

/// A rendered image block with no alt text and no caption.
pub const IMAGE_BLOCK_BARE: &str = concat!(
    r#"<figure class="wp-block-image">"#,
    r#"<img src="https://example.org/uploads/photo.jpg" class="wp-image-7" />"#,
    "</figure>"
);

/// A rendered YouTube embed block in the oEmbed shape.
pub const YOUTUBE_BLOCK: &str = concat!(
    r#"<figure class="wp-block-embed is-type-video is-provider-youtube">"#,
    r#"<div class="wp-block-embed__wrapper">"#,
    r#"<iframe width="560" height="315" src="https://www.youtube.com/embed/dQw4w9WgXcQ?feature=oembed" title="Example video" frameborder="0" allowfullscreen></iframe>"#,
    "</div></figure>"
);

/// A non-YouTube embed block that transformers must pass through.
pub const VIMEO_BLOCK: &str = concat!(
    r#"<figure class="wp-block-embed is-type-video is-provider-vimeo">"#,
    r#"<div class="wp-block-embed__wrapper">"#,
    r#"<iframe src="https://player.vimeo.com/video/123456" width="640" height="360"></iframe>"#,
    "</div></figure>"
);

/// The canonical YouTube video id used across fixtures.
pub const YOUTUBE_VIDEO_ID: &str = "dQw4w9WgXcQ";
