//! # gridaware-transform
//!
//! Tier-aware content transformers. Each transformer takes one rendered
//! fragment (or the theme typography document), the request context
//! resolved by `gridaware-provider`, and returns adapted output. All
//! transformers are pure over their inputs and idempotent, so re-running
//! a filter chain over already-adapted markup is safe.
//!
//! - [`image`] — placeholder / overlay / lazy-load renderings for images
//! - [`video`] — YouTube privacy rewrite, placeholders and thumbnails
//! - [`typography`] — system-font substitution at high intensity
//! - [`runtime`] — body class, info bar, and click-to-load scripts
//! - [`html`] — the attribute-level scanner the transformers share

pub mod html;
pub mod image;
pub mod runtime;
pub mod typography;
pub mod video;

pub use image::ImageMeta;
pub use runtime::GridStatus;
pub use video::EmbedMeta;
