//! Content-addressed image resize cache for static site templates.
//!
//! A template asks for `resize("images/photo.png", "800x800 webp")` and gets
//! back a public URL. The artifact is named after the source bytes and the
//! requested transform, so it is built once and reused until either changes.

pub mod cache;
pub mod config;
pub mod error;
pub mod fingerprint;
pub mod freshness;
pub mod image;
pub mod logger;
pub mod options;

pub use cache::{ArtifactPublisher, CacheLayout, OutputPublisher, ResizeCache, StaticFiles};
pub use config::SiteConfig;
pub use error::{ResizeError, Result};
pub use options::OutputFormat;
