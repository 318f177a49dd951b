//! Image transform pipeline.
//!
//! # Modules
//!
//! - [`geometry`]: geometry expressions and target size math
//! - [`pipeline`]: decode, orient, resize and write artifacts
//! - `flatten`: alpha compositing for opaque formats
//! - `encode`: metadata-free encoding with atomic writes

mod encode;
mod flatten;
pub mod geometry;
pub mod pipeline;

pub use encode::JPEG_QUALITY;
pub use geometry::{FitMode, Geometry, MAX_PIXELS};
pub use pipeline::{Pipeline, Transform};
