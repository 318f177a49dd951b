//! Resize pipeline: decode → orient → resolve % → resize → flatten → encode.

use std::io;
use std::path::Path;

use image::imageops::FilterType;
use image::metadata::Orientation;
use image::error::{LimitError, LimitErrorKind};
use image::{DynamicImage, ImageDecoder, ImageError, ImageFormat, ImageReader};

use super::encode::write_atomic;
use super::flatten::{WHITE, flatten};
use super::geometry::{Geometry, percent_to_pixels, within_limits};
use crate::error::{ResizeError, Result};
use crate::options::OutputFormat;

/// Produces an artifact at `dest` from `source`.
///
/// The cache orchestrator only talks to this trait, which keeps the
/// check-and-build logic testable without decoding real images.
pub trait Transform: Send + Sync {
    fn process(
        &self,
        source: &Path,
        geometry: &str,
        format: Option<OutputFormat>,
        dest: &Path,
    ) -> Result<()>;
}

/// The image-crate backed transform.
#[derive(Debug, Clone, Copy)]
pub struct Pipeline {
    /// Resampling filter used for every resize.
    pub filter: FilterType,
}

impl Default for Pipeline {
    fn default() -> Self {
        Self {
            filter: FilterType::Lanczos3,
        }
    }
}

impl Transform for Pipeline {
    fn process(
        &self,
        source: &Path,
        geometry: &str,
        format: Option<OutputFormat>,
        dest: &Path,
    ) -> Result<()> {
        // Bad geometry fails before any pixel work
        let mut parsed = Geometry::parse(geometry)?;

        let (img, native) = decode_oriented(source)?;

        if let Geometry::Percent(pct) = parsed {
            let (w, h) = percent_to_pixels(pct, (img.width(), img.height()));
            let resolved = format!("{w}x{h}");
            crate::debug!("resize"; "{} resolved to {}", geometry.trim(), resolved);
            parsed = Geometry::parse(&resolved)?;
        }

        let (tw, th) = parsed.target_dimensions((img.width(), img.height()));
        if !within_limits((tw, th)) {
            crate::debug!("resize"; "{} asks for {}x{}", geometry.trim(), tw, th);
            return Err(ResizeError::processing(
                source,
                ImageError::Limits(LimitError::from_kind(LimitErrorKind::DimensionError)),
            ));
        }
        let img = if (tw, th) == (img.width(), img.height()) {
            img
        } else {
            img.resize_exact(tw, th, self.filter)
        };

        let target = format.map_or(native, OutputFormat::image_format);
        let img = if supports_alpha(target) {
            img
        } else {
            flatten(&img, WHITE)
        };

        write_atomic(&img, target, dest)
    }
}

/// Decode `source` and apply its EXIF orientation.
///
/// Returns the upright image and the format it was stored in.
pub fn decode_oriented(source: &Path) -> Result<(DynamicImage, ImageFormat)> {
    let reader = ImageReader::open(source)
        .map_err(|e| ResizeError::not_found(source, e))?
        .with_guessed_format()
        .map_err(|e| ResizeError::processing(source, e))?;

    let Some(native) = reader.format() else {
        return Err(ResizeError::processing(
            source,
            io::Error::new(io::ErrorKind::InvalidData, "unrecognized image format"),
        ));
    };

    let mut decoder = reader
        .into_decoder()
        .map_err(|e| ResizeError::processing(source, e))?;
    // Missing or unreadable EXIF just means "already upright"
    let orientation = decoder.orientation().unwrap_or(Orientation::NoTransforms);
    let mut img =
        DynamicImage::from_decoder(decoder).map_err(|e| ResizeError::processing(source, e))?;
    img.apply_orientation(orientation);

    Ok((img, native))
}

/// Whether `format` can store transparency.
pub fn supports_alpha(format: ImageFormat) -> bool {
    !matches!(format, ImageFormat::Jpeg | ImageFormat::Bmp)
}
