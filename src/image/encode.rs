//! Encoding and atomic artifact writes.

use std::fs;
use std::io::{BufWriter, Seek, Write};
use std::path::Path;

use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ImageFormat, ImageResult};
use tempfile::NamedTempFile;

use crate::error::{ResizeError, Result};

/// JPEG quality for re-encoded artifacts.
pub const JPEG_QUALITY: u8 = 90;

/// Encode `img` as `format` and move it into place at `dest`.
///
/// The bytes go to a temp file next to `dest` first, so a reader either
/// sees no artifact or a complete one.
pub fn write_atomic(img: &DynamicImage, format: ImageFormat, dest: &Path) -> Result<()> {
    let dir = dest.parent().unwrap_or_else(|| Path::new("."));
    let tmp = NamedTempFile::new_in(dir).map_err(|e| ResizeError::processing(dest, e))?;

    let mut writer = BufWriter::new(tmp);
    encode(img, format, &mut writer).map_err(|e| ResizeError::processing(dest, e))?;
    let tmp = writer
        .into_inner()
        .map_err(|e| ResizeError::processing(dest, e.into_error()))?;

    // NamedTempFile is created 0600; artifacts are published as regular files
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        tmp.as_file()
            .set_permissions(fs::Permissions::from_mode(0o644))
            .map_err(|e| ResizeError::processing(dest, e))?;
    }

    tmp.persist(dest)
        .map_err(|e| ResizeError::processing(dest, e.error))?;
    Ok(())
}

/// Encode without any metadata: only pixels are written.
fn encode<W: Write + Seek>(img: &DynamicImage, format: ImageFormat, w: &mut W) -> ImageResult<()> {
    match format {
        ImageFormat::Jpeg => DynamicImage::ImageRgb8(img.to_rgb8())
            .write_with_encoder(JpegEncoder::new_with_quality(w, JPEG_QUALITY)),
        // The WebP encoder only takes 8-bit RGB(A)
        ImageFormat::WebP if img.color().has_alpha() => {
            DynamicImage::ImageRgba8(img.to_rgba8()).write_to(w, format)
        }
        ImageFormat::WebP => DynamicImage::ImageRgb8(img.to_rgb8()).write_to(w, format),
        other => img.write_to(w, other),
    }
}
