//! Alpha flattening for opaque output formats.

use image::{DynamicImage, Rgb, RgbImage};

/// Background used when flattening transparency.
pub const WHITE: Rgb<u8> = Rgb([255, 255, 255]);

/// Composite `img` onto a solid background, dropping the alpha channel.
///
/// Images without alpha are only converted to 8-bit RGB.
pub fn flatten(img: &DynamicImage, background: Rgb<u8>) -> DynamicImage {
    if !img.color().has_alpha() {
        return DynamicImage::ImageRgb8(img.to_rgb8());
    }

    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();
    let mut out = RgbImage::new(width, height);

    for (src, dst) in rgba.pixels().zip(out.pixels_mut()) {
        let alpha = u32::from(src[3]);
        for c in 0..3 {
            let fg = u32::from(src[c]) * alpha;
            let bg = u32::from(background[c]) * (255 - alpha);
            #[allow(clippy::cast_possible_truncation)]
            let mixed = ((fg + bg + 127) / 255) as u8;
            dst[c] = mixed;
        }
    }

    DynamicImage::ImageRgb8(out)
}
