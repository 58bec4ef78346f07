//! Conversions between the canonical forms.
//!
//! - Gray to RGB copies the gray level into every channel.
//! - RGB to gray stores the rounded mean `(r + g + b + 1) / 3`.
//! - Palette to RGB/gray looks every index up in the attached palette.
//! - RGB/gray to palette goes through [`quantize`].

use crate::canonical::CanonicalImage;
use crate::quantize::quantize;
use crate::settings::QuantizeSettings;
use gx_texture_common::color_8888::Color8888;
use gx_texture_common::format::CanonicalForm;
use gx_texture_common::{TextureError, TextureResult};
use tracing::debug;

/// Expands a gray image to RGBA.
pub fn gray_to_rgb(image: &CanonicalImage) -> CanonicalImage {
    let mut out = CanonicalImage::new(CanonicalForm::Rgb, image.width(), image.height());
    for y in 0..image.height() as usize {
        for x in 0..image.width() as usize {
            let (gray, alpha) = image.gray_at(x, y);
            out.set_rgba(x, y, Color8888::new(gray, gray, gray, alpha));
        }
    }
    out
}

/// Reduces an RGBA image to gray.
pub fn rgb_to_gray(image: &CanonicalImage) -> CanonicalImage {
    let mut out = CanonicalImage::new(CanonicalForm::Gray, image.width(), image.height());
    for y in 0..image.height() as usize {
        for x in 0..image.width() as usize {
            let color = image.rgba_at(x, y);
            out.set_gray(x, y, color.gray(), color.a);
        }
    }
    out
}

/// Resolves every palette index to its RGBA entry.
///
/// # Errors
///
/// Returns [`TextureError::PaletteOverflow`] if an index points past the end of the palette
/// (or no palette is attached).
pub fn palette_to_rgb(image: &CanonicalImage) -> TextureResult<CanonicalImage> {
    let entries = image.palette().map(|palette| palette.entries()).unwrap_or(&[]);
    let mut out = CanonicalImage::new(CanonicalForm::Rgb, image.width(), image.height());
    for y in 0..image.height() as usize {
        for x in 0..image.width() as usize {
            let index = image.index_at(x, y) as usize;
            let color = entries
                .get(index)
                .ok_or(TextureError::PaletteOverflow {
                    requested: index + 1,
                    max: entries.len(),
                })?;
            out.set_rgba(x, y, *color);
        }
    }
    Ok(out)
}

/// Quantizes an RGBA image into a palette image.
///
/// # Errors
///
/// Same as [`quantize`].
pub fn rgb_to_palette(
    image: &CanonicalImage,
    settings: &QuantizeSettings,
) -> TextureResult<CanonicalImage> {
    let (palette, indices) = quantize(image.pixels(), settings)?;
    Ok(CanonicalImage::from_indices(
        image.width(),
        image.height(),
        &indices,
        palette,
    ))
}

/// Converts an image to another canonical form.
///
/// Converting to the image's own form returns a copy.
///
/// # Errors
///
/// See [`palette_to_rgb`] and [`quantize`].
pub fn recode(
    image: &CanonicalImage,
    target: CanonicalForm,
    settings: &QuantizeSettings,
) -> TextureResult<CanonicalImage> {
    use CanonicalForm::*;

    if image.form() != target {
        debug!(from = ?image.form(), to = ?target, "recoding canonical image");
    }
    match (image.form(), target) {
        (Gray, Gray) | (Rgb, Rgb) | (Palette, Palette) => Ok(image.clone()),
        (Gray, Rgb) => Ok(gray_to_rgb(image)),
        (Rgb, Gray) => Ok(rgb_to_gray(image)),
        (Palette, Rgb) => palette_to_rgb(image),
        (Palette, Gray) => Ok(rgb_to_gray(&palette_to_rgb(image)?)),
        (Rgb, Palette) => rgb_to_palette(image, settings),
        (Gray, Palette) => rgb_to_palette(&gray_to_rgb(image), settings),
    }
}

#[cfg(test)]
mod tests {
    use crate::test_prelude::*;

    fn rgb_sample() -> CanonicalImage {
        let mut image = CanonicalImage::new(CanonicalForm::Rgb, 2, 1);
        image.set_rgba(0, 0, Color8888::new(10, 20, 31, 255));
        image.set_rgba(1, 0, Color8888::new(200, 200, 200, 7));
        image
    }

    #[test]
    fn gray_uses_rounded_mean() {
        let settings = QuantizeSettings::default();
        let gray = recode(&rgb_sample(), CanonicalForm::Gray, &settings).unwrap();
        assert_eq!(gray.gray_at(0, 0), (20, 255));
        assert_eq!(gray.gray_at(1, 0), (200, 7));

        let rgb = recode(&gray, CanonicalForm::Rgb, &settings).unwrap();
        assert_eq!(rgb.rgba_at(1, 0), Color8888::new(200, 200, 200, 7));
    }

    #[test]
    fn palette_round_trip_is_exact_for_few_colors() {
        let settings = QuantizeSettings::new(4);
        let indexed = recode(&rgb_sample(), CanonicalForm::Palette, &settings).unwrap();
        assert_eq!(indexed.palette().map(Palette::len), Some(2));

        let back = recode(&indexed, CanonicalForm::Rgb, &settings).unwrap();
        assert_eq!(back, rgb_sample());
    }

    #[test]
    fn missing_palette_entries_are_reported() {
        let palette = Palette::from(vec![Color8888::TRANSPARENT]);
        let image = CanonicalImage::from_indices(1, 1, &[3], palette);
        assert_eq!(
            palette_to_rgb(&image),
            Err(TextureError::PaletteOverflow {
                requested: 4,
                max: 1
            })
        );
    }
}
