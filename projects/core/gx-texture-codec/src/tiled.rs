//! # Tiled Block Codec
//!
//! Decodes native GX pixel data to a [`CanonicalImage`] and encodes it back.
//!
//! ## Traversal
//!
//! The padded image is split into `tile_width x tile_height` tiles. Tiles are stored
//! left-to-right, then top-to-bottom; inside a tile pixels are stored row-major. For an 8x4 tile
//! format on a 16x8 image:
//!
//! ```text
//! tile 0 | tile 1
//! -------+-------
//! tile 2 | tile 3
//! ```
//!
//! ## Packing
//!
//! - 4-bit formats store two pixels per byte, the first in the high nibble.
//! - 16-bit words follow the [`Endian`] passed in (big-endian for console data).
//! - RGBA32 stores each 4x4 tile as 32 bytes of `(alpha, red)` pairs followed by 32 bytes of
//!   `(green, blue)` pairs.
//! - Index formats decode to palette indices only; the palette is attached by the caller.
//! - CMPR goes through [`gx_texture_cmpr`].

use crate::canonical::CanonicalImage;
use crate::pixel::{
    decode_ia8, decode_rgb565, decode_rgb5a3, encode_ia8, encode_rgb565, encode_rgb5a3,
};
use crate::settings::CodecSettings;
use alloc::vec;
use alloc::vec::Vec;
use gx_texture_common::bit_depth::{expand4, reduce4};
use gx_texture_common::color_8888::Color8888;
use gx_texture_common::endian::Endian;
use gx_texture_common::format::{FormatDescriptor, TextureFormat};
use gx_texture_common::{GeometryIssue, TextureError, TextureResult};
use tracing::debug;

/// Iterates the `(x, y)` pixel coordinates of a padded image in storage order.
pub fn tile_order(
    desc: &FormatDescriptor,
    xwidth: u32,
    xheight: u32,
) -> impl Iterator<Item = (usize, usize)> {
    let (tw, th) = (desc.tile_width as usize, desc.tile_height as usize);
    let (xwidth, xheight) = (xwidth as usize, xheight as usize);
    (0..xheight).step_by(th).flat_map(move |ty| {
        (0..xwidth).step_by(tw).flat_map(move |tx| {
            (0..th).flat_map(move |y| (0..tw).map(move |x| (tx + x, ty + y)))
        })
    })
}

#[inline]
fn read_nibble(data: &[u8], n: usize) -> u8 {
    let byte = data[n / 2];
    if n % 2 == 0 {
        byte >> 4
    } else {
        byte & 0x0F
    }
}

#[inline]
fn write_nibble(data: &mut [u8], n: usize, value: u8) {
    let byte = &mut data[n / 2];
    if n % 2 == 0 {
        *byte = (*byte & 0x0F) | (value << 4);
    } else {
        *byte = (*byte & 0xF0) | (value & 0x0F);
    }
}

/// Decodes native pixel data to its canonical form.
///
/// `width` and `height` are the logical dimensions; the returned image covers the padded
/// `xwidth x xheight` area. Index formats return indices without a palette.
///
/// # Errors
///
/// Returns [`TextureError::GeometryError`] if the dimensions are empty or need more bytes than
/// `data` holds.
pub fn decode(
    data: &[u8],
    format: TextureFormat,
    width: u32,
    height: u32,
    endian: Endian,
) -> TextureResult<CanonicalImage> {
    let desc = format.descriptor();
    let required = desc.image_size(width, height)?;
    if data.len() < required {
        return Err(TextureError::geometry(
            width,
            height,
            GeometryIssue::BufferTooSmall {
                required,
                actual: data.len(),
            },
        ));
    }
    let data = &data[..required];
    let (xwidth, xheight) = desc.aligned_dimensions(width, height)?;
    debug!(%format, width, height, xwidth, xheight, "decoding");

    let mut out = CanonicalImage::new(desc.canonical_form, xwidth, xheight);
    let order = tile_order(desc, xwidth, xheight).enumerate();
    match format {
        TextureFormat::I4 => {
            for (n, (x, y)) in order {
                out.set_gray(x, y, expand4(read_nibble(data, n)), 255);
            }
        }
        TextureFormat::I8 => {
            for (n, (x, y)) in order {
                out.set_gray(x, y, data[n], 255);
            }
        }
        TextureFormat::IA4 => {
            for (n, (x, y)) in order {
                out.set_gray(x, y, expand4(data[n]), expand4(data[n] >> 4));
            }
        }
        TextureFormat::IA8 => {
            for (n, (x, y)) in order {
                let (intensity, alpha) = decode_ia8(endian.read_u16(&data[n * 2..]));
                out.set_gray(x, y, intensity, alpha);
            }
        }
        TextureFormat::RGB565 => {
            for (n, (x, y)) in order {
                out.set_rgba(x, y, decode_rgb565(endian.read_u16(&data[n * 2..])));
            }
        }
        TextureFormat::RGB5A3 => {
            for (n, (x, y)) in order {
                out.set_rgba(x, y, decode_rgb5a3(endian.read_u16(&data[n * 2..])));
            }
        }
        TextureFormat::RGBA32 => {
            for (n, (x, y)) in order {
                let (tile, i) = (n / 16 * 64, n % 16 * 2);
                let (alpha, red) = (data[tile + i], data[tile + i + 1]);
                let (green, blue) = (data[tile + 32 + i], data[tile + 32 + i + 1]);
                out.set_rgba(x, y, Color8888::new(red, green, blue, alpha));
            }
        }
        TextureFormat::C4 => {
            for (n, (x, y)) in order {
                out.set_index(x, y, read_nibble(data, n) as u16);
            }
        }
        TextureFormat::C8 => {
            for (n, (x, y)) in order {
                out.set_index(x, y, data[n] as u16);
            }
        }
        TextureFormat::C14X2 => {
            for (n, (x, y)) in order {
                out.set_index(x, y, endian.read_u16(&data[n * 2..]) & 0x3FFF);
            }
        }
        TextureFormat::CMPR => {
            let rgba = gx_texture_cmpr::decompress_image(data, xwidth as usize, xheight as usize)?;
            out = CanonicalImage::from_pixels(desc.canonical_form, xwidth, xheight, rgba)?;
        }
        TextureFormat::CanonicalGray
        | TextureFormat::CanonicalRgb
        | TextureFormat::CanonicalPalette => {
            out = CanonicalImage::from_pixels(desc.canonical_form, xwidth, xheight, data.to_vec())?;
        }
    }
    Ok(out)
}

/// Encodes a canonical image to a native (or canonical) format.
///
/// The image must already be in the canonical form of `format` and padded to its tile size.
/// Index formats require every index to fit the format's palette capacity.
///
/// # Errors
///
/// - [`TextureError::UnsupportedConversion`] if the canonical form does not match `format`.
/// - [`TextureError::GeometryError`] if the image is empty or not tile aligned.
/// - [`TextureError::PaletteOverflow`] if an index does not fit the format.
pub fn encode(
    image: &CanonicalImage,
    format: TextureFormat,
    settings: &CodecSettings,
) -> TextureResult<Vec<u8>> {
    let desc = format.descriptor();
    if image.form() != desc.canonical_form {
        return Err(TextureError::UnsupportedConversion {
            from: image.format(),
            to: format,
        });
    }
    let (width, height) = (image.width(), image.height());
    let size = desc.image_size(width, height)?;
    if !desc.is_tile_aligned(width, height) {
        return Err(TextureError::geometry(
            width,
            height,
            GeometryIssue::NotTileAligned {
                tile_width: desc.tile_width,
                tile_height: desc.tile_height,
            },
        ));
    }
    if format.is_palette() {
        if let Some(max_index) = image.max_index() {
            if max_index as usize >= desc.max_palette_entries {
                return Err(TextureError::PaletteOverflow {
                    requested: max_index as usize + 1,
                    max: desc.max_palette_entries,
                });
            }
        }
    }
    debug!(%format, width, height, size, "encoding");

    let endian = settings.endian;
    let mut out = vec![0u8; size];
    let order = tile_order(desc, width, height).enumerate();
    match format {
        TextureFormat::I4 => {
            for (n, (x, y)) in order {
                write_nibble(&mut out, n, reduce4(image.gray_at(x, y).0));
            }
        }
        TextureFormat::I8 => {
            for (n, (x, y)) in order {
                out[n] = image.gray_at(x, y).0;
            }
        }
        TextureFormat::IA4 => {
            for (n, (x, y)) in order {
                let (intensity, alpha) = image.gray_at(x, y);
                out[n] = (reduce4(alpha) << 4) | reduce4(intensity);
            }
        }
        TextureFormat::IA8 => {
            for (n, (x, y)) in order {
                let (intensity, alpha) = image.gray_at(x, y);
                endian.write_u16(&mut out[n * 2..], encode_ia8(intensity, alpha));
            }
        }
        TextureFormat::RGB565 => {
            for (n, (x, y)) in order {
                endian.write_u16(&mut out[n * 2..], encode_rgb565(image.rgba_at(x, y)));
            }
        }
        TextureFormat::RGB5A3 => {
            for (n, (x, y)) in order {
                endian.write_u16(&mut out[n * 2..], encode_rgb5a3(image.rgba_at(x, y)));
            }
        }
        TextureFormat::RGBA32 => {
            for (n, (x, y)) in order {
                let (tile, i) = (n / 16 * 64, n % 16 * 2);
                let color = image.rgba_at(x, y);
                out[tile + i] = color.a;
                out[tile + i + 1] = color.r;
                out[tile + 32 + i] = color.g;
                out[tile + 32 + i + 1] = color.b;
            }
        }
        TextureFormat::C4 => {
            for (n, (x, y)) in order {
                write_nibble(&mut out, n, image.index_at(x, y) as u8);
            }
        }
        TextureFormat::C8 => {
            for (n, (x, y)) in order {
                out[n] = image.index_at(x, y) as u8;
            }
        }
        TextureFormat::C14X2 => {
            for (n, (x, y)) in order {
                endian.write_u16(&mut out[n * 2..], image.index_at(x, y) & 0x3FFF);
            }
        }
        TextureFormat::CMPR => {
            out = gx_texture_cmpr::compress_image(
                image.pixels(),
                width as usize,
                height as usize,
                &settings.cmpr,
            )?;
        }
        TextureFormat::CanonicalGray
        | TextureFormat::CanonicalRgb
        | TextureFormat::CanonicalPalette => out.copy_from_slice(image.pixels()),
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use crate::test_prelude::*;

    /// Canonical image with a deterministic pattern, valid for `format`.
    fn pattern(format: TextureFormat, width: u32, height: u32) -> CanonicalImage {
        let desc = format.descriptor();
        let mut image = CanonicalImage::new(desc.canonical_form, width, height);
        for y in 0..height as usize {
            for x in 0..width as usize {
                let v = (x * 37 + y * 11) as u8;
                match desc.canonical_form {
                    CanonicalForm::Gray => image.set_gray(x, y, v, 255 - v),
                    CanonicalForm::Rgb => {
                        image.set_rgba(x, y, Color8888::new(v, v ^ 0x5A, 255 - v, v | 0x0F))
                    }
                    CanonicalForm::Palette => {
                        let cap = desc.max_palette_entries.min(1024);
                        image.set_index(x, y, ((x * 7 + y * 3) % cap) as u16)
                    }
                }
            }
        }
        image
    }

    /// What the pixel pattern looks like after being stored in `format`.
    fn representable(format: TextureFormat, image: &CanonicalImage) -> CanonicalImage {
        let settings = CodecSettings::default();
        let once = encode(image, format, &settings).unwrap();
        decode(&once, format, image.width(), image.height(), Endian::Big).unwrap()
    }

    /// CMPR is lossy in a way that is not idempotent and is covered separately.
    #[test]
    fn every_format_round_trips_representable_images() {
        let formats = TextureFormat::all_values()
            .iter()
            .filter(|&&format| format != TextureFormat::CMPR);
        for format in formats {
            for endian in Endian::all_values() {
                let (tw, th) = format.descriptor().tile_size();
                let (width, height) = (tw * 2, th * 3);
                // Bring the pattern onto the format's grid first; from then on bytes are exact.
                let image = representable(*format, &pattern(*format, width, height));
                let settings = CodecSettings {
                    endian: *endian,
                    ..Default::default()
                };

                let encoded = encode(&image, *format, &settings).unwrap();
                assert_eq!(encoded.len(), format.descriptor().image_size(width, height).unwrap());
                let decoded = decode(&encoded, *format, width, height, *endian).unwrap();
                assert_eq!(decoded, image, "{format} {endian:?}");
            }
        }
    }

    #[test]
    fn cmpr_round_trips_solid_blocks() {
        let mut image = CanonicalImage::new(CanonicalForm::Rgb, 16, 8);
        for y in 0..8 {
            for x in 0..16 {
                let color = match (x / 4, y / 4) {
                    (0, 0) => Color8888::new(255, 0, 0, 255),
                    (1, 0) => Color8888::new(0, 0, 255, 255),
                    (2, 1) => Color8888::new(255, 255, 255, 255),
                    _ => Color8888::TRANSPARENT,
                };
                image.set_rgba(x, y, color);
            }
        }
        let encoded = encode(&image, TextureFormat::CMPR, &CodecSettings::default()).unwrap();
        assert_eq!(encoded.len(), 64);
        let decoded = decode(&encoded, TextureFormat::CMPR, 16, 8, Endian::Big).unwrap();
        assert_eq!(decoded, image);
    }

    #[test]
    fn tile_order_visits_tiles_then_rows() {
        let desc = TextureFormat::I8.descriptor();
        let order: Vec<_> = tile_order(desc, 16, 4).collect();
        assert_eq!(order.len(), 64);
        assert_eq!(order[0], (0, 0));
        assert_eq!(order[7], (7, 0));
        assert_eq!(order[8], (0, 1));
        assert_eq!(order[32], (8, 0));
    }

    #[test]
    fn gray4_mid_gray_stays_within_one_step() {
        let mut image = CanonicalImage::new(CanonicalForm::Gray, 8, 8);
        for y in 0..8 {
            for x in 0..8 {
                image.set_gray(x, y, 0x88, 255);
            }
        }
        let encoded = encode(&image, TextureFormat::I4, &CodecSettings::default()).unwrap();
        assert_eq!(encoded.len(), 32);
        let decoded = decode(&encoded, TextureFormat::I4, 8, 8, Endian::Big).unwrap();
        for y in 0..8 {
            for x in 0..8 {
                let (gray, alpha) = decoded.gray_at(x, y);
                assert!(gray.abs_diff(0x88) <= 8, "{gray:#x}");
                assert_eq!(alpha, 255);
            }
        }
    }

    #[test]
    fn rgb565_always_decodes_opaque() {
        let data: Vec<u8> = (0..32).map(|i| (i * 29) as u8).collect();
        let decoded = decode(&data, TextureFormat::RGB565, 4, 4, Endian::Big).unwrap();
        assert!(!decoded.has_transparency());
    }

    #[test]
    fn rgba32_uses_two_planes_per_tile() {
        let mut image = CanonicalImage::new(CanonicalForm::Rgb, 4, 4);
        image.set_rgba(1, 0, Color8888::new(0x11, 0x22, 0x33, 0x44));
        let encoded = encode(&image, TextureFormat::RGBA32, &CodecSettings::default()).unwrap();
        assert_eq!(encoded.len(), 64);
        assert_eq!(&encoded[2..4], &[0x44, 0x11]);
        assert_eq!(&encoded[34..36], &[0x22, 0x33]);
    }

    #[rstest]
    #[case(TextureFormat::I4, [0x12, 0x34])]
    #[case(TextureFormat::C4, [0x12, 0x34])]
    fn four_bit_formats_store_high_nibble_first(#[case] format: TextureFormat, #[case] bytes: [u8; 2]) {
        let mut data = vec![0u8; 32];
        data[..2].copy_from_slice(&bytes);
        let decoded = decode(&data, format, 8, 8, Endian::Big).unwrap();
        let first: Vec<u16> = (0..4)
            .map(|x| match decoded.form() {
                CanonicalForm::Gray => decoded.gray_at(x, 0).0 as u16 / 17,
                _ => decoded.index_at(x, 0),
            })
            .collect();
        assert_eq!(first, [1u16, 2, 3, 4]);
    }

    #[test]
    fn ia8_is_alpha_then_intensity() {
        let mut data = vec![0u8; 32];
        data[..2].copy_from_slice(&[0x40, 0xC0]);
        let decoded = decode(&data, TextureFormat::IA8, 4, 4, Endian::Big).unwrap();
        assert_eq!(decoded.gray_at(0, 0), (0xC0, 0x40));
    }

    #[test]
    fn decode_pads_to_tile_size() {
        let decoded = decode(&[0u8; 32], TextureFormat::CMPR, 5, 3, Endian::Big).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (8, 8));
    }

    #[rstest]
    #[case(TextureFormat::RGB565, 4, 4, 31)]
    #[case(TextureFormat::I4, 0, 8, 32)]
    #[case(TextureFormat::I4, u32::MAX, 8, 64)]
    #[case(TextureFormat::RGB5A3, 4, u32::MAX, 64)]
    fn decode_rejects_bad_geometry(
        #[case] format: TextureFormat,
        #[case] width: u32,
        #[case] height: u32,
        #[case] len: usize,
    ) {
        assert!(matches!(
            decode(&vec![0u8; len], format, width, height, Endian::Big),
            Err(TextureError::GeometryError { .. })
        ));
    }

    #[test]
    fn encode_checks_form_alignment_and_capacity() {
        let settings = CodecSettings::default();
        let gray = CanonicalImage::new(CanonicalForm::Gray, 8, 8);
        assert_eq!(
            encode(&gray, TextureFormat::RGB565, &settings),
            Err(TextureError::UnsupportedConversion {
                from: TextureFormat::CanonicalGray,
                to: TextureFormat::RGB565,
            })
        );

        let unaligned = CanonicalImage::new(CanonicalForm::Rgb, 6, 4);
        assert!(matches!(
            encode(&unaligned, TextureFormat::RGB565, &settings),
            Err(TextureError::GeometryError {
                issue: GeometryIssue::NotTileAligned { .. },
                ..
            })
        ));

        let mut indices = CanonicalImage::new(CanonicalForm::Palette, 8, 8);
        indices.set_index(0, 0, 16);
        assert_eq!(
            encode(&indices, TextureFormat::C4, &settings),
            Err(TextureError::PaletteOverflow {
                requested: 17,
                max: 16
            })
        );
        assert!(encode(&indices, TextureFormat::C8, &settings).is_ok());
    }
}
