//! Packing of single 16-bit words.
//!
//! The same three layouts are used for native pixels and for palette entries:
//!
//! ```text
//! IA8     AAAAAAAA IIIIIIII                  alpha in the high byte
//! RGB565  RRRRRGGG GGGBBBBB                  always opaque
//! RGB5A3  1RRRRRGG GGGBBBBB                  top bit set: opaque 5-5-5
//!         0AAARRRR GGGGBBBB                  top bit clear: 3-bit alpha, 4-4-4 colour
//! ```

use gx_texture_common::bit_depth::{
    expand3, expand4, expand5, reduce3, reduce4, reduce5, REDUCE_8_TO_5_SHL1,
};
use gx_texture_common::color_565::Color565;
use gx_texture_common::color_8888::Color8888;
use gx_texture_common::format::PaletteFormat;

/// Unpacks an IA8 word into `(intensity, alpha)`.
#[inline]
pub fn decode_ia8(word: u16) -> (u8, u8) {
    (word as u8, (word >> 8) as u8)
}

/// Packs `(intensity, alpha)` into an IA8 word.
#[inline]
pub fn encode_ia8(intensity: u8, alpha: u8) -> u16 {
    ((alpha as u16) << 8) | intensity as u16
}

/// Unpacks an RGB565 word; alpha is always 255.
#[inline]
pub fn decode_rgb565(word: u16) -> Color8888 {
    Color565::from_raw(word).to_color_8888()
}

/// Packs the colour channels into an RGB565 word; alpha is dropped.
#[inline]
pub fn encode_rgb565(color: Color8888) -> u16 {
    Color565::from_color_8888(color).raw_value()
}

/// Unpacks an RGB5A3 word.
#[inline]
pub fn decode_rgb5a3(word: u16) -> Color8888 {
    if word & 0x8000 != 0 {
        Color8888::new(
            expand5((word >> 10) as u8),
            expand5((word >> 5) as u8),
            expand5(word as u8),
            255,
        )
    } else {
        Color8888::new(
            expand4((word >> 8) as u8),
            expand4((word >> 4) as u8),
            expand4(word as u8),
            expand3((word >> 12) as u8),
        )
    }
}

/// Packs a colour into an RGB5A3 word.
///
/// Colours whose alpha reduces to the 3-bit maximum (alpha >= 0xED) use the opaque 5-5-5 mode.
#[inline]
pub fn encode_rgb5a3(color: Color8888) -> u16 {
    let alpha = reduce3(color.a);
    if alpha == 7 {
        0x8000
            | (reduce5(color.r) as u16) << 10
            | (REDUCE_8_TO_5_SHL1[color.g as usize] as u16) << 4
            | reduce5(color.b) as u16
    } else {
        (alpha as u16) << 12
            | (reduce4(color.r) as u16) << 8
            | (reduce4(color.g) as u16) << 4
            | reduce4(color.b) as u16
    }
}

/// Unpacks a palette entry. IA8 entries become gray RGBA colours.
#[inline]
pub fn decode_palette_entry(word: u16, format: PaletteFormat) -> Color8888 {
    match format {
        PaletteFormat::IA8 => {
            let (intensity, alpha) = decode_ia8(word);
            Color8888::new(intensity, intensity, intensity, alpha)
        }
        PaletteFormat::RGB565 => decode_rgb565(word),
        PaletteFormat::RGB5A3 => decode_rgb5a3(word),
    }
}

/// Packs a palette entry. IA8 entries store the gray level of the colour.
#[inline]
pub fn encode_palette_entry(color: Color8888, format: PaletteFormat) -> u16 {
    match format {
        PaletteFormat::IA8 => encode_ia8(color.gray(), color.a),
        PaletteFormat::RGB565 => encode_rgb565(color),
        PaletteFormat::RGB5A3 => encode_rgb5a3(color),
    }
}
