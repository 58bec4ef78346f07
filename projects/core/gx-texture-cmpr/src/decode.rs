//! CMPR sub-block decoding.
//!
//! A sub-block is `p0: u16be, p1: u16be, indices: [u8; 4]`. The endpoint comparison picks the
//! mode:
//!
//! - `p0 > p1`: entries 2 and 3 are `(2*p0 + p1) / 3` and `(p0 + 2*p1) / 3`.
//! - `p0 <= p1`: entry 2 is `(p0 + p1) / 2` and entry 3 is transparent black.
//!
//! All blends are computed on the 8-bit expansions of the endpoints and truncate.

use crate::block::Decoded4x4Block;
use crate::stats::{CmprBlockMode, CmprBlockStats};
use crate::BLOCK_SIZE;
use gx_texture_common::color_565::Color565;
use gx_texture_common::color_8888::Color8888;

/// Index of the transparent slot in 3-colour mode.
pub const TRANSPARENT_INDEX: u8 = 3;

/// Reads the two big-endian endpoints of an encoded sub-block.
#[inline]
pub fn read_endpoints(src: &[u8; BLOCK_SIZE]) -> (Color565, Color565) {
    (
        Color565::from_raw(u16::from_be_bytes([src[0], src[1]])),
        Color565::from_raw(u16::from_be_bytes([src[2], src[3]])),
    )
}

/// Mode selected by a pair of endpoints.
#[inline]
pub fn block_mode(p0: Color565, p1: Color565) -> CmprBlockMode {
    if p0.greater_than(&p1) {
        CmprBlockMode::FourColor
    } else {
        CmprBlockMode::ThreeColor
    }
}

/// Builds the 4-entry palette of a sub-block from its endpoints.
///
/// In 3-colour mode entry 3 is [`Color8888::TRANSPARENT`].
pub fn block_palette(p0: Color565, p1: Color565) -> (CmprBlockMode, [Color8888; 4]) {
    let c0 = p0.to_color_8888();
    let c1 = p1.to_color_8888();
    let mode = block_mode(p0, p1);
    let palette = match mode {
        CmprBlockMode::FourColor => [c0, c1, blend_third(c0, c1), blend_third(c1, c0)],
        CmprBlockMode::ThreeColor => [c0, c1, midpoint(c0, c1), Color8888::TRANSPARENT],
    };
    (mode, palette)
}

/// `(2*near + far) / 3` per channel, opaque.
#[inline]
pub(crate) fn blend_third(near: Color8888, far: Color8888) -> Color8888 {
    let mix = |a: u8, b: u8| ((2 * a as u32 + b as u32) / 3) as u8;
    Color8888::new(mix(near.r, far.r), mix(near.g, far.g), mix(near.b, far.b), 255)
}

/// `(a + b) / 2` per channel, opaque.
#[inline]
pub(crate) fn midpoint(a: Color8888, b: Color8888) -> Color8888 {
    let mix = |a: u8, b: u8| ((a as u32 + b as u32) / 2) as u8;
    Color8888::new(mix(a.r, b.r), mix(a.g, b.g), mix(a.b, b.b), 255)
}

/// Returns the 2-bit index of pixel `i` (row-major) of an encoded sub-block.
#[inline]
pub(crate) fn pixel_index(indices: &[u8], i: usize) -> u8 {
    (indices[i / 4] >> (6 - 2 * (i % 4))) & 0b11
}

/// Decodes one 8-byte CMPR sub-block into 16 RGBA pixels.
///
/// # Example
///
/// ```
/// use gx_texture_cmpr::decompress_cmpr;
/// use gx_texture_common::color_8888::Color8888;
///
/// // p0 = p1 = pure red: 3-colour mode, every index 0.
/// let block = [0xF8, 0x00, 0xF8, 0x00, 0x00, 0x00, 0x00, 0x00];
/// let pixels = decompress_cmpr(&block);
/// assert!(pixels.pixels.iter().all(|&p| p == Color8888::new(255, 0, 0, 255)));
/// ```
pub fn decompress_cmpr(src: &[u8; BLOCK_SIZE]) -> Decoded4x4Block {
    let (p0, p1) = read_endpoints(src);
    let (_, palette) = block_palette(p0, p1);
    let mut block = Decoded4x4Block::new(Color8888::TRANSPARENT);
    for (i, pixel) in block.pixels.iter_mut().enumerate() {
        *pixel = palette[pixel_index(&src[4..], i) as usize];
    }
    block
}

/// Decodes one sub-block and gathers [`CmprBlockStats`] about it.
///
/// The distortion of a pixel is the distance between its palette entry and that entry
/// requantized to RGB565 precision; endpoints always contribute zero.
pub fn decode_block_with_stats(src: &[u8; BLOCK_SIZE]) -> (Decoded4x4Block, CmprBlockStats) {
    let (p0, p1) = read_endpoints(src);
    let (mode, palette) = block_palette(p0, p1);

    let mut entry_distortion = [0u32; 4];
    for (distortion, entry) in entry_distortion.iter_mut().zip(&palette) {
        let requantized = Color565::from_color_8888(*entry).to_color_8888();
        *distortion = entry.distance_rgb(&requantized);
    }
    if mode == CmprBlockMode::ThreeColor {
        entry_distortion[TRANSPARENT_INDEX as usize] = 0;
    }

    let mut block = Decoded4x4Block::new(Color8888::TRANSPARENT);
    let mut stats = CmprBlockStats {
        mode,
        used_indices: [0; 4],
        distortion: 0,
    };
    for (i, pixel) in block.pixels.iter_mut().enumerate() {
        let index = pixel_index(&src[4..], i) as usize;
        *pixel = palette[index];
        stats.used_indices[index] += 1;
        stats.distortion += entry_distortion[index];
    }
    (block, stats)
}
