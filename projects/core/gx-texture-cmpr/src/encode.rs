//! # CMPR Sub-Block Encoder
//!
//! Compresses the 16 pixels of a 4x4 sub-block into 8 bytes.
//!
//! ## Algorithm
//!
//! 1. Pixels whose alpha high bit is clear are transparent. A block without any opaque pixel
//!    gets the default vector as its header (green LSB cleared in `p0`, set in `p1`) and every
//!    index set to 3.
//! 2. The opaque pixels are quantized to RGB565 and collected, in scan order, into a list of
//!    distinct colours with their frequencies.
//! 3. With fewer than 3 distinct colours the endpoints are the first and last entries.
//!    Otherwise every pair of distinct colours is tried as endpoints; the pair whose derived
//!    palette has the lowest frequency-weighted distance to the block wins (first pair on ties).
//! 4. Endpoints are ordered `p0 < p1` when the block has transparent pixels (3-colour mode) and
//!    `p0 > p1` otherwise. Equal endpoints are separated through the green LSB.
//! 5. The palette is rebuilt from the ordered endpoints exactly as the decoder does, and every
//!    opaque pixel picks its nearest entry (lower index on ties).
//!
//! Distances are the sum of absolute differences over red, green and blue.

use crate::block::Decoded4x4Block;
use crate::decode::{blend_third, block_palette, midpoint, TRANSPARENT_INDEX};
use crate::BLOCK_SIZE;
use gx_texture_common::color_565::Color565;
use gx_texture_common::color_8888::Color8888;
use likely_stable::unlikely;

/// Scratch state for encoding one sub-block.
#[derive(Debug, Clone)]
pub(crate) struct CmprBlockWork {
    /// Distinct RGB565 colours of the opaque pixels, in first-seen order, with their counts.
    colors: [(Color565, u32); 16],
    /// Number of valid entries in `colors`.
    color_count: usize,
    /// Number of opaque pixels.
    opaque_count: usize,
    /// Palette derived from the chosen endpoints.
    palette: [Color8888; 4],
    /// Chosen 2-bit index per pixel, row-major.
    indices: [u8; 16],
    /// Header used when no pixel is opaque.
    default_pair: (Color565, Color565),
}

impl CmprBlockWork {
    fn new(block: &Decoded4x4Block, default_vector: Color565) -> Self {
        let mut work = Self {
            colors: [(Color565::default(), 0); 16],
            color_count: 0,
            opaque_count: 0,
            palette: [Color8888::TRANSPARENT; 4],
            indices: [TRANSPARENT_INDEX; 16],
            default_pair: (
                default_vector.with_green_lsb_cleared(),
                default_vector.with_green_lsb_set(),
            ),
        };

        for pixel in block.pixels.iter().filter(|pixel| pixel.is_opaque()) {
            work.opaque_count += 1;
            let color = Color565::from_color_8888(*pixel);
            let known = work.colors[..work.color_count]
                .iter_mut()
                .find(|(existing, _)| *existing == color);
            match known {
                Some((_, count)) => *count += 1,
                None => {
                    work.colors[work.color_count] = (color, 1);
                    work.color_count += 1;
                }
            }
        }
        work
    }

    #[inline]
    fn has_transparency(&self) -> bool {
        self.opaque_count < 16
    }

    /// Picks the two endpoints, unordered.
    fn select_endpoints(&self) -> (Color565, Color565) {
        let colors = &self.colors[..self.color_count];
        let first = colors[0].0;
        let last = colors[self.color_count - 1].0;
        if self.color_count < 3 {
            return (first, last);
        }

        let transparent = self.has_transparency();
        let mut best = (first, colors[1].0);
        let mut best_distance = u32::MAX;
        for (i, &(s0, _)) in colors.iter().enumerate() {
            for &(s1, _) in &colors[i + 1..] {
                let distance = pair_distance(colors, s0, s1, transparent);
                if distance < best_distance {
                    best_distance = distance;
                    best = (s0, s1);
                }
            }
        }
        best
    }

    /// Orders the endpoints for the block's mode and separates equal ones.
    fn order_endpoints(&self, a: Color565, b: Color565) -> (Color565, Color565) {
        let (low, high) = if a.greater_than(&b) { (b, a) } else { (a, b) };
        if self.has_transparency() {
            if low == high {
                (low.with_green_lsb_cleared(), high.with_green_lsb_set())
            } else {
                (low, high)
            }
        } else if low == high {
            (high.with_green_lsb_set(), low.with_green_lsb_cleared())
        } else {
            (high, low)
        }
    }

    /// Assigns the nearest palette entry to every opaque pixel.
    fn assign_indices(&mut self, block: &Decoded4x4Block) {
        let entries = if self.has_transparency() { 3 } else { 4 };
        for (index, pixel) in self.indices.iter_mut().zip(&block.pixels) {
            *index = if pixel.is_opaque() {
                nearest_index(&self.palette[..entries], pixel)
            } else {
                TRANSPARENT_INDEX
            };
        }
    }

    fn serialize(&self, p0: Color565, p1: Color565) -> [u8; BLOCK_SIZE] {
        let mut out = [0u8; BLOCK_SIZE];
        out[0..2].copy_from_slice(&p0.raw_value().to_be_bytes());
        out[2..4].copy_from_slice(&p1.raw_value().to_be_bytes());
        for (row, byte) in out[4..].iter_mut().enumerate() {
            let row = &self.indices[row * 4..row * 4 + 4];
            *byte = (row[0] << 6) | (row[1] << 4) | (row[2] << 2) | row[3];
        }
        out
    }
}

/// Frequency-weighted distance of every distinct colour to the palette built from `s0, s1`.
fn pair_distance(colors: &[(Color565, u32)], s0: Color565, s1: Color565, transparent: bool) -> u32 {
    let c0 = s0.to_color_8888();
    let c1 = s1.to_color_8888();
    let mut candidates = [c0, c1, midpoint(c0, c1), Color8888::TRANSPARENT];
    let entries = if transparent {
        3
    } else {
        candidates[2] = blend_third(c0, c1);
        candidates[3] = blend_third(c1, c0);
        4
    };

    colors
        .iter()
        .map(|&(color, count)| {
            let color = color.to_color_8888();
            let index = nearest_index(&candidates[..entries], &color);
            candidates[index as usize].distance_rgb(&color) * count
        })
        .sum()
}

/// Nearest entry of a 3 or 4 entry palette, comparing entries in index order and keeping the
/// lower index on ties.
#[inline]
fn nearest_index(palette: &[Color8888], pixel: &Color8888) -> u8 {
    let mut best = 0;
    let mut best_distance = palette[0].distance_rgb(pixel);
    for (index, entry) in palette.iter().enumerate().skip(1) {
        let distance = entry.distance_rgb(pixel);
        if distance < best_distance {
            best = index as u8;
            best_distance = distance;
        }
    }
    best
}

/// Compresses one 4x4 block of RGBA pixels into an 8-byte CMPR sub-block.
///
/// `default_vector` is the header colour used when the block has no opaque pixel; see
/// [`CmprSettings`](crate::CmprSettings).
///
/// # Example
///
/// ```
/// use gx_texture_cmpr::{compress_cmpr, decompress_cmpr, Decoded4x4Block};
/// use gx_texture_common::color_565::Color565;
/// use gx_texture_common::color_8888::Color8888;
///
/// let red = Color8888::new(255, 0, 0, 255);
/// let encoded = compress_cmpr(&Decoded4x4Block::new(red), Color565::default());
/// assert_eq!(decompress_cmpr(&encoded), Decoded4x4Block::new(red));
/// ```
pub fn compress_cmpr(block: &Decoded4x4Block, default_vector: Color565) -> [u8; BLOCK_SIZE] {
    let mut work = CmprBlockWork::new(block, default_vector);
    if unlikely(work.opaque_count == 0) {
        let (p0, p1) = work.default_pair;
        return work.serialize(p0, p1);
    }

    let (a, b) = work.select_endpoints();
    let (p0, p1) = work.order_endpoints(a, b);
    let (_, palette) = block_palette(p0, p1);
    work.palette = palette;
    work.assign_indices(block);
    work.serialize(p0, p1)
}

#[cfg(test)]
mod tests {
    use crate::decode::read_endpoints;
    use crate::test_prelude::*;

    fn gradient_block(alpha_hole: bool) -> Decoded4x4Block {
        let mut block = Decoded4x4Block::new(Color8888::TRANSPARENT);
        for (i, pixel) in block.pixels.iter_mut().enumerate() {
            let v = (i * 17) as u8;
            let a = if alpha_hole && i == 5 { 0 } else { 255 };
            *pixel = Color8888::new(v, 255 - v, v / 2, a);
        }
        block
    }

    #[test]
    fn transparent_block_uses_default_vector() {
        let block = Decoded4x4Block::new(Color8888::new(200, 10, 10, 0x7F));
        let default = Color565::from_rgb(255, 0, 255);
        let encoded = compress_cmpr(&block, default);

        let (p0, p1) = read_endpoints(&encoded);
        assert_eq!(p0, default.with_green_lsb_cleared());
        assert_eq!(p1, default.with_green_lsb_set());
        assert_eq!(p0.raw_value() ^ p1.raw_value(), GREEN_LSB);
        assert_eq!(&encoded[4..], &[0xFF; 4]);
        assert!(decompress_cmpr(&encoded)
            .pixels
            .iter()
            .all(|&p| p == Color8888::TRANSPARENT));
    }

    #[rstest]
    #[case(false)]
    #[case(true)]
    fn mode_matches_transparency(#[case] alpha_hole: bool) {
        let encoded = compress_cmpr(&gradient_block(alpha_hole), Color565::default());
        let (p0, p1) = read_endpoints(&encoded);
        assert_eq!(p0.greater_than(&p1), !alpha_hole);

        let decoded = decompress_cmpr(&encoded);
        assert_eq!(decoded.pixels[5].a == 0, alpha_hole);
    }

    #[rstest]
    #[case(Color8888::new(0, 0, 0, 255))]
    #[case(Color8888::new(255, 255, 255, 255))]
    #[case(Color8888::new(12, 200, 99, 255))]
    fn solid_opaque_block_keeps_four_color_mode(#[case] color: Color8888) {
        let encoded = compress_cmpr(&Decoded4x4Block::new(color), Color565::default());
        let (p0, p1) = read_endpoints(&encoded);
        assert!(p0.greater_than(&p1));
        assert_eq!(p0.raw_value() ^ p1.raw_value(), GREEN_LSB);

        // The colour is exactly representable through one of the endpoints.
        let expected = Color565::from_color_8888(color).to_color_8888();
        let decoded = decompress_cmpr(&encoded);
        let error = decoded.pixels[0].distance_rgb(&expected);
        assert!(error <= 4, "error {error}");
        assert!(decoded.has_identical_pixels());
    }

    #[test]
    fn two_colors_are_exact() {
        let a = Color8888::new(255, 0, 0, 255);
        let b = Color8888::new(0, 0, 255, 255);
        let mut block = Decoded4x4Block::new(a);
        for pixel in block.pixels.iter_mut().skip(8) {
            *pixel = b;
        }
        let decoded = decompress_cmpr(&compress_cmpr(&block, Color565::default()));
        assert_eq!(decoded, block);
    }

    /// No pixel may be assigned an entry farther away than another available entry.
    #[rstest]
    #[case(false)]
    #[case(true)]
    fn indices_pick_the_nearest_entry(#[case] alpha_hole: bool) {
        let block = gradient_block(alpha_hole);
        let encoded = compress_cmpr(&block, Color565::default());
        let (p0, p1) = read_endpoints(&encoded);
        let (mode, palette) = crate::decode::block_palette(p0, p1);
        let usable = match mode {
            CmprBlockMode::FourColor => 4,
            CmprBlockMode::ThreeColor => 3,
        };

        let decoded = decompress_cmpr(&encoded);
        for (source, output) in block.pixels.iter().zip(&decoded.pixels) {
            if !source.is_opaque() {
                continue;
            }
            let chosen = output.distance_rgb(source);
            let best = palette[..usable]
                .iter()
                .map(|entry| entry.distance_rgb(source))
                .min()
                .unwrap();
            assert_eq!(chosen, best);
        }
    }

    #[test]
    fn encoding_is_deterministic() {
        let block = gradient_block(false);
        assert_eq!(
            compress_cmpr(&block, Color565::default()),
            compress_cmpr(&block, Color565::default())
        );
    }
}
