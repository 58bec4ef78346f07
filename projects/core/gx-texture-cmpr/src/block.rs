//! # Decoded 4x4 Block
//!
//! This module provides the [`Decoded4x4Block`] structure for representing the 16 RGBA pixels of
//! one CMPR sub-block, either before compression or after decompression.
//!
//! ## Memory Layout
//!
//! The pixels are stored in row-major order:
//! ```text
//! [ 0] [ 1] [ 2] [ 3]
//! [ 4] [ 5] [ 6] [ 7]
//! [ 8] [ 9] [10] [11]
//! [12] [13] [14] [15]
//! ```
//!
//! ## Usage
//!
//! ```
//! use gx_texture_common::color_8888::Color8888;
//! use gx_texture_cmpr::Decoded4x4Block;
//!
//! let red_pixel = Color8888::new(255, 0, 0, 255);
//! let block = Decoded4x4Block::new(red_pixel);
//!
//! assert!(block.has_identical_pixels());
//! assert_eq!(block.opaque_count(), 16);
//! ```

use gx_texture_common::color_8888::Color8888;

/// Represents a decoded 4x4 block of CMPR pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decoded4x4Block {
    /// The 16 pixels in the block (row-major order)
    /// (i.e. `pixels[0]` is top-left, `pixels[3]` is top-right, etc.)
    pub pixels: [Color8888; 16],
}

impl Decoded4x4Block {
    /// Constructs a new decoded block initialised with 16 copies of the provided pixel.
    pub fn new(pixel: Color8888) -> Self {
        Self {
            pixels: [pixel; 16],
        }
    }

    /// Reads the 4x4 region whose top-left corner is `(x, y)` out of a row-major RGBA buffer
    /// that is `stride` pixels wide.
    ///
    /// The caller must ensure the region lies inside the buffer.
    pub fn read_rgba(rgba: &[u8], stride: usize, x: usize, y: usize) -> Self {
        let mut block = Self::new(Color8888::TRANSPARENT);
        for row in 0..4 {
            let start = ((y + row) * stride + x) * 4;
            for (col, chunk) in rgba[start..start + 16].chunks_exact(4).enumerate() {
                block.pixels[row * 4 + col] = Color8888::from_slice(chunk);
            }
        }
        block
    }

    /// Writes this block into the 4x4 region whose top-left corner is `(x, y)` of a row-major
    /// RGBA buffer that is `stride` pixels wide.
    pub fn write_rgba(&self, rgba: &mut [u8], stride: usize, x: usize, y: usize) {
        for row in 0..4 {
            let start = ((y + row) * stride + x) * 4;
            for (col, chunk) in rgba[start..start + 16].chunks_exact_mut(4).enumerate() {
                chunk.copy_from_slice(&self.pixels[row * 4 + col].to_bytes());
            }
        }
    }

    /// Gets a pixel at the specified coordinates (0-3, 0-3)
    #[inline]
    pub fn get_pixel(&self, x: usize, y: usize) -> Color8888 {
        self.pixels[y * 4 + x]
    }

    /// Number of pixels whose alpha high bit is set.
    #[inline]
    pub fn opaque_count(&self) -> usize {
        self.pixels.iter().filter(|pixel| pixel.is_opaque()).count()
    }

    /// Checks if all pixels in the block have the same color values
    #[inline]
    pub fn has_identical_pixels(&self) -> bool {
        let first = self.pixels[0];
        self.pixels.iter().all(|pixel| *pixel == first)
    }

    /// Checks if all pixels in the block have the same color values
    /// Ignoring the alpha values.
    #[inline]
    pub fn has_identical_pixels_ignore_alpha(&self) -> bool {
        let first = self.pixels[0].without_alpha();
        self.pixels
            .iter()
            .all(|pixel| pixel.without_alpha() == first)
    }
}

#[cfg(test)]
mod tests {
    use crate::test_prelude::*;

    #[test]
    fn reads_and_writes_the_addressed_region() {
        // 8x4 image: left half red, right half blue.
        let mut rgba = vec![0u8; 8 * 4 * 4];
        for y in 0..4 {
            for x in 0..8 {
                let pixel = if x < 4 { [255, 0, 0, 255] } else { [0, 0, 255, 255] };
                rgba[(y * 8 + x) * 4..][..4].copy_from_slice(&pixel);
            }
        }

        let right = Decoded4x4Block::read_rgba(&rgba, 8, 4, 0);
        assert_eq!(right, Decoded4x4Block::new(Color8888::new(0, 0, 255, 255)));

        let mut copy = vec![0u8; rgba.len()];
        right.write_rgba(&mut copy, 8, 0, 0);
        Decoded4x4Block::read_rgba(&rgba, 8, 0, 0).write_rgba(&mut copy, 8, 4, 0);
        assert_eq!(Decoded4x4Block::read_rgba(&copy, 8, 0, 0), right);
        assert_eq!(
            Decoded4x4Block::read_rgba(&copy, 8, 4, 0).get_pixel(3, 3),
            Color8888::new(255, 0, 0, 255)
        );
    }

    #[rstest]
    #[case(0x00, 0)]
    #[case(0x7F, 0)]
    #[case(0x80, 16)]
    fn counts_opaque_pixels(#[case] alpha: u8, #[case] expected: usize) {
        let block = Decoded4x4Block::new(Color8888::new(1, 2, 3, alpha));
        assert_eq!(block.opaque_count(), expected);
        assert!(block.has_identical_pixels_ignore_alpha());
    }
}
