//! Whole-image CMPR compression, decompression and analysis.
//!
//! Images are row-major canonical RGBA buffers (4 bytes per pixel) whose dimensions are already
//! padded to a multiple of the 8x8 macroblock. Macroblocks are stored left-to-right, then
//! top-to-bottom; inside one macroblock the four sub-blocks are stored in this order:
//!
//! ```text
//! +----+----+
//! | 0  | 1  |
//! +----+----+
//! | 2  | 3  |
//! +----+----+
//! ```

use crate::block::Decoded4x4Block;
use crate::decode::{decode_block_with_stats, decompress_cmpr};
use crate::encode::compress_cmpr;
use crate::settings::CmprSettings;
use crate::stats::CmprImageStats;
use crate::{BLOCK_SIZE, MACROBLOCK_SIZE};
use alloc::vec;
use alloc::vec::Vec;
use gx_texture_common::color_565::Color565;
use gx_texture_common::color_8888::Color8888;
use gx_texture_common::{GeometryIssue, TextureError, TextureResult};

/// Offsets of the four sub-blocks inside a macroblock, in storage order.
const SUB_BLOCK_OFFSETS: [(usize, usize); 4] = [(0, 0), (4, 0), (0, 4), (4, 4)];

/// Computes the colour used for fully transparent sub-blocks when none is configured.
///
/// This is the mean colour of every opaque pixel of the image, or black if there is none.
pub fn default_vector(rgba: &[u8]) -> Color565 {
    let mut sums = [0u64; 3];
    let mut count = 0u64;
    for pixel in rgba.chunks_exact(4).map(Color8888::from_slice) {
        if pixel.is_opaque() {
            sums[0] += pixel.r as u64;
            sums[1] += pixel.g as u64;
            sums[2] += pixel.b as u64;
            count += 1;
        }
    }
    if count == 0 {
        return Color565::default();
    }
    let mean = |sum: u64| ((sum + count / 2) / count) as u8;
    Color565::from_rgb(mean(sums[0]), mean(sums[1]), mean(sums[2]))
}

fn check_geometry(width: usize, height: usize, actual: usize, required: usize) -> TextureResult<()> {
    let (w, h) = (width as u32, height as u32);
    if width == 0 || height == 0 {
        return Err(TextureError::geometry(w, h, GeometryIssue::Empty));
    }
    if width % 8 != 0 || height % 8 != 0 {
        return Err(TextureError::geometry(
            w,
            h,
            GeometryIssue::NotTileAligned {
                tile_width: 8,
                tile_height: 8,
            },
        ));
    }
    if actual < required {
        return Err(TextureError::geometry(
            w,
            h,
            GeometryIssue::BufferTooSmall { required, actual },
        ));
    }
    Ok(())
}

/// Splits CMPR data into whole sub-blocks. A trailing partial block is not yielded.
fn blocks(data: &[u8]) -> impl Iterator<Item = &[u8; BLOCK_SIZE]> {
    // `chunks_exact` only yields slices of exactly `BLOCK_SIZE`, so every conversion succeeds.
    data.chunks_exact(BLOCK_SIZE)
        .filter_map(|chunk| <&[u8; BLOCK_SIZE]>::try_from(chunk).ok())
}

/// Iterates `(x, y)` of every sub-block in storage order.
fn sub_blocks(width: usize, height: usize) -> impl Iterator<Item = (usize, usize)> {
    (0..height).step_by(8).flat_map(move |y| {
        (0..width).step_by(8).flat_map(move |x| {
            SUB_BLOCK_OFFSETS
                .iter()
                .map(move |&(dx, dy)| (x + dx, y + dy))
        })
    })
}

/// Compresses a canonical RGBA image to CMPR.
///
/// # Parameters
///
/// - `rgba`: row-major RGBA pixels, at least `width * height * 4` bytes
/// - `width`, `height`: padded dimensions, multiples of 8
/// - `settings`: compressor settings
///
/// # Errors
///
/// Returns [`TextureError::GeometryError`] if the dimensions are empty, not multiples of 8, or
/// larger than the buffer.
pub fn compress_image(
    rgba: &[u8],
    width: usize,
    height: usize,
    settings: &CmprSettings,
) -> TextureResult<Vec<u8>> {
    check_geometry(width, height, rgba.len(), width * height * 4)?;
    let fallback = settings
        .default_color
        .unwrap_or_else(|| default_vector(&rgba[..width * height * 4]));

    let mut out = vec![0u8; width * height / 2];
    for (dst, (x, y)) in out.chunks_exact_mut(BLOCK_SIZE).zip(sub_blocks(width, height)) {
        let block = Decoded4x4Block::read_rgba(rgba, width, x, y);
        dst.copy_from_slice(&compress_cmpr(&block, fallback));
    }
    Ok(out)
}

/// Decompresses CMPR data to a canonical RGBA image of `width * height * 4` bytes.
///
/// # Errors
///
/// Returns [`TextureError::GeometryError`] if the dimensions are empty, not multiples of 8, or
/// need more data than supplied.
pub fn decompress_image(data: &[u8], width: usize, height: usize) -> TextureResult<Vec<u8>> {
    check_geometry(width, height, data.len(), width * height / 2)?;

    let mut rgba = vec![0u8; width * height * 4];
    for (src, (x, y)) in blocks(data).zip(sub_blocks(width, height)) {
        decompress_cmpr(src).write_rgba(&mut rgba, width, x, y);
    }
    Ok(rgba)
}

/// Gathers [`CmprImageStats`] over every sub-block of CMPR data.
///
/// # Errors
///
/// Same as [`decompress_image`].
pub fn analyze_image(data: &[u8], width: usize, height: usize) -> TextureResult<CmprImageStats> {
    check_geometry(width, height, data.len(), width * height / 2)?;

    let mut stats = CmprImageStats::default();
    let count = width * height / 16;
    for src in blocks(&data[..count * BLOCK_SIZE]) {
        let (_, block_stats) = decode_block_with_stats(src);
        stats.add_block(&block_stats);
    }
    Ok(stats)
}

/// Number of macroblocks in an image of the given padded dimensions.
#[inline]
pub fn macroblock_count(width: usize, height: usize) -> usize {
    (width / 8) * (height / 8)
}

/// Size in bytes of CMPR data for the given padded dimensions.
#[inline]
pub fn compressed_size(width: usize, height: usize) -> usize {
    macroblock_count(width, height) * MACROBLOCK_SIZE
}
