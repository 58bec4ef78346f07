//! Statistics gathered while decoding CMPR data.
//!
//! These are diagnostics for re-encoders: they describe which mode a block uses, which of its
//! palette entries are referenced, and how far the interpolated entries lie from colours that
//! RGB565 can represent exactly.

/// Palette mode of a CMPR sub-block, selected by comparing its two endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CmprBlockMode {
    /// `p0 > p1`: four opaque colours, two of them 1/3 and 2/3 blends.
    FourColor,
    /// `p0 <= p1`: three opaque colours (the third is the midpoint) and a transparent slot.
    ThreeColor,
}

/// Statistics for one decoded sub-block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CmprBlockStats {
    /// Palette mode of the block.
    pub mode: CmprBlockMode,
    /// `used_indices[i]` is the number of pixels that reference palette entry `i`.
    pub used_indices: [u8; 4],
    /// Sum over all opaque pixels of the RGB distance between the palette entry and the same
    /// entry requantized to RGB565 and expanded back to 8 bits.
    pub distortion: u32,
}

impl CmprBlockStats {
    /// Whether every pixel of the block is transparent.
    #[inline]
    pub fn is_fully_transparent(&self) -> bool {
        self.mode == CmprBlockMode::ThreeColor && self.used_indices[3] == 16
    }

    /// Number of distinct palette entries referenced by the block.
    #[inline]
    pub fn distinct_indices(&self) -> usize {
        self.used_indices.iter().filter(|&&count| count > 0).count()
    }
}

/// Statistics aggregated over every sub-block of a CMPR image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CmprImageStats {
    /// Number of 4x4 sub-blocks analysed.
    pub blocks: usize,
    /// Sub-blocks in 4-colour mode.
    pub four_color_blocks: usize,
    /// Sub-blocks in 3-colour mode, fully transparent ones included.
    pub three_color_blocks: usize,
    /// Sub-blocks whose every pixel is transparent.
    pub fully_transparent_blocks: usize,
    /// How often each palette index is referenced over the whole image.
    pub index_usage: [u64; 4],
    /// Sum of the per-block distortion.
    pub total_distortion: u64,
}

impl CmprImageStats {
    /// Adds one sub-block to the totals.
    pub fn add_block(&mut self, stats: &CmprBlockStats) {
        self.blocks += 1;
        match stats.mode {
            CmprBlockMode::FourColor => self.four_color_blocks += 1,
            CmprBlockMode::ThreeColor => self.three_color_blocks += 1,
        }
        if stats.is_fully_transparent() {
            self.fully_transparent_blocks += 1;
        }
        for (total, &count) in self.index_usage.iter_mut().zip(&stats.used_indices) {
            *total += count as u64;
        }
        self.total_distortion += stats.distortion as u64;
    }

    /// Mean distortion per sub-block, `0.0` for an empty image.
    pub fn mean_distortion(&self) -> f64 {
        if self.blocks == 0 {
            return 0.0;
        }
        self.total_distortion as f64 / self.blocks as f64
    }
}
