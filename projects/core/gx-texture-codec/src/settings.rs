//! Settings for the codec and the quantizer.

use gx_texture_cmpr::CmprSettings;
use gx_texture_common::endian::Endian;
use gx_texture_common::MAX_PALETTE_ENTRIES;

/// Settings used when encoding canonical images to native formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CodecSettings {
    /// Byte order of the 16-bit words in the native buffer.
    pub endian: Endian,
    /// Settings for CMPR targets.
    pub cmpr: CmprSettings,
}

/// Settings for [`quantize`](crate::quantize).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuantizeSettings {
    /// Largest number of palette entries to produce, between 1 and
    /// [`MAX_PALETTE_ENTRIES`].
    pub max_colors: usize,
}

impl QuantizeSettings {
    /// Settings producing at most `max_colors` entries.
    pub fn new(max_colors: usize) -> Self {
        Self { max_colors }
    }
}

impl Default for QuantizeSettings {
    fn default() -> Self {
        Self { max_colors: 256 }
    }
}

impl QuantizeSettings {
    /// Whether `max_colors` is within `1..=MAX_PALETTE_ENTRIES`.
    #[inline]
    pub fn is_valid(&self) -> bool {
        (1..=MAX_PALETTE_ENTRIES).contains(&self.max_colors)
    }
}
