//! # RGB565 Color Format Support
//!
//! RGB565 is a 16-bit colour format that packs red, green, and blue into a single word:
//!
//! - **Red**: 5 bits (bits 15-11)
//! - **Green**: 6 bits (bits 10-5)
//! - **Blue**: 5 bits (bits 4-0)
//!
//! It is both a native pixel format, a palette entry format, and the endpoint format of CMPR
//! blocks.
//!
//! ## Color Expansion
//!
//! Conversions in both directions go through the [`bit_depth`](crate::bit_depth) tables, so a
//! [`Color565`] built from 8-bit components is the *nearest* representable colour and
//! re-expanding it reproduces the exact bytes every other codec in the workspace produces.
//!
//! ```rust
//! use gx_texture_common::color_565::Color565;
//!
//! let color = Color565::from_raw(0xF800); // Pure red
//! assert_eq!(color.red(), 255);
//! assert_eq!(color.green(), 0);
//! assert_eq!(color.blue(), 0);
//!
//! let rgba = color.to_color_8888();
//! assert_eq!(Color565::from_color_8888(rgba), color);
//! ```

use crate::bit_depth::{expand5, expand6, reduce5, reduce6};
use crate::color_8888::Color8888;

/// Mask of the least significant green bit of an RGB565 word.
pub const GREEN_LSB: u16 = 0x0020;

/// Represents a 16-bit RGB565 color (5 bits red, 6 bits green, 5 bits blue).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Color565 {
    /// The underlying 16-bit RGB565 value
    value: u16,
}

impl Color565 {
    /// Creates a new [`Color565`] from the raw 16-bit value
    #[inline]
    pub fn from_raw(value: u16) -> Self {
        Self { value }
    }

    /// Creates a new [`Color565`] from separate 8-bit RGB components,
    /// rounding each to the nearest representable value.
    #[inline]
    pub fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        Self {
            value: ((reduce5(r) as u16) << 11) | ((reduce6(g) as u16) << 5) | reduce5(b) as u16,
        }
    }

    /// Creates a new [`Color565`] from the colour channels of a [`Color8888`]; alpha is ignored.
    #[inline]
    pub fn from_color_8888(color: Color8888) -> Self {
        Self::from_rgb(color.r, color.g, color.b)
    }

    /// Returns the raw 16-bit value
    #[inline]
    pub fn raw_value(&self) -> u16 {
        self.value
    }

    /// Extracts the expanded 8-bit red component (0-255)
    #[inline]
    pub fn red(&self) -> u8 {
        expand5((self.value >> 11) as u8)
    }

    /// Extracts the expanded 8-bit green component (0-255)
    #[inline]
    pub fn green(&self) -> u8 {
        expand6((self.value >> 5) as u8)
    }

    /// Extracts the expanded 8-bit blue component (0-255)
    #[inline]
    pub fn blue(&self) -> u8 {
        expand5(self.value as u8)
    }

    /// Compares two [`Color565`] values
    ///
    /// Returns if this value is greater than the other.
    /// This is the comparison that selects the CMPR block mode.
    #[inline]
    pub fn greater_than(&self, other: &Self) -> bool {
        self.value > other.value
    }

    /// Returns this colour with the least significant green bit set.
    #[inline]
    pub fn with_green_lsb_set(self) -> Self {
        Self::from_raw(self.value | GREEN_LSB)
    }

    /// Returns this colour with the least significant green bit cleared.
    #[inline]
    pub fn with_green_lsb_cleared(self) -> Self {
        Self::from_raw(self.value & !GREEN_LSB)
    }

    /// Converts this [`Color565`] to a [`Color8888`] with full opacity (alpha=255)
    ///
    /// # Examples
    ///
    /// ```
    /// use gx_texture_common::color_565::Color565;
    ///
    /// let rgb565 = Color565::from_rgb(255, 0, 0);
    /// let rgba8888 = rgb565.to_color_8888();
    /// assert_eq!(rgba8888.r, 255);
    /// assert_eq!(rgba8888.g, 0);
    /// assert_eq!(rgba8888.b, 0);
    /// assert_eq!(rgba8888.a, 255);
    /// ```
    pub fn to_color_8888(&self) -> Color8888 {
        Color8888::new(self.red(), self.green(), self.blue(), 255)
    }
}
