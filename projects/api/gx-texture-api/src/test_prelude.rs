//! Common test imports and utilities
//!
//! This module provides a common set of imports used across test modules
//! in this crate.

// External crates commonly used in tests
pub use rstest::rstest;

// Crate modules commonly used in tests
pub use crate::buffer::*;
pub use crate::convert::*;
pub use crate::error::*;
pub use crate::image::*;
pub use crate::mipmap::*;
pub use crate::rules::*;
pub use crate::settings::*;

// Types from the lower level crates
pub use gx_texture_codec::{encode, CanonicalImage, CodecSettings, Palette};
pub use gx_texture_common::color_565::Color565;
pub use gx_texture_common::color_8888::Color8888;
pub use gx_texture_common::format::{CanonicalForm, PaletteFormat, TextureFormat};
pub use gx_texture_common::{TextureError, TextureResult};

// Alloc types for no_std compatibility
pub use alloc::vec;
pub use alloc::vec::Vec;

use core::cell::Cell;

/// A [`Resizer`] that counts its calls and otherwise behaves like [`BoxFilter`].
#[derive(Debug, Default)]
pub struct CountingResizer {
    calls: Cell<usize>,
}

impl CountingResizer {
    /// Number of levels produced so far.
    pub fn calls(&self) -> usize {
        self.calls.get()
    }
}

impl Resizer for CountingResizer {
    fn half_size(&self, image: &CanonicalImage) -> TextureResult<CanonicalImage> {
        self.calls.set(self.calls.get() + 1);
        BoxFilter.half_size(image)
    }
}
