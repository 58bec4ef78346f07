//! Common test imports and utilities
//!
//! This module provides a common set of imports used across test modules
//! in this crate.

// External crates commonly used in tests
pub use rstest::rstest;

// Crate items
pub use crate::block::*;
pub use crate::decode::*;
pub use crate::encode::*;
pub use crate::image::*;
pub use crate::settings::*;
pub use crate::stats::*;
pub use crate::{BLOCK_SIZE, MACROBLOCK_SIZE};

// Shared workspace items
pub use gx_texture_common::color_565::{Color565, GREEN_LSB};
pub use gx_texture_common::color_8888::Color8888;
pub use gx_texture_common::TextureError;

// Standard library
pub use alloc::vec;
pub use alloc::vec::Vec;

/// Builds a block from a row-major list of 16 `(r, g, b, a)` tuples.
pub(crate) fn block_from(pixels: [(u8, u8, u8, u8); 16]) -> Decoded4x4Block {
    let mut block = Decoded4x4Block::new(Color8888::TRANSPARENT);
    for (dst, (r, g, b, a)) in block.pixels.iter_mut().zip(pixels) {
        *dst = Color8888::new(r, g, b, a);
    }
    block
}
