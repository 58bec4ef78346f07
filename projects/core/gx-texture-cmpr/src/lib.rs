#![doc = include_str!(concat!("../", core::env!("CARGO_PKG_README")))]
#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]

extern crate alloc;

pub mod block;
pub mod decode;
pub mod encode;
pub mod image;
pub mod settings;
pub mod stats;

pub use block::Decoded4x4Block;
pub use decode::{decode_block_with_stats, decompress_cmpr};
pub use encode::compress_cmpr;
pub use image::{
    analyze_image, compress_image, compressed_size, decompress_image, default_vector,
};
pub use settings::CmprSettings;
pub use stats::{CmprBlockMode, CmprBlockStats, CmprImageStats};

/// Size of one encoded 4x4 sub-block in bytes.
pub const BLOCK_SIZE: usize = 8;

/// Size of one encoded 8x8 macroblock in bytes.
pub const MACROBLOCK_SIZE: usize = 4 * BLOCK_SIZE;

/// Common test imports and utilities for tests in this crate
#[cfg(test)]
pub(crate) mod test_prelude;
