#![doc = include_str!(concat!("../", core::env!("CARGO_PKG_README")))]
#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]

extern crate alloc;

pub mod bit_depth;
pub mod color_565;
pub mod color_8888;
pub mod endian;
pub mod error;
pub mod format;

pub use error::{GeometryIssue, TextureError, TextureResult};
pub use format::{
    AlphaSupport, CanonicalForm, FormatDescriptor, PaletteFormat, TextureFormat,
    MAX_PALETTE_ENTRIES,
};

/// Common test imports and utilities for tests in this crate
#[cfg(test)]
pub(crate) mod test_prelude;
