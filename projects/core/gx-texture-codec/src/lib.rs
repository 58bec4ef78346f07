#![doc = include_str!(concat!("../", core::env!("CARGO_PKG_README")))]
#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]

extern crate alloc;

pub mod canonical;
pub mod palette;
pub mod pixel;
pub mod quantize;
pub mod recode;
pub mod settings;
pub mod tiled;

pub use canonical::CanonicalImage;
pub use gx_texture_common::{TextureError, TextureResult};
pub use palette::{decode_palette, encode_palette, Palette};
pub use quantize::quantize;
pub use recode::recode;
pub use settings::{CodecSettings, QuantizeSettings};
pub use tiled::{decode, encode};

/// Common test imports and utilities for tests in this crate
#[cfg(test)]
pub(crate) mod test_prelude;
