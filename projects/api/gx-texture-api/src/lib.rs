#![doc = include_str!(concat!("../", core::env!("CARGO_PKG_README")))]
#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]

extern crate alloc;

pub mod buffer;
pub mod convert;
pub mod error;
pub mod image;
pub mod mipmap;
pub mod rules;
pub mod settings;

pub use buffer::{PixelBuffer, SharedContainer};
pub use convert::{convert, ConversionTarget, ConvertRequest, FormatRequest, PaletteRequest};
pub use error::RuleParseError;
pub use image::{AlphaStatus, Image};
pub use mipmap::{BoxFilter, Mipmaps, Resizer};
pub use rules::{
    parse_rule_lists, DestPattern, FileFormat, SourceInfo, SourcePattern, TransformRule,
    TransformRules, TransformTarget,
};
pub use settings::{ConvertSettings, ConvertSettingsBuilder, MAX_CONVERSION_DEPTH};

/// Re-exports of the lower level crates' types that appear in this crate's API.
pub mod reexports {
    pub use gx_texture_cmpr::{analyze_image, CmprImageStats, CmprSettings};
    pub use gx_texture_codec::{decode_palette, encode_palette, CanonicalImage, Palette};
    pub use gx_texture_common::color_565::Color565;
    pub use gx_texture_common::color_8888::Color8888;
    pub use gx_texture_common::endian::Endian;
    pub use gx_texture_common::format::{CanonicalForm, FormatDescriptor, PaletteFormat, TextureFormat};
    pub use gx_texture_common::{TextureError, TextureResult, MAX_PALETTE_ENTRIES};
}

/// Common test imports and utilities for tests in this crate
#[cfg(test)]
pub(crate) mod test_prelude;
