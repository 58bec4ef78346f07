//! Common test imports and utilities
//!
//! This module provides a common set of imports used across test modules
//! in this crate.

// External crates commonly used in tests
pub use rstest::rstest;

// Crate items
pub use crate::canonical::*;
pub use crate::palette::*;
pub use crate::pixel::*;
pub use crate::quantize::*;
pub use crate::recode::*;
pub use crate::settings::*;
pub use crate::tiled::*;

// Shared workspace items
pub use gx_texture_common::color_8888::Color8888;
pub use gx_texture_common::endian::Endian;
pub use gx_texture_common::format::{CanonicalForm, PaletteFormat, TextureFormat};
pub use gx_texture_common::{GeometryIssue, TextureError, MAX_PALETTE_ENTRIES};

// Standard library
pub use alloc::vec;
pub use alloc::vec::Vec;
