//! Common test imports and utilities
//!
//! This module provides a common set of imports used across test modules
//! in this crate.

// External crates commonly used in tests
pub use rstest::rstest;

// Crate items
pub use crate::bit_depth::*;
pub use crate::color_565::*;
pub use crate::color_8888::*;
pub use crate::endian::*;
pub use crate::error::*;
pub use crate::format::*;

// Standard library
pub use alloc::vec::Vec;
