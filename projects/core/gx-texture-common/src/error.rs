//! Error types shared by every texture codec crate.

use crate::format::TextureFormat;
use alloc::string::String;
use thiserror::Error;

/// Result alias used throughout the workspace.
pub type TextureResult<T> = Result<T, TextureError>;

/// Errors that can occur while decoding, encoding, quantizing or converting textures.
///
/// Every variant is a caller configuration error; none of them are retryable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TextureError {
    /// The numeric format code does not name a known image or palette format.
    #[error("Invalid format code: {0:#04x}")]
    InvalidFormat(u32),

    /// The format name does not name a known image or palette format.
    #[error("Unknown format name: {0}")]
    UnknownFormatName(String),

    /// The declared dimensions are inconsistent with the supplied buffer or tile alignment.
    #[error("Geometry error for a {width}x{height} image: {issue}")]
    GeometryError {
        /// Declared width in pixels
        width: u32,
        /// Declared height in pixels
        height: u32,
        /// What exactly is wrong
        issue: GeometryIssue,
    },

    /// No codec path exists between the two formats.
    #[error("Unsupported conversion from {from} to {to}")]
    UnsupportedConversion {
        /// Format of the data that was supplied
        from: TextureFormat,
        /// Format that was requested
        to: TextureFormat,
    },

    /// A palette of the requested size cannot be built or stored.
    #[error("Palette overflow: {requested} entries requested, between 1 and {max} allowed")]
    PaletteOverflow {
        /// Number of entries requested
        requested: usize,
        /// Largest number of entries allowed for the target
        max: usize,
    },

    /// The conversion pipeline nested deeper than allowed.
    #[error("Conversion depth exceeded: reached depth {depth}, the limit is {max}")]
    ConversionDepthExceeded {
        /// Depth that was about to be entered
        depth: usize,
        /// Configured ceiling
        max: usize,
    },
}

/// Details of a [`TextureError::GeometryError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GeometryIssue {
    /// Width or height is zero.
    #[error("image has no pixels")]
    Empty,

    /// The buffer holds fewer bytes than the dimensions require.
    #[error("need {required} bytes, but only {actual} bytes supplied")]
    BufferTooSmall {
        /// Bytes required by the dimensions
        required: usize,
        /// Bytes supplied
        actual: usize,
    },

    /// A buffer that must be tile aligned is not.
    #[error("dimensions are not a multiple of the {tile_width}x{tile_height} tile")]
    NotTileAligned {
        /// Tile width of the target format
        tile_width: u32,
        /// Tile height of the target format
        tile_height: u32,
    },

    /// The dimensions overflow the addressable size.
    #[error("dimensions are too large")]
    TooLarge,
}

impl TextureError {
    /// Shorthand for building a [`TextureError::GeometryError`].
    pub fn geometry(width: u32, height: u32, issue: GeometryIssue) -> Self {
        TextureError::GeometryError {
            width,
            height,
            issue,
        }
    }
}
