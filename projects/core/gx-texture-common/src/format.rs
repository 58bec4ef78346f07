//! # Format Descriptor Table
//!
//! Static metadata for every native pixel format of the console GPU and for the three canonical
//! in-memory forms that all native formats decode to.
//!
//! ## Native formats
//!
//! ```text
//! Format   Code  bpp  Tile  Alpha          Palette
//! I4       0x00    4  8x8   none           -
//! I8       0x01    8  8x4   none           -
//! IA4      0x02    8  8x4   variable       -
//! IA8      0x03   16  4x4   variable       -
//! RGB565   0x04   16  4x4   none (opaque)  -
//! RGB5A3   0x05   16  4x4   variable       -
//! RGBA32   0x06   32  4x4   variable       -
//! C4       0x08    4  8x8   via palette    <= 16
//! C8       0x09    8  8x4   via palette    <= 256
//! C14X2    0x0A   16  4x4   via palette    <= 16384
//! CMPR     0x0E    4  8x8   variable       -
//! ```
//!
//! ## Canonical forms
//!
//! - [`TextureFormat::CanonicalGray`]: 2 bytes per pixel, `(gray, alpha)`.
//! - [`TextureFormat::CanonicalRgb`]: 4 bytes per pixel, `(red, green, blue, alpha)`.
//! - [`TextureFormat::CanonicalPalette`]: 2 bytes per pixel, a 16-bit palette index.
//!
//! Canonical forms use a 1x1 tile, so any dimensions are valid for them.

use crate::error::{GeometryIssue, TextureError, TextureResult};
use alloc::string::ToString;
use core::fmt;
use core::str::FromStr;
use derive_enum_all_values::AllValues;

/// Largest palette any format can carry (C14X2).
pub const MAX_PALETTE_ENTRIES: usize = 16384;

/// First code used for canonical forms; chosen outside the console's native code range.
const CANONICAL_CODE_BASE: u32 = 0x100;

/// A native or canonical pixel format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, AllValues)]
#[repr(u32)]
pub enum TextureFormat {
    /// 4-bit intensity.
    I4 = 0x00,
    /// 8-bit intensity.
    I8 = 0x01,
    /// 4-bit intensity with 4-bit alpha.
    IA4 = 0x02,
    /// 8-bit intensity with 8-bit alpha.
    IA8 = 0x03,
    /// 16-bit colour, always opaque.
    RGB565 = 0x04,
    /// 16-bit colour, either 5-5-5 opaque or 4-4-4 with 3-bit alpha.
    RGB5A3 = 0x05,
    /// 32-bit colour stored as two planes per tile (AR then GB).
    RGBA32 = 0x06,
    /// 4-bit palette index.
    C4 = 0x08,
    /// 8-bit palette index.
    C8 = 0x09,
    /// 14-bit palette index stored in 16 bits.
    C14X2 = 0x0A,
    /// S3TC-style block compression.
    CMPR = 0x0E,
    /// Canonical gray + alpha, 2 bytes per pixel.
    CanonicalGray = CANONICAL_CODE_BASE,
    /// Canonical RGBA, 4 bytes per pixel.
    CanonicalRgb = CANONICAL_CODE_BASE + 1,
    /// Canonical 16-bit palette index.
    CanonicalPalette = CANONICAL_CODE_BASE + 2,
}

/// A palette entry format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, AllValues)]
#[repr(u32)]
pub enum PaletteFormat {
    /// 8-bit intensity with 8-bit alpha.
    IA8 = 0,
    /// 16-bit colour, always opaque.
    RGB565 = 1,
    /// 16-bit colour, either 5-5-5 opaque or 4-4-4 with 3-bit alpha.
    #[default]
    RGB5A3 = 2,
}

/// The canonical intermediate representation a format decodes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, AllValues)]
pub enum CanonicalForm {
    /// Gray + alpha, 2 bytes per pixel.
    Gray,
    /// RGBA, 4 bytes per pixel.
    Rgb,
    /// 16-bit palette index with an attached palette.
    Palette,
}

/// How a format represents transparency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AlphaSupport {
    /// Every pixel is opaque.
    None,
    /// Pixels carry their own alpha.
    Variable,
    /// Alpha comes from the palette entry format.
    ViaPalette,
}

/// Static metadata of a [`TextureFormat`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatDescriptor {
    /// The format described.
    pub format: TextureFormat,
    /// Display name, as accepted by [`TextureFormat::from_str`].
    pub name: &'static str,
    /// Bits per pixel in the packed buffer.
    pub bits_per_pixel: u32,
    /// Tile width in pixels.
    pub tile_width: u32,
    /// Tile height in pixels.
    pub tile_height: u32,
    /// How the format represents transparency.
    pub alpha: AlphaSupport,
    /// Palette capacity; `0` for formats without a palette.
    pub max_palette_entries: usize,
    /// Canonical form the format decodes to.
    pub canonical_form: CanonicalForm,
}

const fn descriptor(
    format: TextureFormat,
    name: &'static str,
    bits_per_pixel: u32,
    tile: (u32, u32),
    alpha: AlphaSupport,
    max_palette_entries: usize,
    canonical_form: CanonicalForm,
) -> FormatDescriptor {
    FormatDescriptor {
        format,
        name,
        bits_per_pixel,
        tile_width: tile.0,
        tile_height: tile.1,
        alpha,
        max_palette_entries,
        canonical_form,
    }
}

use AlphaSupport as A;
use CanonicalForm as F;
use TextureFormat as T;

static DESCRIPTORS: [FormatDescriptor; 14] = [
    descriptor(T::I4, "I4", 4, (8, 8), A::None, 0, F::Gray),
    descriptor(T::I8, "I8", 8, (8, 4), A::None, 0, F::Gray),
    descriptor(T::IA4, "IA4", 8, (8, 4), A::Variable, 0, F::Gray),
    descriptor(T::IA8, "IA8", 16, (4, 4), A::Variable, 0, F::Gray),
    descriptor(T::RGB565, "RGB565", 16, (4, 4), A::None, 0, F::Rgb),
    descriptor(T::RGB5A3, "RGB5A3", 16, (4, 4), A::Variable, 0, F::Rgb),
    descriptor(T::RGBA32, "RGBA32", 32, (4, 4), A::Variable, 0, F::Rgb),
    descriptor(T::C4, "C4", 4, (8, 8), A::ViaPalette, 16, F::Palette),
    descriptor(T::C8, "C8", 8, (8, 4), A::ViaPalette, 256, F::Palette),
    descriptor(T::C14X2, "C14X2", 16, (4, 4), A::ViaPalette, 16384, F::Palette),
    descriptor(T::CMPR, "CMPR", 4, (8, 8), A::Variable, 0, F::Rgb),
    descriptor(T::CanonicalGray, "X-GRAY", 16, (1, 1), A::Variable, 0, F::Gray),
    descriptor(T::CanonicalRgb, "X-RGB", 32, (1, 1), A::Variable, 0, F::Rgb),
    descriptor(
        T::CanonicalPalette,
        "X-PAL",
        16,
        (1, 1),
        A::ViaPalette,
        MAX_PALETTE_ENTRIES,
        F::Palette,
    ),
];

impl TextureFormat {
    /// Returns the static descriptor of this format.
    #[inline]
    pub fn descriptor(self) -> &'static FormatDescriptor {
        let index = match self {
            T::I4 => 0,
            T::I8 => 1,
            T::IA4 => 2,
            T::IA8 => 3,
            T::RGB565 => 4,
            T::RGB5A3 => 5,
            T::RGBA32 => 6,
            T::C4 => 7,
            T::C8 => 8,
            T::C14X2 => 9,
            T::CMPR => 10,
            T::CanonicalGray => 11,
            T::CanonicalRgb => 12,
            T::CanonicalPalette => 13,
        };
        &DESCRIPTORS[index]
    }

    /// Numeric code of this format.
    #[inline]
    pub fn code(self) -> u32 {
        self as u32
    }

    /// Display name of this format.
    #[inline]
    pub fn name(self) -> &'static str {
        self.descriptor().name
    }

    /// Whether this is one of the three canonical in-memory forms.
    #[inline]
    pub fn is_canonical(self) -> bool {
        matches!(
            self,
            T::CanonicalGray | T::CanonicalRgb | T::CanonicalPalette
        )
    }

    /// Whether pixels of this format are palette indices.
    #[inline]
    pub fn is_palette(self) -> bool {
        self.descriptor().canonical_form == CanonicalForm::Palette
    }

    /// Whether this format belongs to the gray family.
    #[inline]
    pub fn is_gray(self) -> bool {
        self.descriptor().canonical_form == CanonicalForm::Gray
    }

    /// Canonical form this format decodes to.
    #[inline]
    pub fn canonical_form(self) -> CanonicalForm {
        self.descriptor().canonical_form
    }

    /// The canonical [`TextureFormat`] this format decodes to.
    #[inline]
    pub fn canonical_format(self) -> TextureFormat {
        self.canonical_form().format()
    }

    /// Palette capacity, `0` for formats without a palette.
    #[inline]
    pub fn max_palette_entries(self) -> usize {
        self.descriptor().max_palette_entries
    }
}

impl FormatDescriptor {
    /// Returns the descriptor for a numeric format code.
    ///
    /// Fails with [`TextureError::InvalidFormat`] for unknown codes.
    pub fn from_code(code: u32) -> TextureResult<&'static FormatDescriptor> {
        TextureFormat::try_from(code).map(TextureFormat::descriptor)
    }

    /// Returns `(tile_width, tile_height)`.
    #[inline]
    pub fn tile_size(&self) -> (u32, u32) {
        (self.tile_width, self.tile_height)
    }

    /// Rounds the dimensions up to a whole number of tiles: `(xwidth, xheight)`.
    ///
    /// Fails with [`TextureError::GeometryError`] when a padded dimension does not fit in a `u32`.
    #[inline]
    pub fn aligned_dimensions(&self, width: u32, height: u32) -> TextureResult<(u32, u32)> {
        match (
            width.checked_next_multiple_of(self.tile_width),
            height.checked_next_multiple_of(self.tile_height),
        ) {
            (Some(xwidth), Some(xheight)) => Ok((xwidth, xheight)),
            _ => Err(TextureError::geometry(width, height, GeometryIssue::TooLarge)),
        }
    }

    /// Whether the dimensions are already a whole number of tiles.
    #[inline]
    pub fn is_tile_aligned(&self, width: u32, height: u32) -> bool {
        width % self.tile_width == 0 && height % self.tile_height == 0
    }

    /// Size in bytes of a `width x height` image after tile padding.
    ///
    /// Fails with [`TextureError::GeometryError`] when either dimension is zero or the size
    /// overflows.
    pub fn image_size(&self, width: u32, height: u32) -> TextureResult<usize> {
        if width == 0 || height == 0 {
            return Err(TextureError::geometry(width, height, GeometryIssue::Empty));
        }
        let (xwidth, xheight) = self.aligned_dimensions(width, height)?;
        (xwidth as usize)
            .checked_mul(xheight as usize)
            .and_then(|pixels| pixels.checked_mul(self.bits_per_pixel as usize))
            .map(|bits| bits / 8)
            .ok_or(TextureError::geometry(width, height, GeometryIssue::TooLarge))
    }
}

impl CanonicalForm {
    /// The [`TextureFormat`] representing this canonical form.
    #[inline]
    pub fn format(self) -> TextureFormat {
        match self {
            CanonicalForm::Gray => T::CanonicalGray,
            CanonicalForm::Rgb => T::CanonicalRgb,
            CanonicalForm::Palette => T::CanonicalPalette,
        }
    }

    /// Bytes per pixel of this canonical form.
    #[inline]
    pub fn bytes_per_pixel(self) -> usize {
        match self {
            CanonicalForm::Gray | CanonicalForm::Palette => 2,
            CanonicalForm::Rgb => 4,
        }
    }
}

impl PaletteFormat {
    /// Numeric code of this palette format.
    #[inline]
    pub fn code(self) -> u32 {
        self as u32
    }

    /// Display name of this palette format.
    pub fn name(self) -> &'static str {
        match self {
            PaletteFormat::IA8 => "IA8",
            PaletteFormat::RGB565 => "RGB565",
            PaletteFormat::RGB5A3 => "RGB5A3",
        }
    }

    /// Size of one serialised palette entry in bytes.
    #[inline]
    pub fn entry_size(self) -> usize {
        2
    }

    /// How entries of this format represent transparency.
    pub fn alpha(self) -> AlphaSupport {
        match self {
            PaletteFormat::IA8 | PaletteFormat::RGB5A3 => AlphaSupport::Variable,
            PaletteFormat::RGB565 => AlphaSupport::None,
        }
    }

    /// Whether entries of this format are gray.
    #[inline]
    pub fn is_gray(self) -> bool {
        self == PaletteFormat::IA8
    }

    /// Size in bytes of a serialised palette of `count` entries.
    #[inline]
    pub fn palette_size(self, count: usize) -> usize {
        count * self.entry_size()
    }
}

impl TryFrom<u32> for TextureFormat {
    type Error = TextureError;

    fn try_from(code: u32) -> Result<Self, Self::Error> {
        TextureFormat::all_values()
            .iter()
            .copied()
            .find(|format| format.code() == code)
            .ok_or(TextureError::InvalidFormat(code))
    }
}

impl TryFrom<u32> for PaletteFormat {
    type Error = TextureError;

    fn try_from(code: u32) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(PaletteFormat::IA8),
            1 => Ok(PaletteFormat::RGB565),
            2 => Ok(PaletteFormat::RGB5A3),
            _ => Err(TextureError::InvalidFormat(code)),
        }
    }
}

impl From<TextureFormat> for u32 {
    fn from(value: TextureFormat) -> Self {
        value.code()
    }
}

impl From<PaletteFormat> for u32 {
    fn from(value: PaletteFormat) -> Self {
        value.code()
    }
}

impl FromStr for TextureFormat {
    type Err = TextureError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_ascii_uppercase();
        let format = match upper.as_str() {
            "CI4" => T::C4,
            "CI8" => T::C8,
            "CI14X2" | "C14" => T::C14X2,
            "RGBA8" | "RGBA8888" => T::RGBA32,
            "DXT1" | "CMP" => T::CMPR,
            "GRAY" => T::CanonicalGray,
            "RGB" | "RGBA" => T::CanonicalRgb,
            "PAL" => T::CanonicalPalette,
            name => {
                return TextureFormat::all_values()
                    .iter()
                    .copied()
                    .find(|format| format.name() == name)
                    .ok_or_else(|| TextureError::UnknownFormatName(s.to_string()))
            }
        };
        Ok(format)
    }
}

impl FromStr for PaletteFormat {
    type Err = TextureError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_ascii_uppercase();
        let name = upper.strip_prefix("P-").unwrap_or(&upper);
        PaletteFormat::all_values()
            .iter()
            .copied()
            .find(|format| format.name() == name)
            .ok_or_else(|| TextureError::UnknownFormatName(s.to_string()))
    }
}

impl fmt::Display for TextureFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl fmt::Display for PaletteFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
