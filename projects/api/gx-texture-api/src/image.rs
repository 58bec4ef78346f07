//! The [`Image`] entity.
//!
//! An image is a tiled pixel buffer in one [`TextureFormat`], an optional palette for the index
//! formats, and an optional chain of mipmaps. Every link of the chain has the same format as the
//! head and its own dimensions.

use crate::buffer::PixelBuffer;
use alloc::boxed::Box;
use alloc::vec;
use core::cell::Cell;
use gx_texture_codec::{CanonicalImage, Palette};
use gx_texture_common::color_8888::Color8888;
use gx_texture_common::endian::Endian;
use gx_texture_common::format::{AlphaSupport, PaletteFormat, TextureFormat};
use gx_texture_common::{GeometryIssue, TextureError, TextureResult};

/// Whether an image contains pixels that are not fully opaque.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AlphaStatus {
    /// Not computed yet.
    #[default]
    Unknown,
    /// Every pixel is fully opaque.
    Opaque,
    /// At least one pixel may be translucent.
    MayHaveTransparency,
}

/// A texture in a native or canonical format.
#[derive(Debug, Clone)]
pub struct Image {
    width: u32,
    height: u32,
    xwidth: u32,
    xheight: u32,
    format: TextureFormat,
    palette_format: PaletteFormat,
    endian: Endian,
    pixels: PixelBuffer,
    palette: Option<Palette>,
    alpha: Cell<AlphaStatus>,
    pub(crate) mipmap: Option<Box<Image>>,
}

impl Image {
    /// Creates an image whose pixel bytes are all zero.
    ///
    /// Index formats get a one-entry transparent palette so every pixel resolves.
    ///
    /// # Errors
    ///
    /// Returns [`TextureError::GeometryError`] for empty or oversized dimensions.
    pub fn new(width: u32, height: u32, format: TextureFormat) -> TextureResult<Self> {
        let size = format.descriptor().image_size(width, height)?;
        let mut image = Self::from_buffer(width, height, format, vec![0u8; size])?;
        if format.is_palette() {
            image.palette = Some(Palette::from(vec![Color8888::TRANSPARENT]));
        }
        Ok(image)
    }

    /// Wraps native pixel bytes.
    ///
    /// The buffer must hold at least the padded image size; extra trailing bytes are kept but
    /// never read.
    ///
    /// # Errors
    ///
    /// Returns [`TextureError::GeometryError`] for empty dimensions or a short buffer.
    pub fn from_buffer(
        width: u32,
        height: u32,
        format: TextureFormat,
        pixels: impl Into<PixelBuffer>,
    ) -> TextureResult<Self> {
        let pixels = pixels.into();
        let desc = format.descriptor();
        let required = desc.image_size(width, height)?;
        if pixels.len() < required {
            return Err(TextureError::geometry(
                width,
                height,
                GeometryIssue::BufferTooSmall {
                    required,
                    actual: pixels.len(),
                },
            ));
        }
        let (xwidth, xheight) = desc.aligned_dimensions(width, height)?;
        Ok(Self {
            width,
            height,
            xwidth,
            xheight,
            format,
            palette_format: PaletteFormat::default(),
            endian: Endian::default(),
            pixels,
            palette: None,
            alpha: Cell::new(AlphaStatus::Unknown),
            mipmap: None,
        })
    }

    /// Wraps a canonical image. The format is the canonical format of its form.
    pub fn from_canonical(mut image: CanonicalImage) -> Self {
        let palette = image.take_palette();
        let (width, height) = (image.width(), image.height());
        Self {
            width,
            height,
            xwidth: width,
            xheight: height,
            format: image.format(),
            palette_format: PaletteFormat::default(),
            endian: Endian::default(),
            pixels: PixelBuffer::Owned(image.into_pixels()),
            palette,
            alpha: Cell::new(AlphaStatus::Unknown),
            mipmap: None,
        }
    }

    /// Sets the byte order the pixel and palette words are stored in.
    pub fn with_endian(mut self, endian: Endian) -> Self {
        self.endian = endian;
        self
    }

    /// Attaches a palette stored in `format`.
    pub fn with_palette(mut self, palette: Palette, format: PaletteFormat) -> Self {
        self.set_palette(Some(palette), format);
        self
    }

    /// Logical width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Logical height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Width padded to the tile width.
    #[inline]
    pub fn xwidth(&self) -> u32 {
        self.xwidth
    }

    /// Height padded to the tile height.
    #[inline]
    pub fn xheight(&self) -> u32 {
        self.xheight
    }

    /// Pixel format.
    #[inline]
    pub fn format(&self) -> TextureFormat {
        self.format
    }

    /// Palette entry format. Only meaningful for index formats.
    #[inline]
    pub fn palette_format(&self) -> PaletteFormat {
        self.palette_format
    }

    /// Byte order of 16-bit words.
    #[inline]
    pub fn endian(&self) -> Endian {
        self.endian
    }

    /// Pixel bytes.
    #[inline]
    pub fn pixels(&self) -> &[u8] {
        self.pixels.as_slice()
    }

    /// The pixel storage, owned or borrowed.
    #[inline]
    pub fn buffer(&self) -> &PixelBuffer {
        &self.pixels
    }

    /// Pixel bytes for writing. Borrowed storage is copied first.
    pub fn pixels_mut(&mut self) -> &mut [u8] {
        self.alpha.set(AlphaStatus::Unknown);
        self.pixels.make_mutable()
    }

    /// Attached palette.
    #[inline]
    pub fn palette(&self) -> Option<&Palette> {
        self.palette.as_ref()
    }

    /// Replaces the palette and its entry format.
    pub fn set_palette(&mut self, palette: Option<Palette>, format: PaletteFormat) {
        self.alpha.set(AlphaStatus::Unknown);
        self.palette = palette;
        self.palette_format = format;
    }

    /// Decodes the visible `width x height` area to its canonical form.
    ///
    /// Index formats carry the attached palette along.
    ///
    /// # Errors
    ///
    /// See [`gx_texture_codec::decode`].
    pub fn to_canonical(&self) -> TextureResult<CanonicalImage> {
        let mut canonical = gx_texture_codec::decode(
            self.pixels(),
            self.format,
            self.width,
            self.height,
            self.endian,
        )?;
        if self.format.is_palette() {
            canonical.set_palette(self.palette.clone());
        }
        Ok(canonical.with_canvas(self.width, self.height))
    }

    /// Whether the image contains translucent pixels. Computed once and cached until the next
    /// mutation.
    pub fn alpha_status(&self) -> AlphaStatus {
        if self.alpha.get() == AlphaStatus::Unknown {
            self.alpha.set(self.compute_alpha_status());
        }
        self.alpha.get()
    }

    /// Shorthand for `alpha_status() == MayHaveTransparency`.
    #[inline]
    pub fn has_alpha(&self) -> bool {
        self.alpha_status() == AlphaStatus::MayHaveTransparency
    }

    fn compute_alpha_status(&self) -> AlphaStatus {
        if self.format.descriptor().alpha == AlphaSupport::None {
            return AlphaStatus::Opaque;
        }
        match self.to_canonical() {
            Ok(canonical) if !canonical.has_transparency() => AlphaStatus::Opaque,
            _ => AlphaStatus::MayHaveTransparency,
        }
    }

    /// Whether every visible pixel is gray.
    pub fn is_gray(&self) -> bool {
        self.format.is_gray()
            || self
                .to_canonical()
                .is_ok_and(|canonical| canonical.is_gray())
    }

    /// Copy of this image without its mipmap chain.
    pub(crate) fn level_only(&self) -> Self {
        Self {
            width: self.width,
            height: self.height,
            xwidth: self.xwidth,
            xheight: self.xheight,
            format: self.format,
            palette_format: self.palette_format,
            endian: self.endian,
            pixels: self.pixels.clone(),
            palette: self.palette.clone(),
            alpha: self.alpha.clone(),
            mipmap: None,
        }
    }

    /// Assembles an already encoded image.
    pub(crate) fn from_parts(
        width: u32,
        height: u32,
        format: TextureFormat,
        palette_format: PaletteFormat,
        endian: Endian,
        pixels: PixelBuffer,
        palette: Option<Palette>,
    ) -> TextureResult<Self> {
        let (xwidth, xheight) = format.descriptor().aligned_dimensions(width, height)?;
        Ok(Self {
            width,
            height,
            xwidth,
            xheight,
            format,
            palette_format,
            endian,
            pixels,
            palette,
            alpha: Cell::new(AlphaStatus::Unknown),
            mipmap: None,
        })
    }
}

impl PartialEq for Image {
    fn eq(&self, other: &Self) -> bool {
        self.width == other.width
            && self.height == other.height
            && self.format == other.format
            && (!self.format.is_palette() || self.palette_format == other.palette_format)
            && self.endian == other.endian
            && self.pixels == other.pixels
            && self.palette == other.palette
            && self.mipmap == other.mipmap
    }
}

impl Eq for Image {}
