//! The canonical in-memory image.
//!
//! Every native format decodes to one of three canonical forms:
//!
//! | Form      | Bytes per pixel | Layout                               |
//! |-----------|-----------------|--------------------------------------|
//! | `Gray`    | 2               | `gray, alpha`                        |
//! | `Rgb`     | 4               | `red, green, blue, alpha`            |
//! | `Palette` | 2               | big-endian `u16` index into a palette |
//!
//! Pixels are row-major with no tiling.

use crate::palette::Palette;
use alloc::vec;
use alloc::vec::Vec;
use gx_texture_common::color_8888::Color8888;
use gx_texture_common::format::{CanonicalForm, TextureFormat};
use gx_texture_common::{GeometryIssue, TextureError, TextureResult};

/// A decoded image in one of the canonical forms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalImage {
    form: CanonicalForm,
    width: u32,
    height: u32,
    pixels: Vec<u8>,
    palette: Option<Palette>,
}

impl CanonicalImage {
    /// Creates an image filled with transparent black (or palette index 0).
    pub fn new(form: CanonicalForm, width: u32, height: u32) -> Self {
        Self {
            form,
            width,
            height,
            pixels: vec![0; width as usize * height as usize * form.bytes_per_pixel()],
            palette: None,
        }
    }

    /// Wraps an existing pixel buffer.
    ///
    /// # Errors
    ///
    /// Returns [`TextureError::GeometryError`] when the buffer size does not match the
    /// dimensions.
    pub fn from_pixels(
        form: CanonicalForm,
        width: u32,
        height: u32,
        pixels: Vec<u8>,
    ) -> TextureResult<Self> {
        let required = width as usize * height as usize * form.bytes_per_pixel();
        if pixels.len() != required {
            return Err(TextureError::geometry(
                width,
                height,
                GeometryIssue::BufferTooSmall {
                    required,
                    actual: pixels.len(),
                },
            ));
        }
        Ok(Self {
            form,
            width,
            height,
            pixels,
            palette: None,
        })
    }

    /// Wraps a 16-bit index buffer and its palette.
    pub fn from_indices(width: u32, height: u32, indices: &[u16], palette: Palette) -> Self {
        let mut image = Self::new(CanonicalForm::Palette, width, height);
        for (dst, index) in image.pixels.chunks_exact_mut(2).zip(indices) {
            dst.copy_from_slice(&index.to_be_bytes());
        }
        image.palette = Some(palette);
        image
    }

    /// Canonical form of the pixels.
    #[inline]
    pub fn form(&self) -> CanonicalForm {
        self.form
    }

    /// The canonical [`TextureFormat`] of the pixels.
    #[inline]
    pub fn format(&self) -> TextureFormat {
        self.form.format()
    }

    /// Width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Raw pixel bytes.
    #[inline]
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Consumes the image, returning the raw pixel bytes.
    #[inline]
    pub fn into_pixels(self) -> Vec<u8> {
        self.pixels
    }

    /// Attached palette, for palette-form images.
    #[inline]
    pub fn palette(&self) -> Option<&Palette> {
        self.palette.as_ref()
    }

    /// Attaches or removes the palette.
    #[inline]
    pub fn set_palette(&mut self, palette: Option<Palette>) {
        self.palette = palette;
    }

    /// Detaches the palette.
    #[inline]
    pub fn take_palette(&mut self) -> Option<Palette> {
        self.palette.take()
    }

    #[inline]
    fn offset(&self, x: usize, y: usize) -> usize {
        (y * self.width as usize + x) * self.form.bytes_per_pixel()
    }

    /// Reads a gray pixel as `(gray, alpha)`.
    #[inline]
    pub fn gray_at(&self, x: usize, y: usize) -> (u8, u8) {
        let o = self.offset(x, y);
        (self.pixels[o], self.pixels[o + 1])
    }

    /// Writes a gray pixel.
    #[inline]
    pub fn set_gray(&mut self, x: usize, y: usize, gray: u8, alpha: u8) {
        let o = self.offset(x, y);
        self.pixels[o] = gray;
        self.pixels[o + 1] = alpha;
    }

    /// Reads an RGBA pixel.
    #[inline]
    pub fn rgba_at(&self, x: usize, y: usize) -> Color8888 {
        Color8888::from_slice(&self.pixels[self.offset(x, y)..])
    }

    /// Writes an RGBA pixel.
    #[inline]
    pub fn set_rgba(&mut self, x: usize, y: usize, color: Color8888) {
        let o = self.offset(x, y);
        self.pixels[o..o + 4].copy_from_slice(&color.to_bytes());
    }

    /// Reads a palette index.
    #[inline]
    pub fn index_at(&self, x: usize, y: usize) -> u16 {
        let o = self.offset(x, y);
        u16::from_be_bytes([self.pixels[o], self.pixels[o + 1]])
    }

    /// Writes a palette index.
    #[inline]
    pub fn set_index(&mut self, x: usize, y: usize, index: u16) {
        let o = self.offset(x, y);
        self.pixels[o..o + 2].copy_from_slice(&index.to_be_bytes());
    }

    /// Iterates the palette indices in row-major order.
    pub fn indices(&self) -> impl Iterator<Item = u16> + '_ {
        self.pixels
            .chunks_exact(2)
            .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
    }

    /// Largest palette index used, `None` for an empty image.
    pub fn max_index(&self) -> Option<u16> {
        self.indices().max()
    }

    /// Whether any pixel is not fully opaque.
    ///
    /// Palette images answer from the entries actually referenced.
    pub fn has_transparency(&self) -> bool {
        match self.form {
            CanonicalForm::Gray => self.pixels.chunks_exact(2).any(|p| p[1] != 255),
            CanonicalForm::Rgb => self.pixels.chunks_exact(4).any(|p| p[3] != 255),
            CanonicalForm::Palette => match &self.palette {
                Some(palette) => self
                    .indices()
                    .any(|i| palette.get(i as usize).is_none_or(|entry| entry.a != 255)),
                None => false,
            },
        }
    }

    /// Whether every pixel is gray.
    pub fn is_gray(&self) -> bool {
        match self.form {
            CanonicalForm::Gray => true,
            CanonicalForm::Rgb => self
                .pixels
                .chunks_exact(4)
                .all(|p| p[0] == p[1] && p[1] == p[2]),
            CanonicalForm::Palette => self.palette.as_ref().is_none_or(Palette::is_gray),
        }
    }

    /// Returns the image on a `width x height` canvas: pixels outside the current bounds become
    /// transparent black (or index 0), pixels outside the new bounds are dropped.
    pub fn with_canvas(&self, width: u32, height: u32) -> Self {
        if width == self.width && height == self.height {
            return self.clone();
        }
        let bpp = self.form.bytes_per_pixel();
        let mut out = Self::new(self.form, width, height);
        out.palette = self.palette.clone();
        let row_bytes = width.min(self.width) as usize * bpp;
        for y in 0..height.min(self.height) as usize {
            let src = y * self.width as usize * bpp;
            let dst = y * width as usize * bpp;
            out.pixels[dst..dst + row_bytes].copy_from_slice(&self.pixels[src..src + row_bytes]);
        }
        out
    }
}
