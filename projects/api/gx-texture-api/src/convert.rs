//! # Conversion Orchestrator
//!
//! Converts an [`Image`] (and its mipmap chain) to another format in three stages:
//!
//! 1. **Decode**: the source goes to its canonical form.
//! 2. **Recode**: the canonical image moves to the form the target needs. Gray and RGB convert
//!    per pixel; anything to palette goes through the quantizer.
//! 3. **Encode**: the canonical image is padded to the target tile size and packed.
//!
//! When the source already has the target format (and palette format, for index formats) the
//! stages are skipped and the image is copied as is.
//!
//! Each stage runs one level deeper than the node it belongs to, and each mipmap link runs one
//! level deeper than the head. Entering a level above [`ConvertSettings::max_depth`] fails with
//! [`TextureError::ConversionDepthExceeded`].

use crate::buffer::PixelBuffer;
use crate::image::Image;
use crate::settings::ConvertSettings;
use alloc::vec::Vec;
use gx_texture_codec::{recode, CanonicalImage, CodecSettings, QuantizeSettings};
use gx_texture_common::format::{CanonicalForm, PaletteFormat, TextureFormat};
use gx_texture_common::{TextureError, TextureResult};
use tracing::{debug, trace};

/// Requested image format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FormatRequest {
    /// Pick a format from the source.
    #[default]
    Auto,
    /// Convert to exactly this format.
    Exact(TextureFormat),
}

/// Requested palette entry format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PaletteRequest {
    /// Pick a palette format from the source.
    #[default]
    Auto,
    /// Store the palette in exactly this format.
    Exact(PaletteFormat),
}

/// Where the converted image goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConversionTarget {
    /// Replace the source image.
    InPlace,
    /// Return a new image and leave the source untouched.
    NewBuffer,
}

/// The target of a conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ConvertRequest {
    /// Image format.
    pub format: FormatRequest,
    /// Palette entry format.
    pub palette: PaletteRequest,
}

impl ConvertRequest {
    /// Requests `format`, with an automatically chosen palette format.
    pub fn exact(format: TextureFormat) -> Self {
        Self {
            format: FormatRequest::Exact(format),
            palette: PaletteRequest::Auto,
        }
    }

    /// Sets the palette entry format.
    pub fn with_palette_format(mut self, format: PaletteFormat) -> Self {
        self.palette = PaletteRequest::Exact(format);
        self
    }

    /// Resolves automatic requests into a concrete format pair for `source`.
    ///
    /// - A native source keeps its format. A canonical source picks `IA8`/`I8` (gray),
    ///   `RGB5A3`/`RGB565` (RGB, with/without alpha), or the smallest index format holding its
    ///   palette.
    /// - A native index source keeps its palette format; other sources get `IA8` when gray,
    ///   `RGB5A3` when translucent, otherwise `RGB565`.
    pub fn resolve(&self, source: &Image) -> (TextureFormat, PaletteFormat) {
        let format = match self.format {
            FormatRequest::Exact(format) => format,
            FormatRequest::Auto => auto_format(source),
        };
        let palette_format = match self.palette {
            PaletteRequest::Exact(format) => format,
            PaletteRequest::Auto => auto_palette_format(source),
        };
        (format, palette_format)
    }
}

fn auto_format(source: &Image) -> TextureFormat {
    let format = source.format();
    if !format.is_canonical() {
        return format;
    }
    match format.canonical_form() {
        CanonicalForm::Gray if source.has_alpha() => TextureFormat::IA8,
        CanonicalForm::Gray => TextureFormat::I8,
        CanonicalForm::Rgb if source.has_alpha() => TextureFormat::RGB5A3,
        CanonicalForm::Rgb => TextureFormat::RGB565,
        CanonicalForm::Palette => {
            let entries = source.palette().map_or(0, |palette| palette.len());
            [TextureFormat::C4, TextureFormat::C8]
                .into_iter()
                .find(|format| entries <= format.max_palette_entries())
                .unwrap_or(TextureFormat::C14X2)
        }
    }
}

fn auto_palette_format(source: &Image) -> PaletteFormat {
    let format = source.format();
    if format.is_palette() && !format.is_canonical() {
        source.palette_format()
    } else if source.is_gray() {
        PaletteFormat::IA8
    } else if source.has_alpha() {
        PaletteFormat::RGB5A3
    } else {
        PaletteFormat::RGB565
    }
}

/// Converts `image` and its mipmap chain.
///
/// With [`ConversionTarget::InPlace`] the image is replaced and `None` is returned; with
/// [`ConversionTarget::NewBuffer`] the converted image is returned and `image` is left as is.
/// Either way the source is only read until the whole chain converted, so a failed conversion
/// leaves it unchanged.
///
/// # Errors
///
/// Returns the first error of any stage of any link.
pub fn convert(
    image: &mut Image,
    request: ConvertRequest,
    target: ConversionTarget,
    settings: &ConvertSettings,
) -> TextureResult<Option<Image>> {
    let converted = convert_chain(image, request, settings)?;
    match target {
        ConversionTarget::InPlace => {
            *image = converted;
            Ok(None)
        }
        ConversionTarget::NewBuffer => Ok(Some(converted)),
    }
}

impl Image {
    /// Converts this image in place. See [`convert`].
    ///
    /// # Errors
    ///
    /// See [`convert`].
    pub fn convert_in_place(
        &mut self,
        request: ConvertRequest,
        settings: &ConvertSettings,
    ) -> TextureResult<()> {
        *self = convert_chain(self, request, settings)?;
        Ok(())
    }

    /// Returns a converted copy of this image. See [`convert`].
    ///
    /// # Errors
    ///
    /// See [`convert`].
    pub fn converted(
        &self,
        request: ConvertRequest,
        settings: &ConvertSettings,
    ) -> TextureResult<Image> {
        convert_chain(self, request, settings)
    }
}

fn enter(depth: usize, settings: &ConvertSettings) -> TextureResult<()> {
    if depth > settings.max_depth {
        return Err(TextureError::ConversionDepthExceeded {
            depth,
            max: settings.max_depth,
        });
    }
    Ok(())
}

fn convert_chain(
    source: &Image,
    request: ConvertRequest,
    settings: &ConvertSettings,
) -> TextureResult<Image> {
    let (format, palette_format) = request.resolve(source);
    debug!(
        from = %source.format(),
        to = %format,
        %palette_format,
        width = source.width(),
        height = source.height(),
        "converting image"
    );
    let mut head = convert_level(source, format, palette_format, settings, 0)?;

    // Links are converted one after another and relinked in the same order.
    let mut links = Vec::new();
    let mut next = source.mipmap.as_deref();
    while let Some(link) = next {
        trace!(
            level = links.len() + 1,
            width = link.width(),
            height = link.height(),
            "converting mipmap"
        );
        links.push(convert_level(link, format, palette_format, settings, 1)?);
        next = link.mipmap.as_deref();
    }
    head.attach_chain(links);
    Ok(head)
}

/// Converts a single level, ignoring its mipmaps.
fn convert_level(
    source: &Image,
    format: TextureFormat,
    palette_format: PaletteFormat,
    settings: &ConvertSettings,
    depth: usize,
) -> TextureResult<Image> {
    enter(depth, settings)?;
    let same_palette = !format.is_palette() || source.palette_format() == palette_format;
    if source.format() == format && same_palette {
        debug!(%format, "formats match, copying");
        return Ok(source.level_only());
    }

    let stage = depth + 1;
    enter(stage, settings)?;
    let decoded = source.to_canonical()?;
    debug!(from = %source.format(), form = ?decoded.form(), "decoded");

    let canonical = recode_for(&decoded, format, settings)?;

    let desc = format.descriptor();
    let (xwidth, xheight) = desc.aligned_dimensions(source.width(), source.height())?;
    let canvas = canonical.with_canvas(xwidth, xheight);
    let codec = CodecSettings {
        endian: source.endian(),
        cmpr: settings.cmpr,
    };
    let bytes = gx_texture_codec::encode(&canvas, format, &codec)?;
    debug!(to = %format, xwidth, xheight, bytes = bytes.len(), "encoded");

    // Canonical palettes keep full RGBA8 entries.
    let palette = match (format.is_palette(), canvas.palette()) {
        (true, Some(palette)) if format.is_canonical() => Some(palette.clone()),
        (true, Some(palette)) => Some(palette.quantized_to(palette_format)),
        _ => None,
    };
    Image::from_parts(
        source.width(),
        source.height(),
        format,
        palette_format,
        source.endian(),
        PixelBuffer::Owned(bytes),
        palette,
    )
}

/// Moves `decoded` to the canonical form of `format`.
///
/// A palette that already fits the target is kept with its indices.
fn recode_for(
    decoded: &CanonicalImage,
    format: TextureFormat,
    settings: &ConvertSettings,
) -> TextureResult<CanonicalImage> {
    let target = format.canonical_form();
    let quantize = if format.is_palette() {
        QuantizeSettings::new(settings.palette_colors(format.max_palette_entries()))
    } else {
        QuantizeSettings::default()
    };

    if decoded.form() == CanonicalForm::Palette && target == CanonicalForm::Palette {
        let entries = decoded.palette().map_or(0, |palette| palette.len());
        if entries <= quantize.max_colors {
            trace!(entries, "palette fits, keeping indices");
            return Ok(decoded.clone());
        }
        debug!(entries, max = quantize.max_colors, "palette too large, requantizing");
        let rgb = recode(decoded, CanonicalForm::Rgb, &quantize)?;
        return recode(&rgb, CanonicalForm::Palette, &quantize);
    }
    recode(decoded, target, &quantize)
}
