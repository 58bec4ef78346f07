//! Palettes and the palette entry codec.
//!
//! A [`Palette`] is an ordered list of RGBA colours; the position of an entry is the index that
//! pixels refer to, so serialisation preserves order exactly.

use crate::pixel::{decode_palette_entry, encode_palette_entry};
use alloc::vec::Vec;
use core::ops::Index;
use gx_texture_common::color_8888::Color8888;
use gx_texture_common::endian::Endian;
use gx_texture_common::format::PaletteFormat;
use gx_texture_common::{GeometryIssue, TextureError, TextureResult, MAX_PALETTE_ENTRIES};

/// An ordered list of RGBA palette entries.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Palette {
    entries: Vec<Color8888>,
}

impl Palette {
    /// Creates an empty palette.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the palette has no entries.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entry at `index`, if present.
    #[inline]
    pub fn get(&self, index: usize) -> Option<Color8888> {
        self.entries.get(index).copied()
    }

    /// Appends an entry.
    #[inline]
    pub fn push(&mut self, color: Color8888) {
        self.entries.push(color);
    }

    /// The entries in index order.
    #[inline]
    pub fn entries(&self) -> &[Color8888] {
        &self.entries
    }

    /// Iterates the entries in index order.
    pub fn iter(&self) -> impl Iterator<Item = &Color8888> {
        self.entries.iter()
    }

    /// Whether any entry has an alpha other than 255.
    pub fn has_transparency(&self) -> bool {
        self.entries.iter().any(|entry| entry.a != 255)
    }

    /// Whether every entry is gray.
    pub fn is_gray(&self) -> bool {
        self.entries.iter().all(Color8888::is_gray)
    }

    /// Returns a copy with every entry passed through `format`, i.e. the colours the palette
    /// will have after being stored in that format.
    pub fn quantized_to(&self, format: PaletteFormat) -> Self {
        self.entries
            .iter()
            .map(|&entry| decode_palette_entry(encode_palette_entry(entry, format), format))
            .collect()
    }
}

impl From<Vec<Color8888>> for Palette {
    fn from(entries: Vec<Color8888>) -> Self {
        Self { entries }
    }
}

impl FromIterator<Color8888> for Palette {
    fn from_iter<T: IntoIterator<Item = Color8888>>(iter: T) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl Index<usize> for Palette {
    type Output = Color8888;

    fn index(&self, index: usize) -> &Self::Output {
        &self.entries[index]
    }
}

/// Serialises a palette in the given entry format.
///
/// Each entry takes 2 bytes; the output is `palette.len() * 2` bytes.
pub fn encode_palette(palette: &Palette, format: PaletteFormat, endian: Endian) -> Vec<u8> {
    let mut out = Vec::with_capacity(format.palette_size(palette.len()));
    for entry in palette.iter() {
        out.extend_from_slice(&endian.u16_bytes(encode_palette_entry(*entry, format)));
    }
    out
}

/// Reads `count` palette entries of the given format.
///
/// # Errors
///
/// - [`TextureError::PaletteOverflow`] if `count` exceeds [`MAX_PALETTE_ENTRIES`].
/// - [`TextureError::GeometryError`] if `data` holds fewer than `count` entries.
pub fn decode_palette(
    data: &[u8],
    count: usize,
    format: PaletteFormat,
    endian: Endian,
) -> TextureResult<Palette> {
    if count > MAX_PALETTE_ENTRIES {
        return Err(TextureError::PaletteOverflow {
            requested: count,
            max: MAX_PALETTE_ENTRIES,
        });
    }
    let required = format.palette_size(count);
    if data.len() < required {
        return Err(TextureError::geometry(
            count as u32,
            1,
            GeometryIssue::BufferTooSmall {
                required,
                actual: data.len(),
            },
        ));
    }

    Ok(data[..required]
        .chunks_exact(format.entry_size())
        .map(|word| decode_palette_entry(endian.read_u16(word), format))
        .collect())
}

#[cfg(test)]
mod tests {
    use crate::test_prelude::*;

    fn sample() -> Palette {
        Palette::from(vec![
            Color8888::new(255, 0, 0, 255),
            Color8888::new(0, 0, 0, 0),
            Color8888::new(255, 255, 255, 255),
            Color8888::new(0, 255, 0, 255),
        ])
    }

    #[test]
    fn preserves_order_and_colors() {
        for endian in Endian::all_values() {
            let bytes = encode_palette(&sample(), PaletteFormat::RGB5A3, *endian);
            assert_eq!(bytes.len(), 8);
            let decoded = decode_palette(&bytes, 4, PaletteFormat::RGB5A3, *endian).unwrap();
            assert_eq!(decoded, sample());
        }
    }

    /// First entry is opaque red; IA8 stores it as alpha 0xFF then its gray level 0x55.
    #[rstest]
    #[case(PaletteFormat::IA8, [0xFF, 0x55])]
    #[case(PaletteFormat::RGB565, [0xF8, 0x00])]
    #[case(PaletteFormat::RGB5A3, [0xFC, 0x00])]
    fn big_endian_layout(#[case] format: PaletteFormat, #[case] first: [u8; 2]) {
        let bytes = encode_palette(&sample(), format, Endian::Big);
        assert_eq!(&bytes[..2], &first);
    }

    #[test]
    fn rgb565_drops_alpha() {
        let bytes = encode_palette(&sample(), PaletteFormat::RGB565, Endian::Big);
        let decoded = decode_palette(&bytes, 4, PaletteFormat::RGB565, Endian::Big).unwrap();
        assert!(!decoded.has_transparency());
        assert_eq!(decoded, sample().quantized_to(PaletteFormat::RGB565));
    }

    #[test]
    fn rejects_short_buffers() {
        assert!(matches!(
            decode_palette(&[0u8; 3], 2, PaletteFormat::IA8, Endian::Big),
            Err(TextureError::GeometryError { .. })
        ));
        assert!(matches!(
            decode_palette(&[], MAX_PALETTE_ENTRIES + 1, PaletteFormat::IA8, Endian::Big),
            Err(TextureError::PaletteOverflow { .. })
        ));
    }
}
