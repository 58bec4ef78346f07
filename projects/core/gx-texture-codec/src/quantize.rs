//! # Palette Quantizer
//!
//! Reduces an RGBA image to at most `K` palette entries with a median cut over red, green and
//! blue.
//!
//! ## Algorithm
//!
//! 1. Build a histogram of the distinct RGBA colours, sorted by colour.
//! 2. If there are at most `K` distinct colours, every colour becomes its own entry.
//! 3. Otherwise start with one bucket holding every colour and repeat until there are `K`
//!    buckets or no bucket spans more than one value on any channel:
//!    - pick the bucket with the widest channel range (lowest bucket index on ties; red, then
//!      green, then blue on channel ties),
//!    - sort it along that channel (colour order breaks ties),
//!    - split it at its pixel-weighted median, keeping both halves non-empty. The first half
//!      stays in place, the second half is appended.
//! 4. Each bucket's entry is the pixel-weighted mean of its colours, alpha included.
//!
//! The output only depends on the input pixels and `K`.

use crate::palette::Palette;
use crate::settings::QuantizeSettings;
use alloc::vec::Vec;
use gx_texture_common::color_8888::Color8888;
use gx_texture_common::{TextureError, TextureResult, MAX_PALETTE_ENTRIES};
use tracing::{debug, trace};

/// A contiguous run of histogram entries.
#[derive(Debug, Clone, Copy)]
struct Bucket {
    start: usize,
    end: usize,
    /// Channel with the widest range: 0 = red, 1 = green, 2 = blue.
    channel: usize,
    /// Range of that channel.
    range: u8,
}

impl Bucket {
    fn new(entries: &[(Color8888, u32)], start: usize, end: usize) -> Self {
        let mut min = [u8::MAX; 3];
        let mut max = [u8::MIN; 3];
        for (color, _) in &entries[start..end] {
            for (channel, value) in [color.r, color.g, color.b].into_iter().enumerate() {
                min[channel] = min[channel].min(value);
                max[channel] = max[channel].max(value);
            }
        }

        let mut bucket = Self {
            start,
            end,
            channel: 0,
            range: 0,
        };
        for channel in 0..3 {
            let range = max[channel].saturating_sub(min[channel]);
            if range > bucket.range {
                bucket.channel = channel;
                bucket.range = range;
            }
        }
        bucket
    }
}

#[inline]
fn channel_value(color: &Color8888, channel: usize) -> u8 {
    match channel {
        0 => color.r,
        1 => color.g,
        _ => color.b,
    }
}

/// Distinct colours with their pixel counts, sorted by colour.
fn histogram(rgba: &[u8]) -> Vec<(Color8888, u32)> {
    let mut colors: Vec<Color8888> = rgba.chunks_exact(4).map(Color8888::from_slice).collect();
    colors.sort_unstable();

    let mut entries: Vec<(Color8888, u32)> = Vec::new();
    for color in colors {
        match entries.last_mut() {
            Some((last, count)) if *last == color => *count += 1,
            _ => entries.push((color, 1)),
        }
    }
    entries
}

fn weighted_mean(entries: &[(Color8888, u32)]) -> Color8888 {
    let mut sums = [0u64; 4];
    let mut total = 0u64;
    for (color, count) in entries {
        let count = *count as u64;
        for (sum, value) in sums.iter_mut().zip(color.to_bytes()) {
            *sum += value as u64 * count;
        }
        total += count;
    }
    let mean = |sum: u64| ((sum + total / 2) / total.max(1)) as u8;
    Color8888::new(mean(sums[0]), mean(sums[1]), mean(sums[2]), mean(sums[3]))
}

/// Splits `bucket` at its weighted median, returning the two halves.
fn split(entries: &mut [(Color8888, u32)], bucket: Bucket) -> (Bucket, Bucket) {
    let slice = &mut entries[bucket.start..bucket.end];
    slice.sort_unstable_by_key(|(color, _)| (channel_value(color, bucket.channel), *color));

    let total: u64 = slice.iter().map(|(_, count)| *count as u64).sum();
    let mut seen = 0u64;
    let mut at = slice.len() - 1;
    for (i, (_, count)) in slice.iter().enumerate() {
        seen += *count as u64;
        if seen * 2 >= total {
            at = i + 1;
            break;
        }
    }
    let at = bucket.start + at.clamp(1, slice.len() - 1);

    (
        Bucket::new(entries, bucket.start, at),
        Bucket::new(entries, at, bucket.end),
    )
}

/// Quantizes a row-major RGBA buffer to at most `settings.max_colors` entries.
///
/// Returns the palette and one index per pixel. Every index is smaller than the palette length.
///
/// # Errors
///
/// Returns [`TextureError::PaletteOverflow`] if `max_colors` is 0 or larger than
/// [`MAX_PALETTE_ENTRIES`].
///
/// # Example
///
/// ```
/// use gx_texture_codec::{quantize, QuantizeSettings};
///
/// let rgba = [255, 0, 0, 255, 0, 0, 255, 255, 255, 0, 0, 255];
/// let (palette, indices) = quantize(&rgba, &QuantizeSettings::new(16)).unwrap();
/// assert_eq!(palette.len(), 2);
/// assert_eq!(indices[0], indices[2]);
/// ```
pub fn quantize(rgba: &[u8], settings: &QuantizeSettings) -> TextureResult<(Palette, Vec<u16>)> {
    if !settings.is_valid() {
        return Err(TextureError::PaletteOverflow {
            requested: settings.max_colors,
            max: MAX_PALETTE_ENTRIES,
        });
    }
    let max_colors = settings.max_colors;
    let mut entries = histogram(rgba);
    debug!(distinct = entries.len(), max_colors, "quantizing");

    let buckets = if entries.len() <= max_colors {
        (0..entries.len())
            .map(|i| Bucket::new(&entries, i, i + 1))
            .collect()
    } else {
        let mut buckets = Vec::with_capacity(max_colors);
        buckets.push(Bucket::new(&entries, 0, entries.len()));
        while buckets.len() < max_colors {
            let mut widest: Option<usize> = None;
            for (i, bucket) in buckets.iter().enumerate() {
                let wider = widest.is_none_or(|w: usize| bucket.range > buckets[w].range);
                if bucket.range > 0 && wider {
                    widest = Some(i);
                }
            }
            let Some(index) = widest else {
                break;
            };

            let (low, high) = split(&mut entries, buckets[index]);
            trace!(
                bucket = index,
                channel = buckets[index].channel,
                range = buckets[index].range,
                at = low.end,
                "splitting bucket"
            );
            buckets[index] = low;
            buckets.push(high);
        }
        buckets
    };

    let mut palette = Palette::new();
    let mut lookup: Vec<(Color8888, u16)> = Vec::with_capacity(entries.len());
    for (index, bucket) in buckets.iter().enumerate() {
        let members = &entries[bucket.start..bucket.end];
        palette.push(weighted_mean(members));
        lookup.extend(members.iter().map(|(color, _)| (*color, index as u16)));
    }
    lookup.sort_unstable_by_key(|(color, _)| *color);

    let indices = rgba
        .chunks_exact(4)
        .map(Color8888::from_slice)
        .map(|color| match lookup.binary_search_by_key(&color, |(c, _)| *c) {
            Ok(found) => lookup[found].1,
            Err(_) => 0,
        })
        .collect();
    Ok((palette, indices))
}
