//! # Bit-Depth Lookup Tables
//!
//! Fixed tables mapping N-bit channel values up to their 8-bit equivalents, and 8-bit values
//! down to N bits. Every codec routine and the CMPR compressor go through these tables, so the
//! mapping here is the one that ends up in the encoded bytes.
//!
//! ## Mapping
//!
//! - Expansion (`EXPAND_N_TO_8`): `round(v * 255 / (2^N - 1))`.
//!   The tables are strictly increasing and map `0` to `0` and the N-bit maximum to `255`.
//! - Reduction (`REDUCE_8_TO_N`): `round(x * (2^N - 1) / 255)`, i.e. the nearest N-bit value.
//!
//! Neither formula ever lands exactly on a `.5`, because `255` and `2^N - 1` are both odd,
//! so there is no tie-breaking rule to worry about.
//!
//! Reducing an expanded value always yields the original:
//!
//! ```
//! use gx_texture_common::bit_depth::{EXPAND_5_TO_8, REDUCE_8_TO_5};
//!
//! for v in 0..32 {
//!     assert_eq!(REDUCE_8_TO_5[EXPAND_5_TO_8[v] as usize] as usize, v);
//! }
//! ```
//!
//! The tables are built at compile time; nothing is computed at runtime.

/// Builds an N-bit to 8-bit expansion table.
const fn expand_table<const LEN: usize>() -> [u8; LEN] {
    let max = (LEN - 1) as u32;
    let mut table = [0u8; LEN];
    let mut v = 0;
    while v < LEN {
        table[v] = ((2 * v as u32 * 255 + max) / (2 * max)) as u8;
        v += 1;
    }
    table
}

/// Builds an 8-bit to N-bit reduction table, optionally pre-shifted left.
const fn reduce_table(bits: u32, shift: u32) -> [u8; 256] {
    let max = (1u32 << bits) - 1;
    let mut table = [0u8; 256];
    let mut x = 0;
    while x < 256 {
        let reduced = (2 * x as u32 * max + 255) / 510;
        table[x] = (reduced << shift) as u8;
        x += 1;
    }
    table
}

/// 3-bit to 8-bit expansion (RGB5A3 alpha).
pub static EXPAND_3_TO_8: [u8; 8] = expand_table::<8>();
/// 4-bit to 8-bit expansion (I4, IA4, RGB5A3 colour in alpha mode).
pub static EXPAND_4_TO_8: [u8; 16] = expand_table::<16>();
/// 5-bit to 8-bit expansion (RGB565 red/blue, RGB5A3 colour in opaque mode).
pub static EXPAND_5_TO_8: [u8; 32] = expand_table::<32>();
/// 6-bit to 8-bit expansion (RGB565 green).
pub static EXPAND_6_TO_8: [u8; 64] = expand_table::<64>();

/// 8-bit to 3-bit reduction.
pub static REDUCE_8_TO_3: [u8; 256] = reduce_table(3, 0);
/// 8-bit to 4-bit reduction.
pub static REDUCE_8_TO_4: [u8; 256] = reduce_table(4, 0);
/// 8-bit to 5-bit reduction.
pub static REDUCE_8_TO_5: [u8; 256] = reduce_table(5, 0);
/// 8-bit to 6-bit reduction.
pub static REDUCE_8_TO_6: [u8; 256] = reduce_table(6, 0);

/// 8-bit to 5-bit reduction, pre-shifted left by one bit.
///
/// Used where a 5-bit channel lands in a field whose lowest bit is always zero,
/// e.g. the green field of an opaque RGB5A3 word (`1rrrrrgggggbbbbb`) packed from the
/// same shifts as an RGB565 word.
pub static REDUCE_8_TO_5_SHL1: [u8; 256] = reduce_table(5, 1);

/// Expands a 3-bit value to 8 bits.
#[inline]
pub fn expand3(value: u8) -> u8 {
    EXPAND_3_TO_8[(value & 0x07) as usize]
}

/// Expands a 4-bit value to 8 bits.
#[inline]
pub fn expand4(value: u8) -> u8 {
    EXPAND_4_TO_8[(value & 0x0F) as usize]
}

/// Expands a 5-bit value to 8 bits.
#[inline]
pub fn expand5(value: u8) -> u8 {
    EXPAND_5_TO_8[(value & 0x1F) as usize]
}

/// Expands a 6-bit value to 8 bits.
#[inline]
pub fn expand6(value: u8) -> u8 {
    EXPAND_6_TO_8[(value & 0x3F) as usize]
}

/// Reduces an 8-bit value to 3 bits.
#[inline]
pub fn reduce3(value: u8) -> u8 {
    REDUCE_8_TO_3[value as usize]
}

/// Reduces an 8-bit value to 4 bits.
#[inline]
pub fn reduce4(value: u8) -> u8 {
    REDUCE_8_TO_4[value as usize]
}

/// Reduces an 8-bit value to 5 bits.
#[inline]
pub fn reduce5(value: u8) -> u8 {
    REDUCE_8_TO_5[value as usize]
}

/// Reduces an 8-bit value to 6 bits.
#[inline]
pub fn reduce6(value: u8) -> u8 {
    REDUCE_8_TO_6[value as usize]
}
