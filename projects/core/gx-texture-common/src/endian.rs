//! Byte-order capability.
//!
//! An image picks its [`Endian`] once; every codec routine that reads or writes multi-byte
//! words receives it explicitly. Console data is big-endian, which is the default.

use derive_enum_all_values::AllValues;

/// Byte order of the 16/32-bit words inside a pixel or palette buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, AllValues)]
pub enum Endian {
    /// Most significant byte first (console native).
    #[default]
    Big,
    /// Least significant byte first.
    Little,
}

impl Endian {
    /// Reads a `u16` from the first two bytes of `bytes`.
    #[inline]
    pub fn read_u16(self, bytes: &[u8]) -> u16 {
        let raw = [bytes[0], bytes[1]];
        match self {
            Endian::Big => u16::from_be_bytes(raw),
            Endian::Little => u16::from_le_bytes(raw),
        }
    }

    /// Writes `value` into the first two bytes of `bytes`.
    #[inline]
    pub fn write_u16(self, bytes: &mut [u8], value: u16) {
        bytes[..2].copy_from_slice(&self.u16_bytes(value));
    }

    /// Returns the byte representation of `value`.
    #[inline]
    pub fn u16_bytes(self, value: u16) -> [u8; 2] {
        match self {
            Endian::Big => value.to_be_bytes(),
            Endian::Little => value.to_le_bytes(),
        }
    }

    /// Reads a `u32` from the first four bytes of `bytes`.
    #[inline]
    pub fn read_u32(self, bytes: &[u8]) -> u32 {
        let raw = [bytes[0], bytes[1], bytes[2], bytes[3]];
        match self {
            Endian::Big => u32::from_be_bytes(raw),
            Endian::Little => u32::from_le_bytes(raw),
        }
    }

    /// Writes `value` into the first four bytes of `bytes`.
    #[inline]
    pub fn write_u32(self, bytes: &mut [u8], value: u32) {
        let raw = match self {
            Endian::Big => value.to_be_bytes(),
            Endian::Little => value.to_le_bytes(),
        };
        bytes[..4].copy_from_slice(&raw);
    }
}
