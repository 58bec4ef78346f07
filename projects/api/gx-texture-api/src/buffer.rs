//! Ownership-tagged pixel storage.
//!
//! A [`PixelBuffer`] either owns its bytes or borrows a range of a read-only
//! [`SharedContainer`] (for example a whole archive that several textures point into). Borrowed
//! bytes are never written: [`PixelBuffer::make_mutable`] copies them into owned storage first.

use alloc::sync::Arc;
use alloc::vec::Vec;
use core::ops::Range;
use gx_texture_common::{GeometryIssue, TextureError, TextureResult};

/// A read-only backing store that textures can borrow their pixels from.
#[derive(Debug, Clone)]
pub struct SharedContainer {
    bytes: Arc<[u8]>,
}

impl SharedContainer {
    /// Wraps the given bytes.
    pub fn new(bytes: impl Into<Arc<[u8]>>) -> Self {
        Self {
            bytes: bytes.into(),
        }
    }

    /// The full contents of the container.
    #[inline]
    pub fn as_slice(&self) -> &[u8] {
        &self.bytes
    }

    /// Borrows `range` of the container as a read-only pixel buffer.
    ///
    /// # Errors
    ///
    /// Returns [`TextureError::GeometryError`] if the range ends past the container.
    pub fn borrow(&self, range: Range<usize>) -> TextureResult<PixelBuffer> {
        if range.start > range.end || range.end > self.bytes.len() {
            return Err(TextureError::geometry(
                0,
                0,
                GeometryIssue::BufferTooSmall {
                    required: range.end,
                    actual: self.bytes.len(),
                },
            ));
        }
        Ok(PixelBuffer::Shared {
            container: self.clone(),
            range,
        })
    }

    /// Whether `buffer` currently borrows from this container.
    pub fn is_borrowed(&self, buffer: &PixelBuffer) -> bool {
        match buffer {
            PixelBuffer::Shared { container, .. } => Arc::ptr_eq(&container.bytes, &self.bytes),
            PixelBuffer::Owned(_) => false,
        }
    }
}

/// Pixel bytes that are either exclusively owned or borrowed from a [`SharedContainer`].
#[derive(Debug, Clone)]
pub enum PixelBuffer {
    /// Exclusively owned bytes.
    Owned(Vec<u8>),
    /// A read-only view into a shared container.
    Shared {
        /// The backing store.
        container: SharedContainer,
        /// Byte range inside the container.
        range: Range<usize>,
    },
}

impl PixelBuffer {
    /// The bytes of the buffer.
    #[inline]
    pub fn as_slice(&self) -> &[u8] {
        match self {
            PixelBuffer::Owned(bytes) => bytes,
            PixelBuffer::Shared { container, range } => &container.bytes[range.clone()],
        }
    }

    /// Number of bytes.
    #[inline]
    pub fn len(&self) -> usize {
        self.as_slice().len()
    }

    /// Whether the buffer has no bytes.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.as_slice().is_empty()
    }

    /// Whether the bytes belong to a shared container.
    #[inline]
    pub fn is_borrowed(&self) -> bool {
        matches!(self, PixelBuffer::Shared { .. })
    }

    /// Copies borrowed bytes into owned storage if needed and returns them for writing.
    ///
    /// The shared container itself is never written.
    pub fn make_mutable(&mut self) -> &mut [u8] {
        if let PixelBuffer::Shared { container, range } = self {
            *self = PixelBuffer::Owned(container.bytes[range.clone()].to_vec());
        }
        match self {
            PixelBuffer::Owned(bytes) => bytes,
            // Copied above.
            PixelBuffer::Shared { .. } => &mut [],
        }
    }

    /// Consumes the buffer, returning owned bytes.
    pub fn into_vec(self) -> Vec<u8> {
        match self {
            PixelBuffer::Owned(bytes) => bytes,
            PixelBuffer::Shared { container, range } => container.bytes[range].to_vec(),
        }
    }
}

impl From<Vec<u8>> for PixelBuffer {
    fn from(bytes: Vec<u8>) -> Self {
        PixelBuffer::Owned(bytes)
    }
}

impl PartialEq for PixelBuffer {
    fn eq(&self, other: &Self) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl Eq for PixelBuffer {}

#[cfg(test)]
mod tests {
    use crate::test_prelude::*;

    #[test]
    fn make_mutable_copies_before_writing() {
        let container = SharedContainer::new(vec![1u8, 2, 3, 4, 5]);
        let mut buffer = container.borrow(1..4).unwrap();
        assert!(buffer.is_borrowed());
        assert!(container.is_borrowed(&buffer));
        assert_eq!(buffer.as_slice(), &[2, 3, 4]);

        buffer.make_mutable()[0] = 99;
        assert!(!buffer.is_borrowed());
        assert!(!container.is_borrowed(&buffer));
        assert_eq!(buffer.as_slice(), &[99, 3, 4]);
        assert_eq!(container.as_slice(), &[1, 2, 3, 4, 5]);
    }

    #[test]
    fn other_containers_do_not_claim_buffers() {
        let a = SharedContainer::new(vec![0u8; 4]);
        let b = SharedContainer::new(vec![0u8; 4]);
        let buffer = a.borrow(0..4).unwrap();
        assert!(!b.is_borrowed(&buffer));
    }

    #[test]
    fn borrow_rejects_out_of_range() {
        let container = SharedContainer::new(vec![0u8; 4]);
        assert!(container.borrow(2..5).is_err());
    }
}
