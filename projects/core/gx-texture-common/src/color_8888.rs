/// Represents a single RGBA8888 pixel color
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Color8888 {
    /// Red component (0-255)
    pub r: u8,
    /// Green component (0-255)
    pub g: u8,
    /// Blue component (0-255)
    pub b: u8,
    /// Alpha component (0-255)
    pub a: u8,
}

impl Color8888 {
    /// Fully transparent black.
    pub const TRANSPARENT: Self = Self::new(0, 0, 0, 0);

    /// Constructs a new [`Color8888`] from the specified red, green, blue, and alpha components.
    ///
    /// # Examples
    ///
    /// ```
    /// use gx_texture_common::color_8888::Color8888;
    ///
    /// let pixel = Color8888::new(255, 0, 0, 255);
    /// assert_eq!(pixel.r, 255);
    /// assert_eq!(pixel.a, 255);
    /// ```
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Reads a pixel from the first 4 bytes of `bytes`, in `R, G, B, A` order.
    #[inline]
    pub fn from_slice(bytes: &[u8]) -> Self {
        Self::new(bytes[0], bytes[1], bytes[2], bytes[3])
    }

    /// Returns the pixel as `[R, G, B, A]` bytes.
    #[inline]
    pub fn to_bytes(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// Returns the colour with alpha forced to 255.
    #[inline]
    pub fn without_alpha(self) -> Self {
        Self::new(self.r, self.g, self.b, 255)
    }

    /// Whether the high bit of alpha is set; this is the CMPR opaque/transparent split.
    #[inline]
    pub fn is_opaque(&self) -> bool {
        self.a & 0x80 != 0
    }

    /// Whether red, green and blue are equal.
    #[inline]
    pub fn is_gray(&self) -> bool {
        self.r == self.g && self.g == self.b
    }

    /// Gray level of this colour: the rounded mean of red, green and blue.
    #[inline]
    pub fn gray(&self) -> u8 {
        ((self.r as u16 + self.g as u16 + self.b as u16 + 1) / 3) as u8
    }

    /// Sum of absolute per-channel differences over red, green and blue.
    #[inline]
    pub fn distance_rgb(&self, other: &Self) -> u32 {
        self.r.abs_diff(other.r) as u32
            + self.g.abs_diff(other.g) as u32
            + self.b.abs_diff(other.b) as u32
    }
}
