//! Settings for the CMPR compressor.

use gx_texture_common::color_565::Color565;

/// Settings which control how images are compressed to CMPR.
///
/// ```
/// use gx_texture_cmpr::CmprSettings;
/// use gx_texture_common::color_565::Color565;
///
/// // Fill fully transparent blocks with magenta instead of the image's mean colour.
/// let settings = CmprSettings {
///     default_color: Some(Color565::from_rgb(255, 0, 255)),
/// };
/// assert_ne!(settings, CmprSettings::default());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CmprSettings {
    /// Colour written into the header of sub-blocks that have no opaque pixel.
    ///
    /// The two endpoints of such a block are this colour with the green LSB cleared and set,
    /// so the block decodes in 3-colour mode and every index can point at the transparent slot.
    ///
    /// `None` precomputes the colour as the mean of every opaque pixel in the image (black if
    /// the image has none).
    pub default_color: Option<Color565>,
}
