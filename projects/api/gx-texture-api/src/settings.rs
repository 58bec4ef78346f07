//! Conversion settings and their builder.

use gx_texture_cmpr::CmprSettings;
use gx_texture_common::color_565::Color565;

/// Default ceiling on nested conversion stages.
pub const MAX_CONVERSION_DEPTH: usize = 10;

/// Settings for [`convert`](crate::convert::convert).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConvertSettings {
    /// Settings for CMPR targets.
    pub cmpr: CmprSettings,
    /// Upper bound on palette entries when quantizing, on top of the target format's capacity.
    pub max_palette_colors: Option<usize>,
    /// Deepest pipeline stage allowed before failing with
    /// [`ConversionDepthExceeded`](gx_texture_common::TextureError::ConversionDepthExceeded).
    pub max_depth: usize,
}

impl Default for ConvertSettings {
    fn default() -> Self {
        Self {
            cmpr: CmprSettings::default(),
            max_palette_colors: None,
            max_depth: MAX_CONVERSION_DEPTH,
        }
    }
}

impl ConvertSettings {
    /// Palette size to quantize to for a target with `capacity` entries.
    #[inline]
    pub(crate) fn palette_colors(&self, capacity: usize) -> usize {
        match self.max_palette_colors {
            Some(limit) => limit.min(capacity),
            None => capacity,
        }
    }
}

/// Builder for [`ConvertSettings`] with convenient configuration methods.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConvertSettingsBuilder {
    default_color: Option<Color565>,
    max_palette_colors: Option<usize>,
    max_depth: Option<usize>,
}

impl ConvertSettingsBuilder {
    /// Create a new settings builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the colour used for fully transparent CMPR sub-blocks.
    pub fn default_color(mut self, color: Color565) -> Self {
        self.default_color = Some(color);
        self
    }

    /// Limit the number of palette entries produced by quantization.
    pub fn max_palette_colors(mut self, colors: usize) -> Self {
        self.max_palette_colors = Some(colors);
        self
    }

    /// Set the conversion depth ceiling.
    pub fn max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }

    /// Build the settings using the configured values or defaults.
    pub fn build(self) -> ConvertSettings {
        let default = ConvertSettings::default();
        ConvertSettings {
            cmpr: CmprSettings {
                default_color: self.default_color.or(default.cmpr.default_color),
            },
            max_palette_colors: self.max_palette_colors.or(default.max_palette_colors),
            max_depth: self.max_depth.unwrap_or(default.max_depth),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::test_prelude::*;

    #[test]
    fn builder() {
        let settings = ConvertSettingsBuilder::new()
            .default_color(Color565::from_raw(0x1234))
            .max_palette_colors(8)
            .max_depth(3)
            .build();

        assert_eq!(settings.cmpr.default_color, Some(Color565::from_raw(0x1234)));
        assert_eq!(settings.max_palette_colors, Some(8));
        assert_eq!(settings.max_depth, 3);
    }

    #[test]
    fn builder_defaults() {
        assert_eq!(ConvertSettingsBuilder::new().build(), ConvertSettings::default());
        assert_eq!(ConvertSettings::default().max_depth, MAX_CONVERSION_DEPTH);
    }

    #[rstest]
    #[case(None, 256, 256)]
    #[case(Some(16), 256, 16)]
    #[case(Some(1000), 16, 16)]
    fn palette_colors_respect_capacity(
        #[case] limit: Option<usize>,
        #[case] capacity: usize,
        #[case] expected: usize,
    ) {
        let settings = ConvertSettings {
            max_palette_colors: limit,
            ..Default::default()
        };
        assert_eq!(settings.palette_colors(capacity), expected);
    }
}
