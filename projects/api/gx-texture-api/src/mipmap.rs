//! Mipmap chains.
//!
//! The chain hangs off the head [`Image`]; each link is another image of the same format. New
//! levels are produced by a caller supplied [`Resizer`].

use crate::convert::ConvertRequest;
use crate::image::Image;
use crate::settings::ConvertSettings;
use alloc::boxed::Box;
use alloc::vec::Vec;
use gx_texture_codec::{recode, CanonicalImage, QuantizeSettings};
use gx_texture_common::color_8888::Color8888;
use gx_texture_common::format::CanonicalForm;
use gx_texture_common::TextureResult;
use tracing::trace;

/// Produces the next smaller mipmap level.
pub trait Resizer {
    /// Returns `image` at half its width and height, each rounded down but at least 1.
    ///
    /// The result may be in any canonical form; it is converted to the chain's format afterwards.
    fn half_size(&self, image: &CanonicalImage) -> TextureResult<CanonicalImage>;
}

/// Averages each 2x2 square of pixels, alpha included.
#[derive(Debug, Clone, Copy, Default)]
pub struct BoxFilter;

impl Resizer for BoxFilter {
    fn half_size(&self, image: &CanonicalImage) -> TextureResult<CanonicalImage> {
        let rgb = recode(image, CanonicalForm::Rgb, &QuantizeSettings::default())?;
        let (width, height) = (rgb.width() as usize, rgb.height() as usize);
        let (out_width, out_height) = ((width / 2).max(1), (height / 2).max(1));

        let mut out = CanonicalImage::new(CanonicalForm::Rgb, out_width as u32, out_height as u32);
        for y in 0..out_height {
            for x in 0..out_width {
                let mut sums = [0u32; 4];
                let mut count = 0u32;
                for (sx, sy) in [(0, 0), (1, 0), (0, 1), (1, 1)] {
                    let (sx, sy) = (x * 2 + sx, y * 2 + sy);
                    if sx < width && sy < height {
                        for (sum, value) in sums.iter_mut().zip(rgb.rgba_at(sx, sy).to_bytes()) {
                            *sum += value as u32;
                        }
                        count += 1;
                    }
                }
                let mean = |sum: u32| ((sum + count / 2) / count) as u8;
                out.set_rgba(
                    x,
                    y,
                    Color8888::new(mean(sums[0]), mean(sums[1]), mean(sums[2]), mean(sums[3])),
                );
            }
        }
        Ok(out)
    }
}

/// Iterator over the links of a mipmap chain, largest first. The head is not included.
#[derive(Debug, Clone)]
pub struct Mipmaps<'a> {
    next: Option<&'a Image>,
}

impl<'a> Iterator for Mipmaps<'a> {
    type Item = &'a Image;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = current.mipmap.as_deref();
        Some(current)
    }
}

impl Image {
    /// Iterates the mipmap links below this image.
    pub fn mipmaps(&self) -> Mipmaps<'_> {
        Mipmaps {
            next: self.mipmap.as_deref(),
        }
    }

    /// Number of mipmap links below this image.
    pub fn mipmap_count(&self) -> usize {
        self.mipmaps().count()
    }

    /// Removes every mipmap link.
    pub fn clear_mipmaps(&mut self) {
        // Unlinked one at a time so long chains do not recurse on drop.
        drop(self.take_chain());
    }

    /// Sets the chain to `levels` links.
    ///
    /// A longer chain is truncated. A shorter one is extended by halving the last level with
    /// `resizer` and converting the result to this image's format, stopping early once a level
    /// reaches 1x1.
    ///
    /// # Errors
    ///
    /// Errors from `resizer` or from converting a new level. Levels built before the error stay
    /// attached.
    pub fn set_mipmaps(&mut self, levels: usize, resizer: &dyn Resizer) -> TextureResult<()> {
        let mut links = self.take_chain();
        links.truncate(levels);
        let result = self.extend_chain(&mut links, levels, resizer);
        self.attach_chain(links);
        result
    }

    fn extend_chain(
        &self,
        links: &mut Vec<Image>,
        levels: usize,
        resizer: &dyn Resizer,
    ) -> TextureResult<()> {
        let request = ConvertRequest::exact(self.format()).with_palette_format(self.palette_format());
        let settings = ConvertSettings::default();
        while links.len() < levels {
            let last = links.last().unwrap_or(self);
            if last.width() == 1 && last.height() == 1 {
                break;
            }
            let smaller = resizer.half_size(&last.to_canonical()?)?;
            trace!(
                level = links.len() + 1,
                width = smaller.width(),
                height = smaller.height(),
                "building mipmap"
            );
            let link = Image::from_canonical(smaller)
                .with_endian(self.endian())
                .converted(request, &settings)?;
            links.push(link);
        }
        Ok(())
    }

    /// Detaches the chain, largest link first.
    pub(crate) fn take_chain(&mut self) -> Vec<Image> {
        let mut links = Vec::new();
        let mut next = self.mipmap.take();
        while let Some(mut link) = next {
            next = link.mipmap.take();
            links.push(*link);
        }
        links
    }

    /// Attaches `links` as the chain, largest first, replacing any existing chain.
    pub(crate) fn attach_chain(&mut self, links: Vec<Image>) {
        let mut chain = None;
        for mut link in links.into_iter().rev() {
            link.mipmap = chain;
            chain = Some(Box::new(link));
        }
        self.mipmap = chain;
    }
}
