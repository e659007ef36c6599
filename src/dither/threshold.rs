//! Direct nearest-color quantization

use image::RgbaImage;

use crate::color::Rgb;
use crate::error::DitherError;
use crate::format::PixelFormat;
use crate::framebuffer::Framebuffer;

use super::Dither;

/// Per-pixel nearest-color matching with no spatial error propagation.
///
/// Every pixel is computed independently from the unmodified source
/// channels, so the output is deterministic and order-independent.
pub struct Threshold {
    format: PixelFormat,
}

impl Threshold {
    pub fn new(format: PixelFormat) -> Self {
        Self { format }
    }
}

impl Dither for Threshold {
    fn format(&self) -> PixelFormat {
        self.format
    }

    fn apply(&self, source: &RgbaImage, target: &mut Framebuffer) -> Result<(), DitherError> {
        let palette = self.palette();
        for (x, y, pixel) in source.enumerate_pixels() {
            let rgb = Rgb::new(pixel[0], pixel[1], pixel[2]);
            target.set_index(x, y, palette.nearest_index(rgb));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uniform(width: u32, height: u32, rgb: [u8; 3]) -> RgbaImage {
        RgbaImage::from_pixel(width, height, image::Rgba([rgb[0], rgb[1], rgb[2], 255]))
    }

    #[test]
    fn output_is_deterministic() {
        let mut source = RgbaImage::new(16, 16);
        for (x, y, pixel) in source.enumerate_pixels_mut() {
            *pixel = image::Rgba([(x * 16) as u8, (y * 16) as u8, ((x + y) * 8) as u8, 255]);
        }
        let strategy = Threshold::new(PixelFormat::Color4);

        let mut first = Framebuffer::new(PixelFormat::Color4, 16, 16);
        let mut second = Framebuffer::new(PixelFormat::Color4, 16, 16);
        strategy.apply(&source, &mut first).unwrap();
        strategy.apply(&source, &mut second).unwrap();
        assert_eq!(first.as_bytes(), second.as_bytes());
    }

    #[test]
    fn pure_palette_colors_map_to_themselves() {
        for format in [
            PixelFormat::Mono,
            PixelFormat::Gray4,
            PixelFormat::Color4,
            PixelFormat::Color7,
        ] {
            let strategy = Threshold::new(format);
            let palette = format.palette();
            for entry in palette.entries() {
                let source = uniform(4, 4, [entry.rgb.r, entry.rgb.g, entry.rgb.b]);
                let mut fb = Framebuffer::new(format, 4, 4);
                strategy.apply(&source, &mut fb).unwrap();
                let expected = palette.index_of(entry.name).unwrap();
                assert_eq!(fb.index_at(2, 2), expected, "{format:?}/{}", entry.name);
            }
        }
    }

    #[test]
    fn mid_gray_thresholds_without_pattern() {
        // no spatial variation: every output pixel is the same index
        let source = uniform(8, 8, [140, 140, 140]);
        let strategy = Threshold::new(PixelFormat::Mono);
        let mut fb = Framebuffer::new(PixelFormat::Mono, 8, 8);
        strategy.apply(&source, &mut fb).unwrap();
        let first = fb.index_at(0, 0);
        for y in 0..8 {
            for x in 0..8 {
                assert_eq!(fb.index_at(x, y), first);
            }
        }
    }
}
