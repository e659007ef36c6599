//! Ordered (Bayer matrix) spatial dithering

use image::RgbaImage;

use crate::color::Rgb;
use crate::error::DitherError;
use crate::format::PixelFormat;
use crate::framebuffer::Framebuffer;

use super::Dither;

/// Normalized 4x4 Bayer threshold matrix, row-major, values (0..16)/16.
#[rustfmt::skip]
const BAYER4: [[f32; 4]; 4] = [
    [ 0.0 / 16.0,  8.0 / 16.0,  2.0 / 16.0, 10.0 / 16.0],
    [12.0 / 16.0,  4.0 / 16.0, 14.0 / 16.0,  6.0 / 16.0],
    [ 3.0 / 16.0, 11.0 / 16.0,  1.0 / 16.0,  9.0 / 16.0],
    [15.0 / 16.0,  7.0 / 16.0, 13.0 / 16.0,  5.0 / 16.0],
];

/// Bayer-matrix halftoning.
///
/// Each pixel's channels are offset by the matrix cell for its position
/// before nearest-color matching, producing a fixed 4x4 halftone pattern.
/// The offset scales down as the palette grows, which keeps pure extremes
/// (solid black, solid white) intact.
pub struct Ordered {
    format: PixelFormat,
}

impl Ordered {
    pub fn new(format: PixelFormat) -> Self {
        Self { format }
    }
}

impl Dither for Ordered {
    fn format(&self) -> PixelFormat {
        self.format
    }

    fn apply(&self, source: &RgbaImage, target: &mut Framebuffer) -> Result<(), DitherError> {
        let palette = self.palette();
        let scale = 256.0 / palette.len() as f32;
        for (x, y, pixel) in source.enumerate_pixels() {
            let offset = (BAYER4[(y % 4) as usize][(x % 4) as usize] - 0.5) * scale;
            let rgb = Rgb::new(
                adjust(pixel[0], offset),
                adjust(pixel[1], offset),
                adjust(pixel[2], offset),
            );
            target.set_index(x, y, palette.nearest_index(rgb));
        }
        Ok(())
    }
}

#[inline]
fn adjust(channel: u8, offset: f32) -> u8 {
    (channel as f32 + offset).round().clamp(0.0, 255.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uniform(width: u32, height: u32, rgb: [u8; 3]) -> RgbaImage {
        RgbaImage::from_pixel(width, height, image::Rgba([rgb[0], rgb[1], rgb[2], 255]))
    }

    #[test]
    fn output_is_deterministic() {
        let source = uniform(16, 16, [120, 90, 60]);
        let strategy = Ordered::new(PixelFormat::Gray4);
        let mut first = Framebuffer::new(PixelFormat::Gray4, 16, 16);
        let mut second = Framebuffer::new(PixelFormat::Gray4, 16, 16);
        strategy.apply(&source, &mut first).unwrap();
        strategy.apply(&source, &mut second).unwrap();
        assert_eq!(first.as_bytes(), second.as_bytes());
    }

    #[test]
    fn uniform_input_repeats_with_period_four() {
        let source = uniform(16, 16, [128, 128, 128]);
        let strategy = Ordered::new(PixelFormat::Mono);
        let mut fb = Framebuffer::new(PixelFormat::Mono, 16, 16);
        strategy.apply(&source, &mut fb).unwrap();

        for y in 0..16 {
            for x in 0..16 {
                assert_eq!(fb.index_at(x, y), fb.index_at(x % 4, y % 4));
            }
        }
        // mid-gray actually halftones rather than collapsing to one level
        let tile: Vec<u8> = (0..4)
            .flat_map(|y| (0..4).map(move |x| (x, y)))
            .map(|(x, y)| fb.index_at(x, y))
            .collect();
        assert!(tile.iter().any(|&i| i == 0));
        assert!(tile.iter().any(|&i| i == 1));
    }

    #[test]
    fn pure_palette_colors_survive_the_offset() {
        for format in [
            PixelFormat::Mono,
            PixelFormat::Gray4,
            PixelFormat::Color4,
            PixelFormat::Color7,
        ] {
            let strategy = Ordered::new(format);
            let palette = format.palette();
            for entry in palette.entries() {
                let source = uniform(8, 8, [entry.rgb.r, entry.rgb.g, entry.rgb.b]);
                let mut fb = Framebuffer::new(format, 8, 8);
                strategy.apply(&source, &mut fb).unwrap();
                let expected = palette.index_of(entry.name).unwrap();
                for y in 0..8 {
                    for x in 0..8 {
                        assert_eq!(
                            fb.index_at(x, y),
                            expected,
                            "{format:?}/{} at {x},{y}",
                            entry.name
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn offset_rounds_and_clamps_per_channel() {
        assert_eq!(adjust(250, 60.0), 255);
        assert_eq!(adjust(5, -60.0), 0);
        assert_eq!(adjust(100, 0.4), 100);
        assert_eq!(adjust(100, 0.6), 101);
    }
}
