//! Render orchestration: one strategy, one or two output planes

use image::RgbaImage;

use crate::dither::{self, Dither};
use crate::error::DitherError;
use crate::format::PixelFormat;
use crate::framebuffer::Framebuffer;

/// Runs a dithering strategy against a source image and, for dual-plane
/// hardware, splits the result into the two physical planes.
pub struct Renderer {
    strategy: Box<dyn Dither>,
}

impl Renderer {
    pub fn new(strategy: Box<dyn Dither>) -> Self {
        Self { strategy }
    }

    /// Construct with a registered strategy name.
    pub fn by_name(name: &str, format: PixelFormat) -> Result<Self, DitherError> {
        Ok(Self::new(dither::by_name(name, format)?))
    }

    pub fn format(&self) -> PixelFormat {
        self.strategy.format()
    }

    /// Quantize `source` into a fresh framebuffer matching its dimensions.
    pub fn render(&self, source: &RgbaImage) -> Result<Framebuffer, DitherError> {
        let mut fb = Framebuffer::new(self.format(), source.width(), source.height());
        self.strategy.apply(source, &mut fb)?;
        Ok(fb)
    }

    /// Quantize `source` into the two mono planes of a dual-plane panel.
    ///
    /// Chromatic formats split by plane membership: red and yellow pixels
    /// land on the chromatic plane, black (and everything else dark) on the
    /// black plane, white stays background on both. A mono strategy instead
    /// mirrors the single quantization onto both planes, as dual-RAM
    /// controllers expect identical frames in both banks.
    pub fn render_planes(
        &self,
        source: &RgbaImage,
    ) -> Result<(Framebuffer, Framebuffer), DitherError> {
        let quantized = self.render(source)?;
        if self.format() == PixelFormat::Mono {
            let mirror = quantized.clone();
            return Ok((quantized, mirror));
        }
        Ok(split_planes(&quantized))
    }
}

/// Map a quantized chromatic framebuffer onto black and chromatic mono
/// planes.
fn split_planes(quantized: &Framebuffer) -> (Framebuffer, Framebuffer) {
    let palette = quantized.format().palette();
    let ink = PixelFormat::Mono
        .palette()
        .index_of("black")
        .unwrap_or(0);
    let (width, height) = (quantized.width(), quantized.height());
    let mut black = Framebuffer::new(PixelFormat::Mono, width, height);
    let mut chroma = Framebuffer::new(PixelFormat::Mono, width, height);

    for y in 0..height {
        for x in 0..width {
            let name = palette
                .entry_at(quantized.index_at(x, y))
                .map(|entry| entry.name);
            match name {
                Some("red") | Some("yellow") => chroma.set_index(x, y, ink),
                Some("white") | None => {}
                Some(_) => black.set_index(x, y, ink),
            }
        }
    }

    (black, chroma)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dither::Threshold;

    fn renderer(format: PixelFormat) -> Renderer {
        Renderer::new(Box::new(Threshold::new(format)))
    }

    fn image_of_columns(colors: &[[u8; 3]], height: u32) -> RgbaImage {
        RgbaImage::from_fn(colors.len() as u32, height, |x, _| {
            let c = colors[x as usize];
            image::Rgba([c[0], c[1], c[2], 255])
        })
    }

    #[test]
    fn render_matches_source_dimensions() {
        let source = RgbaImage::new(10, 7);
        let fb = renderer(PixelFormat::Mono).render(&source).unwrap();
        assert_eq!((fb.width(), fb.height()), (10, 7));
        assert_eq!(fb.format(), PixelFormat::Mono);
    }

    #[test]
    fn chromatic_split_routes_red_and_yellow_to_the_chroma_plane() {
        let source = image_of_columns(
            &[[0, 0, 0], [255, 255, 255], [255, 255, 0], [255, 0, 0]],
            2,
        );
        let (black, chroma) = renderer(PixelFormat::Color4)
            .render_planes(&source)
            .unwrap();

        // black pixel: black plane only
        assert_eq!(black.index_at(0, 0), 0);
        assert_eq!(chroma.index_at(0, 0), 1);
        // white pixel: background on both
        assert_eq!(black.index_at(1, 0), 1);
        assert_eq!(chroma.index_at(1, 0), 1);
        // yellow and red: chroma plane only
        for x in 2..4 {
            assert_eq!(black.index_at(x, 0), 1, "column {x}");
            assert_eq!(chroma.index_at(x, 0), 0, "column {x}");
        }
    }

    #[test]
    fn mono_planes_are_mirrored() {
        let source = image_of_columns(&[[0, 0, 0], [255, 255, 255]], 4);
        let (first, second) = renderer(PixelFormat::Mono).render_planes(&source).unwrap();
        assert_eq!(first.as_bytes(), second.as_bytes());
        assert_eq!(first.index_at(0, 0), 0);
        assert_eq!(first.index_at(1, 0), 1);
    }

    #[test]
    fn planes_are_always_mono() {
        let source = RgbaImage::new(4, 4);
        let (black, chroma) = renderer(PixelFormat::Color4)
            .render_planes(&source)
            .unwrap();
        assert_eq!(black.format(), PixelFormat::Mono);
        assert_eq!(chroma.format(), PixelFormat::Mono);
    }
}
