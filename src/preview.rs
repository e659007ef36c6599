//! Indexed-PNG export of framebuffers
//!
//! Host-side inspection of quantization output without panel hardware: the
//! PNG palette is the panel palette, so the preview shows exactly the colors
//! the glass would.

use std::io::Cursor;

use png::{BitDepth, ColorType, Encoder};

use crate::error::PreviewError;
use crate::framebuffer::Framebuffer;

/// Encode a framebuffer as an indexed PNG using its palette for the PLTE
/// chunk.
pub fn encode(fb: &Framebuffer) -> Result<Vec<u8>, PreviewError> {
    let palette = fb.format().palette();
    let mut plte = Vec::with_capacity(palette.len() * 3);
    for entry in palette.entries() {
        plte.extend_from_slice(&[entry.rgb.r, entry.rgb.g, entry.rgb.b]);
    }

    // unpack to one index byte per pixel
    let mut indexed = Vec::with_capacity((fb.width() * fb.height()) as usize);
    for y in 0..fb.height() {
        for x in 0..fb.width() {
            indexed.push(fb.index_at(x, y));
        }
    }

    let mut output = Vec::new();
    {
        let mut encoder = Encoder::new(Cursor::new(&mut output), fb.width(), fb.height());
        encoder.set_color(ColorType::Indexed);
        encoder.set_depth(BitDepth::Eight);
        encoder.set_palette(plte);

        let mut writer = encoder.write_header()?;
        writer.write_image_data(&indexed)?;
    }

    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::PixelFormat;

    #[test]
    fn encodes_a_valid_png_stream() {
        let mut fb = Framebuffer::new(PixelFormat::Color4, 12, 8);
        fb.set_named(3, 2, "red").unwrap();
        let data = encode(&fb).unwrap();
        assert_eq!(&data[..8], b"\x89PNG\r\n\x1a\n");

        let decoder = png::Decoder::new(Cursor::new(&data));
        let reader = decoder.read_info().unwrap();
        let info = reader.info();
        assert_eq!((info.width, info.height), (12, 8));
        assert_eq!(info.color_type, ColorType::Indexed);
        // PLTE carries the 4-entry panel palette
        assert_eq!(info.palette.as_deref().map(<[u8]>::len), Some(12));
    }
}
