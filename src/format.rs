//! Hardware pixel formats
//!
//! The closed set of color models panels ship with. Each format binds exactly
//! one palette (a process-wide singleton) and a packing width wide enough to
//! index it.

use std::sync::OnceLock;

use serde::Serialize;

use crate::palette::Palette;

/// Hardware color model of a panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PixelFormat {
    /// Black/white.
    Mono,
    /// Four gray levels.
    Gray4,
    /// Black/white plus yellow and red (tri-color class panels).
    Color4,
    /// Seven-color ACeP panels.
    Color7,
}

impl PixelFormat {
    /// Bits used to encode one pixel in a packed framebuffer.
    pub const fn bits_per_pixel(self) -> u32 {
        match self {
            PixelFormat::Mono => 1,
            PixelFormat::Gray4 => 2,
            PixelFormat::Color4 => 2,
            // 7 colors fit in 3 bits, but controllers address 4-bit nibbles
            PixelFormat::Color7 => 4,
        }
    }

    /// The fixed hardware palette bound to this format.
    ///
    /// Entry order is the hardware index order.
    pub fn palette(self) -> &'static Palette {
        match self {
            PixelFormat::Mono => {
                static MONO: OnceLock<Palette> = OnceLock::new();
                MONO.get_or_init(|| builtin(&["black", "white"]))
            }
            PixelFormat::Gray4 => {
                static GRAY4: OnceLock<Palette> = OnceLock::new();
                GRAY4.get_or_init(|| builtin(&["black", "dark_gray", "light_gray", "white"]))
            }
            PixelFormat::Color4 => {
                static COLOR4: OnceLock<Palette> = OnceLock::new();
                COLOR4.get_or_init(|| builtin(&["black", "white", "yellow", "red"]))
            }
            PixelFormat::Color7 => {
                static COLOR7: OnceLock<Palette> = OnceLock::new();
                COLOR7.get_or_init(|| {
                    builtin(&["black", "white", "green", "blue", "red", "yellow", "orange"])
                })
            }
        }
    }
}

fn builtin(names: &[&str]) -> Palette {
    Palette::from_names(names).expect("built-in palette names are recognized")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_orders_fix_hardware_indices() {
        assert_eq!(PixelFormat::Mono.palette().index_of("black"), Some(0));
        assert_eq!(PixelFormat::Mono.palette().index_of("white"), Some(1));
        assert_eq!(PixelFormat::Color4.palette().index_of("yellow"), Some(2));
        assert_eq!(PixelFormat::Color4.palette().index_of("red"), Some(3));
        assert_eq!(PixelFormat::Color7.palette().index_of("orange"), Some(6));
    }

    #[test]
    fn bit_widths_cover_their_palettes() {
        for format in [
            PixelFormat::Mono,
            PixelFormat::Gray4,
            PixelFormat::Color4,
            PixelFormat::Color7,
        ] {
            let slots = 1usize << format.bits_per_pixel();
            assert!(format.palette().len() <= slots);
        }
    }

    #[test]
    fn palettes_are_singletons() {
        assert!(std::ptr::eq(
            PixelFormat::Gray4.palette(),
            PixelFormat::Gray4.palette()
        ));
    }
}
