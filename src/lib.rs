//! Pixel quantization and display-mode sequencing for e-paper panels
//!
//! Converts true-color raster images into hardware-native pixel encodings
//! and drives panel controllers through their refresh modes (full, partial,
//! fast, grayscale, dual-plane).
//!
//! The pipeline: a source [`image::RgbaImage`] goes through a dithering
//! strategy bound to the panel's [`PixelFormat`], producing one (or, for
//! dual-plane panels, two) packed [`Framebuffer`]s; the [`Display`] mode
//! controller validates them, runs whatever mode init the panel needs, and
//! streams the bytes over an opaque [`Transport`].
//!
//! ```
//! use epd_pipeline::{profile, transport::RecordingTransport, Display, Region};
//! use image::RgbaImage;
//!
//! let display = Display::new(RecordingTransport::new(), profile::MONO_2IN13);
//! let canvas = RgbaImage::new(250, 122);
//! display.show(&canvas)?;
//!
//! // refresh just a badge area; the window aligns to the 8-pixel grain
//! let frame = epd_pipeline::Framebuffer::new(display.profile().format, 250, 122);
//! display.display_region(&frame, Region::new(5, 10, 60, 40))?;
//! # Ok::<(), epd_pipeline::DisplayError>(())
//! ```

pub mod color;
pub mod display;
pub mod dither;
pub mod error;
pub mod format;
pub mod framebuffer;
pub mod palette;
pub mod preview;
pub mod profile;
pub mod render;
pub mod transport;

pub use color::Rgb;
pub use display::{Display, DisplayInfo, Mode, Region};
pub use error::{DisplayError, DitherError, PaletteError, PreviewError};
pub use format::PixelFormat;
pub use framebuffer::Framebuffer;
pub use palette::{Palette, PaletteEntry};
pub use profile::{ControllerFamily, InitStep, PanelProfile, PlaneLayout};
pub use render::Renderer;
pub use transport::Transport;
