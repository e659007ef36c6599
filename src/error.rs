//! Error types for the quantization and display layers

use thiserror::Error;

use crate::display::Mode;
use crate::format::PixelFormat;

/// Errors raised while building a palette.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum PaletteError {
    #[error("unknown color name: {0}")]
    UnknownColorName(String),
}

/// Errors raised by dithering strategies and the strategy registry.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum DitherError {
    /// The shared strategy contract was invoked without a concrete
    /// implementation. A programming error, not a runtime condition.
    #[error("dithering strategy does not implement `apply`")]
    NotImplemented,

    #[error("unknown dithering strategy: {0}")]
    UnknownStrategy(String),
}

/// Errors raised by the display mode controller.
///
/// Every validation variant is checked before any device access; transport
/// failures propagate unchanged and abort the in-progress operation without
/// rolling back sub-steps that already completed.
#[derive(Error, Debug)]
pub enum DisplayError {
    #[error("framebuffer format {actual:?} does not match required format {expected:?}")]
    FormatMismatch {
        expected: PixelFormat,
        actual: PixelFormat,
    },

    #[error("framebuffer is {actual_width}x{actual_height}, panel is {panel_width}x{panel_height}")]
    DimensionMismatch {
        panel_width: u32,
        panel_height: u32,
        actual_width: u32,
        actual_height: u32,
    },

    #[error("region {x},{y} {width}x{height} does not fit panel {panel_width}x{panel_height}")]
    RegionOutOfBounds {
        x: u32,
        y: u32,
        width: u32,
        height: u32,
        panel_width: u32,
        panel_height: u32,
    },

    #[error("panel does not support {0:?} mode")]
    ModeUnsupported(Mode),

    #[error("panel has a single RAM plane, dual-plane transfer is unsupported")]
    DualPlaneUnsupported,

    #[error("render failed: {0}")]
    Render(#[from] DitherError),

    #[error("transport failure: {0}")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Errors raised while encoding a framebuffer preview.
#[derive(Error, Debug)]
pub enum PreviewError {
    #[error("PNG encoding failed: {0}")]
    Encode(#[from] png::EncodingError),
}
