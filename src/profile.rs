//! Panel profiles: capabilities and compiled init sequences
//!
//! Init tables are vendor command sequences, encoded offline and checked in
//! as constants, one per refresh mode the panel supports. A missing table
//! means the panel does not support that mode.

use serde::Serialize;

use crate::display::Mode;
use crate::format::PixelFormat;

/// One step of a controller command sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitStep {
    /// Command opcode with payload.
    Cmd(u8, &'static [u8]),
    /// Mandatory settle delay, honored in full.
    DelayMs(u32),
    /// Poll the busy line until the controller is idle.
    WaitIdle,
}

/// Command encoding family of the display controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ControllerFamily {
    /// Window addressing through RAM X/Y range and counter registers
    /// (SSD16xx class).
    RegisterRange,
    /// Explicit partial-in / partial-out command bracket (UC81xx / GDEW
    /// class).
    PartialInOut,
}

/// Physical RAM plane layout of the panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaneLayout {
    /// One RAM plane.
    Single,
    /// Two RAM planes: chromatic black/red, or mirrored old/new frames on
    /// dual-RAM monochrome controllers.
    Dual,
}

/// Static description of one panel model.
#[derive(Debug, Clone)]
pub struct PanelProfile {
    pub name: &'static str,
    pub width: u32,
    pub height: u32,
    pub format: PixelFormat,
    pub family: ControllerFamily,
    pub planes: PlaneLayout,
    /// Whether the controller can address a sub-window. When `false`, region
    /// requests degrade to full-frame transmission; callers can detect the
    /// degradation through [`crate::Display::supports_partial_window`].
    pub partial_window: bool,
    pub init_full: &'static [InitStep],
    pub init_partial: Option<&'static [InitStep]>,
    pub init_fast: Option<&'static [InitStep]>,
    pub init_grayscale: Option<&'static [InitStep]>,
    pub sleep: &'static [InitStep],
}

impl PanelProfile {
    /// Init sequence for a refresh mode, if the panel supports it.
    pub fn init_for(&self, mode: Mode) -> Option<&'static [InitStep]> {
        match mode {
            Mode::Full => Some(self.init_full),
            Mode::Partial => self.init_partial,
            Mode::Fast => self.init_fast,
            Mode::Grayscale => self.init_grayscale,
        }
    }

    pub fn supports(&self, mode: Mode) -> bool {
        self.init_for(mode).is_some()
    }

    /// Packed byte length of one full frame at the panel's format.
    pub fn frame_len(&self) -> usize {
        (self.width as usize * self.format.bits_per_pixel() as usize).div_ceil(8)
            * self.height as usize
    }
}

/// 2.13" monochrome panel on an SSD1680, the common badge/shelf-label glass.
pub const MONO_2IN13: PanelProfile = PanelProfile {
    name: "2.13in mono (SSD1680)",
    width: 250,
    height: 122,
    format: PixelFormat::Mono,
    family: ControllerFamily::RegisterRange,
    planes: PlaneLayout::Single,
    partial_window: true,
    init_full: &[
        InitStep::Cmd(0x12, &[]), // software reset
        InitStep::WaitIdle,
        InitStep::Cmd(0x01, &[0x79, 0x00, 0x00]), // driver output control, 122 gates
        InitStep::Cmd(0x11, &[0x03]),             // data entry: x and y increment
        InitStep::Cmd(0x3C, &[0x05]),             // border waveform
        InitStep::Cmd(0x21, &[0x00, 0x80]),       // display update control
        InitStep::Cmd(0x18, &[0x80]),             // internal temperature sensor
        InitStep::WaitIdle,
    ],
    init_partial: Some(&[
        InitStep::Cmd(0x12, &[]),
        InitStep::WaitIdle,
        InitStep::Cmd(0x3C, &[0x80]), // border: VCOM, no flash
        InitStep::Cmd(0x18, &[0x80]),
        InitStep::Cmd(0x22, &[0xC0]), // enable clock and analog
        InitStep::Cmd(0x20, &[]),
        InitStep::WaitIdle,
    ]),
    init_fast: Some(&[
        InitStep::Cmd(0x12, &[]),
        InitStep::WaitIdle,
        InitStep::Cmd(0x18, &[0x80]),
        InitStep::Cmd(0x22, &[0xB1]), // load temperature value
        InitStep::Cmd(0x20, &[]),
        InitStep::WaitIdle,
        InitStep::Cmd(0x1A, &[0x64, 0x00]), // write temperature: forced 100
        InitStep::Cmd(0x22, &[0x91]),       // load LUT with the forced value
        InitStep::Cmd(0x20, &[]),
        InitStep::WaitIdle,
    ]),
    init_grayscale: None,
    sleep: &[
        InitStep::Cmd(0x10, &[0x01]), // deep sleep, RAM retained
        InitStep::DelayMs(100),
    ],
};

/// 2.9" monochrome panel on a UC8151 with dual frame RAM.
pub const MONO_2IN9_DUAL: PanelProfile = PanelProfile {
    name: "2.9in mono dual-RAM (UC8151)",
    width: 128,
    height: 296,
    format: PixelFormat::Mono,
    family: ControllerFamily::PartialInOut,
    planes: PlaneLayout::Dual,
    partial_window: true,
    init_full: &[
        InitStep::Cmd(0x01, &[0x03, 0x00, 0x2B, 0x2B]), // power setting
        InitStep::Cmd(0x06, &[0x17, 0x17, 0x17]),       // booster soft start
        InitStep::Cmd(0x04, &[]),                       // power on
        InitStep::WaitIdle,
        InitStep::Cmd(0x00, &[0x9F]),             // panel setting, OTP LUT
        InitStep::Cmd(0x61, &[0x80, 0x01, 0x28]), // resolution 128x296
        InitStep::Cmd(0x50, &[0x97]),             // VCOM and data interval
    ],
    init_partial: Some(&[
        InitStep::Cmd(0x01, &[0x03, 0x00, 0x2B, 0x2B]),
        InitStep::Cmd(0x06, &[0x17, 0x17, 0x17]),
        InitStep::Cmd(0x04, &[]),
        InitStep::WaitIdle,
        InitStep::Cmd(0x00, &[0xBF]), // panel setting, register LUT
        InitStep::Cmd(0x61, &[0x80, 0x01, 0x28]),
        InitStep::Cmd(0x50, &[0x17]), // keep border floating between updates
    ]),
    init_fast: None,
    init_grayscale: None,
    sleep: &[
        InitStep::Cmd(0x50, &[0xF7]),
        InitStep::Cmd(0x02, &[]), // power off
        InitStep::WaitIdle,
        InitStep::Cmd(0x07, &[0xA5]), // deep sleep check code
        InitStep::DelayMs(100),
    ],
};

/// 3.7" four-level grayscale panel on an SSD1677.
pub const GRAY4_3IN7: PanelProfile = PanelProfile {
    name: "3.7in gray4 (SSD1677)",
    width: 280,
    height: 480,
    format: PixelFormat::Gray4,
    family: ControllerFamily::RegisterRange,
    planes: PlaneLayout::Single,
    partial_window: true,
    init_full: &[
        InitStep::Cmd(0x12, &[]),
        InitStep::WaitIdle,
        InitStep::Cmd(0x46, &[0xF7]), // auto write red RAM
        InitStep::WaitIdle,
        InitStep::Cmd(0x47, &[0xF7]), // auto write bw RAM
        InitStep::WaitIdle,
        InitStep::Cmd(0x01, &[0xDF, 0x01, 0x00]), // driver output control, 480 gates
        InitStep::Cmd(0x03, &[0x00]),             // gate voltage
        InitStep::Cmd(0x04, &[0x41, 0xA8, 0x32]), // source voltage
        InitStep::Cmd(0x11, &[0x03]),
        InitStep::Cmd(0x3C, &[0x03]),
        InitStep::Cmd(0x2C, &[0x44]), // VCOM
        InitStep::Cmd(0x18, &[0x80]),
        InitStep::WaitIdle,
    ],
    init_partial: Some(&[
        InitStep::Cmd(0x12, &[]),
        InitStep::WaitIdle,
        InitStep::Cmd(0x3C, &[0x80]),
        InitStep::Cmd(0x18, &[0x80]),
        InitStep::WaitIdle,
    ]),
    init_fast: Some(&[
        InitStep::Cmd(0x12, &[]),
        InitStep::WaitIdle,
        InitStep::Cmd(0x18, &[0x80]),
        InitStep::Cmd(0x22, &[0xB1]),
        InitStep::Cmd(0x20, &[]),
        InitStep::WaitIdle,
    ]),
    init_grayscale: Some(&[
        InitStep::Cmd(0x12, &[]),
        InitStep::WaitIdle,
        InitStep::Cmd(0x01, &[0xDF, 0x01, 0x00]),
        InitStep::Cmd(0x11, &[0x03]),
        InitStep::Cmd(0x3C, &[0x03]),
        InitStep::Cmd(0x32, &GRAY4_LUT), // four-level waveform
        InitStep::Cmd(0x3F, &[0x22]),
        InitStep::Cmd(0x03, &[0x17]),
        InitStep::Cmd(0x04, &[0x41, 0xA8, 0x32]),
        InitStep::Cmd(0x2C, &[0x40]),
        InitStep::WaitIdle,
    ]),
    sleep: &[
        InitStep::Cmd(0x10, &[0x03]), // deep sleep, no RAM retention
        InitStep::DelayMs(100),
    ],
};

/// 4.2" black/white/red panel on a UC8176: two physical planes.
pub const TRICOLOR_4IN2: PanelProfile = PanelProfile {
    name: "4.2in tri-color (UC8176)",
    width: 400,
    height: 300,
    format: PixelFormat::Color4,
    family: ControllerFamily::PartialInOut,
    planes: PlaneLayout::Dual,
    partial_window: true,
    init_full: &[
        InitStep::Cmd(0x01, &[0x03, 0x00, 0x2B, 0x2B]),
        InitStep::Cmd(0x06, &[0x17, 0x17, 0x17]),
        InitStep::Cmd(0x04, &[]),
        InitStep::WaitIdle,
        InitStep::Cmd(0x00, &[0x0F]),             // panel setting: tri-color
        InitStep::Cmd(0x30, &[0x3C]),             // PLL 50Hz
        InitStep::Cmd(0x61, &[0x01, 0x90, 0x01, 0x2C]), // resolution 400x300
        InitStep::Cmd(0x82, &[0x12]),             // VCOM DC
        InitStep::Cmd(0x50, &[0x87]),
    ],
    init_partial: Some(&[
        InitStep::Cmd(0x01, &[0x03, 0x00, 0x2B, 0x2B]),
        InitStep::Cmd(0x06, &[0x17, 0x17, 0x17]),
        InitStep::Cmd(0x04, &[]),
        InitStep::WaitIdle,
        InitStep::Cmd(0x00, &[0x0F]),
        InitStep::Cmd(0x50, &[0x17]),
    ]),
    init_fast: None,
    init_grayscale: None,
    sleep: &[
        InitStep::Cmd(0x50, &[0xF7]),
        InitStep::Cmd(0x02, &[]),
        InitStep::WaitIdle,
        InitStep::Cmd(0x07, &[0xA5]),
        InitStep::DelayMs(100),
    ],
};

/// 5.65" seven-color ACeP panel. The controller cannot address a sub-window,
/// so region requests fall back to full-frame refreshes.
pub const ACEP_5IN65: PanelProfile = PanelProfile {
    name: "5.65in ACeP 7-color",
    width: 600,
    height: 448,
    format: PixelFormat::Color7,
    family: ControllerFamily::PartialInOut,
    planes: PlaneLayout::Single,
    partial_window: false,
    init_full: &[
        InitStep::Cmd(0x00, &[0xEF, 0x08]),             // panel setting
        InitStep::Cmd(0x01, &[0x37, 0x00, 0x23, 0x23]), // power setting
        InitStep::Cmd(0x03, &[0x00]),                   // power off sequence
        InitStep::Cmd(0x06, &[0xC7, 0xC7, 0x1D]),       // booster soft start
        InitStep::Cmd(0x30, &[0x3C]),                   // PLL 50Hz
        InitStep::Cmd(0x41, &[0x00]),                   // temperature sensor
        InitStep::Cmd(0x50, &[0x37]),
        InitStep::Cmd(0x60, &[0x22]),                   // TCON
        InitStep::Cmd(0x61, &[0x02, 0x58, 0x01, 0xC0]), // resolution 600x448
        InitStep::Cmd(0xE3, &[0xAA]),                   // power saving
        InitStep::DelayMs(100),
        InitStep::Cmd(0x50, &[0x37]),
    ],
    init_partial: None,
    init_fast: None,
    init_grayscale: None,
    sleep: &[
        InitStep::Cmd(0x02, &[]),
        InitStep::WaitIdle,
        InitStep::Cmd(0x07, &[0xA5]),
        InitStep::DelayMs(100),
    ],
};

/// Four-level grayscale waveform for the 3.7" panel (105 bytes plus voltage
/// frames, SSD1677 layout).
#[rustfmt::skip]
const GRAY4_LUT: [u8; 105] = [
    0x2A, 0x06, 0x15, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x28, 0x06, 0x14, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x20, 0x06, 0x10, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x14, 0x06, 0x28, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x02, 0x02, 0x0A, 0x00, 0x00, 0x00, 0x08, 0x08, 0x02,
    0x00, 0x02, 0x02, 0x0A, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x22, 0x22, 0x22, 0x22, 0x22,
];
