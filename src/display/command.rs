//! Controller-family command composition
//!
//! Both families express the same addressed-window semantics; only the
//! encodings differ. Register-range controllers take RAM X/Y ranges plus
//! address counters, with X in byte units. Partial-in/out controllers
//! bracket the window data between dedicated commands, with pixel-unit
//! window parameters.

use crate::display::Mode;
use crate::display::window::AlignedWindow;
use crate::profile::{ControllerFamily, InitStep};

/// RAM data opcodes for the primary (black) and secondary (chromatic or
/// mirror) planes.
pub(crate) fn plane_opcodes(family: ControllerFamily) -> (u8, u8) {
    match family {
        ControllerFamily::RegisterRange => (0x24, 0x26),
        ControllerFamily::PartialInOut => (0x10, 0x13),
    }
}

/// Data opcode used inside a partial window transmission.
pub(crate) fn window_data_opcode(family: ControllerFamily) -> u8 {
    match family {
        ControllerFamily::RegisterRange => 0x24,
        // new-frame RAM on UC-class parts
        ControllerFamily::PartialInOut => 0x13,
    }
}

/// Commands establishing the RAM address window, issued before pixel data.
pub(crate) fn window_preamble(
    family: ControllerFamily,
    win: AlignedWindow,
) -> Vec<(u8, Vec<u8>)> {
    match family {
        ControllerFamily::RegisterRange => {
            let x_start = (win.x / 8) as u8;
            let x_end = ((win.x + win.width).div_ceil(8) - 1) as u8;
            let y_end = win.y + win.height - 1;
            vec![
                (0x11, vec![0x03]), // data entry: x and y increment
                (0x44, vec![x_start, x_end]),
                (
                    0x45,
                    vec![
                        (win.y & 0xFF) as u8,
                        (win.y >> 8) as u8,
                        (y_end & 0xFF) as u8,
                        (y_end >> 8) as u8,
                    ],
                ),
                (0x4E, vec![x_start]),
                (0x4F, vec![(win.y & 0xFF) as u8, (win.y >> 8) as u8]),
            ]
        }
        ControllerFamily::PartialInOut => {
            let x_end = win.x + win.width - 1;
            let y_end = win.y + win.height - 1;
            vec![
                (0x91, vec![]), // partial in
                (
                    0x90, // partial window, pixel units
                    vec![
                        (win.x >> 8) as u8,
                        (win.x & 0xFF) as u8,
                        (x_end >> 8) as u8,
                        (x_end & 0xFF) as u8,
                        (win.y >> 8) as u8,
                        (win.y & 0xFF) as u8,
                        (y_end >> 8) as u8,
                        (y_end & 0xFF) as u8,
                        0x01, // scan both inside and outside the window
                    ],
                ),
            ]
        }
    }
}

/// Commands closing a partial window transmission.
pub(crate) fn window_postamble(family: ControllerFamily) -> Vec<(u8, Vec<u8>)> {
    match family {
        ControllerFamily::RegisterRange => Vec::new(),
        ControllerFamily::PartialInOut => vec![(0x92, Vec::new())], // partial out
    }
}

/// Full-frame address setup issued before frame data.
pub(crate) fn frame_preamble(
    family: ControllerFamily,
    width: u32,
    height: u32,
) -> Vec<(u8, Vec<u8>)> {
    match family {
        ControllerFamily::RegisterRange => window_preamble(
            family,
            AlignedWindow {
                x: 0,
                y: 0,
                width,
                height,
            },
        ),
        // DTM writes always start at the RAM origin
        ControllerFamily::PartialInOut => Vec::new(),
    }
}

/// Refresh activation for a mode. Delay directives are the panel's
/// electrochemical settle times and must run to completion.
pub(crate) fn refresh_sequence(family: ControllerFamily, mode: Mode) -> &'static [InitStep] {
    match family {
        ControllerFamily::RegisterRange => match mode {
            Mode::Full => &[
                InitStep::Cmd(0x22, &[0xF7]),
                InitStep::Cmd(0x20, &[]),
                InitStep::WaitIdle,
            ],
            Mode::Partial => &[
                InitStep::Cmd(0x22, &[0xFF]),
                InitStep::Cmd(0x20, &[]),
                InitStep::WaitIdle,
            ],
            Mode::Fast => &[
                InitStep::Cmd(0x22, &[0xC7]),
                InitStep::Cmd(0x20, &[]),
                InitStep::WaitIdle,
            ],
            Mode::Grayscale => &[
                InitStep::Cmd(0x22, &[0xCF]),
                InitStep::Cmd(0x20, &[]),
                InitStep::WaitIdle,
            ],
        },
        // UC-class parts share one activation flow across modes
        ControllerFamily::PartialInOut => &[
            InitStep::Cmd(0x04, &[]), // power on
            InitStep::WaitIdle,
            InitStep::Cmd(0x12, &[]), // display refresh
            InitStep::DelayMs(1),
            InitStep::WaitIdle,
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_range_window_uses_byte_units_for_x() {
        let win = AlignedWindow {
            x: 16,
            y: 5,
            width: 24,
            height: 10,
        };
        let preamble = window_preamble(ControllerFamily::RegisterRange, win);
        assert_eq!(preamble[1], (0x44, vec![2, 4])); // bytes 2..=4
        assert_eq!(preamble[2], (0x45, vec![5, 0, 14, 0]));
        assert!(window_postamble(ControllerFamily::RegisterRange).is_empty());
    }

    #[test]
    fn partial_in_out_window_uses_pixel_units() {
        let win = AlignedWindow {
            x: 8,
            y: 260,
            width: 16,
            height: 20,
        };
        let preamble = window_preamble(ControllerFamily::PartialInOut, win);
        assert_eq!(preamble[0].0, 0x91);
        assert_eq!(
            preamble[1],
            (0x90, vec![0, 8, 0, 23, 1, 4, 1, 23, 0x01])
        );
        assert_eq!(window_postamble(ControllerFamily::PartialInOut), vec![(0x92, vec![])]);
    }

    #[test]
    fn both_families_expose_two_plane_opcodes() {
        assert_eq!(plane_opcodes(ControllerFamily::RegisterRange), (0x24, 0x26));
        assert_eq!(plane_opcodes(ControllerFamily::PartialInOut), (0x10, 0x13));
    }
}
