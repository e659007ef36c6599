//! Display mode controller
//!
//! One [`Display`] owns the transport handle for its panel. Every
//! hardware-facing operation runs inside a single mutex region, and the mode
//! and initialized flags live behind the same mutex as the transport itself,
//! so observed state always corresponds to commands the panel has actually
//! received. Dual-plane writes happen inside one region so the two planes
//! are never observable apart.

mod command;
pub(crate) mod window;

pub use window::Region;

use std::sync::{Mutex, MutexGuard, PoisonError};

use image::RgbaImage;
use serde::Serialize;

use crate::dither::Ordered;
use crate::error::DisplayError;
use crate::format::PixelFormat;
use crate::framebuffer::Framebuffer;
use crate::profile::{ControllerFamily, InitStep, PanelProfile, PlaneLayout};
use crate::render::Renderer;
use crate::transport::Transport;

/// Hardware refresh mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    Full,
    Partial,
    Fast,
    Grayscale,
}

/// Snapshot of a display's configuration and current state, for diagnostics.
#[derive(Debug, Clone, Serialize)]
pub struct DisplayInfo {
    pub panel: &'static str,
    pub width: u32,
    pub height: u32,
    pub format: PixelFormat,
    pub family: ControllerFamily,
    pub planes: PlaneLayout,
    pub partial_window: bool,
    pub mode: Option<Mode>,
    pub initialized: bool,
}

/// Mutable device state: the transport and the mode flags it guards.
///
/// Only reachable through the display's mutex, which makes "state mutated
/// only inside the exclusive region" hold by construction.
struct DeviceState<T> {
    transport: T,
    mode: Option<Mode>,
    initialized: bool,
}

/// Drives one panel through its refresh modes.
pub struct Display<T: Transport> {
    profile: PanelProfile,
    renderer: Renderer,
    device: Mutex<DeviceState<T>>,
}

impl<T: Transport> Display<T> {
    /// Create a display using ordered dithering for the panel's format.
    pub fn new(transport: T, profile: PanelProfile) -> Self {
        let renderer = Renderer::new(Box::new(Ordered::new(profile.format)));
        Self::with_renderer(transport, profile, renderer)
    }

    /// Create a display with a caller-chosen renderer.
    ///
    /// The renderer's pixel format must match the panel's; [`Display::show`]
    /// rejects the mismatch before rendering.
    pub fn with_renderer(transport: T, profile: PanelProfile, renderer: Renderer) -> Self {
        Self {
            profile,
            renderer,
            device: Mutex::new(DeviceState {
                transport,
                mode: None,
                initialized: false,
            }),
        }
    }

    pub fn profile(&self) -> &PanelProfile {
        &self.profile
    }

    /// Whether the controller can address a refresh sub-window. When this is
    /// `false`, [`Display::display_region`] transmits the full frame instead.
    pub fn supports_partial_window(&self) -> bool {
        self.profile.partial_window
    }

    /// Snapshot of configuration and current mode state.
    pub fn info(&self) -> DisplayInfo {
        let device = self.lock();
        DisplayInfo {
            panel: self.profile.name,
            width: self.profile.width,
            height: self.profile.height,
            format: self.profile.format,
            family: self.profile.family,
            planes: self.profile.planes,
            partial_window: self.profile.partial_window,
            mode: device.mode,
            initialized: device.initialized,
        }
    }

    /// Render a source image and show it.
    ///
    /// Dual-plane panels render and transmit both planes atomically; this
    /// marks the panel initialized but leaves the mode tracking untouched.
    /// Single-plane panels fall through to the full-mode display path.
    pub fn show(&self, source: &RgbaImage) -> Result<(), DisplayError> {
        if self.renderer.format() != self.profile.format {
            return Err(DisplayError::FormatMismatch {
                expected: self.profile.format,
                actual: self.renderer.format(),
            });
        }
        if source.width() != self.profile.width || source.height() != self.profile.height {
            return Err(DisplayError::DimensionMismatch {
                panel_width: self.profile.width,
                panel_height: self.profile.height,
                actual_width: source.width(),
                actual_height: source.height(),
            });
        }

        match self.profile.planes {
            PlaneLayout::Dual => {
                let (black, chroma) = self.renderer.render_planes(source)?;
                let mut device = self.lock();
                device.ensure_cold_init(&self.profile)?;
                device.transmit_dual(&self.profile, &black, &chroma)?;
                device.refresh(&self.profile, Mode::Full)
            }
            PlaneLayout::Single => {
                let fb = self.renderer.render(source)?;
                self.display_base(&fb)
            }
        }
    }

    /// Show a pre-built framebuffer through the full-mode path.
    pub fn show_frame(&self, fb: &Framebuffer) -> Result<(), DisplayError> {
        self.display_base(fb)
    }

    /// Transmit both planes of a dual-plane panel directly.
    ///
    /// Planes are validated in argument order: format first, then
    /// dimensions, per plane.
    pub fn show_raw(&self, black: &Framebuffer, chroma: &Framebuffer) -> Result<(), DisplayError> {
        if self.profile.planes != PlaneLayout::Dual {
            return Err(DisplayError::DualPlaneUnsupported);
        }
        for fb in [black, chroma] {
            if fb.format() != PixelFormat::Mono {
                return Err(DisplayError::FormatMismatch {
                    expected: PixelFormat::Mono,
                    actual: fb.format(),
                });
            }
            self.check_dimensions(fb)?;
        }

        let mut device = self.lock();
        device.ensure_cold_init(&self.profile)?;
        device.transmit_dual(&self.profile, black, chroma)?;
        device.refresh(&self.profile, Mode::Full)
    }

    /// Display through the base (full) mode. Runs the full-mode init only
    /// when the panel is wholly uninitialized.
    pub fn display_base(&self, fb: &Framebuffer) -> Result<(), DisplayError> {
        self.check_format(fb)?;
        self.check_dimensions(fb)?;
        let mut device = self.lock();
        device.ensure_cold_init(&self.profile)?;
        device.mode = Some(Mode::Full);
        device.transmit_frame(&self.profile, fb)?;
        device.refresh(&self.profile, Mode::Full)
    }

    /// Display through partial mode, initializing it if not already active.
    pub fn display_partial(&self, fb: &Framebuffer) -> Result<(), DisplayError> {
        self.display_mode(fb, Mode::Partial)
    }

    /// Display through fast mode, initializing it if not already active.
    pub fn display_fast(&self, fb: &Framebuffer) -> Result<(), DisplayError> {
        self.display_mode(fb, Mode::Fast)
    }

    /// Display through grayscale mode, initializing it if not already
    /// active.
    pub fn display_grayscale(&self, fb: &Framebuffer) -> Result<(), DisplayError> {
        self.display_mode(fb, Mode::Grayscale)
    }

    /// Refresh a sub-rectangle of the panel from a full-screen framebuffer.
    ///
    /// The window aligns horizontally to the 8-pixel addressing grain; only
    /// the pixel data inside the aligned window is transmitted. Panels
    /// without window support fall back to a full-frame refresh (see
    /// [`Display::supports_partial_window`]).
    pub fn display_region(&self, fb: &Framebuffer, region: Region) -> Result<(), DisplayError> {
        self.check_format(fb)?;
        self.check_dimensions(fb)?;
        let win = window::align_region(region, self.profile.width, self.profile.height)?;

        if !self.profile.partial_window {
            tracing::warn!(
                panel = self.profile.name,
                "controller cannot address a sub-window, transmitting the full frame"
            );
            return self.display_base(fb);
        }

        let data = fb.copy_window(win.x, win.y, win.width, win.height);
        tracing::debug!(
            x = win.x,
            y = win.y,
            width = win.width,
            height = win.height,
            bytes = data.len(),
            "refreshing aligned window"
        );

        let mut device = self.lock();
        device.ensure_mode(&self.profile, Mode::Partial)?;
        for (opcode, payload) in command::window_preamble(self.profile.family, win) {
            device.cmd(opcode, &payload)?;
        }
        device.cmd(command::window_data_opcode(self.profile.family), &data)?;
        for (opcode, payload) in command::window_postamble(self.profile.family) {
            device.cmd(opcode, &payload)?;
        }
        device.refresh(&self.profile, Mode::Partial)
    }

    /// Run the partial-mode init eagerly.
    pub fn init_partial(&self) -> Result<(), DisplayError> {
        self.lock().force_mode(&self.profile, Mode::Partial)
    }

    /// Run the fast-mode init eagerly.
    pub fn init_fast(&self) -> Result<(), DisplayError> {
        self.lock().force_mode(&self.profile, Mode::Fast)
    }

    /// Run the grayscale-mode init eagerly.
    pub fn init_grayscale(&self) -> Result<(), DisplayError> {
        self.lock().force_mode(&self.profile, Mode::Grayscale)
    }

    /// Show a blank (background) frame.
    pub fn clear(&self) -> Result<(), DisplayError> {
        let fb = Framebuffer::new(self.profile.format, self.profile.width, self.profile.height);
        self.display_base(&fb)
    }

    /// Power the panel down. The state machine returns to uninitialized:
    /// the next display call of any mode re-runs that mode's init.
    pub fn sleep(&self) -> Result<(), DisplayError> {
        let mut device = self.lock();
        device.run_steps(self.profile.sleep)?;
        device.mode = None;
        device.initialized = false;
        tracing::info!(panel = self.profile.name, "panel entered deep sleep");
        Ok(())
    }

    fn display_mode(&self, fb: &Framebuffer, mode: Mode) -> Result<(), DisplayError> {
        self.check_format(fb)?;
        self.check_dimensions(fb)?;
        let mut device = self.lock();
        device.ensure_mode(&self.profile, mode)?;
        device.transmit_frame(&self.profile, fb)?;
        device.refresh(&self.profile, mode)
    }

    fn check_format(&self, fb: &Framebuffer) -> Result<(), DisplayError> {
        if fb.format() != self.profile.format {
            return Err(DisplayError::FormatMismatch {
                expected: self.profile.format,
                actual: fb.format(),
            });
        }
        Ok(())
    }

    fn check_dimensions(&self, fb: &Framebuffer) -> Result<(), DisplayError> {
        if fb.width() != self.profile.width || fb.height() != self.profile.height {
            return Err(DisplayError::DimensionMismatch {
                panel_width: self.profile.width,
                panel_height: self.profile.height,
                actual_width: fb.width(),
                actual_height: fb.height(),
            });
        }
        Ok(())
    }

    fn lock(&self) -> MutexGuard<'_, DeviceState<T>> {
        self.device.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<T: Transport> DeviceState<T> {
    fn cmd(&mut self, opcode: u8, data: &[u8]) -> Result<(), DisplayError> {
        self.transport.send_command(opcode).map_err(boxed)?;
        if !data.is_empty() {
            self.transport.send_data(data).map_err(boxed)?;
        }
        Ok(())
    }

    fn run_steps(&mut self, steps: &[InitStep]) -> Result<(), DisplayError> {
        for step in steps {
            match *step {
                InitStep::Cmd(opcode, data) => self.cmd(opcode, data)?,
                InitStep::DelayMs(ms) => self.transport.delay_ms(ms).map_err(boxed)?,
                InitStep::WaitIdle => self.transport.wait_idle().map_err(boxed)?,
            }
        }
        Ok(())
    }

    /// Full-mode init, run only from the wholly uninitialized state.
    fn ensure_cold_init(&mut self, profile: &PanelProfile) -> Result<(), DisplayError> {
        if self.initialized {
            return Ok(());
        }
        tracing::info!(panel = profile.name, "running full-mode init");
        self.run_steps(profile.init_full)?;
        self.initialized = true;
        self.mode = Some(Mode::Full);
        Ok(())
    }

    /// Mode init, skipped when the target mode is already active.
    fn ensure_mode(&mut self, profile: &PanelProfile, mode: Mode) -> Result<(), DisplayError> {
        if self.initialized && self.mode == Some(mode) {
            return Ok(());
        }
        self.force_mode(profile, mode)
    }

    fn force_mode(&mut self, profile: &PanelProfile, mode: Mode) -> Result<(), DisplayError> {
        let steps = profile
            .init_for(mode)
            .ok_or(DisplayError::ModeUnsupported(mode))?;
        tracing::info!(panel = profile.name, ?mode, "initializing refresh mode");
        self.run_steps(steps)?;
        self.mode = Some(mode);
        self.initialized = true;
        Ok(())
    }

    fn transmit_frame(&mut self, profile: &PanelProfile, fb: &Framebuffer) -> Result<(), DisplayError> {
        for (opcode, payload) in
            command::frame_preamble(profile.family, profile.width, profile.height)
        {
            self.cmd(opcode, &payload)?;
        }
        let (primary, _) = command::plane_opcodes(profile.family);
        self.cmd(primary, fb.as_bytes())
    }

    /// Write both planes back to back; callers hold the lock for the whole
    /// pair so the planes are never observable apart.
    fn transmit_dual(
        &mut self,
        profile: &PanelProfile,
        black: &Framebuffer,
        chroma: &Framebuffer,
    ) -> Result<(), DisplayError> {
        for (opcode, payload) in
            command::frame_preamble(profile.family, profile.width, profile.height)
        {
            self.cmd(opcode, &payload)?;
        }
        let (primary, secondary) = command::plane_opcodes(profile.family);
        self.cmd(primary, black.as_bytes())?;
        self.cmd(secondary, chroma.as_bytes())
    }

    fn refresh(&mut self, profile: &PanelProfile, mode: Mode) -> Result<(), DisplayError> {
        self.run_steps(command::refresh_sequence(profile.family, mode))
    }
}

fn boxed<E: std::error::Error + Send + Sync + 'static>(err: E) -> DisplayError {
    DisplayError::Transport(Box::new(err))
}
