//! minifb-backed window surface.
//!
//! Owns the OS window and the software [`BufferCanvas`] behind it, and
//! implements [`Canvas`] by delegation so the app draws through one
//! interface whatever the target.  Also translates keyboard input into
//! [`SimInput`] events for the simulated hand.

use std::sync::mpsc::Sender;
use std::time::Duration;

use minifb::{Key, KeyRepeat, Window, WindowOptions};
use poly_field::canvas::{BufferCanvas, Canvas};
use poly_field::color::Hsba;

use crate::source::SimInput;

// ── Layout ───────────────────────────────────────────────────────────────

pub const WIN_W: usize = 1280;
pub const WIN_H: usize = 720;
const TITLE: &str = "Hand Field";

/// ~30 fps; also the cadence of the presence fade.
const FRAME_TIME: Duration = Duration::from_millis(33);

// ── WindowCanvas ─────────────────────────────────────────────────────────

pub struct WindowCanvas {
    window: Window,
    surface: BufferCanvas,
}

impl WindowCanvas {
    pub fn new() -> Result<Self, minifb::Error> {
        let mut window = Window::new(
            TITLE,
            WIN_W,
            WIN_H,
            WindowOptions { resize: false, ..WindowOptions::default() },
        )?;
        window.limit_update_rate(Some(FRAME_TIME));

        Ok(WindowCanvas { window, surface: BufferCanvas::new(WIN_W, WIN_H) })
    }

    pub fn is_open(&self) -> bool {
        self.window.is_open()
    }

    /// Poll keyboard input and translate it to [`SimInput`] events.
    /// Returns false when the app should quit.
    pub fn poll_input(&mut self, sim_tx: &Sender<SimInput>) -> bool {
        if !self.window.is_open() {
            return false;
        }
        if self.window.is_key_pressed(Key::Q, KeyRepeat::No) {
            return false;
        }
        if self.window.is_key_pressed(Key::H, KeyRepeat::No) {
            let _ = sim_tx.send(SimInput::ToggleHand);
        }
        // Held arrows keep stepping the hand through depth.
        if self.window.is_key_down(Key::Up) {
            let _ = sim_tx.send(SimInput::Closer);
        }
        if self.window.is_key_down(Key::Down) {
            let _ = sim_tx.send(SimInput::Farther);
        }
        true
    }

    /// Push the rendered surface to the screen.
    pub fn present(&mut self) -> Result<(), minifb::Error> {
        self.window.update_with_buffer(self.surface.buffer(), WIN_W, WIN_H)
    }
}

impl Canvas for WindowCanvas {
    fn size(&self) -> (f32, f32) {
        self.surface.size()
    }

    fn fade(&mut self, color: Hsba) {
        self.surface.fade(color);
    }

    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Hsba) {
        self.surface.fill_rect(x, y, w, h, color);
    }

    fn fill_circle(&mut self, cx: f32, cy: f32, radius: f32, color: Hsba) {
        self.surface.fill_circle(cx, cy, radius, color);
    }

    fn stroke_polygon(&mut self, points: &[(f32, f32)], weight: f32, color: Hsba) {
        self.surface.stroke_polygon(points, weight, color);
    }

    fn text_centered(&mut self, text: &str, x: f32, y: f32, scale: u32, color: Hsba) {
        self.surface.text_centered(text, x, y, scale, color);
    }

    fn push_transform(&mut self, dx: f32, dy: f32, rotation: f32) {
        self.surface.push_transform(dx, dy, rotation);
    }

    fn pop_transform(&mut self) {
        self.surface.pop_transform();
    }
}
