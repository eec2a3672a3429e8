//! HSB color with alpha, in the ranges the renderer constants are written
//! against: hue 0–360, saturation and brightness 0–100, alpha 0–100.

/// An HSB color with alpha.  Plain data; conversion happens at the pixel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsba {
    pub h: f32,
    pub s: f32,
    pub b: f32,
    pub a: f32,
}

impl Hsba {
    pub const fn new(h: f32, s: f32, b: f32, a: f32) -> Self {
        Hsba { h, s, b, a }
    }

    pub const fn with_alpha(self, a: f32) -> Self {
        Hsba { a, ..self }
    }

    /// Alpha as a blend factor in `[0, 1]`.
    pub fn alpha_unit(self) -> f32 {
        (self.a / 100.0).clamp(0.0, 1.0)
    }

    /// Convert to 8-bit RGB channels, ignoring alpha.
    pub fn to_rgb(self) -> (u8, u8, u8) {
        let h = self.h.rem_euclid(360.0);
        let s = (self.s / 100.0).clamp(0.0, 1.0);
        let v = (self.b / 100.0).clamp(0.0, 1.0);

        let hi = (h / 60.0) as u32;
        let f = h / 60.0 - hi as f32;
        let p = v * (1.0 - s);
        let q = v * (1.0 - s * f);
        let t = v * (1.0 - s * (1.0 - f));
        let (r, g, b) = match hi {
            0 => (v, t, p),
            1 => (q, v, p),
            2 => (p, v, t),
            3 => (p, q, v),
            4 => (t, p, v),
            _ => (v, p, q),
        };
        (
            (r * 255.0).round() as u8,
            (g * 255.0).round() as u8,
            (b * 255.0).round() as u8,
        )
    }
}

// ════════════════════════════════════════════════════════════════════════
//                                  Tests
// ════════════════════════════════════════════════════════════════════════
