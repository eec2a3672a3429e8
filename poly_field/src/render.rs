//! The per-frame render pass.
//!
//! Two entry points, one per side of the presence gate:
//!
//! * [`FieldRenderer::render_overlay`] — the searching veil with its
//!   centred prompt, at the gate's current opacity.
//! * [`FieldRenderer::render_field`] — the depth-pulsing background wash
//!   and the full stack of rotating polygon layers.
//!
//! The pass is a pure function of `(layer model, vertex count, frame
//! counter)`: the same inputs issue the same primitive stream, which is
//! what the recording-canvas tests pin down.

use std::f32::consts::TAU;

use hand_signal::depth::VertexCount;

use crate::canvas::Canvas;
use crate::color::Hsba;
use crate::layers::LayerModel;

/// Breathing oscillation: radius offset shared by every layer this frame.
pub const BREATH_FREQ: f32 = 0.05;
pub const BREATH_AMPLITUDE: f32 = 20.0;

/// Innermost layer radius and per-layer radius growth, in pixels.
const LAYER_BASE_RADIUS: f32 = 50.0;
const LAYER_RADIUS_STEP: f32 = 4.0;

/// Hue gradient across the stack, centre to rim, in degrees.
const HUE_INNER: f32 = 180.0;
const HUE_OUTER: f32 = 300.0;

const LAYER_SATURATION: f32 = 80.0;
const LAYER_BRIGHTNESS: f32 = 100.0;
const STROKE_WEIGHT: f32 = 0.5;

/// Background wash: ring spacing and the alpha of the outermost ring at
/// full depth progress.
const WASH_HUE: f32 = 220.0;
const WASH_RING_STEP: f32 = 5.0;
const WASH_PEAK_ALPHA: f32 = 15.0;

/// Searching-overlay prompt.
pub const PROMPT: &str = "Raise your hand";
const PROMPT_SCALE: u32 = 4;

/// Sinusoidal radius offset for a given frame.
pub fn breathing_offset(frame_count: u64) -> f32 {
    (frame_count as f32 * BREATH_FREQ).sin() * BREATH_AMPLITUDE
}

/// Draws one frame from explicit state.  Holds nothing but a vertex
/// scratch buffer reused across layers.
#[derive(Debug, Default)]
pub struct FieldRenderer {
    scratch: Vec<(f32, f32)>,
}

impl FieldRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// The searching veil: a full-surface dark rect and the centred
    /// prompt, both at `opacity` (0 invisible, 1 fully opaque).
    pub fn render_overlay<C: Canvas>(&mut self, canvas: &mut C, opacity: f32) {
        let (w, h) = canvas.size();
        let alpha = opacity.clamp(0.0, 1.0) * 100.0;
        canvas.fill_rect(0.0, 0.0, w, h, Hsba::new(0.0, 0.0, 0.0, alpha));
        canvas.text_centered(
            PROMPT,
            w / 2.0,
            h / 2.0,
            PROMPT_SCALE,
            Hsba::new(0.0, 0.0, 100.0, alpha),
        );
    }

    /// One full field frame: the wash sized by depth progress, then every
    /// layer's polygon, innermost first.
    pub fn render_field<C: Canvas>(
        &mut self,
        canvas: &mut C,
        verts: VertexCount,
        model: &LayerModel,
        frame_count: u64,
    ) {
        self.wash(canvas, verts.progress());
        self.layer_pass(canvas, verts, model, frame_count);
    }

    /// Concentric translucent discs from the centre out to a radius that
    /// grows with depth progress.  Inner discs stack, so brightness falls
    /// off toward the rim.
    fn wash<C: Canvas>(&self, canvas: &mut C, progress: f32) {
        let (w, h) = canvas.size();
        let outer = progress * w * 2.0;
        if outer <= 0.0 {
            return;
        }
        let peak = progress * WASH_PEAK_ALPHA;
        let mut r = outer;
        while r > 0.0 {
            let alpha = peak * (r / outer);
            canvas.fill_circle(w / 2.0, h / 2.0, r, Hsba::new(WASH_HUE, 100.0, 100.0, alpha));
            r -= WASH_RING_STEP;
        }
    }

    fn layer_pass<C: Canvas>(
        &mut self,
        canvas: &mut C,
        verts: VertexCount,
        model: &LayerModel,
        frame_count: u64,
    ) {
        let (w, h) = canvas.size();
        let (cx, cy) = (w / 2.0, h / 2.0);
        let breath = breathing_offset(frame_count);
        let last = model.len().saturating_sub(1).max(1) as f32;

        for (i, spec) in model.specs().iter().enumerate() {
            let radius = LAYER_BASE_RADIUS + i as f32 * LAYER_RADIUS_STEP + breath;
            let hue = HUE_INNER + (HUE_OUTER - HUE_INNER) * i as f32 / last;
            let angle = frame_count as f32 * spec.rotation_speed;
            let color = Hsba::new(hue, LAYER_SATURATION, LAYER_BRIGHTNESS, spec.base_alpha);
            self.polygon(canvas, cx, cy, angle, verts.get(), radius, color);
        }
    }

    fn polygon<C: Canvas>(
        &mut self,
        canvas: &mut C,
        cx: f32,
        cy: f32,
        angle: f32,
        sides: u32,
        radius: f32,
        color: Hsba,
    ) {
        self.scratch.clear();
        for k in 0..sides {
            let theta = k as f32 / sides as f32 * TAU;
            self.scratch.push((theta.cos() * radius, theta.sin() * radius));
        }
        let mut frame = canvas.scoped(cx, cy, angle);
        frame.stroke_polygon(&self.scratch, STROKE_WEIGHT, color);
    }
}

// ════════════════════════════════════════════════════════════════════════
//                                  Tests
// ════════════════════════════════════════════════════════════════════════
