//! Top-level application state and the frame loop.
//!
//! `App` owns every piece of per-session state: the presence gate, the
//! depth smoother, the layer model, and the frame counter.  Each tick runs
//! the same fixed order — trail fade, gate, then (once active) smoother
//! and field — so the whole session is reproducible from the detection
//! sequence and the layer seed.

use std::sync::mpsc;
use std::time::Instant;

use hand_signal::depth::DepthSmoother;
use hand_signal::landmark::HandFrame;
use hand_signal::presence::PresenceGate;
use log::info;
use poly_field::canvas::Canvas;
use poly_field::color::Hsba;
use poly_field::layers::LayerModel;
use poly_field::render::FieldRenderer;
use thiserror::Error;

use crate::source::spawn_keypoint_source;
#[cfg(feature = "leap")]
use crate::source::LeapKeypointSource;
#[cfg(not(feature = "leap"))]
use crate::source::SimKeypointSource;
use crate::window::{WindowCanvas, WIN_H, WIN_W};

/// Translucent black laid over the whole surface at the top of every tick;
/// old frames linger briefly as motion trails.
const TRAIL_FADE: Hsba = Hsba::new(0.0, 0.0, 0.0, 3.0);

/// Key legend under the searching prompt.
#[cfg(not(feature = "leap"))]
const HINT: &str = "H RAISE/HIDE HAND - UP/DOWN MOVE - Q QUIT";
#[cfg(feature = "leap")]
const HINT: &str = "Q QUIT";
const HINT_SCALE: u32 = 2;

/// Errors the run loop can surface.  Detection problems never appear here;
/// they degrade to the searching overlay instead.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("window creation failed: {0}")]
    WindowCreate(String),
    #[error("window update failed: {0}")]
    WindowUpdate(String),
}

/// Per-session state, advanced once per frame by [`App::tick`].
pub struct App {
    gate: PresenceGate,
    smoother: DepthSmoother,
    layers: LayerModel,
    renderer: FieldRenderer,
    frame_count: u64,
}

impl App {
    pub fn new(layers: LayerModel) -> Self {
        App {
            gate: PresenceGate::new(),
            smoother: DepthSmoother::new(),
            layers,
            renderer: FieldRenderer::new(),
            frame_count: 0,
        }
    }

    /// Advance one frame from the newest detection result.
    ///
    /// While the gate reports an overlay the rest of the frame is skipped;
    /// once it goes silent the smoother sees the detections and the field
    /// is drawn.  `now` only matters for the smoother's accept throttle.
    pub fn tick<C: Canvas>(&mut self, detections: &[HandFrame], now: Instant, canvas: &mut C) {
        self.frame_count += 1;
        canvas.fade(TRAIL_FADE);

        if let Some(opacity) = self.gate.update(!detections.is_empty()) {
            self.renderer.render_overlay(canvas, opacity);
            let (w, h) = canvas.size();
            canvas.text_centered(
                HINT,
                w / 2.0,
                h * 0.75,
                HINT_SCALE,
                Hsba::new(0.0, 0.0, 100.0, opacity * 40.0),
            );
            return;
        }

        self.smoother.observe(detections, now);
        self.renderer
            .render_field(canvas, self.smoother.vertex_count(), &self.layers, self.frame_count);
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    pub fn gate(&self) -> &PresenceGate {
        &self.gate
    }

    pub fn smoother(&self) -> &DepthSmoother {
        &self.smoother
    }
}

/// Open the window, start the keypoint source, and run until quit.
pub fn run() -> Result<(), AppError> {
    let (sim_tx, sim_rx) = mpsc::channel();

    #[cfg(not(feature = "leap"))]
    let detections = spawn_keypoint_source(SimKeypointSource::new(sim_rx));
    #[cfg(feature = "leap")]
    let detections = {
        // Hardware mode has no simulated hand; key events go nowhere.
        drop(sim_rx);
        spawn_keypoint_source(LeapKeypointSource)
    };

    let mut canvas =
        WindowCanvas::new().map_err(|e| AppError::WindowCreate(e.to_string()))?;
    let mut app = App::new(LayerModel::generate());
    info!("visualizer running at {WIN_W}x{WIN_H}");

    while canvas.is_open() {
        if !canvas.poll_input(&sim_tx) {
            break;
        }
        let latest = detections.latest();
        app.tick(latest.as_deref().unwrap_or(&[]), Instant::now(), &mut canvas);
        canvas
            .present()
            .map_err(|e| AppError::WindowUpdate(e.to_string()))?;
    }
    Ok(())
}

// ════════════════════════════════════════════════════════════════════════
//                                  Tests
// ════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::synthesize_hand;
    use hand_signal::depth::{MAX_VERTS, MIN_VERTS};
    use hand_signal::landmark::Detections;
    use hand_signal::presence::PresenceState;
    use poly_field::canvas::{Cmd, RecordingCanvas};
    use std::time::Duration;

    fn hand(z: f32) -> Detections {
        vec![synthesize_hand(z)]
    }

    fn app() -> App {
        App::new(LayerModel::with_seed(17))
    }

    fn count<F: Fn(&Cmd) -> bool>(rec: &RecordingCanvas, pred: F) -> usize {
        rec.commands.iter().filter(|c| pred(c)).count()
    }

    fn polygon_sides(rec: &RecordingCanvas) -> Option<usize> {
        rec.commands.iter().find_map(|c| match c {
            Cmd::Polygon { points, .. } => Some(points.len()),
            _ => None,
        })
    }

    #[test]
    fn never_detected_stays_on_a_fully_opaque_overlay() {
        let mut app = app();
        let mut rec = RecordingCanvas::new(640.0, 480.0);
        let t0 = Instant::now();
        for i in 0..100u64 {
            rec.clear();
            app.tick(&[], t0 + Duration::from_millis(i * 33), &mut rec);

            assert!(matches!(rec.commands[0], Cmd::Fade(_)));
            assert_eq!(count(&rec, |c| matches!(c, Cmd::Rect { .. })), 1);
            assert_eq!(count(&rec, |c| matches!(c, Cmd::Text { .. })), 2);
            assert_eq!(count(&rec, |c| matches!(c, Cmd::Polygon { .. })), 0);
            assert_eq!(count(&rec, |c| matches!(c, Cmd::Circle { .. })), 0);
            if let Cmd::Rect { color, .. } = &rec.commands[1] {
                assert_eq!(color.a, 100.0);
            }
        }
        assert_eq!(app.gate().state(), PresenceState::Searching);
        assert_eq!(app.frame_count(), 100);
    }

    #[test]
    fn steady_hand_switches_overlay_to_field_after_the_fade() {
        let mut app = app();
        let mut rec = RecordingCanvas::new(640.0, 480.0);
        let t0 = Instant::now();

        // 255 / 5 = 51 overlay ticks, the last one fully transparent.
        for i in 1..=51u64 {
            rec.clear();
            app.tick(&hand(-40.0), t0 + Duration::from_millis(i * 33), &mut rec);
            assert_eq!(count(&rec, |c| matches!(c, Cmd::Rect { .. })), 1, "tick {i}");
        }
        assert_eq!(app.gate().state(), PresenceState::Active);

        rec.clear();
        app.tick(&hand(-40.0), t0 + Duration::from_millis(52 * 33), &mut rec);
        assert_eq!(count(&rec, |c| matches!(c, Cmd::Rect { .. })), 0);
        assert_eq!(count(&rec, |c| matches!(c, Cmd::Text { .. })), 0);
        assert!(count(&rec, |c| matches!(c, Cmd::Polygon { .. })) > 0);

        // The smoother is still warming up from its zero start, so the
        // field opens at minimum complexity.
        assert_eq!(polygon_sides(&rec), Some(MIN_VERTS as usize));
    }

    #[test]
    fn losing_the_hand_after_activation_keeps_the_field() {
        let mut app = app();
        let mut rec = RecordingCanvas::new(640.0, 480.0);
        let t0 = Instant::now();
        let mut i = 0u64;
        while app.gate().state() == PresenceState::Searching {
            i += 1;
            rec.clear();
            app.tick(&hand(-40.0), t0 + Duration::from_millis(i * 33), &mut rec);
        }

        for _ in 0..100 {
            i += 1;
            rec.clear();
            app.tick(&[], t0 + Duration::from_millis(i * 33), &mut rec);
            assert_eq!(count(&rec, |c| matches!(c, Cmd::Rect { .. })), 0);
            assert!(count(&rec, |c| matches!(c, Cmd::Polygon { .. })) > 0);
        }
        assert_eq!(app.gate().state(), PresenceState::Active);
    }

    #[test]
    fn approaching_hand_raises_complexity_to_the_ceiling() {
        let mut app = app();
        let mut rec = RecordingCanvas::new(640.0, 480.0);
        let t0 = Instant::now();
        let mut i = 0u64;

        // Activate and settle the baseline at arm's length.
        for _ in 0..80 {
            i += 1;
            rec.clear();
            app.tick(&hand(-40.0), t0 + Duration::from_millis(i * 60), &mut rec);
        }
        assert_eq!(polygon_sides(&rec), Some(MIN_VERTS as usize));

        // Bring the hand a full scale closer and let the EMA catch up.
        for _ in 0..150 {
            i += 1;
            rec.clear();
            app.tick(&hand(-240.0), t0 + Duration::from_millis(i * 60), &mut rec);
        }
        assert_eq!(polygon_sides(&rec), Some(MAX_VERTS as usize));
    }

    #[test]
    fn frame_counter_counts_ticks() {
        let mut app = app();
        let mut rec = RecordingCanvas::new(64.0, 48.0);
        assert_eq!(app.frame_count(), 0);
        for i in 1..=3u64 {
            app.tick(&[], Instant::now(), &mut rec);
            assert_eq!(app.frame_count(), i);
        }
    }
}
