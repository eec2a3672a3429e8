//! Depth smoothing and the depth-to-complexity parameter.
//!
//! Raw per-frame depth of the reference landmark is noisy, so it is
//! baselined against the first sample ever seen, folded into an exponential
//! moving average on a throttled cadence, and mapped onto the bounded
//! vertex count that drives polygon complexity.  Approaching the sensor
//! (depth falling below the baseline) raises the count; retreating, or any
//! gap in detection, simply leaves the last value in place.

use std::time::{Duration, Instant};

use log::debug;

use crate::landmark::HandFrame;

/// Vertex-count range.  The minimum is also the startup value.
pub const MIN_VERTS: u32 = 3;
pub const MAX_VERTS: u32 = 100;

/// Weight kept from the previous smoothed value on each accepted sample.
pub const SMOOTHING_FACTOR: f32 = 0.8;

/// Minimum spacing between accepted samples.  Detection results arriving
/// faster than this are dropped, not queued.
pub const DETECTION_INTERVAL: Duration = Duration::from_millis(50);

/// Relative depth (toward the sensor, hence negative) that pins the count
/// at [`MAX_VERTS`].
pub const DEPTH_FULL_SCALE: f32 = -200.0;

/// Polygon vertex count, always within `MIN_VERTS..=MAX_VERTS`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VertexCount(u32);

impl Default for VertexCount {
    fn default() -> Self {
        VertexCount(MIN_VERTS)
    }
}

impl VertexCount {
    /// Map a baselined depth onto the count: zero or receding depth gives
    /// the minimum, [`DEPTH_FULL_SCALE`] and beyond the maximum, rounding
    /// to the nearest count in between.
    pub fn from_relative_depth(relative_z: f32) -> Self {
        let span = (MAX_VERTS - MIN_VERTS) as f32;
        let mapped = MIN_VERTS as f32 + relative_z / DEPTH_FULL_SCALE * span;
        VertexCount(mapped.round().clamp(MIN_VERTS as f32, MAX_VERTS as f32) as u32)
    }

    pub fn get(self) -> u32 {
        self.0
    }

    /// Position within the range, 0 at the minimum, 1 at the maximum.
    pub fn progress(self) -> f32 {
        (self.0 - MIN_VERTS) as f32 / (MAX_VERTS - MIN_VERTS) as f32
    }
}

/// Throttled EMA over the reference-landmark depth.
#[derive(Debug)]
pub struct DepthSmoother {
    baseline: Option<f32>,
    smoothed: f32,
    verts: VertexCount,
    last_accept: Option<Instant>,
}

impl Default for DepthSmoother {
    fn default() -> Self {
        Self::new()
    }
}

impl DepthSmoother {
    pub fn new() -> Self {
        DepthSmoother {
            baseline: None,
            smoothed: 0.0,
            verts: VertexCount::default(),
            last_accept: None,
        }
    }

    /// Offer the latest detection result at time `now`.
    ///
    /// Returns `true` when a sample was accepted.  A result with no
    /// readable depth (no hand, or a malformed first frame) and a result
    /// arriving inside [`DETECTION_INTERVAL`] of the previous accept are
    /// both ignored; the current parameter value simply persists.
    pub fn observe(&mut self, detections: &[HandFrame], now: Instant) -> bool {
        let Some(raw) = detections.first().and_then(HandFrame::reference_depth) else {
            return false;
        };
        if let Some(last) = self.last_accept {
            if now.saturating_duration_since(last) < DETECTION_INTERVAL {
                return false;
            }
        }
        self.last_accept = Some(now);

        let baseline = *self.baseline.get_or_insert_with(|| {
            debug!("depth baseline captured at {raw:.2}");
            raw
        });

        // Literal EMA, including the very first sample over the 0 start.
        self.smoothed = self.smoothed * SMOOTHING_FACTOR + raw * (1.0 - SMOOTHING_FACTOR);
        self.verts = VertexCount::from_relative_depth(self.smoothed - baseline);
        true
    }

    pub fn vertex_count(&self) -> VertexCount {
        self.verts
    }

    pub fn smoothed_depth(&self) -> f32 {
        self.smoothed
    }

    /// The depth that counts as "arm's length", captured once from the
    /// first accepted sample.
    pub fn baseline(&self) -> Option<f32> {
        self.baseline
    }
}

// ════════════════════════════════════════════════════════════════════════
//                                  Tests
// ════════════════════════════════════════════════════════════════════════
