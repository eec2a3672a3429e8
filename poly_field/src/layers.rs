//! Per-layer animation parameters, rolled once per session.
//!
//! Every layer keeps the same rotation speed and stroke alpha for the whole
//! session; only the frame counter animates them.  Holding the randomness
//! here keeps the render pass itself fully deterministic.

use log::debug;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Number of concentric layers in the field.
pub const LAYER_COUNT: usize = 300;

/// Per-layer rotation speed range, radians per frame, drawn uniformly.
pub const ROTATION_SPEED_MIN: f32 = 0.005;
pub const ROTATION_SPEED_MAX: f32 = 0.03;

/// Stroke alpha at the innermost and outermost layer; the ramp between
/// them is linear in layer index.
pub const ALPHA_INNER: f32 = 100.0;
pub const ALPHA_OUTER: f32 = 10.0;

/// Fixed animation parameters for one layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayerSpec {
    pub rotation_speed: f32,
    pub base_alpha: f32,
}

/// The ordered collection of all layer parameters, innermost first.
#[derive(Debug, Clone)]
pub struct LayerModel {
    specs: Vec<LayerSpec>,
}

impl LayerModel {
    /// Roll a fresh model.  The seed is logged so a session's exact field
    /// can be reproduced with [`LayerModel::with_seed`].
    pub fn generate() -> Self {
        let seed = rand::thread_rng().gen();
        debug!("layer model seed {seed}");
        Self::with_seed(seed)
    }

    /// Deterministic model from an explicit seed.
    pub fn with_seed(seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let specs = (0..LAYER_COUNT)
            .map(|i| LayerSpec {
                rotation_speed: rng.gen_range(ROTATION_SPEED_MIN..ROTATION_SPEED_MAX),
                base_alpha: alpha_for(i),
            })
            .collect();
        LayerModel { specs }
    }

    pub fn specs(&self) -> &[LayerSpec] {
        &self.specs
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }
}

fn alpha_for(index: usize) -> f32 {
    let t = index as f32 / (LAYER_COUNT - 1) as f32;
    ALPHA_INNER + (ALPHA_OUTER - ALPHA_INNER) * t
}

// ════════════════════════════════════════════════════════════════════════
//                                  Tests
// ════════════════════════════════════════════════════════════════════════
