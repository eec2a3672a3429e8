//! # poly_field
//!
//! The drawing half of the visualizer: a field of concentric rotating
//! polygons over a pulsing background wash, plus the searching overlay
//! shown before a hand has been found.
//!
//! ## Layout
//!
//! * [`color`] — HSB-with-alpha color values and their RGB conversion.
//! * [`canvas`] — the [`canvas::Canvas`] trait the renderer draws through,
//!   a software rasterizer ([`canvas::BufferCanvas`]) and a command
//!   recorder ([`canvas::RecordingCanvas`]) for tests.
//! * [`layers`] — the per-layer animation parameters, rolled once per
//!   session.
//! * [`render`] — the per-frame render pass itself.
//!
//! Given the same layer model, frame counter, and vertex count, a render
//! pass issues an identical primitive stream; all per-session randomness
//! lives in [`layers::LayerModel`].

pub mod canvas;
pub mod color;
pub mod layers;
pub mod render;
