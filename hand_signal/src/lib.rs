//! # hand_signal
//!
//! Turns raw hand-landmark detections into the two signals the visualizer
//! runs on: a presence gate and a smoothed depth parameter.
//!
//! ## Pipeline
//!
//! ```text
//! detections ──► PresenceGate ──► searching / active (+ overlay fade)
//!       │
//!       └─────► DepthSmoother ──► VertexCount (3..=100)
//! ```
//!
//! A detection loop (camera, LeapMotion, or a keyboard simulation) publishes
//! complete results into a [`latest::LatestSlot`]; the frame loop reads the
//! newest result each tick and feeds it to both consumers.  The gate decides
//! *whether* the field is shown, the smoother decides *how complex* it is.
//!
//! Nothing in this crate draws or touches a device; it is pure state that the
//! front end advances once per frame.

pub mod depth;
pub mod landmark;
pub mod latest;
pub mod presence;
