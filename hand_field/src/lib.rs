//! # hand_field
//!
//! Interactive front end: a hand-tracking feed drives a field of rotating
//! translucent polygons in a software-rendered window.
//!
//! ## How a frame happens
//!
//! A keypoint source thread publishes detection results into a shared
//! latest-value slot.  Each tick the app reads the newest result, advances
//! the presence gate, and either draws the searching overlay or feeds the
//! depth smoother and renders the field.  Closing the window or pressing
//! `Q` quits; there is no other UI.
//!
//! ## Feature flags
//!
//! * (default) — **Simulation mode**: the keyboard plays the hand.
//! * `leap` — **Hardware mode**: polls a real LeapMotion controller via
//!   LeapC.
//!
//! ### Simulation keyboard shortcuts
//!
//! | Key | Effect |
//! |---|---|
//! | `H` | Raise / hide the simulated hand |
//! | `Up` (hold) | Move the hand toward the sensor (more vertices) |
//! | `Down` (hold) | Move it away (fewer vertices) |
//! | `Q` | Quit |

pub mod app;
pub mod source;
pub mod window;
