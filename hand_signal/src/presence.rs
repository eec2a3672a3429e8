//! Hand-presence gating with a fade-out transition.
//!
//! The session opens in [`PresenceState::Searching`] with a fully opaque
//! prompt overlay.  While a hand is in view the overlay fades down a step
//! per tick; while it is not, the fade climbs back up.  The moment the fade
//! reaches zero the gate latches [`PresenceState::Active`] and stays there
//! for the rest of the session, whatever the hand does afterwards.

use log::{debug, info};

/// Fade step per tick, on the 0–255 fade scale.  At ~30 ticks/second a
/// steadily held hand clears the overlay in about 1.7 s.
pub const FADE_STEP: u8 = 5;

/// Which side of the one-way latch the session is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresenceState {
    /// Overlay visible; waiting for a hand to hold still long enough.
    Searching,
    /// Field visible; never reverts.
    Active,
}

/// The presence latch and its overlay fade.
#[derive(Debug)]
pub struct PresenceGate {
    state: PresenceState,
    fade: u8,
    hand_visible: bool,
}

impl Default for PresenceGate {
    fn default() -> Self {
        Self::new()
    }
}

impl PresenceGate {
    pub fn new() -> Self {
        PresenceGate {
            state: PresenceState::Searching,
            fade: u8::MAX,
            hand_visible: false,
        }
    }

    /// Advance the gate one tick.
    ///
    /// Returns `Some(opacity)` while the overlay must be drawn, with
    /// opacity in `[0, 1]`; the caller skips the rest of the frame.  Once
    /// the gate is active it returns `None` forever.
    pub fn update(&mut self, hand_present: bool) -> Option<f32> {
        if self.state == PresenceState::Active && self.hand_visible != hand_present {
            debug!(
                "hand {} (latch held)",
                if hand_present { "back in view" } else { "lost" }
            );
        }
        self.hand_visible = hand_present;

        if self.state == PresenceState::Active {
            return None;
        }

        if hand_present {
            self.fade = self.fade.saturating_sub(FADE_STEP);
            if self.fade == 0 {
                self.state = PresenceState::Active;
                info!("hand presence latched; field active");
            }
        } else {
            self.fade = self.fade.saturating_add(FADE_STEP);
        }
        Some(f32::from(self.fade) / f32::from(u8::MAX))
    }

    pub fn state(&self) -> PresenceState {
        self.state
    }

    /// Overlay fade, 0 (gone) to 255 (fully opaque).
    pub fn fade_level(&self) -> u8 {
        self.fade
    }

    /// Whether the most recent tick saw a hand.  Input signal only; a lost
    /// hand never reopens the latch.
    pub fn hand_visible(&self) -> bool {
        self.hand_visible
    }
}

// ════════════════════════════════════════════════════════════════════════
//                                  Tests
// ════════════════════════════════════════════════════════════════════════
