//! Keypoint sources — keyboard simulation and LeapMotion hardware.
//!
//! A source runs on its own thread and publishes whole detection results
//! into a [`LatestSlot`]; the frame loop reads the newest one each tick.
//! Consumers cannot tell the backends apart: both deliver complete
//! 21-landmark frames through the same slot.

use std::sync::mpsc::{Receiver, TryRecvError};
use std::thread;
use std::time::Duration;

use hand_signal::landmark::{Detections, HandFrame, Landmark, LANDMARK_COUNT};
use hand_signal::latest::LatestSlot;
use log::debug;

// ════════════════════════════════════════════════════════════════════════
//                      KeypointSource trait + spawn
// ════════════════════════════════════════════════════════════════════════

/// Anything that can publish detection results into a slot.
pub trait KeypointSource: Send + 'static {
    fn run(self: Box<Self>, out: LatestSlot<Detections>);
}

/// Spawn a source on its own thread; returns the reading side of the slot.
pub fn spawn_keypoint_source<S: KeypointSource>(source: S) -> LatestSlot<Detections> {
    let slot = LatestSlot::new();
    let out = slot.clone();
    thread::spawn(move || Box::new(source).run(out));
    slot
}

// ════════════════════════════════════════════════════════════════════════
//            SimKeypointSource — keyboard hand (always available)
// ════════════════════════════════════════════════════════════════════════

/// Raw input event from the window, applied by [`SimKeypointSource`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SimInput {
    /// Raise the simulated hand if hidden, hide it if raised.
    ToggleHand,
    /// Move the hand toward the sensor.
    Closer,
    /// Move it away.
    Farther,
}

/// Publish cadence of the simulated detector.  Faster than the smoother's
/// accept interval, so the throttle path is exercised in simulation too.
const SIM_CADENCE: Duration = Duration::from_millis(25);

/// Depth change per `Closer`/`Farther` event, in source z units.
const SIM_DEPTH_STEP: f32 = 4.0;
const SIM_DEPTH_MIN: f32 = -260.0;
const SIM_DEPTH_MAX: f32 = 60.0;

/// Amplitude of the jitter layered on the simulated depth.
const SIM_TREMOR: f32 = 1.5;

/// Keyboard-driven hand.  Keeps its state on the source thread; the window
/// only sends [`SimInput`] events.
pub struct SimKeypointSource {
    rx: Receiver<SimInput>,
    present: bool,
    depth: f32,
    cycle: u64,
}

impl SimKeypointSource {
    pub fn new(rx: Receiver<SimInput>) -> Self {
        SimKeypointSource { rx, present: false, depth: 0.0, cycle: 0 }
    }

    fn apply(&mut self, input: SimInput) {
        match input {
            SimInput::ToggleHand => {
                self.present = !self.present;
                debug!("sim hand {}", if self.present { "raised" } else { "hidden" });
            }
            SimInput::Closer => {
                self.depth = (self.depth - SIM_DEPTH_STEP).max(SIM_DEPTH_MIN);
            }
            SimInput::Farther => {
                self.depth = (self.depth + SIM_DEPTH_STEP).min(SIM_DEPTH_MAX);
            }
        }
    }

    fn detections(&self) -> Detections {
        if self.present {
            vec![synthesize_hand(self.depth + tremor(self.cycle))]
        } else {
            Vec::new()
        }
    }
}

impl KeypointSource for SimKeypointSource {
    fn run(mut self: Box<Self>, out: LatestSlot<Detections>) {
        loop {
            loop {
                match self.rx.try_recv() {
                    Ok(input) => self.apply(input),
                    Err(TryRecvError::Empty) => break,
                    Err(TryRecvError::Disconnected) => return,
                }
            }
            self.cycle += 1;
            out.publish(self.detections());
            thread::sleep(SIM_CADENCE);
        }
    }
}

/// Deterministic sub-pixel jitter, so the smoothing stage has real work
/// even with a keyboard hand.
fn tremor(cycle: u64) -> f32 {
    (cycle as f32 * 0.37).sin() * SIM_TREMOR
}

/// Build a complete 21-landmark frame around a reference depth.
///
/// The x/y layout is a stylised open hand in normalised coordinates; only
/// the reference landmark's z is read downstream, but the frame is whole so
/// simulated and real detections look alike to consumers.
pub fn synthesize_hand(z: f32) -> HandFrame {
    // Wrist, then four joints per digit fanning up from it, thumb leftmost.
    const WRIST: (f32, f32) = (0.5, 0.85);
    const DIGIT_ANGLES: [f32; 5] = [2.40, 1.90, 1.57, 1.25, 0.95];

    let mut points = Vec::with_capacity(LANDMARK_COUNT);
    points.push(Landmark { x: WRIST.0, y: WRIST.1, z });
    for angle in DIGIT_ANGLES {
        for joint in 1..=4 {
            let reach = 0.07 * joint as f32;
            points.push(Landmark {
                x: WRIST.0 + angle.cos() * reach,
                y: WRIST.1 - angle.sin() * reach,
                z,
            });
        }
    }
    HandFrame::new(points)
}

// ════════════════════════════════════════════════════════════════════════
//            LeapKeypointSource — real hardware (feature = "leap")
// ════════════════════════════════════════════════════════════════════════

/// Keypoint source backed by a real LeapMotion controller.
///
/// Requires the `leap` feature flag and the LeapC shared library installed.
/// Tracking frames are converted to the 21-landmark layout: palm centre in
/// place of the wrist, then each digit's four joints, thumb first.  LeapC
/// reports millimetres, so the depth mapping's full scale spans a 20 cm
/// approach.
///
/// If the connection cannot be opened the source just exits; the app stays
/// on the searching overlay rather than aborting.
#[cfg(feature = "leap")]
pub struct LeapKeypointSource;

#[cfg(feature = "leap")]
impl KeypointSource for LeapKeypointSource {
    fn run(self: Box<Self>, out: LatestSlot<Detections>) {
        use leaprs::*;

        let mut connection = match Connection::create(ConnectionConfig::default()) {
            Ok(c) => c,
            Err(e) => {
                log::error!("LeapC connection failed: {e:?}; staying in searching mode");
                return;
            }
        };
        if let Err(e) = connection.open() {
            log::error!("LeapMotion device open failed: {e:?}; staying in searching mode");
            return;
        }

        loop {
            let msg = match connection.poll(100) {
                Ok(m) => m,
                Err(_) => continue,
            };
            if let Event::Tracking(frame) = msg.event() {
                let hands: Vec<_> = frame.hands().collect();
                out.publish(hands.iter().map(convert_hand).collect());
            }
        }
    }
}

/// Flatten one LeapC hand into the 21-landmark layout.
#[cfg(feature = "leap")]
fn convert_hand(hand: &leaprs::Hand) -> HandFrame {
    let palm = hand.palm().position();
    let mut points = Vec::with_capacity(LANDMARK_COUNT);
    points.push(Landmark { x: palm.x, y: palm.y, z: palm.z });
    for digit in hand.digits() {
        for joint in [
            digit.metacarpal().next_joint(),
            digit.proximal().next_joint(),
            digit.intermediate().next_joint(),
            digit.distal().next_joint(),
        ] {
            points.push(Landmark { x: joint.x, y: joint.y, z: joint.z });
        }
    }
    HandFrame::new(points)
}

// ════════════════════════════════════════════════════════════════════════
//                                  Tests
// ════════════════════════════════════════════════════════════════════════
