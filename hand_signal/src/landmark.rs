//! Hand-landmark data model.
//!
//! A detection cycle produces zero or more [`HandFrame`]s, each an ordered
//! list of 21 anatomical [`Landmark`]s in the usual hand-model layout
//! (wrist first, then four joints per digit, thumb through pinky).  Frames
//! are replaced wholesale every cycle; nothing here accumulates.

/// Indices into a well-formed frame, by anatomical name.
pub mod landmarks {
    pub const WRIST: usize = 0;
    pub const THUMB_CMC: usize = 1;
    pub const THUMB_MCP: usize = 2;
    pub const THUMB_IP: usize = 3;
    pub const THUMB_TIP: usize = 4;
    pub const INDEX_FINGER_MCP: usize = 5;
    pub const INDEX_FINGER_PIP: usize = 6;
    pub const INDEX_FINGER_DIP: usize = 7;
    pub const INDEX_FINGER_TIP: usize = 8;
    pub const MIDDLE_FINGER_MCP: usize = 9;
    pub const MIDDLE_FINGER_PIP: usize = 10;
    pub const MIDDLE_FINGER_DIP: usize = 11;
    pub const MIDDLE_FINGER_TIP: usize = 12;
    pub const RING_FINGER_MCP: usize = 13;
    pub const RING_FINGER_PIP: usize = 14;
    pub const RING_FINGER_DIP: usize = 15;
    pub const RING_FINGER_TIP: usize = 16;
    pub const PINKY_MCP: usize = 17;
    pub const PINKY_PIP: usize = 18;
    pub const PINKY_DIP: usize = 19;
    pub const PINKY_TIP: usize = 20;
}

/// Number of landmarks in a well-formed frame.
pub const LANDMARK_COUNT: usize = 21;

/// The landmark whose `z` drives the depth parameter.  The middle-finger
/// knuckle sits near the hand's centroid and barely moves when fingers
/// curl, so it tracks whole-hand depth rather than finger pose.
pub const REFERENCE_LANDMARK: usize = landmarks::MIDDLE_FINGER_MCP;

/// A single keypoint.  `z` grows more negative as the hand approaches the
/// sensor.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

/// One detected hand: landmarks indexed by anatomical position.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct HandFrame {
    points: Vec<Landmark>,
}

impl HandFrame {
    pub fn new(points: Vec<Landmark>) -> Self {
        HandFrame { points }
    }

    /// Landmark at an anatomical index, or `None` for a short frame.
    pub fn landmark(&self, index: usize) -> Option<&Landmark> {
        self.points.get(index)
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Raw depth of the reference landmark.
    ///
    /// `None` when the frame is malformed: too short to contain the
    /// reference landmark, or with a non-finite coordinate there.  Malformed
    /// frames still count as presence; they only withhold depth.
    pub fn reference_depth(&self) -> Option<f32> {
        self.landmark(REFERENCE_LANDMARK)
            .map(|p| p.z)
            .filter(|z| z.is_finite())
    }
}

/// The complete result of one detection cycle.  Empty means no hand in view.
pub type Detections = Vec<HandFrame>;

// ════════════════════════════════════════════════════════════════════════
//                                  Tests
// ════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    fn full_frame(z: f32) -> HandFrame {
        HandFrame::new(
            (0..LANDMARK_COUNT)
                .map(|i| Landmark { x: i as f32, y: 0.0, z })
                .collect(),
        )
    }

    #[test]
    fn landmark_lookup_in_and_out_of_bounds() {
        let frame = full_frame(-5.0);
        assert_eq!(frame.landmark(landmarks::WRIST).map(|p| p.x), Some(0.0));
        assert_eq!(frame.landmark(landmarks::PINKY_TIP).map(|p| p.x), Some(20.0));
        assert!(frame.landmark(LANDMARK_COUNT).is_none());
    }

    #[test]
    fn reference_depth_reads_middle_knuckle() {
        let mut points: Vec<Landmark> = (0..LANDMARK_COUNT)
            .map(|_| Landmark::default())
            .collect();
        points[REFERENCE_LANDMARK].z = -42.5;
        let frame = HandFrame::new(points);
        assert_eq!(frame.reference_depth(), Some(-42.5));
    }

    #[test]
    fn short_frame_has_no_reference_depth() {
        let frame = HandFrame::new(vec![Landmark::default(); 5]);
        assert!(frame.reference_depth().is_none());
        assert!(!frame.is_empty());
    }

    #[test]
    fn non_finite_depth_is_rejected() {
        let mut points = vec![Landmark::default(); LANDMARK_COUNT];
        points[REFERENCE_LANDMARK].z = f32::NAN;
        assert!(HandFrame::new(points.clone()).reference_depth().is_none());
        points[REFERENCE_LANDMARK].z = f32::INFINITY;
        assert!(HandFrame::new(points).reference_depth().is_none());
    }
}
