//! Latest-value handoff between a detection thread and the frame loop.
//!
//! The detector publishes at its own cadence; the frame loop reads whatever
//! arrived most recently.  A publish replaces the previous value outright,
//! so there is no queue to drain and no backpressure: a slow producer just
//! means the same value is read again next tick.

use std::sync::{Arc, Mutex, MutexGuard};

/// Shared single-value cell.  Cloning the slot clones the handle, not the
/// value; all clones see the same cell.
#[derive(Debug)]
pub struct LatestSlot<T> {
    inner: Arc<Mutex<Option<T>>>,
}

impl<T> Clone for LatestSlot<T> {
    fn clone(&self) -> Self {
        LatestSlot { inner: Arc::clone(&self.inner) }
    }
}

impl<T> Default for LatestSlot<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> LatestSlot<T> {
    pub fn new() -> Self {
        LatestSlot { inner: Arc::new(Mutex::new(None)) }
    }

    /// Replace the stored value.
    pub fn publish(&self, value: T) {
        *self.lock() = Some(value);
    }

    // A poisoned lock still holds a whole value (the slot is written in one
    // assignment), so recover it rather than propagate the panic.
    fn lock(&self) -> MutexGuard<'_, Option<T>> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl<T: Clone> LatestSlot<T> {
    /// The most recently published value, if any.  The value stays in the
    /// slot, so reads between publishes keep returning it.
    pub fn latest(&self) -> Option<T> {
        self.lock().clone()
    }
}

// ════════════════════════════════════════════════════════════════════════
//                                  Tests
// ════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_empty() {
        let slot: LatestSlot<u32> = LatestSlot::new();
        assert_eq!(slot.latest(), None);
    }

    #[test]
    fn publish_replaces_previous_value() {
        let slot = LatestSlot::new();
        slot.publish(1);
        slot.publish(2);
        assert_eq!(slot.latest(), Some(2));
    }

    #[test]
    fn value_persists_across_reads() {
        let slot = LatestSlot::new();
        slot.publish("hand");
        assert_eq!(slot.latest(), Some("hand"));
        assert_eq!(slot.latest(), Some("hand"));
    }

    #[test]
    fn clones_share_the_cell() {
        let reader: LatestSlot<u32> = LatestSlot::new();
        let writer = reader.clone();
        writer.publish(7);
        assert_eq!(reader.latest(), Some(7));
    }

    #[test]
    fn cross_thread_publish_is_visible() {
        let slot: LatestSlot<u32> = LatestSlot::new();
        let writer = slot.clone();
        std::thread::spawn(move || writer.publish(9))
            .join()
            .unwrap();
        assert_eq!(slot.latest(), Some(9));
    }
}
