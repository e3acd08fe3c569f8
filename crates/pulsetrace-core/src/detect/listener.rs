//! Listener capability interface for detection notifications.

use crate::events::TrendChange;

/// Callbacks fired by [`ThresholdDetector`](crate::detect::ThresholdDetector).
///
/// Every method has a no-op default body so implementors only override the
/// notifications they care about. Callbacks run synchronously inside the
/// `record*` call that triggered them.
pub trait PulseListener {
    /// The latest rate reached or exceeded the high threshold.
    fn on_high_pulse(&mut self, bpm: f64) {
        let _ = bpm;
    }

    /// The latest rate reached or fell below the low threshold.
    fn on_low_pulse(&mut self, bpm: f64) {
        let _ = bpm;
    }

    /// Every value across the no-pulse window was zero.
    fn on_no_pulse(&mut self) {}

    /// Reserved for sensor transports that can lose the device. No
    /// detection rule currently invokes this.
    fn on_disconnected(&mut self) {}

    /// The rate rose by at least the trend threshold within the
    /// observation window.
    fn on_pulse_increased(&mut self, change: &TrendChange) {
        let _ = change;
    }

    /// The rate fell by at least the trend threshold within the
    /// observation window.
    fn on_pulse_decreased(&mut self, change: &TrendChange) {
        let _ = change;
    }

    /// This listener was just subscribed to a detector.
    fn on_subscribed(&mut self) {}

    /// This listener was just unsubscribed from a detector.
    fn on_unsubscribed(&mut self) {}
}
