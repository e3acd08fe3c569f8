//! Notification payloads and the bundled recording listener.
//!
//! Every detector notification has a [`PulseEvent`] representation so
//! consumers that poll instead of implementing callbacks can collect them
//! through an [`EventLog`], and so notifications serialize cleanly for
//! display or export.

use serde::{Deserialize, Serialize};

use crate::detect::PulseListener;

/// A qualifying rise or fall between two measurements in the observation
/// window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrendChange {
    /// Rate at the older end of the detected change.
    pub from_bpm: f64,
    /// The latest rate at detection time.
    pub to_bpm: f64,
    /// Timestamp of the older measurement, epoch milliseconds.
    pub from_epoch_ms: i64,
    /// Timestamp of the latest measurement, epoch milliseconds.
    pub to_epoch_ms: i64,
    /// Percentage change between the two rates.
    pub change_pct: f64,
}

/// One detector notification, mirroring the [`PulseListener`] callbacks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PulseEvent {
    HighPulse { bpm: f64 },
    LowPulse { bpm: f64 },
    NoPulse,
    /// Reserved: no detection rule currently produces this.
    Disconnected,
    PulseIncreased { change: TrendChange },
    PulseDecreased { change: TrendChange },
    Subscribed,
    Unsubscribed,
}

/// Listener that records every notification it receives, in order.
#[derive(Debug, Default)]
pub struct EventLog {
    events: Vec<PulseEvent>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// All recorded events, oldest first.
    pub fn events(&self) -> &[PulseEvent] {
        &self.events
    }

    /// Take all recorded events, leaving the log empty.
    pub fn drain(&mut self) -> Vec<PulseEvent> {
        std::mem::take(&mut self.events)
    }
}

impl PulseListener for EventLog {
    fn on_high_pulse(&mut self, bpm: f64) {
        self.events.push(PulseEvent::HighPulse { bpm });
    }

    fn on_low_pulse(&mut self, bpm: f64) {
        self.events.push(PulseEvent::LowPulse { bpm });
    }

    fn on_no_pulse(&mut self) {
        self.events.push(PulseEvent::NoPulse);
    }

    fn on_disconnected(&mut self) {
        self.events.push(PulseEvent::Disconnected);
    }

    fn on_pulse_increased(&mut self, change: &TrendChange) {
        self.events.push(PulseEvent::PulseIncreased { change: *change });
    }

    fn on_pulse_decreased(&mut self, change: &TrendChange) {
        self.events.push(PulseEvent::PulseDecreased { change: *change });
    }

    fn on_subscribed(&mut self) {
        self.events.push(PulseEvent::Subscribed);
    }

    fn on_unsubscribed(&mut self) {
        self.events.push(PulseEvent::Unsubscribed);
    }
}
