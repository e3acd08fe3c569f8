//! Threshold detection engine.
//!
//! The detector subscribes to a [`PulseSeries`] as an [`UpdateSink`] and
//! re-evaluates the whole recorded history after every append. Detection is
//! stateless -- there is no per-listener debouncing, so a condition that
//! keeps holding re-fires on every subsequent append.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use crate::detect::config::DetectorConfig;
use crate::detect::listener::PulseListener;
use crate::events::TrendChange;
use crate::series::{Measurement, PulseSeries, UpdateSink, Window};

/// Evaluates threshold conditions against a series and notifies listeners.
pub struct ThresholdDetector {
    config: DetectorConfig,
    /// Subscribed listeners in subscription order. Non-owning.
    listeners: Vec<Weak<RefCell<dyn PulseListener>>>,
}

impl ThresholdDetector {
    /// Detector with the built-in default thresholds.
    pub fn new() -> Self {
        Self::with_config(DetectorConfig::default())
    }

    pub fn with_config(config: DetectorConfig) -> Self {
        Self {
            config,
            listeners: Vec::new(),
        }
    }

    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    /// Subscribe a listener and immediately fire `on_subscribed` on it.
    pub fn subscribe(&mut self, listener: &Rc<RefCell<dyn PulseListener>>) {
        self.listeners.push(Rc::downgrade(listener));
        listener.borrow_mut().on_subscribed();
    }

    /// Remove the first matching subscription and fire `on_unsubscribed`.
    ///
    /// The callback fires whether or not the listener was subscribed.
    pub fn unsubscribe(&mut self, listener: &Rc<RefCell<dyn PulseListener>>) {
        let target = Rc::downgrade(listener);
        if let Some(pos) = self.listeners.iter().position(|l| l.ptr_eq(&target)) {
            self.listeners.remove(pos);
        }
        listener.borrow_mut().on_unsubscribed();
    }

    fn each_listener(&self, mut notify: impl FnMut(&mut dyn PulseListener)) {
        for listener in &self.listeners {
            if let Some(listener) = listener.upgrade() {
                notify(&mut *listener.borrow_mut());
            }
        }
    }

    // ── Checks ───────────────────────────────────────────────────────

    fn check_increase(&self, series: &PulseSeries) {
        let Some(trend) = self.config.trend else {
            return;
        };
        let Ok(window) = series.window_from_end(trend.observation_window_ms) else {
            return;
        };
        let Ok(latest) = series.last() else {
            return;
        };
        if let Some(change) = rising_change(&window, latest, trend.threshold_pct) {
            self.each_listener(|l| l.on_pulse_increased(&change));
        }
    }

    fn check_decrease(&self, series: &PulseSeries) {
        let Some(trend) = self.config.trend else {
            return;
        };
        let Ok(window) = series.window_from_end(trend.observation_window_ms) else {
            return;
        };
        let Ok(latest) = series.last() else {
            return;
        };
        if let Some(change) = falling_change(&window, latest, trend.threshold_pct) {
            self.each_listener(|l| l.on_pulse_decreased(&change));
        }
    }

    fn check_high(&self, series: &PulseSeries) {
        let Ok(latest) = series.last() else {
            return;
        };
        if latest.bpm >= self.config.high_bpm {
            self.each_listener(|l| l.on_high_pulse(latest.bpm));
        }
    }

    fn check_low(&self, series: &PulseSeries) {
        let Ok(latest) = series.last() else {
            return;
        };
        if latest.bpm <= self.config.low_bpm {
            self.each_listener(|l| l.on_low_pulse(latest.bpm));
        }
    }

    fn check_no_pulse(&self, series: &PulseSeries) {
        let Ok(window) = series.window_from_end(self.config.no_pulse_window_ms) else {
            return;
        };
        // A window still shorter than the configured span never fires.
        if window.span_ms() >= self.config.no_pulse_window_ms
            && window.values.iter().all(|&bpm| bpm == 0.0)
        {
            self.each_listener(|l| l.on_no_pulse());
        }
    }
}

impl UpdateSink for ThresholdDetector {
    /// Runs the five checks in fixed order. They are independent: none
    /// short-circuits another, and each fetches its own window.
    fn on_update(&mut self, series: &PulseSeries) {
        self.listeners.retain(|l| l.strong_count() > 0);
        self.check_increase(series);
        self.check_decrease(series);
        self.check_high(series);
        self.check_low(series);
        self.check_no_pulse(series);
    }
}

impl Default for ThresholdDetector {
    fn default() -> Self {
        Self::new()
    }
}

/// Scan for a rise of at least `threshold_pct` against the latest rate.
///
/// Walks the window from the second-newest entry down to the oldest and
/// stops at the first qualifying candidate. Zero-valued candidates are
/// skipped. At most one change per update.
fn rising_change(window: &Window<'_>, latest: Measurement, threshold_pct: f64) -> Option<TrendChange> {
    for i in (0..window.len().saturating_sub(1)).rev() {
        let candidate = window.values[i];
        if candidate <= 0.0 {
            continue;
        }
        let change_pct = (100.0 / candidate) * latest.bpm - 100.0;
        if change_pct >= threshold_pct {
            return Some(TrendChange {
                from_bpm: candidate,
                to_bpm: latest.bpm,
                from_epoch_ms: window.timestamps[i],
                to_epoch_ms: latest.epoch_ms,
                change_pct,
            });
        }
    }
    None
}

/// Symmetric scan for a fall of at least `threshold_pct`.
fn falling_change(window: &Window<'_>, latest: Measurement, threshold_pct: f64) -> Option<TrendChange> {
    for i in (0..window.len().saturating_sub(1)).rev() {
        let candidate = window.values[i];
        if candidate <= 0.0 {
            continue;
        }
        let change_pct = 100.0 - (100.0 / candidate) * latest.bpm;
        if change_pct >= threshold_pct {
            return Some(TrendChange {
                from_bpm: candidate,
                to_bpm: latest.bpm,
                from_epoch_ms: window.timestamps[i],
                to_epoch_ms: latest.epoch_ms,
                change_pct,
            });
        }
    }
    None
}
