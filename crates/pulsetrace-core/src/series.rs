//! Append-only heart-rate time series with windowed queries.
//!
//! The series keeps two parallel vectors -- measured rates and their
//! timestamps in epoch milliseconds. Insertion order is time order: callers
//! that supply their own timestamps are trusted, nothing is re-sorted.
//!
//! Every successful append synchronously notifies the subscribed
//! [`UpdateSink`]s in subscription order, in the caller's stack. The series
//! does not own its sinks; subscriptions are held as weak references and
//! entries whose owner has been dropped are pruned on the next append.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SeriesError};

/// One recorded (rate, timestamp) pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    /// Measured rate in beats per minute. Never negative.
    pub bpm: f64,
    /// Time of the measurement in milliseconds since the Unix epoch.
    pub epoch_ms: i64,
}

/// Receiver for append notifications.
///
/// A sink subscribed to a [`PulseSeries`] is called after every successful
/// append, while the series already contains the new measurement.
pub trait UpdateSink {
    fn on_update(&mut self, series: &PulseSeries);
}

/// Read-only view over an aligned slice of the series.
///
/// `values[i]` was recorded at `timestamps[i]`.
#[derive(Debug, Clone, Copy)]
pub struct Window<'a> {
    pub values: &'a [f64],
    pub timestamps: &'a [i64],
}

impl<'a> Window<'a> {
    pub(crate) const EMPTY: Window<'static> = Window {
        values: &[],
        timestamps: &[],
    };

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Milliseconds between the oldest and newest entry; 0 for windows with
    /// fewer than two entries.
    pub fn span_ms(&self) -> i64 {
        match (self.timestamps.first(), self.timestamps.last()) {
            (Some(&first), Some(&last)) => last - first,
            _ => 0,
        }
    }

    pub fn get(&self, index: usize) -> Option<Measurement> {
        match (self.values.get(index), self.timestamps.get(index)) {
            (Some(&bpm), Some(&epoch_ms)) => Some(Measurement { bpm, epoch_ms }),
            _ => None,
        }
    }

    pub fn first(&self) -> Option<Measurement> {
        self.get(0)
    }

    pub fn last(&self) -> Option<Measurement> {
        self.get(self.len().checked_sub(1)?)
    }

    pub fn iter(&self) -> impl Iterator<Item = Measurement> + 'a {
        let values = self.values;
        let timestamps = self.timestamps;
        values
            .iter()
            .zip(timestamps.iter())
            .map(|(&bpm, &epoch_ms)| Measurement { bpm, epoch_ms })
    }
}

/// Append-only store of heart-rate measurements.
///
/// Values and timestamps live in parallel vectors of equal length; all
/// recorded values are non-negative. Queries never mutate.
#[derive(Default)]
pub struct PulseSeries {
    /// Measured rates, oldest first.
    bpm: Vec<f64>,
    /// Timestamps in epoch milliseconds, aligned with `bpm`.
    epoch_ms: Vec<i64>,
    /// Subscribed sinks in subscription order. Non-owning.
    sinks: Vec<Weak<RefCell<dyn UpdateSink>>>,
}

impl PulseSeries {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Recording ────────────────────────────────────────────────────

    /// Record a rate stamped with the current wall clock.
    ///
    /// Rejects negative rates with [`SeriesError::NegativeRate`]; nothing is
    /// appended and no sink fires. On success every subscribed sink is
    /// notified synchronously and the timestamp used is returned.
    pub fn record(&mut self, bpm: f64) -> Result<i64> {
        self.record_at(bpm, Utc::now().timestamp_millis())
    }

    /// Record a (rate, timestamp) pair supplied by the caller.
    ///
    /// The timestamp is trusted as-is -- appending out of time order is the
    /// caller's responsibility. Same rejection and notification contract as
    /// [`record`](Self::record).
    pub fn record_at(&mut self, bpm: f64, epoch_ms: i64) -> Result<i64> {
        if bpm < 0.0 {
            return Err(SeriesError::NegativeRate(bpm));
        }
        self.bpm.push(bpm);
        self.epoch_ms.push(epoch_ms);
        self.sinks.retain(|sink| sink.strong_count() > 0);
        self.notify_sinks();
        Ok(epoch_ms)
    }

    fn notify_sinks(&self) {
        for sink in &self.sinks {
            if let Some(sink) = sink.upgrade() {
                sink.borrow_mut().on_update(self);
            }
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn len(&self) -> usize {
        self.bpm.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bpm.is_empty()
    }

    /// All recorded rates, oldest first.
    pub fn values(&self) -> &[f64] {
        &self.bpm
    }

    /// All recorded timestamps, oldest first.
    pub fn timestamps(&self) -> &[i64] {
        &self.epoch_ms
    }

    /// The most recent measurement.
    pub fn last(&self) -> Result<Measurement> {
        match (self.bpm.last(), self.epoch_ms.last()) {
            (Some(&bpm), Some(&epoch_ms)) => Ok(Measurement { bpm, epoch_ms }),
            _ => Err(SeriesError::Empty),
        }
    }

    /// The full series as a read-only window.
    pub fn all(&self) -> Window<'_> {
        Window {
            values: &self.bpm,
            timestamps: &self.epoch_ms,
        }
    }

    /// The trailing window covering the last `duration_ms` milliseconds.
    ///
    /// Scans backward from the newest entry while the timestamp is newer
    /// than `last - duration_ms`; the entry the scan stops on is included,
    /// so the window's span can overshoot `duration_ms` by one sampling gap.
    /// If `duration_ms` exceeds the full recorded span the whole series is
    /// returned. Fails with [`SeriesError::Empty`] on an empty series.
    pub fn window_from_end(&self, duration_ms: i64) -> Result<Window<'_>> {
        let last = *self.epoch_ms.last().ok_or(SeriesError::Empty)?;
        let first = self.epoch_ms[0];
        if duration_ms > last - first {
            return Ok(self.all());
        }

        let cutoff = last - duration_ms;
        let mut from = self.epoch_ms.len() - 1;
        while from > 0 && self.epoch_ms[from] > cutoff {
            from -= 1;
        }

        Ok(Window {
            values: &self.bpm[from..],
            timestamps: &self.epoch_ms[from..],
        })
    }

    /// Measurements with `start_epoch_ms <= t < start_epoch_ms + duration_ms`.
    ///
    /// The start boundary is located by scanning backward from the newest
    /// entry, the end boundary by scanning forward from there. Degenerate
    /// inputs -- an empty series, a start past the newest entry, a zero or
    /// negative duration -- return an empty window rather than failing.
    pub fn range_from(&self, duration_ms: i64, start_epoch_ms: i64) -> Window<'_> {
        if self.epoch_ms.is_empty() {
            return Window::EMPTY;
        }
        let end_epoch_ms = start_epoch_ms + duration_ms;

        let mut start = self.epoch_ms.len() - 1;
        while start > 0 && self.epoch_ms[start - 1] >= start_epoch_ms {
            start -= 1;
        }
        if self.epoch_ms[start] < start_epoch_ms {
            // Every entry predates the requested start.
            return Window::EMPTY;
        }

        let mut end = start;
        while end < self.epoch_ms.len() && self.epoch_ms[end] < end_epoch_ms {
            end += 1;
        }

        Window {
            values: &self.bpm[start..end],
            timestamps: &self.epoch_ms[start..end],
        }
    }

    /// The final `n` measurements in recorded order.
    ///
    /// `n = 0` yields an empty window; `n >= len` yields everything.
    pub fn last_n(&self, n: usize) -> Window<'_> {
        let from = self.bpm.len().saturating_sub(n);
        Window {
            values: &self.bpm[from..],
            timestamps: &self.epoch_ms[from..],
        }
    }

    /// Measurements between two recorded timestamps, inclusive.
    ///
    /// Both endpoints are looked up by exact value (first occurrence) in the
    /// timestamp sequence. Empty if either timestamp was never recorded or
    /// the start lies after the end.
    pub fn closed_interval(&self, from_epoch_ms: i64, to_epoch_ms: i64) -> Window<'_> {
        let from = self.epoch_ms.iter().position(|&t| t == from_epoch_ms);
        let to = self.epoch_ms.iter().position(|&t| t == to_epoch_ms);
        match (from, to) {
            (Some(from), Some(to)) if from <= to => Window {
                values: &self.bpm[from..=to],
                timestamps: &self.epoch_ms[from..=to],
            },
            _ => Window::EMPTY,
        }
    }

    // ── Subscriptions ────────────────────────────────────────────────

    /// Subscribe a sink to append notifications.
    ///
    /// Subscription order is notification order; duplicates are not
    /// rejected. Unlike [`ThresholdDetector::subscribe`] this fires no
    /// callback on the sink.
    ///
    /// [`ThresholdDetector::subscribe`]: crate::detect::ThresholdDetector::subscribe
    pub fn subscribe(&mut self, sink: &Rc<RefCell<dyn UpdateSink>>) {
        self.sinks.push(Rc::downgrade(sink));
    }

    /// Remove the first matching subscription, if any.
    pub fn unsubscribe(&mut self, sink: &Rc<RefCell<dyn UpdateSink>>) {
        let target = Rc::downgrade(sink);
        if let Some(pos) = self.sinks.iter().position(|s| s.ptr_eq(&target)) {
            self.sinks.remove(pos);
        }
    }
}

impl fmt::Debug for PulseSeries {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PulseSeries")
            .field("len", &self.bpm.len())
            .field("sinks", &self.sinks.len())
            .finish()
    }
}
