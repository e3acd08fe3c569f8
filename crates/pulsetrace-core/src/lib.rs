//! # Pulsetrace Core Library
//!
//! This library records a time series of heart-rate measurements and raises
//! callback-style notifications when threshold conditions occur: rate too
//! high, too low, no pulse over a configured span, or rate rising/falling by
//! a configured percentage.
//!
//! ## Architecture
//!
//! - **Series**: an append-only store of (rate, timestamp) pairs with
//!   windowed queries over the recorded history
//! - **Detection**: a stateless evaluator that re-checks the series against
//!   its thresholds after every append and notifies listeners
//! - **Events**: serializable notification payloads plus a bundled listener
//!   that records them for polling consumers
//!
//! The call chain is synchronous and single-threaded: `record` appends, then
//! walks the subscribed detectors in the caller's stack, and each detector
//! walks its listeners the same way. Subscriptions are non-owning weak
//! references on both hops.
//!
//! ## Key Components
//!
//! - [`PulseSeries`]: measurement store and windowed queries
//! - [`ThresholdDetector`]: threshold evaluation and listener notification
//! - [`PulseListener`]: capability interface for notifications
//! - [`DetectorConfig`]: thresholds, fixed at construction
//!
//! ## Usage
//!
//! ```
//! use std::cell::RefCell;
//! use std::rc::Rc;
//!
//! use pulsetrace_core::{
//!     EventLog, PulseListener, PulseSeries, ThresholdDetector, UpdateSink,
//! };
//!
//! let mut series = PulseSeries::new();
//! let detector = Rc::new(RefCell::new(ThresholdDetector::new()));
//! let log = Rc::new(RefCell::new(EventLog::new()));
//!
//! let listener: Rc<RefCell<dyn PulseListener>> = log.clone();
//! detector.borrow_mut().subscribe(&listener);
//!
//! let sink: Rc<RefCell<dyn UpdateSink>> = detector.clone();
//! series.subscribe(&sink);
//!
//! series.record_at(72.0, 0).unwrap();
//! assert_eq!(series.last().unwrap().bpm, 72.0);
//! ```

pub mod detect;
pub mod error;
pub mod events;
pub mod series;

pub use detect::{DetectorConfig, PulseListener, ThresholdDetector, TrendConfig};
pub use error::{ConfigError, SeriesError};
pub use events::{EventLog, PulseEvent, TrendChange};
pub use series::{Measurement, PulseSeries, UpdateSink, Window};
