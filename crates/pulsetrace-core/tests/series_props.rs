//! Property tests for the series store contracts.

use proptest::prelude::*;
use pulsetrace_core::{PulseSeries, SeriesError};

fn series_from(values: &[f64]) -> PulseSeries {
    let mut series = PulseSeries::new();
    for (i, &bpm) in values.iter().enumerate() {
        series.record_at(bpm, i as i64 * 1000).unwrap();
    }
    series
}

proptest! {
    #[test]
    fn record_then_last_returns_the_value(bpm in 0.0f64..500.0) {
        let mut series = PulseSeries::new();
        let before = chrono::Utc::now().timestamp_millis();
        let at = series.record(bpm).unwrap();
        let last = series.last().unwrap();
        prop_assert_eq!(last.bpm, bpm);
        prop_assert_eq!(last.epoch_ms, at);
        prop_assert!(at >= before);
    }

    #[test]
    fn negative_rates_leave_the_series_unchanged(
        valid in proptest::collection::vec(0.0f64..500.0, 0..20),
        bad in -500.0f64..-0.0001,
    ) {
        let mut series = series_from(&valid);
        let err = series.record_at(bad, 999_999).unwrap_err();
        prop_assert_eq!(err, SeriesError::NegativeRate(bad));
        prop_assert_eq!(series.len(), valid.len());
        prop_assert_eq!(series.values().len(), series.timestamps().len());
    }

    #[test]
    fn oversized_window_equals_all(
        values in proptest::collection::vec(0.0f64..500.0, 1..20),
    ) {
        let series = series_from(&values);
        let span = series.timestamps().last().unwrap() - series.timestamps()[0];
        let window = series.window_from_end(span + 1).unwrap();
        prop_assert_eq!(window.values, series.values());
        prop_assert_eq!(window.timestamps, series.timestamps());
    }

    #[test]
    fn last_n_clamps_and_preserves_order(
        values in proptest::collection::vec(0.0f64..500.0, 0..20),
        n in 0usize..30,
    ) {
        let series = series_from(&values);
        let window = series.last_n(n);
        let expected = n.min(values.len());
        prop_assert_eq!(window.len(), expected);
        prop_assert_eq!(window.values, &values[values.len() - expected..]);
    }

    #[test]
    fn window_from_end_is_a_suffix_within_span(
        values in proptest::collection::vec(0.0f64..500.0, 1..20),
        duration in 0i64..30_000,
    ) {
        let series = series_from(&values);
        let window = series.window_from_end(duration).unwrap();
        prop_assert!(!window.is_empty());
        // Always a suffix: the newest entry is the series' newest.
        prop_assert_eq!(window.last().unwrap(), series.last().unwrap());
        let full_span = series.all().span_ms();
        if duration <= full_span {
            // The boundary entry is included, so the window covers at least
            // the requested duration...
            prop_assert!(window.span_ms() >= duration);
            // ...while everything after it lies strictly inside it.
            if window.len() >= 2 {
                let inner_span = window.timestamps[window.len() - 1] - window.timestamps[1];
                prop_assert!(inner_span < duration);
            }
        } else {
            prop_assert_eq!(window.len(), series.len());
        }
    }

    #[test]
    fn closed_interval_of_recorded_endpoints_is_inclusive(
        values in proptest::collection::vec(0.0f64..500.0, 1..20),
        a in 0usize..20,
        b in 0usize..20,
    ) {
        let series = series_from(&values);
        let a = a.min(values.len() - 1);
        let b = b.min(values.len() - 1);
        let window = series.closed_interval(a as i64 * 1000, b as i64 * 1000);
        if a <= b {
            prop_assert_eq!(window.len(), b - a + 1);
        } else {
            prop_assert!(window.is_empty());
        }
    }
}
