//! Detector configuration.
//!
//! All thresholds are fixed at construction time; there is no runtime
//! reconfiguration. Trend detection is opt-in: it only runs when a
//! [`TrendConfig`] is present, since an observation window without a
//! threshold (or the reverse) is meaningless.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Thresholds evaluated after every recorded measurement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectorConfig {
    /// Rates at or above this fire `on_high_pulse`.
    #[serde(default = "default_high_bpm")]
    pub high_bpm: f64,
    /// Rates at or below this fire `on_low_pulse`.
    #[serde(default = "default_low_bpm")]
    pub low_bpm: f64,
    /// Span over which every value must be zero to fire `on_no_pulse`.
    #[serde(default = "default_no_pulse_window_ms")]
    pub no_pulse_window_ms: i64,
    /// Increase/decrease detection; inactive when absent.
    #[serde(default)]
    pub trend: Option<TrendConfig>,
}

/// Percentage-trend detection over a trailing observation window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrendConfig {
    /// Width of the trailing window the scan runs over.
    pub observation_window_ms: i64,
    /// Minimum percentage change that fires a notification.
    pub threshold_pct: f64,
}

fn default_high_bpm() -> f64 {
    300.0
}

fn default_low_bpm() -> f64 {
    10.0
}

fn default_no_pulse_window_ms() -> i64 {
    5000
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            high_bpm: default_high_bpm(),
            low_bpm: default_low_bpm(),
            no_pulse_window_ms: default_no_pulse_window_ms(),
            trend: None,
        }
    }
}

impl DetectorConfig {
    /// Parse a config from TOML and validate it.
    ///
    /// Missing keys fall back to the defaults.
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize the config to TOML.
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Check the configuration invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.high_bpm < self.low_bpm {
            return Err(ConfigError::InvalidValue {
                field: "high_bpm".to_string(),
                message: format!(
                    "high threshold {} is below low threshold {}",
                    self.high_bpm, self.low_bpm
                ),
            });
        }
        if self.no_pulse_window_ms <= 0 {
            return Err(ConfigError::InvalidValue {
                field: "no_pulse_window_ms".to_string(),
                message: "window must be positive".to_string(),
            });
        }
        if let Some(trend) = &self.trend {
            if trend.observation_window_ms <= 0 {
                return Err(ConfigError::InvalidValue {
                    field: "trend.observation_window_ms".to_string(),
                    message: "window must be positive".to_string(),
                });
            }
            if trend.threshold_pct < 0.0 {
                return Err(ConfigError::InvalidValue {
                    field: "trend.threshold_pct".to_string(),
                    message: "threshold must be non-negative".to_string(),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = DetectorConfig::default();
        assert_eq!(config.high_bpm, 300.0);
        assert_eq!(config.low_bpm, 10.0);
        assert_eq!(config.no_pulse_window_ms, 5000);
        assert!(config.trend.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_toml_round_trip() {
        let config = DetectorConfig {
            high_bpm: 180.0,
            low_bpm: 40.0,
            no_pulse_window_ms: 3000,
            trend: Some(TrendConfig {
                observation_window_ms: 10_000,
                threshold_pct: 50.0,
            }),
        };
        let raw = config.to_toml_string().unwrap();
        let parsed = DetectorConfig::from_toml_str(&raw).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_missing_keys_fall_back_to_defaults() {
        let parsed = DetectorConfig::from_toml_str("high_bpm = 200.0\n").unwrap();
        assert_eq!(parsed.high_bpm, 200.0);
        assert_eq!(parsed.low_bpm, 10.0);
        assert_eq!(parsed.no_pulse_window_ms, 5000);
        assert!(parsed.trend.is_none());
    }

    #[test]
    fn test_validate_rejects_inverted_thresholds() {
        let config = DetectorConfig {
            high_bpm: 30.0,
            low_bpm: 60.0,
            ..DetectorConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { field, .. }) if field == "high_bpm"
        ));
    }

    #[test]
    fn test_validate_rejects_non_positive_windows() {
        let config = DetectorConfig {
            no_pulse_window_ms: 0,
            ..DetectorConfig::default()
        };
        assert!(config.validate().is_err());

        let config = DetectorConfig {
            trend: Some(TrendConfig {
                observation_window_ms: -1,
                threshold_pct: 50.0,
            }),
            ..DetectorConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_parse_error_is_reported() {
        assert!(matches!(
            DetectorConfig::from_toml_str("high_bpm = \"fast\""),
            Err(ConfigError::Parse(_))
        ));
    }
}
