//! Data-driven balance constants
//!
//! `RadioTuning` carries the knobs a host game is expected to rebalance
//! without recompiling: frequency bounds, tuning steps, and the random
//! spawn cadence. Physics constants (wave speed, bandwidth, attenuation)
//! stay in [`crate::consts`]; rebalancing those changes puzzle solutions.

use log::warn;
use serde::{Deserialize, Serialize};

use crate::consts::{
    COARSE_STEP, DEFAULT_ANTENNA_ANGLE, DEFAULT_FREQUENCY, FINE_STEP, FREQ_MAX, FREQ_MIN,
    SIGNAL_SPAWN_INTERVAL,
};

/// Host-adjustable radio balance values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RadioTuning {
    /// Lowest tunable frequency (MHz)
    pub freq_min: f32,
    /// Highest tunable frequency (MHz)
    pub freq_max: f32,
    /// Coarse tuning step (MHz)
    pub coarse_step: f32,
    /// Fine tuning step (MHz)
    pub fine_step: f32,
    /// Power-on frequency (MHz)
    pub default_frequency: f32,
    /// Power-on antenna bearing (degrees)
    pub default_antenna_angle: f32,
    /// Seconds between random survivor spawns
    pub signal_spawn_interval: f32,
}

impl Default for RadioTuning {
    fn default() -> Self {
        Self {
            freq_min: FREQ_MIN,
            freq_max: FREQ_MAX,
            coarse_step: COARSE_STEP,
            fine_step: FINE_STEP,
            default_frequency: DEFAULT_FREQUENCY,
            default_antenna_angle: DEFAULT_ANTENNA_ANGLE,
            signal_spawn_interval: SIGNAL_SPAWN_INTERVAL,
        }
    }
}

impl RadioTuning {
    /// Parse tuning from JSON. Malformed input logs a warning and falls
    /// back to defaults; a missing field takes its default value.
    pub fn from_json(json: &str) -> Self {
        match serde_json::from_str(json) {
            Ok(tuning) => tuning,
            Err(e) => {
                warn!("failed to parse tuning, using defaults: {e}");
                Self::default()
            }
        }
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_consts() {
        let t = RadioTuning::default();
        assert_eq!(t.freq_min, 100.0);
        assert_eq!(t.freq_max, 200.0);
        assert_eq!(t.coarse_step, 5.0);
        assert_eq!(t.fine_step, 0.1);
        assert_eq!(t.default_frequency, 150.0);
        assert_eq!(t.default_antenna_angle, 270.0);
        assert_eq!(t.signal_spawn_interval, 120.0);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let t = RadioTuning::from_json(r#"{"freq_min": 88.0, "freq_max": 108.0}"#);
        assert_eq!(t.freq_min, 88.0);
        assert_eq!(t.freq_max, 108.0);
        assert_eq!(t.coarse_step, 5.0);
    }

    #[test]
    fn test_malformed_json_falls_back() {
        let t = RadioTuning::from_json("not json");
        assert_eq!(t, RadioTuning::default());
    }

    #[test]
    fn test_json_round_trip() {
        let mut t = RadioTuning::default();
        t.signal_spawn_interval = 30.0;
        let parsed = RadioTuning::from_json(&t.to_json());
        assert_eq!(parsed, t);
    }
}
