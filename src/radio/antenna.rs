//! Directional antenna detector
//!
//! Filters the world's wave set down to the subset inside a bearing ±
//! half-angle sector and reception range. All in-range waves land in a
//! per-call cache that the waterfall aggregator reuses the same tick;
//! reflected waves additionally append to a bounded reflection history.

use std::collections::VecDeque;
use std::f32::consts::PI;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::{ANTENNA_RANGE, ANTENNA_SECTOR, REFLECTION_HISTORY_CAP};
use crate::normalize_angle;

/// Category of an ambient wave's emitter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum WaveSource {
    Player,
    Enemy,
    /// Forced-resonance pulse
    Pulse,
    /// Bounced off an obstacle
    Reflection,
    #[default]
    Unknown,
}

impl WaveSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            WaveSource::Player => "player",
            WaveSource::Enemy => "enemy",
            WaveSource::Pulse => "pulse",
            WaveSource::Reflection => "reflection",
            WaveSource::Unknown => "unknown",
        }
    }
}

/// A wave owned by the external reflection subsystem, as seen by the
/// antenna. The detector only reads geometry and flips the one-shot
/// received flag.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AmbientWave {
    pub id: u32,
    /// Wave center (m)
    pub pos: Vec2,
    pub radius: f32,
    /// Heading of the wave front (radians)
    pub angle: f32,
    /// Angular spread; anything over π counts as omnidirectional
    pub spread: f32,
    pub frequency: f32,
    pub source: WaveSource,
    pub reflected: bool,
    /// Obstacle hits accumulated by the reflection subsystem
    pub collision_points: Vec<Vec2>,
    /// One-shot guard so a wave enters the reflection history once
    pub received_by_antenna: bool,
}

impl AmbientWave {
    pub fn new(id: u32, pos: Vec2, radius: f32, frequency: f32, source: WaveSource) -> Self {
        Self {
            id,
            pos,
            radius,
            angle: 0.0,
            spread: 0.0,
            frequency,
            source,
            reflected: false,
            collision_points: Vec::new(),
            received_by_antenna: false,
        }
    }

    pub fn reflected(mut self) -> Self {
        self.reflected = true;
        self
    }

    pub fn omnidirectional(mut self) -> Self {
        self.spread = std::f32::consts::TAU;
        self
    }
}

/// Per-row waterfall annotation for one in-range wave
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WaveContact {
    pub frequency: f32,
    pub source: WaveSource,
    pub reflected: bool,
}

/// A reflected wave the antenna picked up
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReflectionRecord {
    pub wave_id: u32,
    /// Distance from the antenna to the wave center (m)
    pub distance: f32,
    /// Bearing to the wave center (radians)
    pub angle: f32,
    /// Sim clock at reception (s)
    pub timestamp: f64,
    pub collision_points: Vec<Vec2>,
}

/// Directional sector detector with a bounded reflection history
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AntennaDetector {
    /// Bearing (radians)
    direction: f32,
    /// Reception radius (m)
    range: f32,
    /// Full sector angle (radians)
    sector: f32,
    /// In-range waves from the last `detect` call, reused by the waterfall
    waves_in_range: Vec<WaveContact>,
    reflection_history: VecDeque<ReflectionRecord>,
    max_history: usize,
}

impl Default for AntennaDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl AntennaDetector {
    pub fn new() -> Self {
        Self {
            direction: 0.0,
            range: ANTENNA_RANGE,
            sector: ANTENNA_SECTOR,
            waves_in_range: Vec::new(),
            reflection_history: VecDeque::new(),
            max_history: REFLECTION_HISTORY_CAP,
        }
    }

    /// Point the antenna. Normalization happens on read.
    pub fn update_direction(&mut self, angle_rad: f32) {
        self.direction = angle_rad;
    }

    pub fn direction(&self) -> f32 {
        self.direction
    }

    pub fn range(&self) -> f32 {
        self.range
    }

    /// Sweep the wave set. Every wave whose swept band and bearing overlap
    /// the sector lands in the in-range cache; reflected ones also produce
    /// `ReflectionRecord`s, entering the bounded history at most once per
    /// wave. Returns the reflections seen this call.
    pub fn detect(
        &mut self,
        waves: &mut [AmbientWave],
        origin: Vec2,
        now: f64,
    ) -> Vec<ReflectionRecord> {
        self.waves_in_range.clear();
        let mut received = Vec::new();

        for wave in waves.iter_mut() {
            let delta = wave.pos - origin;
            let distance = delta.length();

            // Nearest edge of the annulus; if even that is out of range the
            // swept band cannot intersect [0, range]
            let wave_min_dist = (distance - wave.radius).max(0.0);
            if wave_min_dist > self.range {
                continue;
            }

            let bearing = delta.y.atan2(delta.x);
            let angle_diff = normalize_angle(bearing - self.direction);
            let in_sector = angle_diff.abs() <= self.sector / 2.0 || wave.spread > PI;
            if !in_sector {
                continue;
            }

            let source = if wave.reflected {
                WaveSource::Reflection
            } else {
                wave.source
            };
            self.waves_in_range.push(WaveContact {
                frequency: wave.frequency,
                source,
                reflected: wave.reflected,
            });

            if wave.reflected {
                let collision_points = if wave.collision_points.is_empty() {
                    vec![wave.pos]
                } else {
                    wave.collision_points.clone()
                };
                let record = ReflectionRecord {
                    wave_id: wave.id,
                    distance,
                    angle: bearing,
                    timestamp: now,
                    collision_points,
                };
                received.push(record.clone());

                if !wave.received_by_antenna {
                    wave.received_by_antenna = true;
                    self.record_to_history(record);
                }
            }
        }

        received
    }

    fn record_to_history(&mut self, record: ReflectionRecord) {
        self.reflection_history.push_back(record);
        if self.reflection_history.len() > self.max_history {
            self.reflection_history.pop_front();
        }
    }

    /// Point-in-sector convenience test
    pub fn is_in_range(&self, point: Vec2, origin: Vec2) -> bool {
        let delta = point - origin;
        if delta.length() > self.range {
            return false;
        }
        let angle_diff = normalize_angle(delta.y.atan2(delta.x) - self.direction);
        angle_diff.abs() <= self.sector / 2.0
    }

    pub fn waves_in_range(&self) -> &[WaveContact] {
        &self.waves_in_range
    }

    pub fn reflection_history(&self) -> &VecDeque<ReflectionRecord> {
        &self.reflection_history
    }

    /// The most recent `limit` reflections, oldest first
    pub fn recent_reflections(&self, limit: usize) -> impl Iterator<Item = &ReflectionRecord> {
        let start = self.reflection_history.len().saturating_sub(limit);
        self.reflection_history.iter().skip(start)
    }

    pub fn clear_history(&mut self) {
        self.reflection_history.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wave_at(id: u32, pos: Vec2) -> AmbientWave {
        AmbientWave::new(id, pos, 10.0, 150.0, WaveSource::Enemy)
    }

    #[test]
    fn test_detect_in_sector() {
        let mut antenna = AntennaDetector::new();
        antenna.update_direction(0.0); // facing +X
        let mut waves = vec![wave_at(1, Vec2::new(100.0, 0.0))];

        antenna.detect(&mut waves, Vec2::ZERO, 0.0);
        assert_eq!(antenna.waves_in_range().len(), 1);
        assert_eq!(antenna.waves_in_range()[0].source, WaveSource::Enemy);
    }

    #[test]
    fn test_detect_rejects_off_sector() {
        let mut antenna = AntennaDetector::new();
        antenna.update_direction(0.0);
        // Directly behind the antenna
        let mut waves = vec![wave_at(1, Vec2::new(-100.0, 0.0))];

        let reflections = antenna.detect(&mut waves, Vec2::ZERO, 0.0);
        assert!(reflections.is_empty());
        assert!(antenna.waves_in_range().is_empty());
    }

    #[test]
    fn test_omnidirectional_spread_always_overlaps() {
        let mut antenna = AntennaDetector::new();
        antenna.update_direction(0.0);
        let mut waves = vec![wave_at(1, Vec2::new(-100.0, 0.0)).omnidirectional()];

        antenna.detect(&mut waves, Vec2::ZERO, 0.0);
        assert_eq!(antenna.waves_in_range().len(), 1);
    }

    #[test]
    fn test_swept_band_reaches_origin() {
        let mut antenna = AntennaDetector::new();
        antenna.update_direction(0.0);
        // Center 1 km out, but the 900 m radius brings the band within range
        let mut near = vec![AmbientWave::new(
            1,
            Vec2::new(1000.0, 0.0),
            900.0,
            150.0,
            WaveSource::Player,
        )];
        antenna.detect(&mut near, Vec2::ZERO, 0.0);
        assert_eq!(antenna.waves_in_range().len(), 1);

        // Same center, small radius: completely out of range
        let mut far = vec![AmbientWave::new(
            2,
            Vec2::new(1000.0, 0.0),
            10.0,
            150.0,
            WaveSource::Player,
        )];
        antenna.detect(&mut far, Vec2::ZERO, 0.0);
        assert!(antenna.waves_in_range().is_empty());
    }

    #[test]
    fn test_reflection_recorded_once() {
        let mut antenna = AntennaDetector::new();
        antenna.update_direction(0.0);
        let mut waves = vec![wave_at(1, Vec2::new(100.0, 0.0)).reflected()];

        let first = antenna.detect(&mut waves, Vec2::ZERO, 0.0);
        assert_eq!(first.len(), 1);
        assert_eq!(antenna.reflection_history().len(), 1);
        assert_eq!(antenna.waves_in_range()[0].source, WaveSource::Reflection);

        // Same wave again: still returned per-call, history unchanged
        let second = antenna.detect(&mut waves, Vec2::ZERO, 1.0);
        assert_eq!(second.len(), 1);
        assert_eq!(antenna.reflection_history().len(), 1);
    }

    #[test]
    fn test_reflection_history_fifo_cap() {
        let mut antenna = AntennaDetector::new();
        antenna.update_direction(0.0);
        for i in 0..(REFLECTION_HISTORY_CAP as u32 + 5) {
            let mut waves = vec![wave_at(i, Vec2::new(100.0, 0.0)).reflected()];
            antenna.detect(&mut waves, Vec2::ZERO, i as f64);
        }
        assert_eq!(antenna.reflection_history().len(), REFLECTION_HISTORY_CAP);
        // Oldest records evicted first
        assert_eq!(antenna.reflection_history().front().unwrap().wave_id, 5);
    }

    #[test]
    fn test_recent_reflections_limit() {
        let mut antenna = AntennaDetector::new();
        for i in 0..20u32 {
            let mut waves = vec![wave_at(i, Vec2::new(100.0, 0.0)).reflected()];
            antenna.detect(&mut waves, Vec2::ZERO, i as f64);
        }
        let recent: Vec<_> = antenna.recent_reflections(5).collect();
        assert_eq!(recent.len(), 5);
        assert_eq!(recent[0].wave_id, 15);
        assert_eq!(recent[4].wave_id, 19);
    }

    #[test]
    fn test_empty_wave_list_yields_empty_results() {
        let mut antenna = AntennaDetector::new();
        let reflections = antenna.detect(&mut [], Vec2::ZERO, 0.0);
        assert!(reflections.is_empty());
        assert!(antenna.waves_in_range().is_empty());
    }

    #[test]
    fn test_is_in_range() {
        let mut antenna = AntennaDetector::new();
        antenna.update_direction(0.0);
        assert!(antenna.is_in_range(Vec2::new(100.0, 0.0), Vec2::ZERO));
        // Beyond range
        assert!(!antenna.is_in_range(Vec2::new(500.0, 0.0), Vec2::ZERO));
        // In range but outside the sector
        assert!(!antenna.is_in_range(Vec2::new(0.0, 100.0), Vec2::ZERO));
    }
}
