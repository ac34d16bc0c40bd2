//! Longwave - directional radio simulation engine for a survival game
//!
//! Core modules:
//! - `radio`: Deterministic per-tick simulation (signals, waves, antenna,
//!   waterfall, Morse codec)
//! - `tuning`: Data-driven balance constants
//!
//! The engine is single-threaded and tick-driven: the host calls
//! [`radio::RadioSystem::update`] with a delta time each frame and polls
//! read-only accessors. Rendering and input layers live outside this crate.

pub mod radio;
pub mod tuning;

pub use radio::{MorseCodec, RadioHooks, RadioSystem};
pub use tuning::RadioTuning;

use glam::Vec2;

/// Radio configuration constants
pub mod consts {
    /// Lowest tunable frequency (MHz)
    pub const FREQ_MIN: f32 = 100.0;
    /// Highest tunable frequency (MHz)
    pub const FREQ_MAX: f32 = 200.0;
    /// Coarse tuning step (MHz)
    pub const COARSE_STEP: f32 = 5.0;
    /// Fine tuning step (MHz)
    pub const FINE_STEP: f32 = 0.1;
    /// Total signal bandwidth (MHz); resonance tolerance is half of this
    pub const SIGNAL_BANDWIDTH: f32 = 2.0;
    /// Base spectrum noise level
    pub const NOISE_LEVEL: f32 = 0.15;
    /// Wave propagation speed (m/s, simplified)
    pub const WAVE_SPEED: f32 = 300.0;
    /// Maximum outbound wave radius (m)
    pub const WAVE_MAX_RADIUS: f32 = 10_000.0;
    /// Waterfall history rows
    pub const WATERFALL_HEIGHT: usize = 100;
    /// Spectrum bins per waterfall row
    pub const SPECTRUM_WIDTH: usize = 200;
    /// Received strength below this reads as noise
    pub const NOISE_FLOOR: f32 = 10.0;
    /// Constant receiver gain applied to the strength model
    pub const RECEIVER_GAIN: f32 = 1.5;
    /// Distance attenuation factor per km
    pub const DISTANCE_FALLOFF: f32 = 0.03;
    /// Seconds between random signal spawns
    pub const SIGNAL_SPAWN_INTERVAL: f32 = 120.0;

    /// Antenna reception radius (m)
    pub const ANTENNA_RANGE: f32 = 280.0;
    /// Antenna detection sector (radians, full width)
    pub const ANTENNA_SECTOR: f32 = std::f32::consts::PI / 2.5;
    /// Reflection history cap (FIFO eviction beyond this)
    pub const REFLECTION_HISTORY_CAP: usize = 1000;

    /// Power-on frequency (MHz)
    pub const DEFAULT_FREQUENCY: f32 = 150.0;
    /// Power-on antenna bearing (degrees, 270 = north/up on screen)
    pub const DEFAULT_ANTENNA_ANGLE: f32 = 270.0;
    /// Default signal response emit interval (s)
    pub const WAVE_EMIT_INTERVAL: f32 = 5.0;
}

/// Normalize angle to [-π, π)
#[inline]
pub fn normalize_angle(mut angle: f32) -> f32 {
    use std::f32::consts::PI;
    while angle >= PI {
        angle -= 2.0 * PI;
    }
    while angle < -PI {
        angle += 2.0 * PI;
    }
    angle
}

/// Normalize a bearing difference in degrees to (-180, 180]
#[inline]
pub fn normalize_degrees(mut angle: f32) -> f32 {
    while angle > 180.0 {
        angle -= 360.0;
    }
    while angle < -180.0 {
        angle += 360.0;
    }
    angle
}

/// Project a polar bearing into screen-space world coordinates.
///
/// Convention: 0° = east, angles increase clockwise on screen. The screen
/// Y axis points down, so north (90°) means Y decreases: the sin term is
/// negated. Bearing-dependent consumers rely on this exact sign.
#[inline]
pub fn bearing_to_world(origin: Vec2, direction_deg: f32, distance_m: f32) -> Vec2 {
    let theta = direction_deg.to_radians();
    Vec2::new(
        origin.x + theta.cos() * distance_m,
        origin.y - theta.sin() * distance_m,
    )
}
