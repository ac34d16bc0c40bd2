//! RF emitter ("signal") entity
//!
//! A signal is a stationary emitter with a fixed world position derived
//! once from its polar bearing and distance. Everything about it is
//! immutable after creation except `discovered`, the lifespan countdown,
//! and `received_strength`, which the strength model recomputes per tune.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::morse::MorseCodec;
use crate::bearing_to_world;
use crate::consts::WAVE_EMIT_INTERVAL;

/// Signal category tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SignalKind {
    /// Story-critical signal
    Astronaut,
    #[default]
    Survivor,
    Beacon,
    Interference,
}

impl SignalKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SignalKind::Astronaut => "astronaut",
            SignalKind::Survivor => "survivor",
            SignalKind::Beacon => "beacon",
            SignalKind::Interference => "interference",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "astronaut" => Some(SignalKind::Astronaut),
            "survivor" => Some(SignalKind::Survivor),
            "beacon" => Some(SignalKind::Beacon),
            "interference" => Some(SignalKind::Interference),
            _ => None,
        }
    }
}

/// Parameters for creating a signal. Frequency, direction, and distance are
/// required; the rest default.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignalConfig {
    pub kind: SignalKind,
    /// Carrier frequency (MHz)
    pub frequency: f32,
    /// Polar bearing from the shelter (degrees, 0 = east, clockwise)
    pub direction: f32,
    /// Distance from the shelter (km)
    pub distance: f32,
    pub message: String,
    /// Defaults to `UNKNOWN-xxxx` derived from the assigned id
    pub callsign: Option<String>,
    /// Base strength 0-100
    pub strength: f32,
    pub persistent: bool,
    /// Seconds until the signal expires; ignored when persistent
    pub lifespan: f32,
    /// Seconds between periodic response emissions
    pub wave_emit_interval: f32,
}

impl SignalConfig {
    pub fn new(frequency: f32, direction: f32, distance: f32) -> Self {
        Self {
            kind: SignalKind::default(),
            frequency,
            direction,
            distance,
            message: String::new(),
            callsign: None,
            strength: 50.0,
            persistent: false,
            lifespan: f32::INFINITY,
            wave_emit_interval: WAVE_EMIT_INTERVAL,
        }
    }

    pub fn with_message(mut self, message: &str) -> Self {
        self.message = message.to_string();
        self
    }

    pub fn with_callsign(mut self, callsign: &str) -> Self {
        self.callsign = Some(callsign.to_string());
        self
    }

    pub fn with_strength(mut self, strength: f32) -> Self {
        self.strength = strength;
        self
    }

    pub fn with_kind(mut self, kind: SignalKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_lifespan(mut self, lifespan: f32) -> Self {
        self.lifespan = lifespan;
        self
    }

    pub fn persistent(mut self) -> Self {
        self.persistent = true;
        self
    }
}

/// A stationary RF emitter
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Signal {
    pub id: u32,
    pub kind: SignalKind,
    /// Carrier frequency (MHz)
    pub frequency: f32,
    /// Polar bearing from the shelter (degrees)
    pub direction: f32,
    /// Distance from the shelter (km), fixed at creation
    pub distance: f32,
    /// World position (m), computed once from direction + distance
    pub pos: Vec2,
    pub message: String,
    pub callsign: String,
    /// Base strength 0-100
    pub strength: f32,
    pub persistent: bool,
    /// Remaining lifetime (s); infinite when persistent
    pub lifespan: f32,
    pub discovered: bool,
    /// Strength at the receiver after frequency/direction/distance losses.
    /// Recomputed by the registry whenever the tuner state changes.
    pub received_strength: f32,
    /// Morse encoding of `message`, derived at creation
    pub morse: String,
    /// One-shot guard: quest item materialized for this signal
    pub quest_item_spawned: bool,
    /// Periodic response bookkeeping
    pub wave_emit_interval: f32,
    pub last_wave_emit: f32,
    pub wave_emit_count: u32,
}

impl Signal {
    /// Build a signal from its config, anchored at the shelter origin.
    /// The world position is derived here and never changes afterwards.
    pub fn new(id: u32, origin: Vec2, config: SignalConfig) -> Self {
        let callsign = config
            .callsign
            .unwrap_or_else(|| format!("UNKNOWN-{:04}", id % 10_000));
        let lifespan = if config.persistent {
            f32::INFINITY
        } else {
            config.lifespan
        };
        let pos = bearing_to_world(origin, config.direction, config.distance * 1000.0);

        Self {
            id,
            kind: config.kind,
            frequency: config.frequency,
            direction: config.direction,
            distance: config.distance,
            pos,
            morse: MorseCodec::encode(&config.message),
            message: config.message,
            callsign,
            strength: config.strength,
            persistent: config.persistent,
            lifespan,
            discovered: false,
            received_strength: 0.0,
            quest_item_spawned: false,
            wave_emit_interval: config.wave_emit_interval,
            last_wave_emit: 0.0,
            wave_emit_count: 0,
        }
    }

    /// Advance the lifespan countdown. Returns false once expired.
    pub fn update(&mut self, dt: f32) -> bool {
        if !self.persistent && self.lifespan.is_finite() {
            self.lifespan -= dt;
            return self.lifespan > 0.0;
        }
        true
    }
}
