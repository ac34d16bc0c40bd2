//! Signal registry: emitter lifecycle and the received-strength model
//!
//! The registry exclusively owns every signal. External consumers get
//! read accessors only; the single mutation the strength model performs
//! is `received_strength`.

use glam::Vec2;
use log::{debug, info};
use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::signal::{Signal, SignalConfig, SignalKind};
use crate::consts::{DISTANCE_FALLOFF, NOISE_FLOOR, RECEIVER_GAIN, SIGNAL_BANDWIDTH};
use crate::normalize_degrees;

/// Messages random survivors broadcast
const DISTRESS_MESSAGES: [&str; 9] = [
    "SOS", "HELP", "RESCUE", "ALIVE", "STRANDED", "SUPPLIES", "SHELTER", "DANGER", "EVAC",
];

/// Owns the set of RF emitters
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SignalRegistry {
    signals: Vec<Signal>,
    next_id: u32,
}

impl SignalRegistry {
    pub fn new() -> Self {
        Self {
            signals: Vec::new(),
            next_id: 1,
        }
    }

    fn next_signal_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Create a signal anchored at the shelter origin. Returns its id.
    pub fn add_signal(&mut self, origin: Vec2, config: SignalConfig) -> u32 {
        let id = self.next_signal_id();
        let signal = Signal::new(id, origin, config);
        info!(
            "signal added: {} at ({:.1}, {:.1}), {:.1} MHz",
            signal.callsign, signal.pos.x, signal.pos.y, signal.frequency
        );
        self.signals.push(signal);
        id
    }

    /// Spawn a roaming survivor/beacon signal with randomized parameters.
    pub fn spawn_random_signal(
        &mut self,
        origin: Vec2,
        freq_min: f32,
        freq_max: f32,
        rng: &mut Pcg32,
    ) -> u32 {
        let kind = if rng.random::<f32>() < 0.5 {
            SignalKind::Survivor
        } else {
            SignalKind::Beacon
        };
        let message = DISTRESS_MESSAGES[rng.random_range(0..DISTRESS_MESSAGES.len())];
        let callsign = format!("SURV-{}", rng.random_range(1000..10_000));

        let config = SignalConfig::new(
            freq_min + rng.random::<f32>() * (freq_max - freq_min),
            rng.random::<f32>() * 360.0,
            1.0 + rng.random::<f32>() * 9.0,
        )
        .with_kind(kind)
        .with_message(message)
        .with_callsign(&callsign)
        .with_strength(30.0 + rng.random::<f32>() * 50.0)
        .with_lifespan(300.0 + rng.random::<f32>() * 600.0);

        self.add_signal(origin, config)
    }

    /// Decay lifespans and drop expired signals. Returns the callsigns of
    /// everything that went silent this tick.
    pub fn update(&mut self, dt: f32) -> Vec<String> {
        let mut lost = Vec::new();
        self.signals.retain_mut(|signal| {
            if signal.update(dt) {
                true
            } else {
                debug!("signal expired: {}", signal.callsign);
                lost.push(signal.callsign.clone());
                false
            }
        });
        lost
    }

    /// Remove a signal by id. Returns it if it existed.
    pub fn remove_signal(&mut self, id: u32) -> Option<Signal> {
        let idx = self.signals.iter().position(|s| s.id == id)?;
        let signal = self.signals.remove(idx);
        info!("signal removed: {}", signal.callsign);
        Some(signal)
    }

    /// Recompute `received_strength` for every signal from tuner state.
    ///
    /// - frequency match: Gaussian falloff, zero outside the bandwidth
    /// - direction match: squared-cosine beam with a 0.3 floor when mis-aimed
    /// - distance: `1 / (1 + km * 0.03)`
    pub fn recompute_strengths(&mut self, tuner_freq: f32, antenna_deg: f32) {
        for signal in &mut self.signals {
            let freq_diff = (signal.frequency - tuner_freq).abs();
            let frequency_match = if freq_diff < SIGNAL_BANDWIDTH {
                (-(freq_diff / (SIGNAL_BANDWIDTH * 2.0)).powi(2)).exp()
            } else {
                0.0
            };

            let angle_diff = normalize_degrees(signal.direction - antenna_deg).abs();
            let direction_match = angle_diff.to_radians().cos().powi(2) * 0.7 + 0.3;

            let distance_attenuation = 1.0 / (1.0 + signal.distance * DISTANCE_FALLOFF);

            signal.received_strength = signal.strength
                * frequency_match
                * direction_match
                * distance_attenuation
                * RECEIVER_GAIN;
        }
    }

    /// The signal with the highest received strength, if it clears the
    /// noise floor.
    pub fn strongest_signal(&self) -> Option<&Signal> {
        let strongest = self
            .signals
            .iter()
            .max_by(|a, b| {
                a.received_strength
                    .partial_cmp(&b.received_strength)
                    .unwrap_or(std::cmp::Ordering::Equal)
            })?;
        (strongest.received_strength > NOISE_FLOOR).then_some(strongest)
    }

    pub fn signals(&self) -> &[Signal] {
        &self.signals
    }

    pub fn signals_mut(&mut self) -> &mut [Signal] {
        &mut self.signals
    }

    pub fn get(&self, id: u32) -> Option<&Signal> {
        self.signals.iter().find(|s| s.id == id)
    }

    pub fn get_mut(&mut self, id: u32) -> Option<&mut Signal> {
        self.signals.iter_mut().find(|s| s.id == id)
    }

    pub fn len(&self) -> usize {
        self.signals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.signals.is_empty()
    }
}
