//! Expanding wave propagation and resonance collision
//!
//! Two wave kinds share one list: player-emitted outbound pulses and
//! emitter response pulses traveling back toward the emission point. The
//! per-tick update is strictly ordered: outbound sweep (which may spawn
//! responses) first, then response delivery. Responses spawned this tick
//! are appended after both passes, so they start at radius zero and are
//! never delivered in the tick that created them.

use glam::Vec2;
use log::{debug, info};
use serde::{Deserialize, Serialize};

use super::registry::SignalRegistry;
use super::system::RadioHooks;
use crate::consts::{SIGNAL_BANDWIDTH, WAVE_MAX_RADIUS, WAVE_SPEED};

/// An expanding circular pulse
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Wave {
    /// Player-emitted pulse expanding until it exceeds `max_radius`
    Outbound {
        id: u32,
        origin: Vec2,
        radius: f32,
        max_radius: f32,
        speed: f32,
        frequency: f32,
        emitted_at: f64,
    },
    /// Emitter reply expanding from the signal toward the emission point
    Response {
        id: u32,
        origin: Vec2,
        target: Vec2,
        radius: f32,
        max_radius: f32,
        speed: f32,
        frequency: f32,
        signal_id: u32,
        /// One-way distance from the triggering wave's origin (km)
        distance_km: f32,
        emitted_at: f64,
    },
}

impl Wave {
    pub fn id(&self) -> u32 {
        match self {
            Wave::Outbound { id, .. } | Wave::Response { id, .. } => *id,
        }
    }

    pub fn radius(&self) -> f32 {
        match self {
            Wave::Outbound { radius, .. } | Wave::Response { radius, .. } => *radius,
        }
    }

    pub fn frequency(&self) -> f32 {
        match self {
            Wave::Outbound { frequency, .. } | Wave::Response { frequency, .. } => *frequency,
        }
    }

    pub fn is_response(&self) -> bool {
        matches!(self, Wave::Response { .. })
    }
}

/// A delivered emitter reply, queued FIFO for the decode UI
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponseRecord {
    pub signal_id: u32,
    pub callsign: String,
    pub morse: String,
    /// Round-trip delay in ms: `2 * distance_km * 1000 / speed`
    pub delay_ms: f32,
    pub distance_km: f32,
    /// Received strength at delivery time
    pub strength: f32,
    pub frequency: f32,
    /// Sim clock at delivery (s)
    pub timestamp: f64,
}

/// Owns every propagating wave and the response outbox
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WaveEngine {
    waves: Vec<Wave>,
    responses: Vec<ResponseRecord>,
    next_id: u32,
}

impl WaveEngine {
    pub fn new() -> Self {
        Self {
            waves: Vec::new(),
            responses: Vec::new(),
            next_id: 1,
        }
    }

    fn next_wave_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Emit an outbound pulse from the shelter. Always succeeds.
    pub fn emit_player_wave(&mut self, origin: Vec2, frequency: f32, now: f64) -> u32 {
        let id = self.next_wave_id();
        info!("wave emitted at {frequency:.1} MHz");
        self.waves.push(Wave::Outbound {
            id,
            origin,
            radius: 0.0,
            max_radius: WAVE_MAX_RADIUS,
            speed: WAVE_SPEED,
            frequency,
            emitted_at: now,
        });
        id
    }

    /// Advance every wave by one tick.
    ///
    /// Pass 1 expands outbound waves, drops the exhausted ones, and runs the
    /// annulus sweep against every signal: a resonance fires when the
    /// leading edge crossed the signal this tick and the frequency offset is
    /// within half the bandwidth. There is deliberately no per-signal guard;
    /// a signal sitting exactly on a tick boundary can re-trigger.
    ///
    /// Pass 2 expands response waves and delivers the ones that reached
    /// their target: the signal is marked discovered, the quest item spawns
    /// once per signal, and a record lands in the outbox.
    pub fn update(
        &mut self,
        dt: f32,
        now: f64,
        registry: &mut SignalRegistry,
        hooks: &mut dyn RadioHooks,
    ) {
        let mut spawned: Vec<Wave> = Vec::new();
        let next_id = &mut self.next_id;

        self.waves.retain_mut(|wave| {
            let Wave::Outbound {
                origin,
                radius,
                max_radius,
                speed,
                frequency,
                ..
            } = wave
            else {
                return true;
            };

            *radius += *speed * dt;
            if *radius > *max_radius {
                return false;
            }

            let prev_radius = *radius - *speed * dt;
            for signal in registry.signals() {
                let dist = signal.pos.distance(*origin);
                let swept = dist >= prev_radius && dist <= *radius;
                let resonant = (*frequency - signal.frequency).abs() <= SIGNAL_BANDWIDTH / 2.0;
                if swept && resonant {
                    debug!(
                        "{} resonating at {:.1} MHz, response wave created",
                        signal.callsign, frequency
                    );
                    let id = *next_id;
                    *next_id += 1;
                    spawned.push(Wave::Response {
                        id,
                        origin: signal.pos,
                        target: *origin,
                        radius: 0.0,
                        max_radius: signal.pos.distance(*origin),
                        speed: *speed,
                        frequency: signal.frequency,
                        signal_id: signal.id,
                        distance_km: dist / 1000.0,
                        emitted_at: now,
                    });
                }
            }
            true
        });

        let responses = &mut self.responses;
        self.waves.retain_mut(|wave| {
            let Wave::Response {
                origin,
                target,
                radius,
                max_radius,
                speed,
                frequency,
                signal_id,
                distance_km,
                ..
            } = wave
            else {
                return true;
            };

            *radius += *speed * dt;
            let dist_to_target = origin.distance(*target);

            if *radius >= dist_to_target {
                if let Some(signal) = registry.get_mut(*signal_id) {
                    signal.discovered = true;
                    if !signal.quest_item_spawned {
                        signal.quest_item_spawned = true;
                        hooks.spawn_item("quest_item", signal.pos.x, signal.pos.y);
                        hooks.add_marker(signal.pos.x, signal.pos.y, signal);
                        hooks.log_msg("QUEST ITEM SPAWNED AT SIGNAL LOCATION");
                    }
                    signal.last_wave_emit = now as f32;
                    signal.wave_emit_count += 1;

                    let delay_ms = *distance_km * 2.0 * 1000.0 / *speed;
                    debug!(
                        "response from {} delivered: {:.2} km, {:.2} ms",
                        signal.callsign, distance_km, delay_ms
                    );
                    responses.push(ResponseRecord {
                        signal_id: *signal_id,
                        callsign: signal.callsign.clone(),
                        morse: signal.morse.clone(),
                        delay_ms,
                        distance_km: *distance_km,
                        strength: signal.received_strength,
                        frequency: *frequency,
                        timestamp: now,
                    });
                }
                false
            } else {
                // Missed: expired without reaching the target, unrecorded
                *radius <= *max_radius
            }
        });

        self.waves.append(&mut spawned);
    }

    pub fn waves(&self) -> &[Wave] {
        &self.waves
    }

    /// Pending delivered responses, oldest first
    pub fn responses(&self) -> &[ResponseRecord] {
        &self.responses
    }

    /// Drain the outbox
    pub fn take_responses(&mut self) -> Vec<ResponseRecord> {
        std::mem::take(&mut self.responses)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::radio::signal::SignalConfig;
    use crate::radio::system::NullHooks;

    fn tick_n(engine: &mut WaveEngine, registry: &mut SignalRegistry, n: usize, dt: f32) {
        let mut hooks = NullHooks;
        for i in 0..n {
            engine.update(dt, (i as f64 + 1.0) * dt as f64, registry, &mut hooks);
        }
    }

    #[test]
    fn test_outbound_radius_grows_linearly() {
        let mut engine = WaveEngine::new();
        let mut registry = SignalRegistry::new();
        engine.emit_player_wave(Vec2::ZERO, 150.0, 0.0);

        tick_n(&mut engine, &mut registry, 10, 0.1);
        let r = engine.waves()[0].radius();
        assert!((r - 10.0 * WAVE_SPEED * 0.1).abs() < 1e-2);
    }

    #[test]
    fn test_outbound_removed_past_max_radius() {
        let mut engine = WaveEngine::new();
        let mut registry = SignalRegistry::new();
        engine.emit_player_wave(Vec2::ZERO, 150.0, 0.0);

        // 10 km at 300 m/s is 33.3 s; 34 s of ticks goes past the edge
        tick_n(&mut engine, &mut registry, 340, 0.1);
        assert!(engine.waves().is_empty());
    }

    #[test]
    fn test_resonance_within_half_bandwidth() {
        let mut engine = WaveEngine::new();
        let mut registry = SignalRegistry::new();
        registry.add_signal(Vec2::ZERO, SignalConfig::new(150.0, 0.0, 0.5));

        engine.emit_player_wave(Vec2::ZERO, 150.0 + SIGNAL_BANDWIDTH / 2.0, 0.0);
        tick_n(&mut engine, &mut registry, 30, 0.1);
        assert!(engine.waves().iter().any(|w| w.is_response()));
    }

    #[test]
    fn test_no_resonance_beyond_half_bandwidth() {
        let mut engine = WaveEngine::new();
        let mut registry = SignalRegistry::new();
        registry.add_signal(Vec2::ZERO, SignalConfig::new(150.0, 0.0, 0.5));

        engine.emit_player_wave(Vec2::ZERO, 150.0 + SIGNAL_BANDWIDTH / 2.0 + 0.01, 0.0);
        tick_n(&mut engine, &mut registry, 30, 0.1);
        assert!(!engine.waves().iter().any(|w| w.is_response()));
    }

    #[test]
    fn test_sos_scenario_end_to_end() {
        let mut engine = WaveEngine::new();
        let mut registry = SignalRegistry::new();
        registry.add_signal(
            Vec2::ZERO,
            SignalConfig::new(120.0, 0.0, 2.0)
                .with_message("SOS")
                .with_callsign("KX4-ECHO"),
        );
        registry.recompute_strengths(120.0, 0.0);

        engine.emit_player_wave(Vec2::ZERO, 120.0, 0.0);
        // 2 km out and 2 km back at 300 m/s needs ~13.4 s
        tick_n(&mut engine, &mut registry, 200, 0.1);

        let responses = engine.take_responses();
        assert_eq!(responses.len(), 1);
        let r = &responses[0];
        assert_eq!(r.morse, "... --- ...");
        assert_eq!(r.callsign, "KX4-ECHO");
        assert!((r.distance_km - 2.0).abs() < 1e-3);
        let expected_delay = 2.0 * r.distance_km * 1000.0 / WAVE_SPEED;
        assert!((r.delay_ms - expected_delay).abs() < 1e-3);
        assert!(registry.signals()[0].discovered);
    }

    #[test]
    fn test_quest_item_spawns_exactly_once() {
        struct Counting(u32);
        impl RadioHooks for Counting {
            fn spawn_item(&mut self, _kind: &str, _x: f32, _y: f32) {
                self.0 += 1;
            }
        }

        let mut engine = WaveEngine::new();
        let mut registry = SignalRegistry::new();
        registry.add_signal(Vec2::ZERO, SignalConfig::new(150.0, 0.0, 0.375));

        let mut hooks = Counting(0);
        // Two pings, two deliveries, one quest item
        engine.emit_player_wave(Vec2::ZERO, 150.0, 0.0);
        for i in 0..40 {
            engine.update(0.1, i as f64 * 0.1, &mut registry, &mut hooks);
        }
        engine.emit_player_wave(Vec2::ZERO, 150.0, 4.0);
        for i in 40..80 {
            engine.update(0.1, i as f64 * 0.1, &mut registry, &mut hooks);
        }

        assert!(engine.take_responses().len() >= 2);
        assert_eq!(hooks.0, 1);
    }

    #[test]
    fn test_boundary_duplicate_trigger_is_preserved() {
        // A signal sitting exactly on a tick radius straddles two successive
        // annulus windows ([300, 375] and [375, 450]) and fires twice. The
        // engine keeps this behavior rather than deduplicating.
        let mut engine = WaveEngine::new();
        let mut registry = SignalRegistry::new();
        // 0.375 km = 375 m, exactly 5 ticks of 300 m/s * 0.25 s
        registry.add_signal(Vec2::ZERO, SignalConfig::new(150.0, 0.0, 0.375));

        engine.emit_player_wave(Vec2::ZERO, 150.0, 0.0);
        tick_n(&mut engine, &mut registry, 20, 0.25);

        assert_eq!(engine.take_responses().len(), 2);
    }

    #[test]
    fn test_response_not_delivered_in_spawn_tick() {
        let mut engine = WaveEngine::new();
        let mut registry = SignalRegistry::new();
        registry.add_signal(Vec2::ZERO, SignalConfig::new(150.0, 0.0, 0.03));

        engine.emit_player_wave(Vec2::ZERO, 150.0, 0.0);
        // One tick sweeps past the 30 m signal and spawns the response
        tick_n(&mut engine, &mut registry, 1, 0.1);
        let response = engine.waves().iter().find(|w| w.is_response()).unwrap();
        assert_eq!(response.radius(), 0.0);
        assert!(engine.responses().is_empty());
    }
}
