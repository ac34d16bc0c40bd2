//! Radio system facade
//!
//! Owns the registry, wave engine, antenna, and waterfall, and drives them
//! in the load-bearing per-tick order: signal lifecycle decay, wave
//! expansion, antenna detection, waterfall snapshot. The waterfall must see
//! the antenna cache refreshed *this* tick, so the order is fixed.
//!
//! All collaborators are injected: hooks for the outside world, a seed for
//! the RNG. There are no module-level globals.

use glam::Vec2;
use log::info;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::antenna::{AmbientWave, AntennaDetector, ReflectionRecord, WaveContact};
use super::morse::{DegradedMessage, MorseCodec};
use super::registry::SignalRegistry;
use super::signal::{Signal, SignalConfig};
use super::waterfall::WaterfallAggregator;
use super::wave::{ResponseRecord, Wave, WaveEngine};
use crate::tuning::RadioTuning;

/// Outbound notifications to the host game. Every hook defaults to a
/// no-op, so a missing collaborator degrades silently instead of failing.
pub trait RadioHooks {
    /// User-visible event line
    fn log_msg(&mut self, _message: &str) {}
    /// Materialize a quest item in the world
    fn spawn_item(&mut self, _kind: &str, _x: f32, _y: f32) {}
    /// Fired after every successful tune
    fn frequency_changed(&mut self, _freq: f32) {}
    /// External map annotation for a discovered signal
    fn add_marker(&mut self, _x: f32, _y: f32, _signal: &Signal) {}
}

/// Hooks that do nothing; the default collaborator
pub struct NullHooks;

impl RadioHooks for NullHooks {}

/// The complete radio simulation
pub struct RadioSystem {
    /// Tuned frequency (MHz), always within bounds, one-decimal rounded
    frequency: f32,
    /// Antenna bearing (degrees, [0, 360))
    antenna_angle: f32,
    freq_min: f32,
    freq_max: f32,
    /// Shelter/player origin (m), synced every tick
    shelter: Vec2,
    tuning: RadioTuning,

    registry: SignalRegistry,
    engine: WaveEngine,
    antenna: AntennaDetector,
    waterfall: WaterfallAggregator,

    rng: Pcg32,
    /// Accumulated sim time (s)
    clock: f64,
    spawn_timer: f32,
    hooks: Box<dyn RadioHooks>,
}

impl RadioSystem {
    pub fn new(seed: u64) -> Self {
        Self::with_tuning(RadioTuning::default(), seed)
    }

    pub fn with_tuning(tuning: RadioTuning, seed: u64) -> Self {
        info!("radio system initialized (seed {seed})");
        let mut system = Self {
            frequency: tuning.default_frequency,
            antenna_angle: tuning.default_antenna_angle,
            freq_min: tuning.freq_min,
            freq_max: tuning.freq_max,
            shelter: Vec2::ZERO,
            registry: SignalRegistry::new(),
            engine: WaveEngine::new(),
            antenna: AntennaDetector::new(),
            waterfall: WaterfallAggregator::new(tuning.freq_min, tuning.freq_max),
            rng: Pcg32::seed_from_u64(seed),
            clock: 0.0,
            spawn_timer: 0.0,
            hooks: Box::new(NullHooks),
            tuning,
        };
        system
            .antenna
            .update_direction(system.antenna_angle.to_radians());
        system
    }

    pub fn set_hooks(&mut self, hooks: Box<dyn RadioHooks>) {
        self.hooks = hooks;
    }

    /// Advance one tick. Order matters: lifecycle decay, then wave
    /// expansion/collision/delivery, then antenna detection, then the
    /// waterfall snapshot (which reuses the fresh antenna cache), then
    /// periodic signal spawning.
    pub fn update(&mut self, dt: f32, origin: Vec2, ambient_waves: &mut [AmbientWave]) {
        self.shelter = origin;
        self.clock += dt as f64;

        for callsign in self.registry.update(dt) {
            self.hooks.log_msg(&format!("SIGNAL LOST: {callsign}"));
        }

        self.engine
            .update(dt, self.clock, &mut self.registry, self.hooks.as_mut());

        self.antenna.detect(ambient_waves, origin, self.clock);

        self.waterfall.update(
            self.registry.signals(),
            self.antenna.waves_in_range(),
            &mut self.rng,
        );

        self.spawn_timer += dt;
        if self.spawn_timer >= self.tuning.signal_spawn_interval {
            self.spawn_timer = 0.0;
            let id =
                self.registry
                    .spawn_random_signal(origin, self.freq_min, self.freq_max, &mut self.rng);
            self.registry
                .recompute_strengths(self.frequency, self.antenna_angle);
            if let Some(signal) = self.registry.get(id) {
                let line = format!("NEW SIGNAL DETECTED: {}", signal.callsign);
                self.hooks.log_msg(&line);
            }
        }
    }

    // --- Tuner ---

    /// Step the frequency by whole coarse increments
    pub fn tune_coarse(&mut self, delta: f32) {
        self.retune(self.frequency + delta * self.tuning.coarse_step);
    }

    /// Step the frequency by fine increments
    pub fn tune_fine(&mut self, delta: f32) {
        self.retune(self.frequency + delta * self.tuning.fine_step);
    }

    fn retune(&mut self, target: f32) {
        self.frequency = round_decihertz(target.clamp(self.freq_min, self.freq_max));
        self.hooks.frequency_changed(self.frequency);
        self.registry
            .recompute_strengths(self.frequency, self.antenna_angle);
    }

    /// Rotate the antenna bearing. Wraps to [0, 360) for any delta.
    pub fn rotate_antenna(&mut self, delta_deg: f32) {
        self.antenna_angle = (self.antenna_angle + delta_deg).rem_euclid(360.0);
        self.antenna
            .update_direction(self.antenna_angle.to_radians());
        self.registry
            .recompute_strengths(self.frequency, self.antenna_angle);
    }

    /// Swap frequency bounds (equipment change) and re-clamp the dial
    pub fn set_frequency_range(&mut self, min: f32, max: f32) {
        self.freq_min = min;
        self.freq_max = max;
        self.frequency = round_decihertz(self.frequency.clamp(min, max));
        self.waterfall.set_frequency_range(min, max);
        self.registry
            .recompute_strengths(self.frequency, self.antenna_angle);
    }

    // --- Signals and waves ---

    /// Register a signal anchored at the shelter. Returns its id.
    pub fn add_signal(&mut self, config: SignalConfig) -> u32 {
        let id = self.registry.add_signal(self.shelter, config);
        self.registry
            .recompute_strengths(self.frequency, self.antenna_angle);
        if let Some(signal) = self.registry.get(id) {
            let line = format!("NEW SIGNAL DETECTED: {}", signal.callsign);
            self.hooks.log_msg(&line);
        }
        id
    }

    pub fn remove_signal(&mut self, id: u32) {
        if let Some(signal) = self.registry.remove_signal(id) {
            self.hooks.log_msg(&format!("SIGNAL LOST: {}", signal.callsign));
        }
    }

    /// Ping: emit an outbound wave from the shelter at the tuned frequency
    pub fn emit_player_wave(&mut self) -> u32 {
        let id = self
            .engine
            .emit_player_wave(self.shelter, self.frequency, self.clock);
        let line = format!("WAVE EMITTED AT {:.1} MHz", self.frequency);
        self.hooks.log_msg(&line);
        id
    }

    /// Degrade a signal's transmission by its current received strength
    pub fn degraded_message(&mut self, id: u32) -> Option<DegradedMessage> {
        let signal = self.registry.get(id)?;
        let strength = signal.received_strength;
        // Split borrow: codec needs the signal and the rng together
        let signal = signal.clone();
        Some(MorseCodec::degrade(&signal, strength, &mut self.rng))
    }

    // --- Waterfall passthroughs ---

    pub fn set_enemy_analysis(&mut self, freq: Option<f32>) {
        self.waterfall.set_enemy_analysis(freq);
    }

    pub fn clear_enemy_analysis(&mut self) {
        self.waterfall.clear_enemy_analysis();
    }

    pub fn frequency_to_index(&self, freq: f32, width: usize) -> i32 {
        self.waterfall.frequency_to_index(freq, width)
    }

    // --- Read accessors ---

    pub fn frequency(&self) -> f32 {
        self.frequency
    }

    pub fn antenna_angle(&self) -> f32 {
        self.antenna_angle
    }

    pub fn frequency_bounds(&self) -> (f32, f32) {
        (self.freq_min, self.freq_max)
    }

    pub fn clock(&self) -> f64 {
        self.clock
    }

    pub fn signals(&self) -> &[Signal] {
        self.registry.signals()
    }

    pub fn strongest_signal(&self) -> Option<&Signal> {
        self.registry.strongest_signal()
    }

    pub fn waves(&self) -> &[Wave] {
        self.engine.waves()
    }

    pub fn responses(&self) -> &[ResponseRecord] {
        self.engine.responses()
    }

    pub fn take_responses(&mut self) -> Vec<ResponseRecord> {
        self.engine.take_responses()
    }

    pub fn waves_in_range(&self) -> &[WaveContact] {
        self.antenna.waves_in_range()
    }

    pub fn reflection_history(&self) -> &std::collections::VecDeque<ReflectionRecord> {
        self.antenna.reflection_history()
    }

    pub fn waterfall_history(&self) -> &std::collections::VecDeque<Vec<f32>> {
        self.waterfall.waterfall_history()
    }

    pub fn enemy_freq_history(&self) -> &std::collections::VecDeque<Option<f32>> {
        self.waterfall.enemy_freq_history()
    }

    pub fn wave_contact_history(&self) -> &std::collections::VecDeque<Vec<WaveContact>> {
        self.waterfall.wave_contact_history()
    }
}

/// Round to one decimal (the tuner's 0.1 MHz display granularity)
#[inline]
fn round_decihertz(freq: f32) -> f32 {
    (freq * 10.0).round() / 10.0
}
