//! Waterfall spectrum history
//!
//! Builds one spectrum row per tick (noise floor plus Gaussian signal
//! peaks) and keeps a bounded history alongside two synchronized per-row
//! side-channels: the enemy analysis frequency marker and the antenna's
//! in-range wave contacts. Renderers read these; nothing here draws.

use std::collections::VecDeque;

use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::antenna::WaveContact;
use super::signal::Signal;
use crate::consts::{NOISE_LEVEL, SPECTRUM_WIDTH, WATERFALL_HEIGHT};

/// Bounded spectrum/annotation history, newest row first
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WaterfallAggregator {
    freq_min: f32,
    freq_max: f32,
    enemy_analysis_freq: Option<f32>,
    waterfall_history: VecDeque<Vec<f32>>,
    enemy_freq_history: VecDeque<Option<f32>>,
    wave_contact_history: VecDeque<Vec<WaveContact>>,
}

impl WaterfallAggregator {
    pub fn new(freq_min: f32, freq_max: f32) -> Self {
        Self {
            freq_min,
            freq_max,
            enemy_analysis_freq: None,
            waterfall_history: VecDeque::with_capacity(WATERFALL_HEIGHT),
            enemy_freq_history: VecDeque::with_capacity(WATERFALL_HEIGHT),
            wave_contact_history: VecDeque::with_capacity(WATERFALL_HEIGHT),
        }
    }

    pub fn set_frequency_range(&mut self, min: f32, max: f32) {
        self.freq_min = min;
        self.freq_max = max;
    }

    /// Linear frequency-to-bin map. `freq_max` itself lands one past the
    /// last bin; callers bounds-check.
    pub fn frequency_to_index(&self, freq: f32, width: usize) -> i32 {
        let range = self.freq_max - self.freq_min;
        (((freq - self.freq_min) / range) * width as f32).floor() as i32
    }

    /// One spectrum row: uniform noise plus a Gaussian bump per signal,
    /// scaled by base strength and clamped to [0, 1].
    pub fn generate_spectrum(&self, signals: &[Signal], rng: &mut Pcg32) -> Vec<f32> {
        let width = SPECTRUM_WIDTH;
        let mut spectrum: Vec<f32> = (0..width)
            .map(|_| rng.random::<f32>() * NOISE_LEVEL)
            .collect();

        for signal in signals {
            let center = self.frequency_to_index(signal.frequency, width);
            if center < 0 || center >= width as i32 {
                continue;
            }
            for offset in -10i32..=10 {
                let idx = center + offset;
                if idx >= 0 && idx < width as i32 {
                    let intensity =
                        signal.strength / 100.0 * (-((offset * offset) as f32) / 20.0).exp();
                    spectrum[idx as usize] += intensity;
                }
            }
        }

        for bin in &mut spectrum {
            *bin = bin.min(1.0);
        }
        spectrum
    }

    /// Snapshot one row. All three histories push and evict together so a
    /// row index always lines up across them.
    pub fn update(&mut self, signals: &[Signal], contacts: &[WaveContact], rng: &mut Pcg32) {
        let spectrum = self.generate_spectrum(signals, rng);

        self.waterfall_history.push_front(spectrum);
        self.enemy_freq_history.push_front(self.enemy_analysis_freq);
        self.wave_contact_history.push_front(contacts.to_vec());

        while self.waterfall_history.len() > WATERFALL_HEIGHT {
            self.waterfall_history.pop_back();
        }
        while self.enemy_freq_history.len() > WATERFALL_HEIGHT {
            self.enemy_freq_history.pop_back();
        }
        while self.wave_contact_history.len() > WATERFALL_HEIGHT {
            self.wave_contact_history.pop_back();
        }
    }

    /// Mark the frequency the enemy analyzer is locked to (waterfall
    /// overlay), or clear it with `None`.
    pub fn set_enemy_analysis(&mut self, freq: Option<f32>) {
        self.enemy_analysis_freq = freq;
    }

    pub fn clear_enemy_analysis(&mut self) {
        self.enemy_analysis_freq = None;
    }

    pub fn waterfall_history(&self) -> &VecDeque<Vec<f32>> {
        &self.waterfall_history
    }

    pub fn enemy_freq_history(&self) -> &VecDeque<Option<f32>> {
        &self.enemy_freq_history
    }

    pub fn wave_contact_history(&self) -> &VecDeque<Vec<WaveContact>> {
        &self.wave_contact_history
    }
}
