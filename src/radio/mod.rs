//! Deterministic radio simulation module
//!
//! All engine logic lives here. This module must be pure and deterministic:
//! - Tick-driven only, with an externally supplied delta time
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod antenna;
pub mod morse;
pub mod registry;
pub mod signal;
pub mod system;
pub mod waterfall;
pub mod wave;

pub use antenna::{AmbientWave, AntennaDetector, ReflectionRecord, WaveContact, WaveSource};
pub use morse::{DegradedMessage, MorseCodec, SignalQuality};
pub use registry::SignalRegistry;
pub use signal::{Signal, SignalConfig, SignalKind};
pub use system::{NullHooks, RadioHooks, RadioSystem};
pub use waterfall::WaterfallAggregator;
pub use wave::{ResponseRecord, Wave, WaveEngine};
