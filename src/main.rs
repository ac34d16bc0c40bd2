//! Headless demo: tune to a distress signal, ping it, and decode the reply.
//!
//! Run with `RUST_LOG=debug` for the per-tick engine trace.

use glam::Vec2;
use longwave::radio::{RadioSystem, SignalConfig};
use longwave::MorseCodec;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let seed = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(0xC0FFEE);
    let mut radio = RadioSystem::new(seed);

    radio.add_signal(
        SignalConfig::new(121.5, 90.0, 2.0)
            .with_message("SOS NEED SUPPLIES")
            .with_callsign("KX4-ECHO")
            .with_strength(70.0),
    );
    radio.add_signal(
        SignalConfig::new(156.8, 200.0, 6.5)
            .with_message("BEACON 7 ACTIVE")
            .with_callsign("BCN-0007")
            .with_strength(55.0),
    );

    // Dial down to 121.5 and swing the antenna toward the signal
    while radio.frequency() > 125.0 {
        radio.tune_coarse(-1.0);
    }
    while radio.frequency() > 121.5 {
        radio.tune_fine(-1.0);
    }
    radio.rotate_antenna(-180.0);
    println!(
        "tuned to {:.1} MHz, antenna at {:.0} degrees",
        radio.frequency(),
        radio.antenna_angle()
    );

    if let Some(signal) = radio.strongest_signal() {
        println!(
            "carrier detected: {} ({:.1} MHz, strength {:.0})",
            signal.callsign, signal.frequency, signal.received_strength
        );
    }

    radio.emit_player_wave();

    // 2 km out and back at 300 m/s: ~14 s of simulation
    let origin = Vec2::ZERO;
    for _ in 0..150 {
        radio.update(0.1, origin, &mut []);
    }

    for response in radio.take_responses() {
        println!(
            "response from {} after {:.0} ms: {}",
            response.callsign, response.delay_ms, response.morse
        );
        println!("decoded: {}", MorseCodec::decode(&response.morse));
    }

    println!(
        "waterfall rows captured: {}",
        radio.waterfall_history().len()
    );
}
