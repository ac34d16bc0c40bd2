//! Table-driven Morse codec and strength-graduated message degradation
//!
//! Encoding is stateless: A-Z, 0-9, and space (word gap `/`) are supported;
//! anything else maps to `?` in both directions.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::signal::Signal;

/// Characters substituted in during text corruption
const NOISE_CHARS: [char; 5] = ['?', '#', '*', '@', '~'];

/// Readability tier of a degraded transmission
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SignalQuality {
    Clear,
    Noisy,
    Poor,
    Weak,
}

impl SignalQuality {
    pub fn as_str(&self) -> &'static str {
        match self {
            SignalQuality::Clear => "clear",
            SignalQuality::Noisy => "noisy",
            SignalQuality::Poor => "poor",
            SignalQuality::Weak => "weak",
        }
    }
}

/// A transmission after strength-dependent corruption
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DegradedMessage {
    pub callsign: String,
    pub message: String,
    pub morse: String,
    pub quality: SignalQuality,
}

/// Stateless Morse encoder/decoder
pub struct MorseCodec;

impl MorseCodec {
    /// Encode text to space-joined Morse. Unknown characters become `?`.
    pub fn encode(text: &str) -> String {
        if text.is_empty() {
            return String::new();
        }
        text.to_uppercase()
            .chars()
            .map(|c| char_to_morse(c).unwrap_or("?"))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Decode space-delimited Morse tokens. Unknown tokens become `?`.
    pub fn decode(morse: &str) -> String {
        if morse.is_empty() {
            return String::new();
        }
        morse
            .split(' ')
            .map(|token| morse_to_char(token).unwrap_or('?'))
            .collect()
    }

    /// Morse strings contain only dots, dashes, word gaps, and spaces.
    pub fn is_valid(morse: &str) -> bool {
        morse.chars().all(|c| matches!(c, '.' | '-' | '/' | ' '))
    }

    /// Corrupt a signal's transmission according to its received strength.
    ///
    /// Tier boundaries sit exactly at 80 / 50 / 20.
    pub fn degrade<R: Rng>(signal: &Signal, strength: f32, rng: &mut R) -> DegradedMessage {
        if strength >= 80.0 {
            DegradedMessage {
                callsign: signal.callsign.clone(),
                message: signal.message.clone(),
                morse: signal.morse.clone(),
                quality: SignalQuality::Clear,
            }
        } else if strength >= 50.0 {
            // 0% corrupted at 80, 100% at 50
            let rate = 1.0 - (strength - 50.0) / 30.0;
            DegradedMessage {
                callsign: corrupt_text(&signal.callsign, rate * 0.3, rng),
                message: corrupt_text(&signal.message, rate * 0.4, rng),
                morse: corrupt_morse(&signal.morse, rate * 0.4, rng),
                quality: SignalQuality::Noisy,
            }
        } else if strength >= 20.0 {
            DegradedMessage {
                callsign: corrupt_text(&signal.callsign, 0.7, rng),
                message: corrupt_text(&signal.message, 0.8, rng),
                morse: corrupt_morse(&signal.morse, 0.8, rng),
                quality: SignalQuality::Poor,
            }
        } else {
            DegradedMessage {
                callsign: "---".to_string(),
                message: "...".to_string(),
                morse: ".-?-.?".to_string(),
                quality: SignalQuality::Weak,
            }
        }
    }
}

/// Replace each character with a noise glyph with probability `rate`
fn corrupt_text<R: Rng>(text: &str, rate: f32, rng: &mut R) -> String {
    text.chars()
        .map(|c| {
            if rng.random::<f32>() < rate {
                NOISE_CHARS[rng.random_range(0..NOISE_CHARS.len())]
            } else {
                c
            }
        })
        .collect()
}

/// Morse corruption only ever blots out dots and dashes; the token and word
/// separators survive so the rhythm stays readable.
fn corrupt_morse<R: Rng>(morse: &str, rate: f32, rng: &mut R) -> String {
    morse
        .chars()
        .map(|c| {
            if rng.random::<f32>() < rate && matches!(c, '.' | '-') && rng.random::<f32>() > 0.5 {
                '?'
            } else {
                c
            }
        })
        .collect()
}

fn char_to_morse(c: char) -> Option<&'static str> {
    Some(match c {
        'A' => ".-",
        'B' => "-...",
        'C' => "-.-.",
        'D' => "-..",
        'E' => ".",
        'F' => "..-.",
        'G' => "--.",
        'H' => "....",
        'I' => "..",
        'J' => ".---",
        'K' => "-.-",
        'L' => ".-..",
        'M' => "--",
        'N' => "-.",
        'O' => "---",
        'P' => ".--.",
        'Q' => "--.-",
        'R' => ".-.",
        'S' => "...",
        'T' => "-",
        'U' => "..-",
        'V' => "...-",
        'W' => ".--",
        'X' => "-..-",
        'Y' => "-.--",
        'Z' => "--..",
        '0' => "-----",
        '1' => ".----",
        '2' => "..---",
        '3' => "...--",
        '4' => "....-",
        '5' => ".....",
        '6' => "-....",
        '7' => "--...",
        '8' => "---..",
        '9' => "----.",
        ' ' => "/",
        _ => return None,
    })
}

fn morse_to_char(token: &str) -> Option<char> {
    Some(match token {
        ".-" => 'A',
        "-..." => 'B',
        "-.-." => 'C',
        "-.." => 'D',
        "." => 'E',
        "..-." => 'F',
        "--." => 'G',
        "...." => 'H',
        ".." => 'I',
        ".---" => 'J',
        "-.-" => 'K',
        ".-.." => 'L',
        "--" => 'M',
        "-." => 'N',
        "---" => 'O',
        ".--." => 'P',
        "--.-" => 'Q',
        ".-." => 'R',
        "..." => 'S',
        "-" => 'T',
        "..-" => 'U',
        "...-" => 'V',
        ".--" => 'W',
        "-..-" => 'X',
        "-.--" => 'Y',
        "--.." => 'Z',
        "-----" => '0',
        ".----" => '1',
        "..---" => '2',
        "...--" => '3',
        "....-" => '4',
        "....." => '5',
        "-...." => '6',
        "--..." => '7',
        "---.." => '8',
        "----." => '9',
        "/" => ' ',
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::radio::signal::SignalConfig;
    use glam::Vec2;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn test_signal() -> Signal {
        Signal::new(
            1,
            Vec2::ZERO,
            SignalConfig::new(150.0, 90.0, 5.0)
                .with_message("SOS HELP")
                .with_callsign("KX4-ECHO"),
        )
    }

    #[test]
    fn test_encode_sos() {
        assert_eq!(MorseCodec::encode("SOS"), "... --- ...");
    }

    #[test]
    fn test_encode_lowercase_and_space() {
        assert_eq!(MorseCodec::encode("so s"), "... --- / ...");
    }

    #[test]
    fn test_unknown_chars_map_to_question_mark() {
        assert_eq!(MorseCodec::encode("A!"), ".- ?");
        assert_eq!(MorseCodec::decode(".- ......."), "A?");
    }

    #[test]
    fn test_is_valid() {
        assert!(MorseCodec::is_valid("... --- / .-"));
        assert!(!MorseCodec::is_valid("..x"));
    }

    #[test]
    fn test_degrade_clear_at_exactly_80() {
        let mut rng = Pcg32::seed_from_u64(7);
        let s = test_signal();
        let d = MorseCodec::degrade(&s, 80.0, &mut rng);
        assert_eq!(d.quality, SignalQuality::Clear);
        assert_eq!(d.callsign, "KX4-ECHO");
        assert_eq!(d.message, "SOS HELP");
        assert_eq!(d.morse, s.morse);
    }

    #[test]
    fn test_degrade_tier_boundaries() {
        let mut rng = Pcg32::seed_from_u64(7);
        let s = test_signal();
        assert_eq!(
            MorseCodec::degrade(&s, 79.9, &mut rng).quality,
            SignalQuality::Noisy
        );
        assert_eq!(
            MorseCodec::degrade(&s, 50.0, &mut rng).quality,
            SignalQuality::Noisy
        );
        assert_eq!(
            MorseCodec::degrade(&s, 49.9, &mut rng).quality,
            SignalQuality::Poor
        );
        assert_eq!(
            MorseCodec::degrade(&s, 20.0, &mut rng).quality,
            SignalQuality::Poor
        );
        assert_eq!(
            MorseCodec::degrade(&s, 19.9, &mut rng).quality,
            SignalQuality::Weak
        );
    }

    #[test]
    fn test_degrade_weak_placeholders() {
        let mut rng = Pcg32::seed_from_u64(7);
        let d = MorseCodec::degrade(&test_signal(), 5.0, &mut rng);
        assert_eq!(d.callsign, "---");
        assert_eq!(d.message, "...");
        assert_eq!(d.morse, ".-?-.?");
    }

    #[test]
    fn test_degrade_preserves_morse_separators() {
        // Poor tier corrupts hard, but separators must survive
        let mut rng = Pcg32::seed_from_u64(99);
        let s = test_signal();
        for _ in 0..50 {
            let d = MorseCodec::degrade(&s, 25.0, &mut rng);
            let orig: Vec<_> = s.morse.char_indices().filter(|(_, c)| *c == ' ' || *c == '/').collect();
            let got: Vec<_> = d.morse.char_indices().filter(|(_, c)| *c == ' ' || *c == '/').collect();
            assert_eq!(orig, got);
            assert!(d.morse.chars().all(|c| matches!(c, '.' | '-' | '?' | '/' | ' ')));
        }
    }

    proptest! {
        #[test]
        fn prop_round_trip(text in "[A-Z0-9 ]{0,24}") {
            prop_assert_eq!(MorseCodec::decode(&MorseCodec::encode(&text)), text);
        }

        #[test]
        fn prop_round_trip_uppercases(text in "[a-z]{1,16}") {
            prop_assert_eq!(
                MorseCodec::decode(&MorseCodec::encode(&text)),
                text.to_uppercase()
            );
        }
    }
}
