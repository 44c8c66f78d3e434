//! Equal-temperament pitch mapping.

use libm::{log2, pow};

/// Frequency in Hz of `key` in 12-tone equal temperament.
///
/// Key 69 is concert A at 440 Hz; each step is one semitone. Keys outside
/// the audible range are still well-defined.
#[inline]
pub fn key_frequency(key: i32) -> f64 {
    440.0 * pow(2.0, f64::from(key - 69) / 12.0)
}

/// Fractional key number of `frequency` Hz (inverse of [`key_frequency`]).
#[inline]
pub fn frequency_key(frequency: f64) -> f64 {
    69.0 + 12.0 * log2(frequency / 440.0)
}
