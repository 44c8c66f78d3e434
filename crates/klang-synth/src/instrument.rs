//! An instrument couples an envelope with an oscillator.

use crate::{Envelope, Oscillator};

/// Immutable pairing of one [`Envelope`] and one [`Oscillator`].
///
/// Instruments live in the synthesizer's channel table and are shared
/// read-only by every note sounding on the channel.
#[derive(Debug)]
pub struct Instrument {
    /// Amplitude envelope applied to each note.
    pub envelope: Envelope,
    /// Waveform generator.
    pub oscillator: Oscillator,
}

impl Instrument {
    /// Create an instrument from envelope parameters and a waveform.
    pub fn new(envelope: Envelope, oscillator: Oscillator) -> Self {
        Self {
            envelope,
            oscillator,
        }
    }
}
