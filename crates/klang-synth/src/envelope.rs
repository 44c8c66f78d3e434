//! ADSR amplitude envelope evaluation.
//!
//! The envelope is evaluated as a pure function of a note's timestamps and
//! the render clock. There is no per-sample envelope state to advance, so a
//! note can be evaluated at any time point, in any order, from any thread
//! that knows the clock value.

use crate::{Instrument, Note};

/// ADSR envelope parameters.
///
/// All durations are in seconds and must be non-negative; a zero-length
/// phase completes instantaneously. Levels are typically in `[0, 1]`.
/// Envelopes are immutable after creation and shared read-only by every
/// note on the owning instrument's channel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Envelope {
    /// Seconds to ramp from silence up to `start_amplitude` after note-on.
    pub attack_time: f64,
    /// Seconds to ramp from `start_amplitude` down to `sustain_amplitude`.
    pub decay_time: f64,
    /// Seconds to ramp from the held level down to silence after note-off.
    pub release_time: f64,
    /// Peak level reached at the end of the attack phase.
    pub start_amplitude: f64,
    /// Level held for as long as the key stays down.
    pub sustain_amplitude: f64,
}

impl Envelope {
    /// Level of a held note, `held` seconds after its note-on.
    ///
    /// A branch is only taken when its phase duration is strictly positive,
    /// so zero-length phases never divide by zero.
    #[inline]
    pub fn held_level(&self, held: f64) -> f64 {
        if held < self.attack_time {
            self.start_amplitude * held / self.attack_time
        } else if held < self.attack_time + self.decay_time {
            let t = (held - self.attack_time) / self.decay_time;
            self.start_amplitude + (self.sustain_amplitude - self.start_amplitude) * t
        } else {
            self.sustain_amplitude
        }
    }
}

/// Instantaneous amplitude of `note` played through `instrument` at render
/// time `time`.
///
/// Held notes ramp through attack and decay into sustain. Releasing notes
/// ramp linearly to zero over `release_time`, starting from the level the
/// envelope had at the instant of release — even when release interrupts the
/// attack or decay phase, the curve stays continuous. A note released on the
/// same render-clock instant that created it never sounded, so it releases
/// from silence.
pub fn amplitude(note: &Note, instrument: &Instrument, time: f64) -> f64 {
    let env = &instrument.envelope;
    if note.active {
        env.held_level(time - note.toggle_time)
    } else {
        let held = note.toggle_time - note.on_time;
        let released_from = if held > 0.0 { env.held_level(held) } else { 0.0 };
        if env.release_time > 0.0 {
            let t = (time - note.toggle_time) / env.release_time;
            (released_from * (1.0 - t)).max(0.0)
        } else {
            0.0
        }
    }
}
