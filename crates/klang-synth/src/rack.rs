//! The channel table and active note set.

use alloc::collections::BTreeMap;
use alloc::vec::Vec;

use crate::{Instrument, Note, amplitude, key_frequency};

/// The synthesizer's mutable sounding state: the instrument channel table
/// and the set of currently sounding or releasing notes.
///
/// The rack knows nothing about threads or locks; the engine owns one
/// behind a mutex and serializes every call here. All timestamps are
/// render-clock seconds supplied by the caller.
#[derive(Debug, Default)]
pub struct Rack {
    channels: BTreeMap<usize, Instrument>,
    notes: Vec<Note>,
}

impl Rack {
    /// Create an empty rack.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) the instrument behind `channel`.
    pub fn add_channel(&mut self, channel: usize, instrument: Instrument) {
        self.channels.insert(channel, instrument);
    }

    /// Start a new note at render time `now`.
    ///
    /// Re-pressing a held key layers a second note over the first rather
    /// than retriggering it; each press gets its own release tail.
    pub fn note_on(&mut self, key: i32, channel: usize, now: f64) {
        self.notes.push(Note::on(channel, key, now));
    }

    /// Release a held note at render time `now`.
    ///
    /// When several held notes match `(key, channel)`, the earliest-created
    /// one is released; exactly one note transitions per call. No match is a
    /// no-op, as is releasing a key that was never pressed.
    pub fn note_off(&mut self, key: i32, channel: usize, now: f64) {
        if let Some(note) = self
            .notes
            .iter_mut()
            .find(|note| note.key == key && note.channel == channel && note.active)
        {
            note.release(now);
        }
    }

    /// Mix every live note at render time `time`, pruning finished ones.
    ///
    /// Returns the raw, pre-clamp sum of all note contributions —
    /// superposition holds at this level, and the engine applies headroom
    /// and quantization afterwards. Notes whose channel is unknown and notes
    /// whose release has run out are removed in the same pass; this is the
    /// only place notes are deleted.
    pub fn mix(&mut self, time: f64) -> f64 {
        let Self { channels, notes } = self;
        let mut amp = 0.0;
        notes.retain(|note| {
            let Some(instrument) = channels.get(&note.channel) else {
                return false;
            };
            let live =
                note.active || time - note.toggle_time < instrument.envelope.release_time;
            if live {
                amp += amplitude(note, instrument, time)
                    * instrument.oscillator.sample(time, key_frequency(note.key));
            }
            live
        });
        amp
    }
}
