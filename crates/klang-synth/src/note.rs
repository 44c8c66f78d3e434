//! A single sounding (or releasing) note event.

/// One sounding or releasing note.
///
/// A note records *when* it was toggled, not a phase or level of its own —
/// the envelope and oscillator reconstruct the instantaneous amplitude from
/// these timestamps and the render clock.
///
/// Invariants: `on_time <= toggle_time`, and `toggle_time` never exceeds the
/// current render clock. `toggle_time` is monotonically non-decreasing over
/// the note's lifetime.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Note {
    /// Channel id of the owning instrument.
    pub channel: usize,
    /// Opaque pitch identifier (key 69 is concert A, 440 Hz).
    pub key: i32,
    /// Render-clock time of the note-on that created this note.
    pub on_time: f64,
    /// Render-clock time of the most recent on or off transition.
    pub toggle_time: f64,
    /// Whether the key is still held (`true`) or releasing (`false`).
    pub active: bool,
}

impl Note {
    /// Create a held note starting at render time `now`.
    pub fn on(channel: usize, key: i32, now: f64) -> Self {
        Self {
            channel,
            key,
            on_time: now,
            toggle_time: now,
            active: true,
        }
    }

    /// Begin the release phase at render time `now`.
    pub fn release(&mut self, now: f64) {
        self.active = false;
        self.toggle_time = now;
    }
}
