//! Klang Synth — the note/envelope/instrument model for the klang
//! synthesizer engine.
//!
//! This crate is the pure half of the synthesizer: everything here is a
//! function of a passed-in render-clock time, so the same state can be
//! evaluated from unit tests, benchmarks, or the real-time render thread
//! without caring who advances the clock.
//!
//! # Core Components
//!
//! ## Envelopes
//!
//! - [`Envelope`] - ADSR parameter set
//! - [`amplitude`] - pure evaluator: note timing state + envelope → level
//!
//! ## Oscillators
//!
//! - [`Oscillator`] - built-in waveforms plus a closure case, all evaluated
//!   as a pure mapping `(time, frequency) → sample`
//!
//! ## Notes and Instruments
//!
//! - [`Note`] - one sounding or releasing event
//! - [`Instrument`] - one envelope paired with one oscillator
//! - [`Rack`] - the channel table and active note set, with the
//!   mix-and-prune pass the render loop runs once per sample
//!
//! ## Pitch
//!
//! - [`key_frequency`] / [`frequency_key`] - 12-tone equal temperament,
//!   key 69 = 440 Hz
//!
//! # Example
//!
//! ```rust
//! use klang_synth::{Envelope, Instrument, Oscillator, Rack};
//!
//! let mut rack = Rack::new();
//! rack.add_channel(
//!     0,
//!     Instrument::new(
//!         Envelope {
//!             attack_time: 0.01,
//!             decay_time: 0.1,
//!             release_time: 0.2,
//!             start_amplitude: 1.0,
//!             sustain_amplitude: 0.8,
//!         },
//!         Oscillator::Sine,
//!     ),
//! );
//!
//! rack.note_on(69, 0, 0.0);
//! let sample = rack.mix(0.005);
//! assert!(sample > 0.0);
//! ```
//!
//! # no_std Support
//!
//! This crate is `no_std` compatible (`alloc` is required). Disable the
//! default `std` feature:
//!
//! ```toml
//! klang-synth = { version = "0.1", default-features = false }
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

mod envelope;
mod instrument;
mod note;
mod oscillator;
mod pitch;
mod rack;

pub use envelope::{Envelope, amplitude};
pub use instrument::Instrument;
pub use note::Note;
pub use oscillator::Oscillator;
pub use pitch::{frequency_key, key_frequency};
pub use rack::Rack;
