//! Audio engine layer for the klang synthesizer.
//!
//! This crate drives the pure model from [`klang_synth`] in real time:
//!
//! - **Render engine**: [`Synth`], the double-buffered producer pipeline —
//!   a dedicated thread fills fixed-size sample blocks and submits them to
//!   the output device, paced by a counting backpressure signal
//! - **Block pool**: [`BlockPool`], the pre-allocated ring of sample blocks
//! - **Backpressure**: [`BlockPermits`] / [`PermitReleaser`], the capacity
//!   signal coupling the render thread to device completions
//! - **Device abstraction**: [`OutputBackend`] / [`OutputDevice`], with
//!   [`CpalBackend`] as the production implementation
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use klang_io::{AudioFormat, CpalBackend, Synth};
//! use klang_synth::{Envelope, Instrument, Oscillator};
//!
//! let synth = Synth::open(AudioFormat::default(), &CpalBackend::new())?;
//! synth.add_channel(0, Instrument::new(
//!     Envelope {
//!         attack_time: 0.01,
//!         decay_time: 0.1,
//!         release_time: 0.2,
//!         start_amplitude: 1.0,
//!         sustain_amplitude: 0.8,
//!     },
//!     Oscillator::Sine,
//! ));
//!
//! synth.note_on(69, 0); // concert A starts sounding
//! synth.note_off(69, 0);
//! ```

mod backend;
mod blocks;
mod cpal_backend;
mod engine;
mod permits;

pub use backend::{AudioFormat, BlockDoneCallback, OutputBackend, OutputDevice};
pub use blocks::BlockPool;
pub use cpal_backend::CpalBackend;
pub use engine::Synth;
pub use permits::{BlockPermits, PermitReleaser};

/// Error types for engine and device operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// No audio output device available on the system.
    #[error("no audio output device available")]
    NoDevice,

    /// The requested audio device was not found.
    #[error("device not found: {0}")]
    DeviceNotFound(String),

    /// Audio stream setup or playback error.
    #[error("audio stream error: {0}")]
    Stream(String),

    /// The construction-time audio format was rejected.
    #[error("invalid audio format: {0}")]
    InvalidFormat(String),

    /// The block-permit discipline was violated — more blocks in flight
    /// than the pool holds.
    #[error("backpressure violation: {0}")]
    Backpressure(String),
}

/// Convenience result type for engine and device operations.
pub type Result<T> = std::result::Result<T, Error>;
