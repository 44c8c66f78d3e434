//! Pluggable audio output abstraction.
//!
//! This module decouples the render pipeline from any specific platform
//! audio API. The production implementation wraps cpal
//! ([`crate::CpalBackend`]); tests drive the engine with deterministic mock
//! devices implementing the same contract.
//!
//! The traits use boxed callbacks rather than generic parameters, keeping
//! them object-safe so a backend can be selected at runtime and platform
//! types stay out of application code.

use crate::{Error, Result};

/// Construction-time audio format.
///
/// All parameters are fixed when the engine is opened and cannot change at
/// runtime. The mix itself is mono; `channels` describes the device stream
/// the backend opens, and the backend fans each mono frame out to it.
#[derive(Debug, Clone)]
pub struct AudioFormat {
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Output channel count of the device stream.
    pub channels: u16,
    /// Number of blocks in the pool — also the backpressure capacity.
    pub block_count: usize,
    /// Samples per block.
    pub samples_per_block: usize,
}

impl Default for AudioFormat {
    fn default() -> Self {
        Self {
            sample_rate: 44100,
            channels: 1,
            block_count: 8,
            samples_per_block: 512,
        }
    }
}

impl AudioFormat {
    /// Reject formats the pipeline cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.sample_rate == 0 {
            return Err(Error::InvalidFormat("sample rate must be nonzero".into()));
        }
        if self.channels == 0 {
            return Err(Error::InvalidFormat("channel count must be nonzero".into()));
        }
        if self.block_count < 2 {
            return Err(Error::InvalidFormat(
                "at least two blocks are required for double buffering".into(),
            ));
        }
        if self.samples_per_block == 0 {
            return Err(Error::InvalidFormat("block size must be nonzero".into()));
        }
        Ok(())
    }

    /// Duration of one sample in seconds.
    pub fn sample_period(&self) -> f64 {
        1.0 / f64::from(self.sample_rate)
    }

    /// Playback duration of one block in seconds.
    pub fn block_duration(&self) -> f64 {
        self.samples_per_block as f64 * self.sample_period()
    }
}

/// Callback invoked by the output device once per finished block.
///
/// Runs on a thread owned by the platform audio layer — implementations
/// must not block or allocate.
pub type BlockDoneCallback = Box<dyn FnMut() + Send + 'static>;

/// A playback device accepting filled sample blocks.
pub trait OutputDevice: Send {
    /// Queue one filled block for asynchronous playback.
    ///
    /// Never blocks under the permit discipline: the engine acquires a
    /// permit per block, so at most `block_count` blocks are in flight.
    fn submit(&mut self, block: &[i16]) -> Result<()>;
}

/// Factory for output devices.
pub trait OutputBackend {
    /// Backend name for logs.
    fn name(&self) -> &'static str;

    /// Open an output device for `format`.
    ///
    /// `on_block_done` must be invoked exactly once per submitted block,
    /// after the device has finished playing it. A lost completion
    /// notification permanently stalls the render loop — this is the one
    /// correctness-critical contract a backend must uphold.
    fn open(
        &self,
        format: &AudioFormat,
        on_block_done: BlockDoneCallback,
    ) -> Result<Box<dyn OutputDevice>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_format() {
        let format = AudioFormat::default();
        assert_eq!(format.sample_rate, 44100);
        assert_eq!(format.channels, 1);
        assert_eq!(format.block_count, 8);
        assert_eq!(format.samples_per_block, 512);
        assert!(format.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_single_block() {
        let format = AudioFormat {
            block_count: 1,
            ..AudioFormat::default()
        };
        assert!(matches!(format.validate(), Err(Error::InvalidFormat(_))));
    }

    #[test]
    fn test_validate_rejects_zero_fields() {
        for format in [
            AudioFormat {
                sample_rate: 0,
                ..AudioFormat::default()
            },
            AudioFormat {
                channels: 0,
                ..AudioFormat::default()
            },
            AudioFormat {
                samples_per_block: 0,
                ..AudioFormat::default()
            },
        ] {
            assert!(matches!(format.validate(), Err(Error::InvalidFormat(_))));
        }
    }

    #[test]
    fn test_block_duration() {
        let format = AudioFormat {
            sample_rate: 44100,
            samples_per_block: 441,
            ..AudioFormat::default()
        };
        assert!((format.block_duration() - 0.01).abs() < 1e-12);
    }
}
