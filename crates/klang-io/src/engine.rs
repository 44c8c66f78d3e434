//! The synthesizer engine: render thread, clock, and note interface.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::JoinHandle;

use klang_synth::{Instrument, Rack};

use crate::Result;
use crate::backend::{AudioFormat, OutputBackend, OutputDevice};
use crate::blocks::BlockPool;
use crate::permits::{BlockPermits, PermitReleaser};

/// Fraction of full scale a single saturated note occupies. Several notes
/// summing constructively stay below the clamp instead of flattening.
const HEADROOM: f64 = 0.2;

/// Quantize a raw mix amplitude to a 16-bit sample.
///
/// The clamp bounds the mix to the representable range so an over-full mix
/// distorts by flattening rather than wrapping around.
#[inline]
fn quantize(amp: f64) -> i16 {
    (amp.clamp(-1.0, 1.0) * HEADROOM * f64::from(i16::MAX)) as i16
}

fn lock_rack(rack: &Mutex<Rack>) -> MutexGuard<'_, Rack> {
    rack.lock().unwrap_or_else(PoisonError::into_inner)
}

/// A running synthesizer: a render thread producing audio blocks from the
/// shared note state, paced by the output device.
///
/// Note calls stamp the current render clock and mutate the shared
/// [`Rack`] under its lock; they never touch audio hardware and never
/// block on it. The render thread takes the same lock once per block —
/// not per sample — and drops it before submitting to the device.
///
/// Dropping the synthesizer stops the render thread after the block it is
/// currently filling; blocks already submitted are abandoned to the device.
#[derive(Debug)]
pub struct Synth {
    rack: Arc<Mutex<Rack>>,
    running: Arc<AtomicBool>,
    clock_bits: Arc<AtomicU64>,
    wake: PermitReleaser,
    format: AudioFormat,
    render: Option<JoinHandle<()>>,
}

impl Synth {
    /// Open an output device through `backend` and start the render thread.
    ///
    /// Device-open failure is fatal to the instance and surfaces here; the
    /// engine performs no recovery or retries after construction.
    pub fn open(format: AudioFormat, backend: &dyn OutputBackend) -> Result<Self> {
        format.validate()?;

        let (permits, releaser) = BlockPermits::new(format.block_count);
        let completion = releaser.clone();
        let device = backend.open(&format, Box::new(move || completion.release()))?;

        let rack = Arc::new(Mutex::new(Rack::new()));
        let running = Arc::new(AtomicBool::new(true));
        let clock_bits = Arc::new(AtomicU64::new(0.0_f64.to_bits()));

        tracing::info!(
            backend = backend.name(),
            sample_rate = format.sample_rate,
            blocks = format.block_count,
            samples_per_block = format.samples_per_block,
            "synthesizer started"
        );

        let render = std::thread::spawn({
            let rack = Arc::clone(&rack);
            let running = Arc::clone(&running);
            let clock_bits = Arc::clone(&clock_bits);
            let format = format.clone();
            move || render_loop(&format, device, &permits, &rack, &running, &clock_bits)
        });

        Ok(Self {
            rack,
            running,
            clock_bits,
            wake: releaser,
            format,
            render: Some(render),
        })
    }

    /// Register (or replace) the instrument behind `channel`.
    ///
    /// Notes already sounding on a replaced channel continue through the
    /// new instrument; notes on channels that were never registered are
    /// silently dropped by the next render pass.
    pub fn add_channel(&self, channel: usize, instrument: Instrument) {
        lock_rack(&self.rack).add_channel(channel, instrument);
    }

    /// Start a note at the current render time.
    ///
    /// Re-pressing a held key layers a second note rather than
    /// retriggering the first.
    pub fn note_on(&self, key: i32, channel: usize) {
        let now = self.time();
        lock_rack(&self.rack).note_on(key, channel, now);
    }

    /// Release the earliest-created held note matching `(key, channel)`.
    ///
    /// Exactly one note transitions per call; no match is a no-op.
    pub fn note_off(&self, key: i32, channel: usize) {
        let now = self.time();
        lock_rack(&self.rack).note_off(key, channel, now);
    }

    /// Render-clock time in seconds: how much audio has been produced.
    pub fn time(&self) -> f64 {
        f64::from_bits(self.clock_bits.load(Ordering::Acquire))
    }

    /// The construction-time audio format.
    pub fn format(&self) -> &AudioFormat {
        &self.format
    }
}

impl Drop for Synth {
    fn drop(&mut self) {
        self.running.store(false, Ordering::Release);
        // Wake the render thread if it is parked waiting for a free block.
        self.wake.wake();
        if let Some(render) = self.render.take() {
            let _ = render.join();
        }
    }
}

/// The producer loop: each iteration fills and submits one block.
fn render_loop(
    format: &AudioFormat,
    mut device: Box<dyn OutputDevice>,
    permits: &BlockPermits,
    rack: &Mutex<Rack>,
    running: &AtomicBool,
    clock_bits: &AtomicU64,
) {
    let mut pool = BlockPool::new(format.block_count, format.samples_per_block);
    let dt = format.sample_period();
    let mut clock = 0.0_f64;

    while running.load(Ordering::Acquire) {
        // The sole blocking point: wait until the device frees a block.
        if !permits.acquire() {
            break;
        }
        if !running.load(Ordering::Acquire) {
            break;
        }

        let block = pool.next_block();
        {
            // One critical section per block; released before submission.
            let mut rack = lock_rack(rack);
            for sample in block.iter_mut() {
                *sample = quantize(rack.mix(clock));
                clock += dt;
                clock_bits.store(clock.to_bits(), Ordering::Release);
            }
        }

        if let Err(err) = device.submit(block) {
            tracing::error!(%err, "output device rejected a block; render loop stopping");
            break;
        }
    }

    tracing::debug!("render loop exited");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quantize_scales_and_applies_headroom() {
        assert_eq!(quantize(0.0), 0);
        assert_eq!(quantize(1.0), (0.2 * f64::from(i16::MAX)) as i16);
        assert_eq!(quantize(-1.0), -((0.2 * f64::from(i16::MAX)) as i16));
    }

    #[test]
    fn test_quantize_clamps_overfull_mix() {
        // Ten saturated notes summing constructively must not wrap around.
        assert_eq!(quantize(10.0), quantize(1.0));
        assert_eq!(quantize(-10.0), quantize(-1.0));
    }

    #[test]
    fn test_quantize_is_monotonic() {
        let mut prev = i16::MIN;
        for i in -100..=100 {
            let sample = quantize(f64::from(i) / 50.0);
            assert!(sample >= prev);
            prev = sample;
        }
    }
}
