//! cpal-based output backend.
//!
//! Implements the [`OutputBackend`] contract on top of
//! [cpal](https://crates.io/crates/cpal), covering ALSA (Linux), CoreAudio
//! (macOS), and WASAPI (Windows).
//!
//! cpal is pull-based — the platform calls us for samples — while the
//! engine pushes filled blocks. The bridge is a pair of bounded channels of
//! recycled buffers: [`OutputDevice::submit`] copies a block into a
//! recycled buffer and queues it; the stream callback drains queued blocks,
//! converting i16 to f32 and fanning the mono frame out to the device's
//! channel count. Each fully consumed block fires the completion callback
//! and returns its buffer for reuse, so the steady state allocates nothing.
//! If the render thread falls behind, the callback plays silence.

use std::sync::mpsc::{Receiver, SyncSender, sync_channel};

use cpal::Host;
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};

use crate::backend::{AudioFormat, BlockDoneCallback, OutputBackend, OutputDevice};
use crate::{Error, Result};

/// Extract device name via `description()` (cpal 0.17+).
fn device_name(device: &cpal::Device) -> std::result::Result<String, cpal::DeviceNameError> {
    device.description().map(|d| d.name().to_string())
}

/// cpal-based audio output backend.
///
/// Holds a cpal [`Host`] — the connection to the platform's audio system —
/// and an optional device-name filter. By default the platform's default
/// output device is used.
pub struct CpalBackend {
    host: Host,
    device_name: Option<String>,
}

impl CpalBackend {
    /// Create a backend using the platform's default audio host and output
    /// device.
    pub fn new() -> Self {
        let host = cpal::default_host();
        tracing::info!(host = host.id().name(), "cpal backend initialized");
        Self {
            host,
            device_name: None,
        }
    }

    /// Use the first output device whose name contains `name`
    /// (case-insensitive) instead of the default device.
    pub fn with_device(name: impl Into<String>) -> Self {
        let mut backend = Self::new();
        backend.device_name = Some(name.into());
        backend
    }

    /// Find the configured output device, or the default one.
    fn find_output_device(&self) -> Result<cpal::Device> {
        match &self.device_name {
            Some(search) => {
                let search_lower = search.to_lowercase();
                let devices = self
                    .host
                    .output_devices()
                    .map_err(|e| Error::Stream(e.to_string()))?;

                for device in devices {
                    if let Ok(name) = device_name(&device)
                        && name.to_lowercase().contains(&search_lower)
                    {
                        return Ok(device);
                    }
                }
                Err(Error::DeviceNotFound(format!(
                    "no output device matching '{}'",
                    search
                )))
            }
            None => self.host.default_output_device().ok_or(Error::NoDevice),
        }
    }
}

impl Default for CpalBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl OutputBackend for CpalBackend {
    fn name(&self) -> &'static str {
        "cpal"
    }

    fn open(
        &self,
        format: &AudioFormat,
        mut on_block_done: BlockDoneCallback,
    ) -> Result<Box<dyn OutputDevice>> {
        format.validate()?;
        let device = self.find_output_device()?;

        let stream_config = cpal::StreamConfig {
            channels: format.channels,
            sample_rate: format.sample_rate,
            buffer_size: cpal::BufferSize::Fixed(format.samples_per_block as u32),
        };

        // submit → queue → stream callback; spent buffers flow back through
        // `recycled`. Both are bounded by the pool size, matching the permit
        // capacity.
        let (queue_tx, queue_rx) = sync_channel::<Vec<i16>>(format.block_count);
        let (recycled_tx, recycled_rx) = sync_channel::<Vec<i16>>(format.block_count);
        for _ in 0..format.block_count {
            let _ = recycled_tx.try_send(Vec::with_capacity(format.samples_per_block));
        }

        let channels = usize::from(format.channels);
        let mut playing: Option<(Vec<i16>, usize)> = None;

        let stream = device
            .build_output_stream(
                &stream_config,
                move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                    for frame in data.chunks_mut(channels) {
                        if playing.is_none() {
                            playing = queue_rx.try_recv().ok().map(|block| (block, 0));
                        }

                        let mut finished = false;
                        let value = match playing.as_mut() {
                            Some((block, position)) => {
                                let sample = f32::from(block[*position]) / f32::from(i16::MAX);
                                *position += 1;
                                finished = *position == block.len();
                                sample
                            }
                            // Underrun: the render thread has not caught
                            // up; play silence rather than stale samples.
                            None => 0.0,
                        };

                        if finished {
                            if let Some((spent, _)) = playing.take() {
                                let _ = recycled_tx.try_send(spent);
                            }
                            on_block_done();
                        }

                        for sample in frame {
                            *sample = value;
                        }
                    }
                },
                |err| tracing::error!(%err, "output stream error"),
                None,
            )
            .map_err(|e| Error::Stream(e.to_string()))?;

        stream.play().map_err(|e| Error::Stream(e.to_string()))?;
        tracing::info!(
            channels = format.channels,
            sample_rate = format.sample_rate,
            "output stream started"
        );

        Ok(Box::new(CpalOutput {
            queue: queue_tx,
            recycled: recycled_rx,
            _stream: stream,
        }))
    }
}

/// A live cpal output stream accepting blocks from the render loop.
///
/// The stream plays for as long as this device exists; dropping it stops
/// playback.
struct CpalOutput {
    queue: SyncSender<Vec<i16>>,
    recycled: Receiver<Vec<i16>>,
    _stream: cpal::Stream,
}

impl OutputDevice for CpalOutput {
    fn submit(&mut self, block: &[i16]) -> Result<()> {
        // Under the permit discipline a recycled buffer is always waiting:
        // one buffer returns per completion, one permit per buffer.
        let mut buffer = self.recycled.try_recv().map_err(|_| {
            Error::Backpressure("no spent block buffer available; completions out of step".into())
        })?;
        buffer.clear();
        buffer.extend_from_slice(block);
        self.queue
            .try_send(buffer)
            .map_err(|_| Error::Backpressure("device queue full".into()))
    }
}
