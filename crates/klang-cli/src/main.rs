//! klang — real-time synthesizer demo.
//!
//! Plays a looping arpeggio through the default output device until
//! interrupted with Ctrl-C. Waveform, envelope, tempo, and the audio format
//! are all configurable from the command line.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use klang_io::{AudioFormat, CpalBackend, Synth};
use klang_synth::{Envelope, Instrument, Oscillator, key_frequency};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "klang")]
#[command(author, version, about = "Real-time synthesizer demo", long_about = None)]
struct Cli {
    /// Sample rate in Hz
    #[arg(long, default_value = "44100")]
    sample_rate: u32,

    /// Number of audio blocks in flight
    #[arg(long, default_value = "8")]
    blocks: usize,

    /// Samples per block
    #[arg(long, default_value = "512")]
    block_size: usize,

    /// Output device channel count
    #[arg(long, default_value = "2")]
    channels: u16,

    /// Output device name (uses the default device if omitted)
    #[arg(long)]
    device: Option<String>,

    /// Waveform for the demo instrument
    #[arg(long, value_enum, default_value_t = Wave::Sine)]
    wave: Wave,

    /// Attack time in seconds
    #[arg(long, default_value = "0.02")]
    attack: f64,

    /// Decay time in seconds
    #[arg(long, default_value = "0.1")]
    decay: f64,

    /// Release time in seconds
    #[arg(long, default_value = "0.25")]
    release: f64,

    /// Sustain level (0 to 1)
    #[arg(long, default_value = "0.8")]
    sustain: f64,

    /// Pattern tempo in beats per minute
    #[arg(long, default_value = "120")]
    bpm: u32,
}

#[derive(Clone, Copy, ValueEnum)]
enum Wave {
    Sine,
    Square,
    Saw,
    Triangle,
}

impl From<Wave> for Oscillator {
    fn from(wave: Wave) -> Self {
        match wave {
            Wave::Sine => Oscillator::Sine,
            Wave::Square => Oscillator::Square,
            Wave::Saw => Oscillator::Saw,
            Wave::Triangle => Oscillator::Triangle,
        }
    }
}

/// A minor arpeggio over two octaves, up and back down.
const PATTERN: [i32; 8] = [57, 60, 64, 69, 72, 69, 64, 60];

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let format = AudioFormat {
        sample_rate: cli.sample_rate,
        channels: cli.channels,
        block_count: cli.blocks,
        samples_per_block: cli.block_size,
    };

    let backend = match &cli.device {
        Some(name) => CpalBackend::with_device(name.clone()),
        None => CpalBackend::new(),
    };
    let synth = Synth::open(format, &backend).context("opening the output device")?;

    synth.add_channel(
        0,
        Instrument::new(
            Envelope {
                attack_time: cli.attack,
                decay_time: cli.decay,
                release_time: cli.release,
                start_amplitude: 1.0,
                sustain_amplitude: cli.sustain,
            },
            cli.wave.into(),
        ),
    );

    let running = Arc::new(AtomicBool::new(true));
    {
        let running = Arc::clone(&running);
        ctrlc::set_handler(move || running.store(false, Ordering::SeqCst))
            .context("installing the Ctrl-C handler")?;
    }

    // Two pattern steps per beat.
    let step = Duration::from_secs_f64(30.0 / f64::from(cli.bpm));
    println!("playing — Ctrl-C to stop");

    'pattern: loop {
        for key in PATTERN {
            if !running.load(Ordering::SeqCst) {
                break 'pattern;
            }
            tracing::debug!(key, frequency = key_frequency(key), "note on");
            synth.note_on(key, 0);
            std::thread::sleep(step);
            synth.note_off(key, 0);
        }
    }

    println!("\nstopped after {:.1} s of audio", synth.time());
    Ok(())
}
