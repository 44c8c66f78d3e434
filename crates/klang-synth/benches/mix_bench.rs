//! Benchmarks for the note-mixing hot path.

use criterion::{Criterion, criterion_group, criterion_main};
use klang_synth::{Envelope, Instrument, Oscillator, Rack};
use std::hint::black_box;

fn chord_rack() -> Rack {
    let mut rack = Rack::new();
    for channel in 0..4 {
        rack.add_channel(
            channel,
            Instrument::new(
                Envelope {
                    attack_time: 0.01,
                    decay_time: 0.1,
                    release_time: 0.2,
                    start_amplitude: 1.0,
                    sustain_amplitude: 0.8,
                },
                Oscillator::Sine,
            ),
        );
        for key in [57, 60, 64, 69] {
            rack.note_on(key, channel, 0.0);
        }
    }
    rack
}

fn bench_mix(c: &mut Criterion) {
    let dt = 1.0 / 44100.0;

    c.bench_function("mix_16_notes", |b| {
        let mut rack = chord_rack();
        let mut time = 1.0;
        b.iter(|| {
            time += dt;
            black_box(rack.mix(time))
        });
    });

    c.bench_function("mix_block_512", |b| {
        let mut rack = chord_rack();
        let mut time = 1.0;
        b.iter(|| {
            let mut sum = 0.0;
            for _ in 0..512 {
                sum += rack.mix(time);
                time += dt;
            }
            black_box(sum)
        });
    });
}

criterion_group!(benches, bench_mix);
criterion_main!(benches);
