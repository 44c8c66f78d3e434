//! Property-based tests for the envelope evaluator.
//!
//! Checks phase monotonicity, boundedness, and continuity at the
//! held-to-releasing transition over randomized ADSR parameters.

use klang_synth::{Envelope, Instrument, Note, Oscillator, amplitude};
use proptest::prelude::*;

fn instrument(env: Envelope) -> Instrument {
    Instrument::new(env, Oscillator::Sine)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    /// During attack the amplitude never decreases.
    #[test]
    fn attack_is_monotonic(
        attack in 1e-3f64..2.0,
        start in 0.0f64..1.0,
        sustain in 0.0f64..1.0,
        a in 0.0f64..1.0,
        b in 0.0f64..1.0,
    ) {
        let inst = instrument(Envelope {
            attack_time: attack,
            decay_time: 0.5,
            release_time: 0.5,
            start_amplitude: start,
            sustain_amplitude: sustain,
        });
        let note = Note::on(0, 69, 0.0);

        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        let early = amplitude(&note, &inst, lo * attack);
        let late = amplitude(&note, &inst, hi * attack);
        prop_assert!(
            early <= late + 1e-12,
            "attack decreased: {} at {} vs {} at {}", early, lo * attack, late, hi * attack
        );
    }

    /// The amplitude of a held note is bounded by the envelope's levels and
    /// is always finite and non-negative.
    #[test]
    fn held_amplitude_is_bounded(
        attack in 0.0f64..1.0,
        decay in 0.0f64..1.0,
        start in 0.0f64..1.0,
        sustain in 0.0f64..1.0,
        time in 0.0f64..10.0,
    ) {
        let inst = instrument(Envelope {
            attack_time: attack,
            decay_time: decay,
            release_time: 0.5,
            start_amplitude: start,
            sustain_amplitude: sustain,
        });
        let note = Note::on(0, 69, 0.0);

        let level = amplitude(&note, &inst, time);
        prop_assert!(level.is_finite());
        prop_assert!(level >= 0.0);
        prop_assert!(level <= start.max(sustain) + 1e-12);
    }

    /// During release the amplitude never increases, and is exactly zero
    /// once the release duration has elapsed.
    #[test]
    fn release_is_monotonic_and_terminates(
        release in 1e-3f64..1.0,
        sustain in 0.0f64..1.0,
        hold in 1e-3f64..2.0,
        a in 0.0f64..2.0,
        b in 0.0f64..2.0,
    ) {
        let inst = instrument(Envelope {
            attack_time: 0.0,
            decay_time: 0.0,
            release_time: release,
            start_amplitude: 1.0,
            sustain_amplitude: sustain,
        });
        let mut note = Note::on(0, 69, 0.0);
        note.release(hold);

        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        let early = amplitude(&note, &inst, hold + lo * release);
        let late = amplitude(&note, &inst, hold + hi * release);
        prop_assert!(late <= early + 1e-12, "release increased: {} then {}", early, late);

        // `hold + release` can round a hair below the true boundary, so
        // allow float dust at the edge; past it the clamp is exact.
        prop_assert!(amplitude(&note, &inst, hold + release) < 1e-9);
        prop_assert_eq!(amplitude(&note, &inst, hold + release + 1.0), 0.0);
    }

    /// The envelope is continuous at the instant `active` flips: the release
    /// ramp starts exactly where the held curve left off, wherever in the
    /// attack/decay/sustain it was interrupted.
    #[test]
    fn release_start_matches_held_level(
        attack in 0.0f64..0.5,
        decay in 0.0f64..0.5,
        start in 0.0f64..1.0,
        sustain in 0.0f64..1.0,
        hold in 1e-6f64..2.0,
    ) {
        let inst = instrument(Envelope {
            attack_time: attack,
            decay_time: decay,
            release_time: 0.3,
            start_amplitude: start,
            sustain_amplitude: sustain,
        });

        let held = Note::on(0, 69, 0.0);
        let level_held = amplitude(&held, &inst, hold);

        let mut releasing = held;
        releasing.release(hold);
        let level_releasing = amplitude(&releasing, &inst, hold);

        prop_assert!(
            (level_held - level_releasing).abs() < 1e-12,
            "discontinuity at release: held {} vs releasing {}", level_held, level_releasing
        );
    }
}
