#![no_main]

use arbitrary::Arbitrary;
use gatewalk::maze::{
    sequence_length_for_level, Challenge, Color, GridPos, SubmitOutcome,
};
use libfuzzer_sys::fuzz_target;
use rand::rngs::SmallRng;
use rand::SeedableRng;
use std::time::Duration;

/// Structured input for challenge state machine fuzzing.
#[derive(Arbitrary, Debug)]
struct ChallengeInput {
    /// Level the challenge belongs to.
    level: u8,
    /// Seed for sequence generation.
    seed: u64,
    /// Operation stream: (op kind, argument).
    ops: Vec<(u8, u16)>,
}

fuzz_target!(|input: ChallengeInput| {
    // Cap inputs to reasonable values to avoid excessive runtime
    let level = u32::from(input.level % 40) + 1;
    let ops: Vec<_> = input.ops.into_iter().take(128).collect();

    let mut rng = SmallRng::seed_from_u64(input.seed);
    let length = sequence_length_for_level(level);
    let mut challenge = Challenge::new(GridPos::new(1, 1), length, level, &mut rng);

    let expected: Vec<Color> = challenge.sequence().to_vec();
    assert_eq!(expected.len(), length);
    assert!(challenge.input().is_empty());

    for (kind, arg) in ops {
        match kind % 4 {
            0 => {
                challenge.start_playback();
            }
            1 => {
                challenge.advance(Duration::from_millis(u64::from(arg % 1000)));
            }
            2 => {
                let color = Color::ALL[usize::from(arg) % 5];
                let outcome = challenge.submit(color);
                if let SubmitOutcome::Mismatch { .. } = outcome {
                    challenge.fail_attempt();
                }
            }
            _ => {
                challenge.fail_attempt();
            }
        }

        // The sequence never changes mid-challenge, input never
        // outruns it, and the lit color only exists while playback
        // is running.
        assert_eq!(challenge.sequence(), expected.as_slice());
        assert!(challenge.input().len() <= length);
        if challenge.input_enabled() {
            assert!(challenge.lit_color().is_none());
        }
    }
});
