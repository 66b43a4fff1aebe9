//! Extended fuzzing tests for whole game sessions.
//!
//! Run with: PROPTEST_CASES=20000 cargo test --release fuzz_maze

#![allow(missing_docs)]
#![allow(clippy::unwrap_used)]

use std::time::Duration;

use proptest::prelude::*;
use rand::rngs::SmallRng;
use rand::SeedableRng;

use gatewalk::hub::InputEvent;
use gatewalk::maze::{
    check_invariants, sequence_length_for_level, Challenge, Color, Direction, GameConfig,
    GridPos, MazeGame, MazeLayout, ProgressRecord, MAX_LIVES,
};
use gatewalk::storage::{KeyValueStore, MemoryStore, SharedStore};

/// Decode a (kind, arg) pair into one session input.
fn decode_op(kind: u8, arg: u8) -> Op {
    match kind {
        0 | 1 | 2 => Op::Input(InputEvent::Move(Direction::ALL[arg as usize % 4])),
        3 | 4 => Op::Input(InputEvent::Color(Color::ALL[arg as usize % 5])),
        5 => Op::Input(InputEvent::StartSequence),
        6 => Op::Input(InputEvent::Confirm),
        7 => Op::Input(InputEvent::NewMaze),
        8 => Op::Input(InputEvent::Reset),
        _ => Op::Tick(Duration::from_millis(u64::from(arg) * 23)),
    }
}

#[derive(Debug, Clone, Copy)]
enum Op {
    Input(InputEvent),
    Tick(Duration),
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(2000))]

    /// Arbitrary input streams never panic and never corrupt the
    /// session invariants. Durable counters always match a fresh load
    /// from the same store.
    #[test]
    fn fuzz_session_random_ops(
        seed in any::<u64>(),
        ops in prop::collection::vec((0u8..10, any::<u8>()), 0..150)
    ) {
        let store = SharedStore::new(MemoryStore::new());
        let config = GameConfig { seed, ..GameConfig::default() };
        let mut game = MazeGame::new(store.clone(), config).unwrap();
        game.init();

        for (kind, arg) in ops {
            match decode_op(kind, arg) {
                Op::Input(input) => {
                    game.handle_input(input);
                }
                Op::Tick(dt) => {
                    game.tick(dt);
                }
            }
            let violations = check_invariants(&game.snapshot());
            prop_assert!(violations.is_empty(), "after op ({kind},{arg}): {violations:?}");
        }

        let record = ProgressRecord::load(&store);
        prop_assert_eq!(record.level, game.level());
        prop_assert_eq!(record.score, game.score());
        prop_assert_eq!(record.lives, game.lives());
    }

    /// Garbage in the store never panics the loader; loaded values are
    /// clamped back into range.
    #[test]
    fn fuzz_progress_load_tolerates_garbage(
        level in any::<String>(),
        score in any::<String>(),
        lives in any::<String>(),
        gates in any::<String>()
    ) {
        let mut store = MemoryStore::new();
        store.set("maze.level", &level);
        store.set("maze.score", &score);
        store.set("maze.lives", &lives);
        store.set("maze.gates", &gates);

        let record = ProgressRecord::load(&store);
        prop_assert!(record.level >= 1);
        prop_assert!(record.lives <= MAX_LIVES);
    }

    /// Layout parsing accepts or rejects arbitrary grids without
    /// panicking, and accepted grids are internally consistent.
    #[test]
    fn fuzz_layout_parse_robust(
        rows in prop::collection::vec("[.#GSEx ]{0,14}", 0..10)
    ) {
        let borrowed: Vec<&str> = rows.iter().map(String::as_str).collect();
        if let Ok(layout) = MazeLayout::parse(&borrowed) {
            prop_assert_eq!(usize::from(layout.height()), borrowed.len());
            prop_assert!(layout.in_bounds(layout.start()));
            prop_assert!(layout.in_bounds(layout.end()));
            prop_assert_eq!(layout.gate_positions().len(), layout.gate_count());
        }
    }

    /// Challenges absorb any op storm without panicking, and entered
    /// input never outgrows the sequence.
    #[test]
    fn fuzz_challenge_op_storm(
        seed in any::<u64>(),
        level in 1u32..60,
        ops in prop::collection::vec((0u8..4, any::<u8>()), 0..80)
    ) {
        let mut rng = SmallRng::seed_from_u64(seed);
        let length = sequence_length_for_level(level);
        let mut challenge = Challenge::new(GridPos::new(2, 3), length, level, &mut rng);

        for (kind, arg) in ops {
            match kind {
                0 => {
                    challenge.start_playback();
                }
                1 => {
                    challenge.advance(Duration::from_millis(u64::from(arg) * 17));
                }
                2 => {
                    challenge.submit(Color::ALL[arg as usize % 5]);
                }
                _ => challenge.fail_attempt(),
            }
            prop_assert!(challenge.input().len() <= challenge.sequence().len());
            prop_assert_eq!(challenge.sequence().len(), length);
        }
    }
}
