#![no_main]

//! Full game session fuzzer.
//!
//! This fuzz target drives a complete maze session through its public
//! input surface:
//! 1. Movement in all four directions
//! 2. Color submissions and sequence playback
//! 3. Level confirmation, maze regeneration, and resets
//! 4. Timer ticks of arbitrary size
//!
//! Session invariants are checked after every operation, and the
//! persisted progress record must agree with the live session at the
//! end. This catches integration bugs that the component fuzzers miss.

use arbitrary::Arbitrary;
use gatewalk::maze::{check_invariants, Color, Direction, GameConfig, MazeGame, ProgressRecord};
use gatewalk::hub::InputEvent;
use gatewalk::storage::{MemoryStore, SharedStore};
use libfuzzer_sys::fuzz_target;
use std::time::Duration;

/// A fuzzer-generated session operation.
#[derive(Arbitrary, Debug, Clone)]
enum FuzzOp {
    /// Move the player in a direction.
    Move { dir: u8 },
    /// Submit a color during a challenge.
    Color { idx: u8 },
    /// Start or replay sequence playback.
    StartSequence,
    /// Confirm a level transition or restart after game over.
    Confirm,
    /// Regenerate the maze at the current level.
    NewMaze,
    /// Reset all progress.
    Reset,
    /// Advance game time.
    Tick { ms: u16 },
}

/// Structured input for session fuzzing.
#[derive(Arbitrary, Debug)]
struct SessionInput {
    /// Seed for sequence generation.
    seed: u64,
    /// Operations to apply in order.
    ops: Vec<FuzzOp>,
}

fuzz_target!(|input: SessionInput| {
    // Cap the op count to avoid excessive runtime
    let ops: Vec<_> = input.ops.into_iter().take(64).collect();

    let config = GameConfig {
        seed: input.seed,
        ..GameConfig::default()
    };
    let store = SharedStore::new(MemoryStore::new());
    let mut game = match MazeGame::new(store.clone(), config) {
        Ok(game) => game,
        Err(_) => return,
    };
    game.init();

    let violations = check_invariants(&game.snapshot());
    assert!(
        violations.is_empty(),
        "invariants violated at start: {:?}",
        violations
    );

    for (i, op) in ops.iter().enumerate() {
        match op {
            FuzzOp::Move { dir } => {
                let dir = Direction::ALL[usize::from(dir % 4)];
                game.handle_input(InputEvent::Move(dir));
            }
            FuzzOp::Color { idx } => {
                let color = Color::ALL[usize::from(idx % 5)];
                game.handle_input(InputEvent::Color(color));
            }
            FuzzOp::StartSequence => {
                game.handle_input(InputEvent::StartSequence);
            }
            FuzzOp::Confirm => {
                game.handle_input(InputEvent::Confirm);
            }
            FuzzOp::NewMaze => {
                game.handle_input(InputEvent::NewMaze);
            }
            FuzzOp::Reset => {
                game.handle_input(InputEvent::Reset);
            }
            FuzzOp::Tick { ms } => {
                game.tick(Duration::from_millis(u64::from(ms % 2000)));
            }
        }

        let violations = check_invariants(&game.snapshot());
        assert!(
            violations.is_empty(),
            "invariants violated after op {} ({:?}): {:?}",
            i,
            op,
            violations
        );
    }

    // The persisted record must agree with the live session
    let snapshot = game.snapshot();
    let record = ProgressRecord::load(&store);
    assert_eq!(record.level, snapshot.level, "persisted level diverged");
    assert_eq!(record.score, snapshot.score, "persisted score diverged");
    assert_eq!(record.lives, snapshot.lives, "persisted lives diverged");
});
