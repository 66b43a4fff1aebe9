//! Maze layer for Gatewalk.
//!
//! Implements the memory-maze rules on top of the storage layer:
//! - Grid layouts with walls, gates, start and end cells
//! - Color-sequence challenges that guard locked gates
//! - Navigation with collision and gate interception
//! - Scoring, lives and level progression
//! - Progress records persisted between sessions

mod challenge;
mod events;
mod game;
mod gate;
mod invariants;
mod layout;
mod nav;
mod progress;

pub use challenge::{
    reveal_tempo, Challenge, ChallengePhase, Color, Playback, PlaybackEvent, SubmitOutcome,
};
pub use events::{AudioCue, GameEvent};
pub use game::{
    CellView, ChallengeView, ChallengeViewState, GameConfig, MazeGame, MazeSnapshot,
};
pub use gate::{sequence_length_for_level, Gate, GateSet};
pub use invariants::{assert_invariants, check_invariants, InvariantViolation};
pub use layout::{CellKind, GridPos, LayoutCatalog, LayoutError, MazeLayout};
pub use nav::{evaluate_move, shortest_path, Direction, MoveCheck};
pub use progress::{clear_gates, ProgressRecord, StoredGate, MAX_LIVES};
